use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;
use url::form_urlencoded;

use super::*;

const ACCESS_CONTROL_URL: &str = "https://accounts.accesscontrol.windows.net";
const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// App-only access token kept until shortly before it expires.
pub(super) struct CachedToken {
    access_token: String,
    refresh_after: Instant,
}

/// Instant after which a token with `lifetime` must be refreshed.
/// Lifetimes too large to represent refresh immediately.
pub(super) fn refresh_deadline(now: Instant, lifetime: Duration) -> Instant {
    now.checked_add(lifetime.saturating_sub(EXPIRY_MARGIN)).unwrap_or(now)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: ExpiresIn,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(u64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> u64 {
        match self {
            Self::Seconds(seconds) => *seconds,
            Self::Text(text) => text.trim().parse().unwrap_or_default(),
        }
    }
}

/// Extracts the realm from a `WWW-Authenticate: Bearer realm="..."` challenge.
pub(super) fn parse_realm(challenge: &str) -> Option<String> {
    let start = challenge.find("realm=\"")? + "realm=\"".len();
    let length = challenge[start..].find('"')?;
    let realm = &challenge[start..start + length];

    (!realm.is_empty()).then(|| realm.to_owned())
}

impl SharePointRestPlatform {
    pub(super) async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached
            .as_ref()
            .filter(|token| token.refresh_after > Instant::now())
        {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn realm(&self) -> AppResult<&str> {
        self.realm
            .get_or_try_init(|| self.discover_realm())
            .await
            .map(String::as_str)
    }

    async fn discover_realm(&self) -> AppResult<String> {
        let site = self.config.site_url.as_str().trim_end_matches('/');
        let response = self
            .http_client
            .get(format!("{site}/_vti_bin/client.svc"))
            .header(AUTHORIZATION, "Bearer")
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("realm discovery failed: {error}")))?;

        let realm = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_realm)
            .ok_or_else(|| {
                AppError::Upstream(format!(
                    "site '{site}' did not advertise a bearer realm (status {})",
                    response.status().as_u16()
                ))
            })?;

        debug!(realm = %realm, "discovered tenant realm");
        Ok(realm)
    }

    async fn request_token(&self) -> AppResult<CachedToken> {
        let realm = self.realm().await?;
        let host = self.config.site_url.host_str().ok_or_else(|| {
            AppError::Internal("site URL must contain a host".to_owned())
        })?;

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair(
                "client_id",
                format!("{}@{realm}", self.config.client_id).as_str(),
            )
            .append_pair("client_secret", self.config.client_secret.as_str())
            .append_pair(
                "resource",
                format!("{SHAREPOINT_PRINCIPAL}/{host}@{realm}").as_str(),
            )
            .finish();

        let response = self
            .http_client
            .post(format!("{ACCESS_CONTROL_URL}/{realm}/tokens/OAuth/2"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("token request failed: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "token request was rejected with status {}",
                status.as_u16()
            )));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|error| AppError::Upstream(format!("unexpected token response: {error}")))?;
        let lifetime = Duration::from_secs(token.expires_in.seconds());
        debug!(
            expires_in_seconds = lifetime.as_secs(),
            "acquired app-only access token"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_after: refresh_deadline(Instant::now(), lifetime),
        })
    }
}
