use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use salary_folders_core::AppError;
use salary_folders_infrastructure::SharePointConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_ALLOWED_ORIGIN: &str = "https://localhost:4321";

#[derive(Debug, Clone)]
pub enum PlatformProviderConfig {
    SharePoint(SharePointConfig),
    InMemory,
}

impl PlatformProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SharePoint(_) => "sharepoint",
            Self::InMemory => "in_memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub allowed_origin: String,
    pub library_name: String,
    pub payroll_officers_group_name: String,
    pub platform_provider: PlatformProviderConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(7071);

        let library_name = required_non_empty_env(&lookup, "SALARIES_LIB_NAME")?;
        let payroll_officers_group_name =
            required_non_empty_env(&lookup, "PAYROLL_OFFICERS_GROUP_NAME")?;

        let platform_provider = match lookup("PLATFORM_PROVIDER")
            .unwrap_or_else(|| "sharepoint".to_owned())
            .as_str()
        {
            "sharepoint" => {
                let site_url = required_non_empty_env(&lookup, "SITE_URL")?;
                let site_url = Url::parse(site_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid SITE_URL: {error}"))
                })?;
                PlatformProviderConfig::SharePoint(SharePointConfig {
                    site_url,
                    client_id: required_non_empty_env(&lookup, "CLIENT_ID")?,
                    client_secret: required_non_empty_env(&lookup, "CLIENT_SECRET")?,
                    realm: lookup("SHAREPOINT_REALM").filter(|value| !value.trim().is_empty()),
                })
            }
            "in_memory" => PlatformProviderConfig::InMemory,
            other => {
                return Err(AppError::Validation(format!(
                    "PLATFORM_PROVIDER must be either 'sharepoint' or 'in_memory', got '{other}'"
                )));
            }
        };

        let allowed_origin = lookup("ALLOWED_ORIGIN")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| match &platform_provider {
                PlatformProviderConfig::SharePoint(sharepoint) => {
                    sharepoint.site_url.origin().ascii_serialization()
                }
                PlatformProviderConfig::InMemory => DEFAULT_ALLOWED_ORIGIN.to_owned(),
            });

        Ok(Self {
            api_host,
            api_port,
            allowed_origin,
            library_name,
            payroll_officers_group_name,
            platform_provider,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = required_env(lookup, name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
