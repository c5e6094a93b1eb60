use std::sync::Arc;

use salary_folders_application::{
    DocumentLibrary, LibrarySettings, PayrollOfficerService, PrincipalDirectory,
    SalaryCatalogService, SalaryFolderProvisioner,
};
use salary_folders_core::AppError;
use salary_folders_infrastructure::{InMemoryContentPlatform, SharePointRestPlatform};
use tracing::info;

use crate::api_config::{ApiConfig, PlatformProviderConfig};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let settings = LibrarySettings::new(
        config.library_name.as_str(),
        config.payroll_officers_group_name.as_str(),
    )?;

    let (directory, library) = match &config.platform_provider {
        PlatformProviderConfig::SharePoint(sharepoint) => {
            info!(site = sharepoint.site_url.as_str(), "using sharepoint platform");
            let platform = Arc::new(SharePointRestPlatform::new(
                reqwest::Client::new(),
                sharepoint.clone(),
            ));
            platform_ports(platform)
        }
        PlatformProviderConfig::InMemory => {
            info!("using in-memory platform with sample data");
            platform_ports(Arc::new(InMemoryContentPlatform::with_sample_data(
                &settings,
            )?))
        }
    };

    Ok(app_state_from_platform(directory, library, settings))
}

fn platform_ports<P>(platform: Arc<P>) -> (Arc<dyn PrincipalDirectory>, Arc<dyn DocumentLibrary>)
where
    P: PrincipalDirectory + DocumentLibrary + 'static,
{
    let directory: Arc<dyn PrincipalDirectory> = platform.clone();
    (directory, platform)
}

pub fn app_state_from_platform(
    directory: Arc<dyn PrincipalDirectory>,
    library: Arc<dyn DocumentLibrary>,
    settings: LibrarySettings,
) -> AppState {
    let payroll_officer_service = PayrollOfficerService::new(directory.clone(), settings.clone());

    AppState {
        provisioner: SalaryFolderProvisioner::new(
            directory.clone(),
            library.clone(),
            settings.clone(),
        ),
        catalog_service: SalaryCatalogService::new(
            directory,
            library,
            payroll_officer_service.clone(),
            settings,
        ),
        payroll_officer_service,
    }
}
