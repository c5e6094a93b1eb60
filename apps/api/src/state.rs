use salary_folders_application::{
    PayrollOfficerService, SalaryCatalogService, SalaryFolderProvisioner,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub payroll_officer_service: PayrollOfficerService,
    pub provisioner: SalaryFolderProvisioner,
    pub catalog_service: SalaryCatalogService,
}
