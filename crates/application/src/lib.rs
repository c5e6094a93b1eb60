//! Application services and ports.

#![forbid(unsafe_code)]

mod library_settings;
mod payroll_officer_service;
mod platform_ports;
mod resolvers;
mod salary_catalog_service;
mod salary_folder_provisioner;

#[cfg(test)]
mod test_support;

pub use library_settings::LibrarySettings;
pub use payroll_officer_service::PayrollOfficerService;
pub use platform_ports::{DocumentLibrary, PrincipalDirectory, UserMemberships};
pub use resolvers::{GroupResolver, IdentityResolver};
pub use salary_catalog_service::{CallerContext, SalaryCatalogService};
pub use salary_folder_provisioner::{
    ProvisionedSalaryFolder, ProvisioningError, SalaryFolderProvisioner,
};
