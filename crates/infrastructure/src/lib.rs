//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_content_platform;
mod sharepoint_rest_platform;

pub use in_memory_content_platform::{
    InMemoryContentPlatform, SAMPLE_PAYROLL_OFFICER, SAMPLE_SITE_ADMIN,
};
pub use sharepoint_rest_platform::{SharePointConfig, SharePointRestPlatform};
