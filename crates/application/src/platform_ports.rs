mod directory;
mod library;

pub use directory::{PrincipalDirectory, UserMemberships};
pub use library::DocumentLibrary;
