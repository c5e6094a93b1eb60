pub mod catalog;
pub mod health;
pub mod salary_folders;
