pub mod dto;
pub mod implementation;

pub use dto::{CleanupSummary, DeleteExtraPackagesOptions};
pub use implementation::DeleteExtraPackages;

pub const PLUGIN_NAME: &str = "delete_extra_packages";
