use async_trait::async_trait;

use crate::config::PlaygroundConfig;
use crate::github::GitHubApi;

pub mod delete_extra_packages;
pub mod dto;
pub mod manager;

pub use delete_extra_packages::DeleteExtraPackages;
pub use dto::PluginRegistration;
pub use manager::PluginRegistry;

/// A maintenance task run against the GitHub API.
///
/// Returns `0` on success and any other value on failure. Implementations
/// must handle their own errors: anything that goes wrong is logged through
/// `client.log()` and turned into a nonzero code.
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn run(&self, config: &PlaygroundConfig, client: &dyn GitHubApi) -> i32;
}
