pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod plugins;
pub mod runner;

pub use auth::Token;
pub use config::PlaygroundConfig;
pub use error::{PlaygroundError, Result};
pub use github::{GitHubApi, GitHubClient};
pub use logging::{LogSink, TracingSink};
pub use plugins::{Plugin, PluginRegistry};
pub use runner::{RunReport, Runner};
