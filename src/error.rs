use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("{operation} returned unexpected status {status}: {detail}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        detail: String,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Plugin not found: {name}")]
    PluginNotFound { name: String },

    #[error("Invalid options for plugin {plugin}: {reason}")]
    InvalidPluginOptions { plugin: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        PlaygroundError::ApiError(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        PlaygroundError::ConfigError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        PlaygroundError::Internal(msg.into())
    }

    pub fn plugin_not_found(name: impl Into<String>) -> Self {
        PlaygroundError::PluginNotFound { name: name.into() }
    }

    pub fn invalid_plugin_options(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        PlaygroundError::InvalidPluginOptions {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    pub fn unexpected_status(
        operation: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        PlaygroundError::UnexpectedStatus {
            operation: operation.into(),
            status,
            detail: detail.into(),
        }
    }
}
