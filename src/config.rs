use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::auth::Token;
use crate::error::{PlaygroundError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const CONFIG_PATH_ENV: &str = "PLAYGROUND_CONFIG";
const TOKEN_ENV: &str = "GITHUB_TOKEN";
const BASE_URL_ENV: &str = "PLAYGROUND_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    pub token: Token,
    #[serde(default)]
    pub enabled: EnabledPlugins,
    #[serde(default)]
    pub plugins: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub client: ClientConfig,
    // Written by external tooling to mark a record that must not be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("github-playground/", env!("CARGO_PKG_VERSION")).to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Plugin name to enabled flag, kept in the order the entries appear in the
/// configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledPlugins(Vec<(String, bool)>);

impl EnabledPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a flag. Re-inserting a name updates it in place.
    pub fn insert(&mut self, name: impl Into<String>, enabled: bool) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = enabled,
            None => self.0.push((name, enabled)),
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|(existing, enabled)| existing == name && *enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    pub fn enabled_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for EnabledPlugins {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut plugins = Self::new();
        for (name, enabled) in iter {
            plugins.insert(name, enabled);
        }
        plugins
    }
}

impl Serialize for EnabledPlugins {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, enabled) in &self.0 {
            map.serialize_entry(name, enabled)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EnabledPlugins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EnabledVisitor;

        impl<'de> Visitor<'de> for EnabledVisitor {
            type Value = EnabledPlugins;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of plugin names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut plugins = EnabledPlugins::new();
                while let Some((name, enabled)) = access.next_entry::<String, bool>()? {
                    plugins.insert(name, enabled);
                }
                Ok(plugins)
            }
        }

        deserializer.deserialize_map(EnabledVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl PlaygroundConfig {
    /// Loads the configuration from `PLAYGROUND_CONFIG` (or the default path)
    /// and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PlaygroundError::config_error(format!(
                "No config exists in path {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PlaygroundError::config_error(format!("Failed to read config file: {}", e)))?;

        let config = Self::parse(&content, ConfigFormat::from_path(path))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: PlaygroundConfig = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                PlaygroundError::config_error(format!("Failed to parse config file: {}", e))
            })?,
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
                PlaygroundError::config_error(format!("Failed to parse config file: {}", e))
            })?,
        };

        if config.error == Some(true) {
            return Err(PlaygroundError::config_error(
                "Config record is flagged as errored",
            ));
        }

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.token = Token::new(token);
            }
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.client.base_url = base_url.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(PlaygroundError::config_error("token cannot be empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(PlaygroundError::config_error(
                "client.timeout_secs must be greater than zero",
            ));
        }
        if self.client.base_url.trim().is_empty() {
            return Err(PlaygroundError::config_error("client.base_url cannot be empty"));
        }
        Ok(())
    }

    /// Deserializes the options record stored under `plugins.<name>`.
    pub fn plugin_options<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .plugins
            .get(name)
            .cloned()
            .ok_or_else(|| PlaygroundError::invalid_plugin_options(name, "no options configured"))?;

        serde_json::from_value(value)
            .map_err(|e| PlaygroundError::invalid_plugin_options(name, e.to_string()))
    }
}
