use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a request that reached the server, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub data: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, data: serde_json::Value) -> Self {
        Self {
            url: String::new(),
            status,
            headers: HashMap::new(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    pub fn error_body(&self) -> Option<ApiErrorBody> {
        serde_json::from_value(self.data.clone()).ok()
    }

    /// Human readable summary of a failed response: the API's message and
    /// documentation link when present, otherwise the raw body.
    pub fn error_detail(&self) -> String {
        match self.error_body() {
            Some(ApiErrorBody {
                message,
                documentation_url: Some(docs),
            }) => format!("{} - {}", message, docs),
            Some(ApiErrorBody { message, .. }) => message,
            None => match &self.data {
                serde_json::Value::Null => "no response body".to_string(),
                serde_json::Value::String(text) if text.is_empty() => {
                    "no response body".to_string()
                }
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageVisibility {
    Public,
    Private,
    Internal,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageOwner {
    pub login: String,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub package_type: String,
    #[serde(default)]
    pub visibility: Option<PackageVisibility>,
    #[serde(default)]
    pub owner: Option<PackageOwner>,
    #[serde(default)]
    pub version_count: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerMetadata {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub container: Option<ContainerMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersion {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub package_html_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<PackageMetadata>,
}

impl PackageVersion {
    /// True only for a container version that carries an explicit, empty tag
    /// list. Missing metadata or a missing tag list count as tagged.
    pub fn is_untagged_container(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.container.as_ref())
            .and_then(|container| container.tags.as_ref())
            .is_some_and(|tags| tags.is_empty())
    }

    pub fn tags(&self) -> &[String] {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.container.as_ref())
            .and_then(|container| container.tags.as_deref())
            .unwrap_or(&[])
    }
}
