#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use github_playground::github::ApiResponse;
use github_playground::{GitHubApi, LogSink, Plugin, PlaygroundConfig, Result};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl LogSink for RecordingSink {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPackages {
        user: String,
        package_type: String,
    },
    ListVersions {
        user: String,
        package_type: String,
        package: String,
    },
    Delete {
        user: String,
        package_type: String,
        package: String,
        version_id: u64,
    },
}

/// Scripted stand-in for the GitHub API. Packages without scripted versions
/// answer 404; deletions answer 204 unless overridden.
pub struct FakeGitHub {
    packages: ApiResponse,
    versions: HashMap<String, ApiResponse>,
    delete_status: HashMap<u64, u16>,
    calls: Mutex<Vec<Call>>,
    pub log: Arc<RecordingSink>,
}

impl FakeGitHub {
    pub fn new(packages: Value) -> Self {
        Self::with_packages_response(200, packages)
    }

    pub fn with_packages_response(status: u16, data: Value) -> Self {
        Self {
            packages: ApiResponse::new(status, data),
            versions: HashMap::new(),
            delete_status: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            log: RecordingSink::new(),
        }
    }

    pub fn with_versions(self, package: &str, versions: Value) -> Self {
        self.with_versions_response(package, 200, versions)
    }

    pub fn with_versions_response(mut self, package: &str, status: u16, data: Value) -> Self {
        self.versions
            .insert(package.to_string(), ApiResponse::new(status, data));
        self
    }

    pub fn with_delete_status(mut self, version_id: u64, status: u16) -> Self {
        self.delete_status.insert(version_id, status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted_ids(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { version_id, .. } => Some(version_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    fn log(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    async fn list_user_packages(&self, username: &str, package_type: &str) -> Result<ApiResponse> {
        self.record(Call::ListPackages {
            user: username.to_string(),
            package_type: package_type.to_string(),
        });
        Ok(self.packages.clone())
    }

    async fn list_package_versions(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
    ) -> Result<ApiResponse> {
        self.record(Call::ListVersions {
            user: username.to_string(),
            package_type: package_type.to_string(),
            package: package_name.to_string(),
        });
        Ok(self.versions.get(package_name).cloned().unwrap_or_else(|| {
            ApiResponse::new(404, json!({ "message": "Package not found." }))
        }))
    }

    async fn delete_package_version(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<ApiResponse> {
        self.record(Call::Delete {
            user: username.to_string(),
            package_type: package_type.to_string(),
            package: package_name.to_string(),
            version_id,
        });
        let status = self.delete_status.get(&version_id).copied().unwrap_or(204);
        Ok(ApiResponse::new(status, Value::Null))
    }
}

/// Plugin returning a fixed code and counting how often it ran.
#[derive(Debug)]
pub struct FixedPlugin {
    code: i32,
    runs: AtomicUsize,
    order: Option<Arc<Mutex<Vec<i32>>>>,
}

impl FixedPlugin {
    pub fn new(code: i32) -> Arc<Self> {
        Arc::new(Self {
            code,
            runs: AtomicUsize::new(0),
            order: None,
        })
    }

    /// Also appends its code to `order` when it runs.
    pub fn tracking(code: i32, order: Arc<Mutex<Vec<i32>>>) -> Arc<Self> {
        Arc::new(Self {
            code,
            runs: AtomicUsize::new(0),
            order: Some(order),
        })
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Plugin for FixedPlugin {
    async fn run(&self, _config: &PlaygroundConfig, _client: &dyn GitHubApi) -> i32 {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Some(order) = &self.order {
            order.lock().unwrap().push(self.code);
        }
        self.code
    }
}

#[derive(Debug, Default)]
pub struct PanickingPlugin;

#[async_trait]
impl Plugin for PanickingPlugin {
    async fn run(&self, _config: &PlaygroundConfig, _client: &dyn GitHubApi) -> i32 {
        panic!("plugin blew up");
    }
}

pub fn config_from_json(value: Value) -> PlaygroundConfig {
    serde_json::from_value(value).unwrap()
}
