use std::sync::Arc;

use crate::config::PlaygroundConfig;
use crate::error::{PlaygroundError, Result};
use crate::github::{GitHubApi, GitHubClient};
use crate::logging::LogSink;
use crate::plugins::{PluginRegistration, PluginRegistry};

/// Exit codes of the plugins that ran, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: Vec<(String, i32)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, code: i32) {
        let name = name.into();
        match self.results.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = code,
            None => self.results.push((name, code)),
        }
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.results
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, code)| *code)
    }

    pub fn results(&self) -> &[(String, i32)] {
        &self.results
    }

    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, code)| *code != 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn exit_code(&self) -> i32 {
        aggregate(self.results.iter().map(|(_, code)| *code))
    }
}

/// 1 if any code is nonzero, otherwise 0.
pub fn aggregate(codes: impl IntoIterator<Item = i32>) -> i32 {
    if codes.into_iter().any(|code| code != 0) {
        1
    } else {
        0
    }
}

pub struct Runner {
    registry: PluginRegistry,
    log: Arc<dyn LogSink>,
}

impl Runner {
    pub fn new(registry: PluginRegistry, log: Arc<dyn LogSink>) -> Self {
        Self { registry, log }
    }

    /// Loads the configuration from disk, talks to the real GitHub API and
    /// returns the process exit code. The file is read on the blocking pool.
    pub async fn run(&self) -> i32 {
        self.log.info("Loading config...");
        let loaded = tokio::task::spawn_blocking(PlaygroundConfig::load)
            .await
            .unwrap_or_else(|e| {
                Err(PlaygroundError::internal(format!(
                    "config loader did not finish: {}",
                    e
                )))
            });

        let log = Arc::clone(&self.log);
        self.run_with(loaded, move |config| {
            let client: Arc<dyn GitHubApi> = Arc::new(GitHubClient::from_config(config, log)?);
            Ok(client)
        })
        .await
    }

    /// Runs every enabled plugin against the client built by `connect`.
    ///
    /// `connect` is only called once the configuration loaded cleanly. Every
    /// failure on the way is logged and reported as exit code 1.
    pub async fn run_with<F>(&self, loaded: Result<PlaygroundConfig>, connect: F) -> i32
    where
        F: FnOnce(&PlaygroundConfig) -> Result<Arc<dyn GitHubApi>>,
    {
        let config = match loaded {
            Ok(config) => Arc::new(config),
            Err(e) => {
                self.log.error(&e.to_string());
                return 1;
            }
        };

        match self.execute(config, connect).await {
            Ok(report) => report.exit_code(),
            Err(e) => {
                self.log.error(&e.to_string());
                1
            }
        }
    }

    async fn execute<F>(&self, config: Arc<PlaygroundConfig>, connect: F) -> Result<RunReport>
    where
        F: FnOnce(&PlaygroundConfig) -> Result<Arc<dyn GitHubApi>>,
    {
        let client = connect(&config)?;
        let plugins = self.resolve(&config)?;
        Ok(self.run_plugins(plugins, config, client).await)
    }

    pub fn resolve(&self, config: &PlaygroundConfig) -> Result<Vec<PluginRegistration>> {
        for name in config.enabled.enabled_names() {
            self.log.info(&format!("Enabling plugin: {}", name));
        }
        self.registry.resolve_enabled(&config.enabled)
    }

    /// Runs plugins one at a time. Each plugin gets its own task so a panic
    /// is recorded as a failure instead of tearing down the run.
    pub async fn run_plugins(
        &self,
        plugins: Vec<PluginRegistration>,
        config: Arc<PlaygroundConfig>,
        client: Arc<dyn GitHubApi>,
    ) -> RunReport {
        let mut report = RunReport::new();

        for PluginRegistration { name, plugin } in plugins {
            self.log.info(&format!("Running plugin: {}", name));

            let config = Arc::clone(&config);
            let client = Arc::clone(&client);
            let handle = tokio::spawn(async move { plugin.run(&config, client.as_ref()).await });

            let code = match handle.await {
                Ok(code) => code,
                Err(e) => {
                    self.log
                        .error(&format!("Plugin {} did not finish: {}", name, e));
                    1
                }
            };
            report.record(name, code);
        }

        let failed = report.failed().len();
        if failed > 0 {
            self.log
                .info(&format!("At least {} plugins failed.", failed));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_is_zero_only_when_everything_passed() {
        assert_eq!(aggregate(Vec::new()), 0);
        assert_eq!(aggregate([0, 0, 0]), 0);
        assert_eq!(aggregate([0, 2, 0]), 1);
        assert_eq!(aggregate([-1]), 1);
    }

    #[test]
    fn aggregate_ignores_order() {
        assert_eq!(aggregate([1, 0]), aggregate([0, 1]));
    }

    #[test]
    fn report_keeps_run_order_and_failures() {
        let mut report = RunReport::new();
        report.record("first", 0);
        report.record("second", 3);
        assert_eq!(report.results().len(), 2);
        assert_eq!(report.get("second"), Some(3));
        assert_eq!(report.get("missing"), None);
        assert_eq!(report.failed(), vec!["second"]);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.results()[0].0, "first");
    }
}
