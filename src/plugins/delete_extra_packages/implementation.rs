use std::time::Duration;

use async_trait::async_trait;

use super::dto::{CleanupSummary, DeleteExtraPackagesOptions};
use super::PLUGIN_NAME;
use crate::config::PlaygroundConfig;
use crate::error::{PlaygroundError, Result};
use crate::github::{ApiResponse, GitHubApi, Package, PackageVersion};
use crate::plugins::Plugin;

const LIST_OK: u16 = 200;
const DELETE_OK: u16 = 204;

/// Deletes every untagged container version owned by the configured user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteExtraPackages;

impl DeleteExtraPackages {
    pub fn new() -> Self {
        Self
    }

    pub fn options(config: &PlaygroundConfig) -> Result<DeleteExtraPackagesOptions> {
        let options: DeleteExtraPackagesOptions = config.plugin_options(PLUGIN_NAME)?;
        if options.user.trim().is_empty() {
            return Err(PlaygroundError::invalid_plugin_options(
                PLUGIN_NAME,
                "user cannot be empty",
            ));
        }
        if options.package_type.trim().is_empty() {
            return Err(PlaygroundError::invalid_plugin_options(
                PLUGIN_NAME,
                "package_type cannot be empty",
            ));
        }
        Ok(options)
    }

    /// Walks packages, then versions, deleting untagged container versions.
    /// The first unexpected status aborts the walk; nothing already deleted
    /// is restored.
    pub async fn clean(
        &self,
        options: &DeleteExtraPackagesOptions,
        client: &dyn GitHubApi,
    ) -> Result<CleanupSummary> {
        let log = client.log();
        let delay = Duration::from_secs(options.delete_delay_secs);
        let mut summary = CleanupSummary::default();

        let listing = client
            .list_user_packages(&options.user, &options.package_type)
            .await?;
        expect_status(&listing, LIST_OK, || {
            format!("list {} packages of {}", options.package_type, options.user)
        })?;
        let packages: Vec<Package> = listing.json()?;

        for package in &packages {
            log.info(&format!("handling package {}", package.name));
            summary.packages_scanned += 1;

            let listing = client
                .list_package_versions(&options.user, &package.package_type, &package.name)
                .await?;
            expect_status(&listing, LIST_OK, || {
                format!("list versions of {}", package.name)
            })?;
            let versions: Vec<PackageVersion> = listing.json()?;

            for version in &versions {
                summary.versions_inspected += 1;
                if !version.is_untagged_container() {
                    log.debug(&format!(
                        "keeping version {} of {} (tags: {:?})",
                        version.id,
                        package.name,
                        version.tags()
                    ));
                    continue;
                }

                log.info(&format!(
                    "deleting untagged version {} of {}",
                    version.id, package.name
                ));
                let deleted = client
                    .delete_package_version(
                        &options.user,
                        &package.package_type,
                        &package.name,
                        version.id,
                    )
                    .await?;
                expect_status(&deleted, DELETE_OK, || {
                    format!("delete version {} of {}", version.id, package.name)
                })?;
                summary.versions_deleted += 1;

                // Crude rate limiting, applied after every deletion.
                tokio::time::sleep(delay).await;
            }
        }

        Ok(summary)
    }
}

fn expect_status(
    response: &ApiResponse,
    expected: u16,
    operation: impl FnOnce() -> String,
) -> Result<()> {
    if response.status == expected {
        Ok(())
    } else {
        Err(PlaygroundError::unexpected_status(
            operation(),
            response.status,
            response.error_detail(),
        ))
    }
}

#[async_trait]
impl Plugin for DeleteExtraPackages {
    async fn run(&self, config: &PlaygroundConfig, client: &dyn GitHubApi) -> i32 {
        let log = client.log();

        let options = match Self::options(config) {
            Ok(options) => options,
            Err(e) => {
                log.error(&e.to_string());
                return 1;
            }
        };

        match self.clean(&options, client).await {
            Ok(summary) => {
                log.info(&format!("{}: {}", PLUGIN_NAME, summary));
                0
            }
            Err(e) => {
                log.error(&e.to_string());
                1
            }
        }
    }
}
