use std::fmt;

use serde::{Deserialize, Serialize};

fn default_package_type() -> String {
    "container".to_string()
}

const fn default_delete_delay_secs() -> u64 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteExtraPackagesOptions {
    pub user: String,
    #[serde(default = "default_package_type")]
    pub package_type: String,
    #[serde(default = "default_delete_delay_secs")]
    pub delete_delay_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
    pub packages_scanned: usize,
    pub versions_inspected: usize,
    pub versions_deleted: usize,
}

impl fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {} packages, inspected {} versions, deleted {} untagged versions",
            self.packages_scanned, self.versions_inspected, self.versions_deleted
        )
    }
}
