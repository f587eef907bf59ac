use std::fmt;
use std::sync::Arc;

use super::Plugin;

/// A plugin picked for this run, keyed by the name it was enabled under.
#[derive(Clone)]
pub struct PluginRegistration {
    pub name: String,
    pub plugin: Arc<dyn Plugin>,
}

impl fmt::Debug for PluginRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
