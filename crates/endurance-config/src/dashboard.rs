//! Dashboard query defaults.

use serde::{Deserialize, Serialize};

const fn default_window_days() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Project ids accepted by `?project=`. Empty accepts any well-formed id.
    #[serde(default)]
    pub allowed_projects: Vec<String>,

    /// Window used when a route is called without `from`.
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            allowed_projects: Vec::new(),
            default_window_days: default_window_days(),
        }
    }
}
