//! Native host configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the in-process scene host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HostConfig {
    /// Add-on module ids the host must behave as if it did not ship,
    /// e.g. `["io_scene_obj"]`.
    #[serde(default)]
    pub disabled_addons: Vec<String>,
}
