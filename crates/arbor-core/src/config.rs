// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration of the tree and the focus router.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration shared by the tree and the focus router.
///
/// Every field has a default, so a RON document only needs to name the fields
/// it overrides: `(focus_wraparound: false)` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Sort children by their `update_order` before each Update pass.
    /// When off, children are updated in child order.
    pub deterministic_update_order: bool,
    /// Reject duplicate insertion into the type index in debug builds.
    pub forbid_duplicate_index_entries: bool,
    /// Directional and tab navigation wrap from the last candidate to the first.
    pub focus_wraparound: bool,
    /// The domain assigned to nodes spawned without one.
    pub default_domain: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            deterministic_update_order: false,
            forbid_duplicate_index_entries: cfg!(debug_assertions),
            focus_wraparound: true,
            default_domain: "default".to_string(),
        }
    }
}

impl TreeConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config = ron::from_str(text)?;
        log::debug!("Loaded tree configuration: {config:?}");
        Ok(config)
    }

    /// Reads and parses a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Serializes the configuration to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty)
    }
}
