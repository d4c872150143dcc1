// Dweve Hovercraft - Table-driven hover documentation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Server settings.
//!
//! Clients pass settings either as `initializationOptions` or through
//! `workspace/didChangeConfiguration`. Both carry the same camelCase object,
//! optionally wrapped in a `hovercraft` section:
//!
//! ```json
//! {
//!   "hovercraft": {
//!     "caseSensitive": true,
//!     "tableDirectories": [".vscode", ".data"],
//!     "showSource": false,
//!     "logLevel": "info"
//!   }
//! }
//! ```

use crate::constants::CONFIG_SECTION;
use hovercraft_core::EngineConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Settings rejected by [`ServerConfig::from_value`].
#[derive(Debug, Error)]
#[error("invalid hovercraft settings: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

/// Engine settings plus server-only options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Settings forwarded to the hover engine.
    #[serde(flatten)]
    pub engine: EngineConfig,

    /// Log filter applied at runtime (`"debug"`, `"hovercraft_core=trace"`, ...).
    #[serde(default)]
    pub log_level: Option<String>,
}

impl ServerConfig {
    /// Read settings from a client-supplied JSON value.
    ///
    /// `null` yields the defaults; a `hovercraft` section is unwrapped when
    /// present.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ConfigError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(value) => value.get(CONFIG_SECTION).unwrap_or(value),
        };
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_default() {
        assert_eq!(ServerConfig::from_value(None).unwrap(), ServerConfig::default());
        assert_eq!(
            ServerConfig::from_value(Some(&Value::Null)).unwrap(),
            ServerConfig::default()
        );
        assert_eq!(
            ServerConfig::from_value(Some(&json!({"hovercraft": null}))).unwrap(),
            ServerConfig::default()
        );
    }

    #[test]
    fn test_flat_settings() {
        let config = ServerConfig::from_value(Some(&json!({
            "caseSensitive": false,
            "logLevel": "debug"
        })))
        .unwrap();
        assert!(!config.engine.case_sensitive);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.engine.table_directories, vec![".vscode", ".data"]);
    }

    #[test]
    fn test_section_is_unwrapped() {
        let config = ServerConfig::from_value(Some(&json!({
            "hovercraft": {"showSource": true, "tableDirectories": ["docs"]}
        })))
        .unwrap();
        assert!(config.engine.show_source);
        assert_eq!(config.engine.table_directories, vec!["docs"]);
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let err = ServerConfig::from_value(Some(&json!({"caseSensitive": "yes"}))).unwrap_err();
        assert!(err.to_string().contains("invalid hovercraft settings"));
    }
}
