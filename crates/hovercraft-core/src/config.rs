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

//! Engine configuration.
//!
//! Hosts receive settings as JSON (LSP `initializationOptions`,
//! `workspace/didChangeConfiguration`) and deserialize them into
//! [`EngineConfig`]. Field names are camelCase and every field has a default,
//! so `{}` is a valid configuration.
//!
//! ```
//! use hovercraft_core::EngineConfig;
//!
//! let config: EngineConfig =
//!     serde_json::from_str(r#"{"caseSensitive": false, "showSource": true}"#).unwrap();
//! assert!(!config.case_sensitive);
//! assert!(config.show_source);
//! assert_eq!(config.table_directories, vec![".vscode", ".data"]);
//! ```

use crate::format::FormatOptions;
use crate::index::CaseSensitivity;
use serde::{Deserialize, Serialize};

/// Directories (relative to a workspace root) searched for table files.
pub const DEFAULT_TABLE_DIRECTORIES: &[&str] = &[".vscode", ".data"];

/// Largest table file that will be read (16 MiB).
pub const DEFAULT_MAX_TABLE_SIZE: u64 = 16 * 1024 * 1024;

fn default_case_sensitive() -> bool {
    true
}

fn default_table_directories() -> Vec<String> {
    DEFAULT_TABLE_DIRECTORIES.iter().map(|d| d.to_string()).collect()
}

fn default_max_table_size() -> u64 {
    DEFAULT_MAX_TABLE_SIZE
}

/// Settings consumed by [`HoverEngine`](crate::HoverEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Match keywords exactly (`true`) or by lowercased form (`false`).
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Directory names that hold table files.
    #[serde(default = "default_table_directories")]
    pub table_directories: Vec<String>,

    /// Add a provenance line to each hover block.
    #[serde(default)]
    pub show_source: bool,

    /// Size limit in bytes; larger table files are reported and skipped.
    #[serde(default = "default_max_table_size")]
    pub max_table_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            table_directories: default_table_directories(),
            show_source: false,
            max_table_size: default_max_table_size(),
        }
    }
}

impl EngineConfig {
    /// Case mode for the keyword index.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::from_flag(self.case_sensitive)
    }

    /// Formatter options.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            show_provenance: self.show_source,
        }
    }

    /// Table directories with blank entries and duplicates removed.
    ///
    /// An empty list falls back to the defaults.
    pub fn normalized_table_directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> = Vec::new();
        for dir in &self.table_directories {
            let dir = dir.trim().trim_end_matches(['/', '\\']);
            if !dir.is_empty() && !dirs.iter().any(|d| d == dir) {
                dirs.push(dir.to_string());
            }
        }
        if dirs.is_empty() {
            default_table_directories()
        } else {
            dirs
        }
    }
}
