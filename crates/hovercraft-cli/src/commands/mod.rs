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

//! CLI command implementations

mod check;
mod completion;
mod hover;
mod lookup;

pub use check::{check, CheckOptions};
pub use completion::{generate_completion, installation_instructions};
pub use hover::{char_offset, hover};
pub use lookup::lookup;

use crate::error::CliError;
use hovercraft_core::{EngineConfig, HoverEngine, ScanReport};
use std::fs;
use std::path::Path;
use tracing::info;

/// Default maximum size of a source file read by `hover` (64 MB).
/// Can be overridden via the HOVERCRAFT_MAX_FILE_SIZE environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

fn get_max_file_size() -> u64 {
    std::env::var("HOVERCRAFT_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// How tables are loaded and rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Table directories; empty means the defaults.
    pub table_directories: Vec<String>,
    /// Match keywords case-insensitively.
    pub ignore_case: bool,
    /// Add a `Source:` line to each record.
    pub show_source: bool,
}

impl EngineOptions {
    fn to_config(&self) -> EngineConfig {
        let mut config = EngineConfig {
            case_sensitive: !self.ignore_case,
            show_source: self.show_source,
            ..EngineConfig::default()
        };
        if !self.table_directories.is_empty() {
            config.table_directories = self.table_directories.clone();
        }
        config
    }
}

/// Build an engine and load every table under `workspace`.
///
/// # Errors
///
/// Returns [`CliError::Workspace`] when `workspace` is not a directory.
pub fn load_workspace(
    workspace: &Path,
    options: &EngineOptions,
) -> Result<(HoverEngine, ScanReport), CliError> {
    if !workspace.is_dir() {
        return Err(CliError::Workspace {
            path: workspace.to_path_buf(),
        });
    }
    let engine = HoverEngine::new(options.to_config());
    let report = engine.scan(workspace);
    info!(
        "Loaded {} records from {} tables under {}",
        report.records(),
        report.files.len(),
        workspace.display()
    );
    Ok((engine, report))
}

/// Read a source file with size validation.
///
/// # Errors
///
/// Returns `Err` if the file is missing, larger than the limit, or not UTF-8.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;
    let max = get_max_file_size();
    if metadata.len() > max {
        return Err(CliError::FileTooLarge {
            path: path.to_path_buf(),
            actual: metadata.len(),
            max,
        });
    }
    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// `path` relative to `root` when it lies below it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
