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

//! Lookup command - print the hover content for a keyword

use super::{load_workspace, EngineOptions};
use crate::error::CliError;
use hovercraft_core::FileTypeKey;
use std::path::Path;

/// Print the Markdown hover content for `keyword` in documents of
/// `file_type`.
///
/// # Errors
///
/// Returns `Err` if the workspace is not a directory, the file type is
/// blank, or no record matches.
///
/// # Examples
///
/// ```no_run
/// use hovercraft_cli::commands::{lookup, EngineOptions};
/// use std::path::Path;
///
/// # fn main() -> Result<(), hovercraft_cli::error::CliError> {
/// lookup("print", "py", Path::new("."), &EngineOptions::default())?;
/// # Ok(())
/// # }
/// ```
pub fn lookup(
    keyword: &str,
    file_type: &str,
    workspace: &Path,
    options: &EngineOptions,
) -> Result<(), CliError> {
    let key = FileTypeKey::new(file_type.trim());
    if key.as_str().is_empty() {
        return Err(CliError::InvalidInput("file type must not be empty".to_string()));
    }

    let (engine, _report) = load_workspace(workspace, options)?;
    let records = engine.lookup(&key, keyword.trim());
    if records.is_empty() {
        return Err(CliError::NotFound(format!(
            "'{}' has no records for file type '{}'",
            keyword, key
        )));
    }

    println!("{}", engine.format(&records).markup_text);
    Ok(())
}
