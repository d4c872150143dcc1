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

//! Hover command - resolve the word at a position of a source file

use super::{load_workspace, read_file, EngineOptions};
use crate::error::CliError;
use colored::Colorize;
use std::path::Path;

/// Character offset of a 1-based `line` and `column` in `text`.
///
/// Columns count characters; a trailing `\r` is not part of the line.
///
/// ```
/// use hovercraft_cli::commands::char_offset;
///
/// assert_eq!(char_offset("ab\ncd", 2, 2), Ok(4));
/// assert!(char_offset("ab\ncd", 3, 1).is_err());
/// ```
pub fn char_offset(text: &str, line: usize, column: usize) -> Result<usize, String> {
    if line == 0 || column == 0 {
        return Err("lines and columns start at 1".to_string());
    }

    let mut offset = 0;
    for (idx, raw) in text.split('\n').enumerate() {
        let content = raw.strip_suffix('\r').unwrap_or(raw);
        if idx + 1 == line {
            let width = content.chars().count();
            if column > width {
                return Err(format!("line {} has {} character(s)", line, width));
            }
            return Ok(offset + column - 1);
        }
        offset += raw.chars().count() + 1;
    }
    Err(format!("file has {} line(s)", text.split('\n').count()))
}

/// Resolve and print the hover content for the word at `line`:`column` of
/// `file`. The file's extension selects the tables.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read, the position is outside it, or
/// no keyword with records sits there.
pub fn hover(
    file: &Path,
    line: usize,
    column: usize,
    workspace: &Path,
    options: &EngineOptions,
) -> Result<(), CliError> {
    let text = read_file(file)?;
    let offset = char_offset(&text, line, column)
        .map_err(|reason| CliError::position(file, line, column, reason))?;

    let (engine, _report) = load_workspace(workspace, options)?;
    let Some(result) = engine.hover_for_path(file, &text, offset) else {
        return Err(CliError::NotFound(format!(
            "no documented keyword at {}:{}:{}",
            file.display(),
            line,
            column
        )));
    };

    let line_start = offset + 1 - column;
    println!(
        "{} {} ({} record(s), columns {}-{})",
        "✓".green().bold(),
        result.keyword.bold(),
        result.matches,
        result.start - line_start + 1,
        result.end - line_start
    );
    println!();
    println!("{}", result.content.markup_text);
    Ok(())
}
