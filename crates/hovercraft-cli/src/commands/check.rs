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

//! Check command - load every table of a workspace and report problems

use super::{display_path, load_workspace, EngineOptions};
use crate::error::CliError;
use colored::Colorize;
use hovercraft_core::{Diagnostic, ScanReport};
use serde::Serialize;
use std::path::Path;

/// Output switches for [`check`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Print a JSON report instead of text.
    pub json: bool,
    /// Fail when any table has diagnostics.
    pub strict: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileSummary<'a> {
    path: String,
    file_type: &'a str,
    records: usize,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckSummary<'a> {
    workspace: String,
    table_directories: &'a [String],
    files: Vec<FileSummary<'a>>,
    records: usize,
    diagnostics: usize,
}

fn summarize<'a>(
    workspace: &Path,
    table_directories: &'a [String],
    report: &'a ScanReport,
) -> CheckSummary<'a> {
    CheckSummary {
        workspace: workspace.display().to_string(),
        table_directories,
        files: report
            .files
            .iter()
            .map(|file| FileSummary {
                path: display_path(&file.path, workspace),
                file_type: file.file_type.as_str(),
                records: file.records,
                diagnostics: &file.diagnostics,
            })
            .collect(),
        records: report.records(),
        diagnostics: report.diagnostic_count(),
    }
}

fn print_text(summary: &CheckSummary<'_>) {
    if summary.files.is_empty() {
        println!(
            "No table files found under {} (searched {})",
            summary.workspace,
            summary.table_directories.join(", ")
        );
        return;
    }

    for file in &summary.files {
        let marker = if file.diagnostics.is_empty() {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!(
            "{} {} [{}] {} record(s)",
            marker, file.path, file.file_type, file.records
        );
        for diagnostic in file.diagnostics {
            println!("    {}", diagnostic.to_string().yellow());
        }
    }
    println!(
        "\n{} file(s), {} record(s), {} diagnostic(s)",
        summary.files.len(),
        summary.records,
        summary.diagnostics
    );
}

/// Load every table under `workspace` and print a report.
///
/// # Errors
///
/// Returns `Err` if the workspace is not a directory, or in strict mode if
/// any table has diagnostics.
///
/// # Output
///
/// ```text
/// ✓ .vscode/hovercraft.py.csv [py] 12 record(s)
/// ✗ .data/hovercraft.js.json [js] 3 record(s)
///     row 2: missing-required-field: 'description' is missing or empty
///
/// 2 file(s), 15 record(s), 1 diagnostic(s)
/// ```
pub fn check(
    workspace: &Path,
    options: &EngineOptions,
    check_options: &CheckOptions,
) -> Result<(), CliError> {
    let (engine, report) = load_workspace(workspace, options)?;
    let table_directories = engine.config().normalized_table_directories();
    let summary = summarize(workspace, &table_directories, &report);

    if check_options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }

    if check_options.strict && summary.diagnostics > 0 {
        let files = report
            .files
            .iter()
            .filter(|file| !file.diagnostics.is_empty())
            .count();
        return Err(CliError::Strict {
            count: summary.diagnostics,
            files,
        });
    }
    Ok(())
}
