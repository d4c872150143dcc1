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

//! Table diagnostics as LSP diagnostics.
//!
//! Problems found while loading a table file are published on that file, so
//! an editor showing `hovercraft.py.csv` underlines the bad rows. A
//! diagnostic about a single row is a warning (the row is skipped, the rest
//! of the table loads); a file-level problem is an error.

use crate::constants::{DIAGNOSTIC_LINE_END_CHAR, DIAGNOSTIC_SOURCE, LINE_NUMBER_OFFSET};
use hovercraft_core::Diagnostic as TableDiagnostic;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::Path;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, Url};

/// Convert one table diagnostic.
pub fn to_lsp_diagnostic(diagnostic: &TableDiagnostic) -> Diagnostic {
    let line = diagnostic
        .line
        .map(|line| line.saturating_sub(LINE_NUMBER_OFFSET))
        .unwrap_or(0)
        .min(u64::from(u32::MAX)) as u32;

    let severity = if diagnostic.row.is_some() {
        DiagnosticSeverity::WARNING
    } else {
        DiagnosticSeverity::ERROR
    };

    let message = match diagnostic.row {
        Some(row) => format!("row {}: {}", row, diagnostic.message),
        None => diagnostic.message.clone(),
    };

    Diagnostic {
        range: Range::new(
            Position::new(line, 0),
            Position::new(line, DIAGNOSTIC_LINE_END_CHAR),
        ),
        severity: Some(severity),
        code: Some(NumberOrString::String(diagnostic.kind.as_str().to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        ..Default::default()
    }
}

/// Convert every diagnostic of a load report.
pub fn to_lsp_diagnostics(diagnostics: &[TableDiagnostic]) -> Vec<Diagnostic> {
    diagnostics.iter().map(to_lsp_diagnostic).collect()
}

/// Table files whose diagnostics are currently shown by the client.
///
/// A file leaves the set when an empty list is published for it. The
/// `take_*` methods hand back files that must be cleared because no newer
/// report will cover them.
#[derive(Debug, Default)]
pub struct PublishedDiagnostics {
    uris: Mutex<HashSet<Url>>,
}

impl PublishedDiagnostics {
    /// Note what was just published for `uri`.
    pub fn record(&self, uri: &Url, published: usize) {
        let mut uris = self.uris.lock();
        if published == 0 {
            uris.remove(uri);
        } else {
            uris.insert(uri.clone());
        }
    }

    /// Forget and return every file not in `current`.
    pub fn take_missing(&self, current: &HashSet<Url>) -> Vec<Url> {
        let mut uris = self.uris.lock();
        let stale: Vec<Url> = uris.difference(current).cloned().collect();
        for uri in &stale {
            uris.remove(uri);
        }
        stale
    }

    /// Forget and return every file below `dir`.
    pub fn take_under(&self, dir: &Path) -> Vec<Url> {
        let mut uris = self.uris.lock();
        let stale: Vec<Url> = uris
            .iter()
            .filter(|uri| {
                uri.to_file_path()
                    .map(|path| path.starts_with(dir) && path != dir)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        for uri in &stale {
            uris.remove(uri);
        }
        stale
    }

    /// Files with diagnostics, sorted.
    pub fn uris(&self) -> Vec<Url> {
        let mut uris: Vec<Url> = self.uris.lock().iter().cloned().collect();
        uris.sort();
        uris
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovercraft_core::DiagnosticKind;

    #[test]
    fn test_row_diagnostic() {
        let diag = TableDiagnostic::row(
            DiagnosticKind::MissingRequiredField,
            2,
            "'description' is empty",
        )
        .at_line(3);
        let lsp = to_lsp_diagnostic(&diag);
        assert_eq!(lsp.range.start, Position::new(2, 0));
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(
            lsp.code,
            Some(NumberOrString::String("missing-required-field".into()))
        );
        assert_eq!(lsp.source.as_deref(), Some("hovercraft"));
        assert_eq!(lsp.message, "row 2: 'description' is empty");
    }

    #[test]
    fn test_file_diagnostic_without_line() {
        let diag = TableDiagnostic::file(DiagnosticKind::InvalidRoot, "root must be an array");
        let lsp = to_lsp_diagnostic(&diag);
        assert_eq!(lsp.range.start.line, 0);
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(lsp.message, "root must be an array");
    }

    #[test]
    fn test_batch_conversion() {
        let diags = vec![
            TableDiagnostic::file(DiagnosticKind::ParseError, "bad").at_line(1),
            TableDiagnostic::row(DiagnosticKind::InvalidEntry, 4, "not an object"),
        ];
        assert_eq!(to_lsp_diagnostics(&diags).len(), 2);
        assert!(to_lsp_diagnostics(&[]).is_empty());
    }

    fn file_uri(path: &str) -> Url {
        Url::from_file_path(path).unwrap()
    }

    #[test]
    fn test_published_set_follows_reports() {
        let published = PublishedDiagnostics::default();
        let a = file_uri("/ws/.vscode/hovercraft.py.csv");
        published.record(&a, 2);
        assert_eq!(published.uris(), vec![a.clone()]);

        published.record(&a, 0);
        assert!(published.uris().is_empty());
    }

    #[test]
    fn test_take_missing_returns_files_absent_from_scan() {
        let published = PublishedDiagnostics::default();
        let kept = file_uri("/ws/.vscode/hovercraft.py.csv");
        let dropped = file_uri("/ws/docs/hovercraft.py.csv");
        published.record(&kept, 1);
        published.record(&dropped, 1);

        let current: HashSet<Url> = [kept.clone()].into_iter().collect();
        assert_eq!(published.take_missing(&current), vec![dropped]);
        assert_eq!(published.uris(), vec![kept]);
    }

    #[test]
    fn test_take_under_directory() {
        let published = PublishedDiagnostics::default();
        let inside = file_uri("/ws/.data/hovercraft.js.json");
        let outside = file_uri("/ws/.vscode/hovercraft.js.csv");
        published.record(&inside, 1);
        published.record(&outside, 1);

        assert_eq!(published.take_under(Path::new("/ws/.data")), vec![inside]);
        assert_eq!(published.uris(), vec![outside]);
    }
}
