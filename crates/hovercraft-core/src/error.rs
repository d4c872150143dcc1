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

//! Diagnostics and error types for table loading.
//!
//! Nothing in this crate is fatal to the engine. Problems found while reading
//! or parsing a table file are collected as [`Diagnostic`] values and handed
//! to the caller next to whatever records could still be recovered. The only
//! `Result`-style error is [`TableError`], used internally while reading a
//! file from disk and folded into an `unreadable-file` diagnostic before it
//! leaves the watcher bridge.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a table diagnostic.
///
/// The serialized form is kebab-case (`missing-required-field`, ...), which is
/// also what [`fmt::Display`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A row or entry lacks `keyword` or `description`, or a CSV header lacks
    /// one of those columns.
    MissingRequiredField,
    /// A JSON array element is not an object, or a recognized field holds a
    /// nested array/object.
    InvalidEntry,
    /// The JSON document root is not an array.
    InvalidRoot,
    /// The reader rejected a row (or, for JSON, the whole document).
    ParseError,
    /// The table file could not be read.
    UnreadableFile,
}

impl DiagnosticKind {
    /// Stable kebab-case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingRequiredField => "missing-required-field",
            DiagnosticKind::InvalidEntry => "invalid-entry",
            DiagnosticKind::InvalidRoot => "invalid-root",
            DiagnosticKind::ParseError => "parse-error",
            DiagnosticKind::UnreadableFile => "unreadable-file",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem found in a table file.
///
/// `row` is the 1-based data row (CSV: first row after the header is 1) or
/// array element (JSON). File-level problems such as an invalid JSON root
/// have no row. `line` is the 1-based source line when the reader knows it.
///
/// # Examples
///
/// ```
/// use hovercraft_core::{Diagnostic, DiagnosticKind};
///
/// let diag = Diagnostic::row(DiagnosticKind::MissingRequiredField, 2, "missing 'description'");
/// assert_eq!(diag.to_string(), "row 2: missing-required-field: missing 'description'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// 1-based row or element number, if the problem is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// 1-based source line, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic that applies to the whole file.
    pub fn file(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: None,
            line: None,
            message: message.into(),
        }
    }

    /// A diagnostic tied to one row or element.
    pub fn row(kind: DiagnosticKind, row: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: Some(row),
            line: None,
            message: message.into(),
        }
    }

    /// Attach a source line.
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.line) {
            (Some(row), Some(line)) => write!(f, "row {} (line {}): ", row, line)?,
            (Some(row), None) => write!(f, "row {}: ", row)?,
            (None, Some(line)) => write!(f, "line {}: ", line)?,
            (None, None) => {}
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// File-level failure while reading a table from disk.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit.
    #[error("{path} is {actual} bytes, larger than the {limit} byte limit")]
    TooLarge {
        /// Path of the table file.
        path: PathBuf,
        /// Size of the file in bytes.
        actual: u64,
        /// Configured maximum in bytes.
        limit: u64,
    },
}

impl TableError {
    /// Fold the error into an `unreadable-file` diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::file(DiagnosticKind::UnreadableFile, self.to_string())
    }
}

/// Result alias for table file I/O.
pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_kebab_case() {
        assert_eq!(DiagnosticKind::MissingRequiredField.as_str(), "missing-required-field");
        assert_eq!(DiagnosticKind::InvalidEntry.to_string(), "invalid-entry");
        assert_eq!(DiagnosticKind::InvalidRoot.to_string(), "invalid-root");
        assert_eq!(DiagnosticKind::ParseError.to_string(), "parse-error");
        assert_eq!(DiagnosticKind::UnreadableFile.to_string(), "unreadable-file");
    }

    #[test]
    fn test_kind_serializes_like_display() {
        let json = serde_json::to_string(&DiagnosticKind::InvalidRoot).unwrap();
        assert_eq!(json, "\"invalid-root\"");
    }

    #[test]
    fn test_diagnostic_display() {
        let file = Diagnostic::file(DiagnosticKind::InvalidRoot, "root is an object");
        assert_eq!(file.to_string(), "invalid-root: root is an object");

        let row = Diagnostic::row(DiagnosticKind::ParseError, 3, "bad bytes").at_line(4);
        assert_eq!(row.to_string(), "row 3 (line 4): parse-error: bad bytes");
    }

    #[test]
    fn test_diagnostic_json_skips_missing_positions() {
        let diag = Diagnostic::file(DiagnosticKind::InvalidRoot, "x");
        let json = serde_json::to_value(&diag).unwrap();
        assert!(json.get("row").is_none());
        assert!(json.get("line").is_none());
        assert_eq!(json["kind"], "invalid-root");
    }

    #[test]
    fn test_table_error_becomes_unreadable_file() {
        let err = TableError::TooLarge {
            path: PathBuf::from("/w/.vscode/hovercraft.py.csv"),
            actual: 20,
            limit: 10,
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.kind, DiagnosticKind::UnreadableFile);
        assert!(diag.message.contains("10 byte limit"));
        assert_eq!(diag.row, None);
    }
}
