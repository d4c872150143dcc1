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

//! Structured error types for the Hovercraft CLI.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from CLI commands.
///
/// # Examples
///
/// ```rust,no_run
/// use hovercraft_cli::error::CliError;
///
/// fn read(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A file could not be read.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// File size exceeds the allowed limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
    },

    /// The workspace root is missing or not a directory.
    #[error("Workspace '{path}' is not a directory")]
    Workspace {
        /// The requested workspace root
        path: PathBuf,
    },

    /// A line/column pair does not address a character in the file.
    #[error("Position {line}:{column} is outside '{path}': {reason}")]
    Position {
        /// The file the position refers to
        path: PathBuf,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Why the position was rejected
        reason: String,
    },

    /// Strict checking found diagnostics.
    #[error("{count} diagnostic(s) found in {files} table file(s)")]
    Strict {
        /// Total number of diagnostics
        count: usize,
        /// Number of files with at least one diagnostic
        files: usize,
    },

    /// No record matched.
    #[error("No hover content: {0}")]
    NotFound(String),

    /// JSON output could not be produced.
    #[error("JSON format error: {0}")]
    Json(String),

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: source.to_string(),
        }
    }

    /// Create a position error.
    pub fn position(
        path: impl AsRef<Path>,
        line: usize,
        column: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::Position {
            path: path.as_ref().to_path_buf(),
            line,
            column,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error(
            "missing.py",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.py"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_position_display() {
        let err = CliError::position("a.py", 4, 9, "line has 3 characters");
        assert_eq!(
            err.to_string(),
            "Position 4:9 is outside 'a.py': line has 3 characters"
        );
    }

    #[test]
    fn test_strict_display() {
        let err = CliError::Strict { count: 3, files: 2 };
        assert_eq!(err.to_string(), "3 diagnostic(s) found in 2 table file(s)");
    }

    #[test]
    fn test_json_conversion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(CliError::from(source), CliError::Json(_)));
    }
}
