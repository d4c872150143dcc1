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

//! Table file parsing.
//!
//! Both formats produce a [`ParseOutcome`]: the records that could be
//! recovered plus a diagnostic for everything that could not. Parsing never
//! fails as a whole and never panics; a table full of garbage simply yields
//! zero records and a list of diagnostics.
//!
//! # Formats
//!
//! - [`TableFormat::Csv`]: header row required, columns matched by name
//!   (case-insensitive), unknown columns ignored, ragged rows tolerated.
//! - [`TableFormat::Json`]: a top-level array of objects.
//!
//! # Examples
//!
//! ```
//! use hovercraft_core::parser::parse;
//! use hovercraft_core::{DiagnosticKind, TableFormat};
//!
//! let csv = b"keyword,description\nprint,Prints a value\nlen,\n";
//! let outcome = parse(csv, TableFormat::Csv);
//!
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.records[0].keyword, "print");
//! assert_eq!(outcome.diagnostics.len(), 1);
//! assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MissingRequiredField);
//! ```

mod csv;
mod json;

pub use self::csv::parse_csv;
pub use self::json::parse_json;

use crate::error::Diagnostic;
use crate::record::{HoverRecord, TableFormat};

/// Column and field names recognized in table files.
pub mod fields {
    /// Keyword the record matches (required).
    pub const KEYWORD: &str = "keyword";
    /// Hover body (required).
    pub const DESCRIPTION: &str = "description";
    /// Optional grouping label.
    pub const CATEGORY: &str = "category";
    /// Optional reference link.
    pub const URL: &str = "url";
    /// Optional provenance tag.
    pub const SOURCE_FILE: &str = "source_file";
}

/// Records recovered from a table file and the problems found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Well-formed records in file order.
    pub records: Vec<HoverRecord>,
    /// One entry per skipped row or file-level problem.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// True when the file parsed without a single diagnostic.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse raw table bytes in the given format.
pub fn parse(bytes: &[u8], format: TableFormat) -> ParseOutcome {
    match format {
        TableFormat::Csv => parse_csv(bytes),
        TableFormat::Json => parse_json(bytes),
    }
}

/// Trim a field and turn blank text into `None`.
pub(crate) fn clean_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Keep a field verbatim unless it is blank.
pub(crate) fn present_field(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Assemble a record from already-cleaned fields.
///
/// Returns the name of the first missing required field on failure.
pub(crate) fn build_record(
    keyword: Option<String>,
    description: Option<String>,
    category: Option<String>,
    url: Option<String>,
    source_file: Option<String>,
) -> std::result::Result<HoverRecord, &'static str> {
    let keyword = keyword.ok_or(fields::KEYWORD)?;
    let description = description.ok_or(fields::DESCRIPTION)?;
    Ok(HoverRecord {
        keyword,
        description,
        category,
        url,
        source_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;

    #[test]
    fn test_clean_field() {
        assert_eq!(clean_field("  print "), Some("print".to_string()));
        assert_eq!(clean_field("   "), None);
        assert_eq!(clean_field(""), None);
        assert_eq!(clean_field("a\nb"), Some("a\nb".to_string()));
    }

    #[test]
    fn test_present_field_keeps_padding() {
        assert_eq!(present_field("  A mapping "), Some("  A mapping ".to_string()));
        assert_eq!(present_field(" \t "), None);
    }

    #[test]
    fn test_build_record_reports_first_missing_field() {
        assert_eq!(
            build_record(None, None, None, None, None).unwrap_err(),
            "keyword"
        );
        assert_eq!(
            build_record(Some("k".into()), None, None, None, None).unwrap_err(),
            "description"
        );
        let record =
            build_record(Some("k".into()), Some("d".into()), None, None, None).unwrap();
        assert_eq!(record, HoverRecord::new("k", "d"));
    }

    #[test]
    fn test_dispatch_by_format() {
        let csv = parse(b"keyword,description\na,b\n", TableFormat::Csv);
        assert_eq!(csv.records, vec![HoverRecord::new("a", "b")]);
        assert!(csv.is_clean());

        let json = parse(br#"[{"keyword":"a","description":"b"}]"#, TableFormat::Json);
        assert_eq!(json.records, vec![HoverRecord::new("a", "b")]);

        let wrong = parse(b"keyword,description\na,b\n", TableFormat::Json);
        assert!(wrong.records.is_empty());
        assert_eq!(wrong.diagnostics[0].kind, DiagnosticKind::ParseError);
    }
}
