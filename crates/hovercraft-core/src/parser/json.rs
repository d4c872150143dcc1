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

//! JSON table parsing.

use super::{build_record, clean_field, fields, present_field, ParseOutcome};
use crate::error::{Diagnostic, DiagnosticKind};
use serde_json::{Map, Value};

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Text of a recognized field. Scalars are stringified, null and blank
/// strings are absent, nested values are rejected. Descriptions keep their
/// surrounding whitespace.
fn field_text(
    entry: &Map<String, Value>,
    name: &'static str,
) -> std::result::Result<Option<String>, String> {
    match entry.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if name == fields::DESCRIPTION => Ok(present_field(s)),
        Some(Value::String(s)) => Ok(clean_field(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(format!(
            "field '{}' must be text, found {}",
            name,
            kind_name(other)
        )),
    }
}

fn entry_fields(
    entry: &Map<String, Value>,
) -> std::result::Result<[Option<String>; 5], String> {
    Ok([
        field_text(entry, fields::KEYWORD)?,
        field_text(entry, fields::DESCRIPTION)?,
        field_text(entry, fields::CATEGORY)?,
        field_text(entry, fields::URL)?,
        field_text(entry, fields::SOURCE_FILE)?,
    ])
}

/// Parse a JSON table.
///
/// The root must be an array; each element must be an object with
/// `keyword` and `description`. Elements are numbered from 1 in diagnostics.
///
/// # Examples
///
/// ```
/// use hovercraft_core::parser::parse_json;
/// use hovercraft_core::DiagnosticKind;
///
/// let outcome = parse_json(br#"{"keyword": "x"}"#);
/// assert!(outcome.records.is_empty());
/// assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::InvalidRoot);
/// ```
pub fn parse_json(bytes: &[u8]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return outcome;
    }

    let root: Value = match serde_json::from_slice(bytes) {
        Ok(root) => root,
        Err(err) => {
            outcome.diagnostics.push(
                Diagnostic::file(DiagnosticKind::ParseError, err.to_string())
                    .at_line(err.line() as u64),
            );
            return outcome;
        }
    };

    let entries = match root {
        Value::Array(entries) => entries,
        other => {
            outcome.diagnostics.push(Diagnostic::file(
                DiagnosticKind::InvalidRoot,
                format!("root must be an array, found {}", kind_name(&other)),
            ));
            return outcome;
        }
    };

    for (entry_idx, entry) in entries.iter().enumerate() {
        let row = entry_idx + 1;

        let object = match entry {
            Value::Object(object) => object,
            other => {
                outcome.diagnostics.push(Diagnostic::row(
                    DiagnosticKind::InvalidEntry,
                    row,
                    format!("entry must be an object, found {}", kind_name(other)),
                ));
                continue;
            }
        };

        let [keyword, description, category, url, source_file] = match entry_fields(object) {
            Ok(values) => values,
            Err(message) => {
                outcome
                    .diagnostics
                    .push(Diagnostic::row(DiagnosticKind::InvalidEntry, row, message));
                continue;
            }
        };

        match build_record(keyword, description, category, url, source_file) {
            Ok(record) => outcome.records.push(record),
            Err(missing) => outcome.diagnostics.push(Diagnostic::row(
                DiagnosticKind::MissingRequiredField,
                row,
                format!("'{}' is missing or empty", missing),
            )),
        }
    }

    outcome
}
