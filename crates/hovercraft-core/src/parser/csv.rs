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

//! CSV table parsing.

use super::{build_record, clean_field, fields, present_field, ParseOutcome};
use crate::error::{Diagnostic, DiagnosticKind};
use ::csv::{ReaderBuilder, StringRecord, Trim};

/// Positions of the recognized columns in the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    keyword: Option<usize>,
    description: Option<usize>,
    category: Option<usize>,
    url: Option<usize>,
    source_file: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = ColumnMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
            let slot = match name.as_str() {
                fields::KEYWORD => &mut map.keyword,
                fields::DESCRIPTION => &mut map.description,
                fields::CATEGORY => &mut map.category,
                fields::URL => &mut map.url,
                fields::SOURCE_FILE => &mut map.source_file,
                _ => continue,
            };
            // First occurrence of a duplicated column wins.
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    fn missing_required(&self) -> Option<&'static str> {
        if self.keyword.is_none() {
            Some(fields::KEYWORD)
        } else if self.description.is_none() {
            Some(fields::DESCRIPTION)
        } else {
            None
        }
    }

    fn field(record: &StringRecord, column: Option<usize>) -> Option<String> {
        column.and_then(|idx| record.get(idx)).and_then(clean_field)
    }

    fn present(record: &StringRecord, column: Option<usize>) -> Option<String> {
        column.and_then(|idx| record.get(idx)).and_then(present_field)
    }
}

/// One physical CSV record located by [`split_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRecord {
    /// Byte range of the record, terminator included.
    start: usize,
    end: usize,
    /// 1-based line the record starts on.
    line: u64,
    /// Set when the record's quoting cannot be read.
    malformed: Option<QuoteError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum QuoteError {
    /// A quoted field is still open at end of input.
    Unterminated { line: u64 },
    /// A closing quote is followed by something other than a delimiter.
    TrailingText { line: u64 },
}

impl QuoteError {
    fn message(&self) -> String {
        match self {
            QuoteError::Unterminated { line } => {
                format!("quoted field opened on line {} is never closed", line)
            }
            QuoteError::TrailingText { line } => {
                format!("unexpected text after closing quote on line {}", line)
            }
        }
    }

    /// Line whose end parsing resumes after.
    fn line(&self) -> u64 {
        match self {
            QuoteError::Unterminated { line } | QuoteError::TrailingText { line } => *line,
        }
    }
}

/// Byte offset just past the line terminator of the line starting at or
/// after `pos`.
fn next_line_start(bytes: &[u8], pos: usize) -> usize {
    bytes[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |off| pos + off + 1)
}

/// Split input into records the way an RFC 4180 reader would, flagging
/// records with broken quoting. Blank lines produce no record.
///
/// A malformed record ends at the line holding the offending quote, so the
/// following line starts a fresh record.
fn split_records(bytes: &[u8]) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut pos = if bytes.starts_with(b"\xef\xbb\xbf") { 3 } else { 0 };
    let mut line: u64 = 1;

    while pos < bytes.len() {
        if bytes[pos] == b'\n' || bytes[pos] == b'\r' {
            if bytes[pos] == b'\n' || bytes.get(pos + 1) != Some(&b'\n') {
                line += 1;
            }
            pos += 1;
            continue;
        }

        let start = pos;
        let start_line = line;
        let mut i = pos;
        let mut field_start = true;
        let mut malformed = None;
        let mut end = bytes.len();

        while i < bytes.len() {
            match bytes[i] {
                b'"' if field_start => {
                    let open_line = line;
                    let open_at = i;
                    i += 1;
                    let mut closed = false;
                    while i < bytes.len() {
                        match bytes[i] {
                            b'"' if bytes.get(i + 1) == Some(&b'"') => i += 2,
                            b'"' => {
                                closed = true;
                                i += 1;
                                break;
                            }
                            b'\n' => {
                                line += 1;
                                i += 1;
                            }
                            _ => i += 1,
                        }
                    }
                    if !closed {
                        malformed = Some(QuoteError::Unterminated { line: open_line });
                        end = next_line_start(bytes, open_at);
                        line = open_line + 1;
                        break;
                    }
                    match bytes.get(i) {
                        None | Some(b',') | Some(b'\n') | Some(b'\r') => field_start = false,
                        Some(_) => {
                            malformed = Some(QuoteError::TrailingText { line });
                            end = next_line_start(bytes, i);
                            line += 1;
                            break;
                        }
                    }
                }
                b',' => {
                    field_start = true;
                    i += 1;
                }
                b'\n' => {
                    end = i + 1;
                    line += 1;
                    break;
                }
                b'\r' => {
                    end = if bytes.get(i + 1) == Some(&b'\n') { i + 2 } else { i + 1 };
                    line += 1;
                    break;
                }
                _ => {
                    field_start = false;
                    i += 1;
                }
            }
        }

        records.push(RawRecord {
            start,
            end,
            line: start_line,
            malformed,
        });
        pos = end;
    }

    records
}

/// Parse a CSV table.
///
/// The first record is the header. Data rows are numbered from 1 in
/// diagnostics. A row with broken quoting or bytes the reader cannot decode
/// (for example invalid UTF-8) becomes a `parse-error` for that row and
/// parsing carries on with the next line.
///
/// # Examples
///
/// ```
/// use hovercraft_core::parser::parse_csv;
///
/// let csv = b"Description,KEYWORD,notes\nPrints a value,print,ignored\n";
/// let outcome = parse_csv(csv);
/// assert_eq!(outcome.records[0].keyword, "print");
/// assert_eq!(outcome.records[0].description, "Prints a value");
/// ```
pub fn parse_csv(bytes: &[u8]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let raw = split_records(bytes);

    let Some(header) = raw.first() else {
        return outcome;
    };
    if let Some(err) = &header.malformed {
        outcome.diagnostics.push(
            Diagnostic::file(
                DiagnosticKind::ParseError,
                format!("unreadable header row: {}", err.message()),
            )
            .at_line(err.line()),
        );
        return outcome;
    }

    let columns = match read_one(&bytes[..header.end]) {
        Ok(Some(headers)) if headers.iter().all(|h| h.trim().is_empty()) => {
            // Empty file: nothing to load, nothing to report.
            return outcome;
        }
        Ok(Some(headers)) => ColumnMap::from_headers(&headers),
        Ok(None) => return outcome,
        Err(err) => {
            outcome.diagnostics.push(
                Diagnostic::file(
                    DiagnosticKind::ParseError,
                    format!("unreadable header row: {}", err),
                )
                .at_line(header.line),
            );
            return outcome;
        }
    };

    if let Some(missing) = columns.missing_required() {
        outcome.diagnostics.push(
            Diagnostic::file(
                DiagnosticKind::MissingRequiredField,
                format!("header has no '{}' column", missing),
            )
            .at_line(header.line),
        );
        return outcome;
    }

    for (record_idx, raw_record) in raw.iter().skip(1).enumerate() {
        let row = record_idx + 1;

        if let Some(err) = &raw_record.malformed {
            outcome.diagnostics.push(
                Diagnostic::row(DiagnosticKind::ParseError, row, err.message())
                    .at_line(raw_record.line),
            );
            continue;
        }

        let record = match read_one(&bytes[raw_record.start..raw_record.end]) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(err) => {
                outcome.diagnostics.push(
                    Diagnostic::row(DiagnosticKind::ParseError, row, err.to_string())
                        .at_line(raw_record.line),
                );
                continue;
            }
        };

        let built = build_record(
            ColumnMap::field(&record, columns.keyword),
            ColumnMap::present(&record, columns.description),
            ColumnMap::field(&record, columns.category),
            ColumnMap::field(&record, columns.url),
            ColumnMap::field(&record, columns.source_file),
        );

        match built {
            Ok(hover) => outcome.records.push(hover),
            Err(missing) => {
                outcome.diagnostics.push(
                    Diagnostic::row(
                        DiagnosticKind::MissingRequiredField,
                        row,
                        format!("'{}' is empty", missing),
                    )
                    .at_line(raw_record.line),
                );
            }
        }
    }

    outcome
}

/// Decode the single record held in `slice`.
fn read_one(slice: &[u8]) -> ::csv::Result<Option<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .buffer_capacity(slice.len().max(64))
        .from_reader(slice);
    reader.records().next().transpose()
}
