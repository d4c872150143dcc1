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

//! Markdown rendering of matched records.
//!
//! Table files are user content. Every field is escaped before it is placed
//! in the Markdown output: `<`, `>` and `&` become HTML entities and Markdown
//! punctuation is backslash-escaped, so a description such as
//! `<script>` or `**bold**` is shown literally.
//!
//! # Layout
//!
//! ```text
//! **keyword**
//!
//! description line one
//! description line two
//!
//! *Category:* function
//!
//! [https://example.com/doc](<https://example.com/doc>)
//!
//! *Source:* builtins
//!
//! ---
//!
//! (next record)
//! ```

use crate::index::IndexedRecord;
use crate::record::HoverRecord;
use std::path::Path;

/// Separator placed between the blocks of several matching records.
pub const RECORD_DIVIDER: &str = "\n\n---\n\n";

/// URL schemes rendered as clickable links.
const LINK_SCHEMES: &[&str] = &["http://", "https://", "file://", "mailto:"];

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Append a `Source:` line naming where each record came from.
    pub show_provenance: bool,
}

/// Rendered hover content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedHover {
    /// Markdown text ready for display.
    pub markup_text: String,
}

/// Turns matched records into Markdown.
#[derive(Debug, Clone, Default)]
pub struct ContentFormatter {
    options: FormatOptions,
}

impl ContentFormatter {
    /// Create a formatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> FormatOptions {
        self.options
    }

    /// Render records as one Markdown document, one block per record in the
    /// given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use hovercraft_core::format::ContentFormatter;
    /// use hovercraft_core::{HoverRecord, IndexedRecord};
    /// use std::path::PathBuf;
    /// use std::sync::Arc;
    ///
    /// let record = IndexedRecord {
    ///     record: Arc::new(HoverRecord::new("foo", "does foo").with_category("demo")),
    ///     defining_path: PathBuf::from("/ws/.vscode/hovercraft.py.csv"),
    /// };
    /// let hover = ContentFormatter::default().format(&[record]);
    /// assert!(hover.markup_text.starts_with("**foo**"));
    /// assert!(hover.markup_text.contains("does foo"));
    /// assert!(hover.markup_text.contains("*Category:* demo"));
    /// ```
    pub fn format(&self, records: &[IndexedRecord]) -> FormattedHover {
        let blocks: Vec<String> = records
            .iter()
            .map(|indexed| self.format_block(&indexed.record, &indexed.defining_path))
            .collect();
        FormattedHover {
            markup_text: blocks.join(RECORD_DIVIDER),
        }
    }

    fn format_block(&self, record: &HoverRecord, defining_path: &Path) -> String {
        let mut sections = vec![
            format!("**{}**", escape_markdown(&record.keyword)),
            escape_markdown(&record.description),
        ];

        if let Some(category) = &record.category {
            sections.push(format!("*Category:* {}", escape_markdown(category)));
        }

        if let Some(url) = &record.url {
            sections.push(render_link(url));
        }

        if self.options.show_provenance {
            let source = record.source_file.clone().unwrap_or_else(|| {
                defining_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| defining_path.display().to_string())
            });
            sections.push(format!("*Source:* {}", escape_markdown(&source)));
        }

        sections.join("\n\n")
    }
}

/// Escape text so Markdown renderers display it literally.
///
/// Line breaks are kept as hard breaks; carriage returns are dropped.
///
/// ```
/// use hovercraft_core::format::escape_markdown;
///
/// assert_eq!(escape_markdown("<b>"), "&lt;b&gt;");
/// assert_eq!(escape_markdown("a*b_c"), "a\\*b\\_c");
/// assert_eq!(escape_markdown("one\ntwo"), "one  \ntwo");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\r' => {}
            '\n' => out.push_str("  \n"),
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-'
            | '.' | '!' | '|' | '~' | '"' | '\'' | '=' | ':' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn has_link_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    LINK_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Percent-encode the characters that would end an angle-bracket link
/// destination early.
fn link_destination(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '\\' => out.push_str("%5C"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn render_link(url: &str) -> String {
    if has_link_scheme(url) {
        format!("[{}](<{}>)", escape_markdown(url), link_destination(url))
    } else {
        format!("*Link:* {}", escape_markdown(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn indexed(record: HoverRecord, path: &str) -> IndexedRecord {
        IndexedRecord {
            record: Arc::new(record),
            defining_path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_single_record_layout() {
        let record = indexed(
            HoverRecord::new("print", "Prints values")
                .with_category("function")
                .with_url("https://docs.python.org/3/library/functions.html"),
            "/ws/.vscode/hovercraft.py.csv",
        );
        let text = ContentFormatter::default().format(&[record]).markup_text;

        let title = text.find("**print**").unwrap();
        let description = text.find("Prints values").unwrap();
        let category = text.find("*Category:* function").unwrap();
        let link = text.find("](<https://docs.python.org/3/library/functions.html>)").unwrap();
        assert!(title < description && description < category && category < link);
        assert!(!text.contains("Source"));
        assert!(!text.contains("---"));
    }

    #[test]
    fn test_optional_sections_omitted() {
        let record = indexed(HoverRecord::new("x", "plain"), "/t.csv");
        let text = ContentFormatter::default().format(&[record]).markup_text;
        assert_eq!(text, "**x**\n\nplain");
    }

    #[test]
    fn test_multiple_records_divided_in_order() {
        let records = vec![
            indexed(HoverRecord::new("x", "first"), "/ws/.vscode/hovercraft.py.csv"),
            indexed(
                HoverRecord::new("x", "second").with_category("c"),
                "/ws/.data/hovercraft.py.json",
            ),
        ];
        let text = ContentFormatter::default().format(&records).markup_text;
        let blocks: Vec<&str> = text.split(RECORD_DIVIDER).collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("first"));
        assert!(blocks[1].contains("second"));
        assert!(blocks[1].contains("*Category:* c"));
        assert!(!blocks[0].contains("Category"));
    }

    #[test]
    fn test_provenance_line() {
        let formatter = ContentFormatter::new(FormatOptions {
            show_provenance: true,
        });
        let records = vec![
            indexed(HoverRecord::new("x", "a"), "/ws/.vscode/hovercraft.py.csv"),
            indexed(
                HoverRecord::new("x", "b").with_source_file("stdlib"),
                "/ws/.data/hovercraft.py.csv",
            ),
        ];
        let text = formatter.format(&records).markup_text;
        assert!(text.contains("*Source:* hovercraft\\.py\\.csv"));
        assert!(text.contains("*Source:* stdlib"));
        assert_eq!(formatter.options(), FormatOptions { show_provenance: true });
    }

    #[test]
    fn test_markup_is_escaped() {
        let record = indexed(
            HoverRecord::new("<b>", "<script>alert('x')</script> **bold** [link](javascript:x)")
                .with_category("<i>cat</i>"),
            "/t.csv",
        );
        let text = ContentFormatter::default().format(&[record]).markup_text;
        assert!(!text.contains('<') || text.contains("](<"));
        assert!(text.contains("&lt;script&gt;"));
        assert!(text.contains("\\*\\*bold\\*\\*"));
        assert!(text.contains("\\[link\\]\\(javascript\\:x\\)"));
        assert!(text.contains("&lt;i&gt;cat&lt;/i&gt;"));
        assert!(text.starts_with("**&lt;b&gt;**"));
    }

    #[test]
    fn test_unsafe_link_scheme_is_plain_text() {
        let record = indexed(HoverRecord::new("x", "d").with_url("javascript:alert(1)"), "/t.csv");
        let text = ContentFormatter::default().format(&[record]).markup_text;
        assert!(text.contains("*Link:* javascript\\:alert\\(1\\)"));
        assert!(!text.contains("](<"));
    }

    #[test]
    fn test_link_destination_is_encoded() {
        let link = render_link("https://example.com/a b<c>");
        assert!(link.ends_with("(<https://example.com/a%20b%3Cc%3E>)"));
        assert!(has_link_scheme("HTTPS://EXAMPLE.COM"));
        assert!(has_link_scheme("mailto:someone@example.com"));
        assert!(!has_link_scheme("ftp://example.com"));
    }

    #[test]
    fn test_multiline_description_keeps_breaks() {
        let record = indexed(HoverRecord::new("k", "line one\r\nline two"), "/t.csv");
        let text = ContentFormatter::default().format(&[record]).markup_text;
        assert!(text.contains("line one  \nline two"));
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(ContentFormatter::default().format(&[]).markup_text, "");
    }
}
