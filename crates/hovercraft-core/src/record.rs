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

//! Hover records, file-type keys and the table file naming convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File name prefix every table file carries.
pub const TABLE_FILE_PREFIX: &str = "hovercraft";

/// One keyword-to-documentation entry from a table file.
///
/// `keyword` and `description` are always non-empty and trimmed. Optional
/// columns that were blank in the source are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverRecord {
    /// Text the record matches.
    pub keyword: String,
    /// Hover body, possibly spanning several lines.
    pub description: String,
    /// Grouping label shown next to the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Reference link appended to the hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Provenance tag. Display only, never used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl HoverRecord {
    /// Create a record with only the required fields.
    pub fn new(keyword: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            description: description.into(),
            category: None,
            url: None,
            source_file: None,
        }
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the reference link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the provenance tag.
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }
}

/// The file extension a table applies to, e.g. `py` or `d.ts`.
///
/// Case is preserved. One leading `.` is dropped so host extensions such as
/// `.py` and table keys such as `py` compare equal.
///
/// # Examples
///
/// ```
/// use hovercraft_core::FileTypeKey;
///
/// assert_eq!(FileTypeKey::new(".py"), FileTypeKey::new("py"));
/// assert_eq!(FileTypeKey::new("MD").as_str(), "MD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTypeKey(String);

impl FileTypeKey {
    /// Build a key from an extension with or without its leading dot.
    pub fn new(extension: impl AsRef<str>) -> Self {
        let ext = extension.as_ref();
        Self(ext.strip_prefix('.').unwrap_or(ext).to_string())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Candidate keys for a document file name, longest suffix first.
    ///
    /// `index.d.ts` yields `d.ts` then `ts`; a name without an extension
    /// yields nothing. Leading dots of hidden files are not extension
    /// separators.
    ///
    /// ```
    /// use hovercraft_core::FileTypeKey;
    ///
    /// let keys = FileTypeKey::candidates_for_file_name("index.d.ts");
    /// assert_eq!(keys, vec![FileTypeKey::new("d.ts"), FileTypeKey::new("ts")]);
    /// assert!(FileTypeKey::candidates_for_file_name("Makefile").is_empty());
    /// ```
    pub fn candidates_for_file_name(file_name: &str) -> Vec<FileTypeKey> {
        let name = file_name.trim_start_matches('.');
        name.match_indices('.')
            .map(|(idx, _)| &name[idx + 1..])
            .filter(|suffix| !suffix.is_empty())
            .map(FileTypeKey::new)
            .collect()
    }

    /// Candidate keys for a document path; see [`Self::candidates_for_file_name`].
    pub fn candidates_for_path(path: &Path) -> Vec<FileTypeKey> {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(Self::candidates_for_file_name)
            .unwrap_or_default()
    }
}

impl fmt::Display for FileTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileTypeKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Serialization format of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of objects.
    Json,
}

impl TableFormat {
    /// File extension for the format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What a conventional table file name says about its contents.
///
/// A table file is named `hovercraft.<ext>.csv` or `hovercraft.<ext>.json`.
/// Everything between the prefix and the format suffix is the key, so
/// `hovercraft.d.ts.json` defines hovers for `d.ts` documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableFile {
    /// File type the table applies to.
    pub file_type: FileTypeKey,
    /// How the file is encoded.
    pub format: TableFormat,
}

impl TableFile {
    /// Interpret a file name, returning `None` if it does not follow the
    /// naming convention.
    ///
    /// ```
    /// use hovercraft_core::{TableFile, TableFormat};
    ///
    /// let table = TableFile::from_file_name("hovercraft.py.csv").unwrap();
    /// assert_eq!(table.file_type.as_str(), "py");
    /// assert_eq!(table.format, TableFormat::Csv);
    ///
    /// assert!(TableFile::from_file_name("hovercraft.csv").is_none());
    /// assert!(TableFile::from_file_name("notes.py.csv").is_none());
    /// ```
    pub fn from_file_name(file_name: &str) -> Option<TableFile> {
        let rest = file_name
            .strip_prefix(TABLE_FILE_PREFIX)?
            .strip_prefix('.')?;

        let (ext, format) = if let Some(ext) = rest.strip_suffix(".csv") {
            (ext, TableFormat::Csv)
        } else if let Some(ext) = rest.strip_suffix(".json") {
            (ext, TableFormat::Json)
        } else {
            return None;
        };

        if ext.is_empty() || ext.starts_with('.') || ext.ends_with('.') {
            return None;
        }

        Some(TableFile {
            file_type: FileTypeKey(ext.to_string()),
            format,
        })
    }

    /// Interpret the file name component of a path.
    pub fn from_path(path: &Path) -> Option<TableFile> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::from_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_table_file_names() {
        let py = TableFile::from_file_name("hovercraft.py.csv").unwrap();
        assert_eq!(py.file_type, FileTypeKey::new("py"));
        assert_eq!(py.format, TableFormat::Csv);

        let md = TableFile::from_file_name("hovercraft.md.json").unwrap();
        assert_eq!(md.file_type.as_str(), "md");
        assert_eq!(md.format, TableFormat::Json);

        let custom = TableFile::from_file_name("hovercraft.custom.csv").unwrap();
        assert_eq!(custom.file_type.as_str(), "custom");
    }

    #[test]
    fn test_table_file_keeps_case_and_inner_dots() {
        let upper = TableFile::from_file_name("hovercraft.SQL.csv").unwrap();
        assert_eq!(upper.file_type.as_str(), "SQL");

        let dts = TableFile::from_file_name("hovercraft.d.ts.json").unwrap();
        assert_eq!(dts.file_type.as_str(), "d.ts");
    }

    #[test]
    fn test_table_file_rejects_other_names() {
        for name in [
            "invalid.csv",
            "hovercraft.csv",
            "hovercraft.json",
            "hovercraft..csv",
            "hovercraft.py.txt",
            "hovercraft.py.CSV",
            "hovercraftpy.csv",
            "myhovercraft.py.csv",
            "",
        ] {
            assert!(TableFile::from_file_name(name).is_none(), "{} should not match", name);
        }
    }

    #[test]
    fn test_table_file_from_path() {
        let path = PathBuf::from("/workspace/.vscode/hovercraft.rs.json");
        let table = TableFile::from_path(&path).unwrap();
        assert_eq!(table.file_type.as_str(), "rs");
        assert_eq!(table.format, TableFormat::Json);
    }

    #[test]
    fn test_file_type_key_strips_one_dot() {
        assert_eq!(FileTypeKey::new(".py").as_str(), "py");
        assert_eq!(FileTypeKey::new("py").as_str(), "py");
        assert_eq!(FileTypeKey::from(".md"), FileTypeKey::new("md"));
    }

    #[test]
    fn test_candidates_for_file_name() {
        assert_eq!(
            FileTypeKey::candidates_for_file_name("main.py"),
            vec![FileTypeKey::new("py")]
        );
        assert_eq!(
            FileTypeKey::candidates_for_file_name("archive.tar.gz"),
            vec![FileTypeKey::new("tar.gz"), FileTypeKey::new("gz")]
        );
        assert!(FileTypeKey::candidates_for_file_name(".bashrc").is_empty());
        assert!(FileTypeKey::candidates_for_file_name("trailing.").is_empty());
        assert_eq!(
            FileTypeKey::candidates_for_path(Path::new("/src/app/index.d.ts")),
            vec![FileTypeKey::new("d.ts"), FileTypeKey::new("ts")]
        );
    }

    #[test]
    fn test_record_builder() {
        let record = HoverRecord::new("print", "Prints a value")
            .with_category("function")
            .with_url("https://docs.python.org/3/library/functions.html#print")
            .with_source_file("builtins");
        assert_eq!(record.keyword, "print");
        assert_eq!(record.category.as_deref(), Some("function"));
        assert!(record.url.is_some());
        assert_eq!(record.source_file.as_deref(), Some("builtins"));
    }
}
