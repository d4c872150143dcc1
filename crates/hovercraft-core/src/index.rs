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

//! Keyword index keyed by file type and keyword.
//!
//! # Architecture
//!
//! ```text
//! KeywordIndex
//! └── FileTypeKey ("py")
//!     ├── Contribution (/ws/.vscode/hovercraft.py.csv)   load #1
//!     │   └── keyword -> [record, record, ...]
//!     └── Contribution (/ws/.data/hovercraft.py.json)    load #2
//!         └── keyword -> [record]
//! ```
//!
//! Each table file owns exactly one contribution per file type. Reloading a
//! file throws its old contribution away and appends the new one, so rows
//! from an earlier version of the file can never linger.
//!
//! # Thread Safety
//!
//! All state sits behind one `parking_lot::RwLock`. Every mutation runs under
//! a single write guard, so a concurrent [`KeywordIndex::lookup`] observes a
//! file's old records or its new records, never a mix.

use crate::record::{FileTypeKey, HoverRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// How keywords are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Exact comparison.
    #[default]
    Sensitive,
    /// Comparison of Unicode-lowercased forms.
    Insensitive,
}

impl CaseSensitivity {
    /// Map a `case_sensitive` flag onto the enum.
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    fn fold(&self, keyword: &str) -> String {
        match self {
            CaseSensitivity::Sensitive => keyword.to_string(),
            CaseSensitivity::Insensitive => keyword.to_lowercase(),
        }
    }
}

/// A record returned from a lookup, with the table file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    /// The matched record.
    pub record: Arc<HoverRecord>,
    /// Path of the table file that defined it.
    pub defining_path: PathBuf,
}

/// Counts describing what the index currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStatistics {
    /// Number of file types with at least one record.
    pub file_types: usize,
    /// Number of (file, file type) contributions.
    pub files: usize,
    /// Total number of records.
    pub records: usize,
}

/// Records one table file contributed to one file type.
#[derive(Debug)]
struct Contribution {
    path: PathBuf,
    records: Vec<Arc<HoverRecord>>,
    /// Folded keyword -> positions in `records`, in file order.
    keywords: HashMap<String, Vec<usize>>,
}

impl Contribution {
    fn new(path: PathBuf, records: Vec<HoverRecord>, case: CaseSensitivity) -> Self {
        let mut contribution = Self {
            path,
            records: records.into_iter().map(Arc::new).collect(),
            keywords: HashMap::new(),
        };
        contribution.rekey(case);
        contribution
    }

    fn rekey(&mut self, case: CaseSensitivity) {
        self.keywords.clear();
        for (pos, record) in self.records.iter().enumerate() {
            self.keywords
                .entry(case.fold(record.keyword.trim()))
                .or_default()
                .push(pos);
        }
    }
}

#[derive(Debug, Default)]
struct IndexState {
    case: CaseSensitivity,
    /// Contributions per file type, oldest load first.
    tables: HashMap<FileTypeKey, Vec<Contribution>>,
}

/// Concurrent keyword index.
///
/// # Examples
///
/// ```
/// use hovercraft_core::{FileTypeKey, HoverRecord, KeywordIndex};
/// use std::path::Path;
///
/// let index = KeywordIndex::new();
/// let py = FileTypeKey::new("py");
/// index.load_file(
///     Path::new("/ws/.vscode/hovercraft.py.csv"),
///     &py,
///     vec![HoverRecord::new("foo", "does foo")],
/// );
///
/// let matches = index.lookup(&py, "foo");
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].record.description, "does foo");
/// assert!(index.lookup(&py, "bar").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct KeywordIndex {
    state: RwLock<IndexState>,
}

impl KeywordIndex {
    /// Create an empty, case-sensitive index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with the given keyword comparison.
    pub fn with_case_sensitivity(case: CaseSensitivity) -> Self {
        Self {
            state: RwLock::new(IndexState {
                case,
                tables: HashMap::new(),
            }),
        }
    }

    /// Current keyword comparison.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.state.read().case
    }

    /// Change keyword comparison, re-keying every loaded file in one step.
    pub fn set_case_sensitivity(&self, case: CaseSensitivity) {
        let mut state = self.state.write();
        if state.case == case {
            return;
        }
        state.case = case;
        for contributions in state.tables.values_mut() {
            for contribution in contributions.iter_mut() {
                contribution.rekey(case);
            }
        }
        debug!("Keyword index re-keyed as {:?}", case);
    }

    /// Replace everything `path` contributed to `file_type` with `records`.
    ///
    /// The new records become the most recent load for the file type.
    /// Loading zero records is the same as [`Self::remove_file`].
    pub fn load_file(&self, path: &Path, file_type: &FileTypeKey, records: Vec<HoverRecord>) {
        let mut state = self.state.write();
        let case = state.case;
        let count = records.len();

        let contributions = state.tables.entry(file_type.clone()).or_default();
        contributions.retain(|c| c.path != path);
        if !records.is_empty() {
            contributions.push(Contribution::new(path.to_path_buf(), records, case));
        }
        if contributions.is_empty() {
            state.tables.remove(file_type);
        }

        debug!(
            "Indexed {} records for '{}' from {}",
            count,
            file_type,
            path.display()
        );
    }

    /// Drop everything `path` contributed to `file_type`.
    ///
    /// Returns the number of records removed. A file type left without
    /// records is removed from the index.
    pub fn remove_file(&self, path: &Path, file_type: &FileTypeKey) -> usize {
        let mut state = self.state.write();
        let Some(contributions) = state.tables.get_mut(file_type) else {
            return 0;
        };

        let removed: usize = contributions
            .iter()
            .filter(|c| c.path == path)
            .map(|c| c.records.len())
            .sum();
        contributions.retain(|c| c.path != path);
        if contributions.is_empty() {
            state.tables.remove(file_type);
        }

        debug!(
            "Removed {} records for '{}' from {}",
            removed,
            file_type,
            path.display()
        );
        removed
    }

    /// Drop everything `path` contributed to any file type.
    pub fn remove_path(&self, path: &Path) -> usize {
        let mut state = self.state.write();
        let mut removed = 0;
        state.tables.retain(|_, contributions| {
            removed += contributions
                .iter()
                .filter(|c| c.path == path)
                .map(|c| c.records.len())
                .sum::<usize>();
            contributions.retain(|c| c.path != path);
            !contributions.is_empty()
        });
        removed
    }

    /// All records for `keyword` under `file_type`, in load order.
    ///
    /// Records from earlier loads come first; within a file, rows keep their
    /// file order. Returns an empty vector when nothing matches.
    pub fn lookup(&self, file_type: &FileTypeKey, keyword: &str) -> Vec<IndexedRecord> {
        let state = self.state.read();
        let Some(contributions) = state.tables.get(file_type) else {
            return Vec::new();
        };

        let key = state.case.fold(keyword.trim());
        let matches = contributions
            .iter()
            .filter_map(|c| c.keywords.get(&key).map(|positions| (c, positions)))
            .flat_map(|(c, positions)| {
                positions.iter().map(move |&pos| IndexedRecord {
                    record: Arc::clone(&c.records[pos]),
                    defining_path: c.path.clone(),
                })
            })
            .collect();
        matches
    }

    /// True if at least one record is loaded for `file_type`.
    pub fn contains_file_type(&self, file_type: &FileTypeKey) -> bool {
        self.state.read().tables.contains_key(file_type)
    }

    /// File types with data, sorted.
    pub fn file_types(&self) -> Vec<FileTypeKey> {
        let mut keys: Vec<_> = self.state.read().tables.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Distinct keywords of a file type, in load order.
    pub fn keywords(&self, file_type: &FileTypeKey) -> Vec<String> {
        let state = self.state.read();
        let mut seen = std::collections::HashSet::new();
        let keywords = state
            .tables
            .get(file_type)
            .into_iter()
            .flatten()
            .flat_map(|c| c.records.iter())
            .filter(|r| seen.insert(state.case.fold(&r.keyword)))
            .map(|r| r.keyword.clone())
            .collect();
        keywords
    }

    /// Paths currently contributing to `file_type`, oldest load first.
    pub fn files(&self, file_type: &FileTypeKey) -> Vec<PathBuf> {
        self.state
            .read()
            .tables
            .get(file_type)
            .map(|cs| cs.iter().map(|c| c.path.clone()).collect())
            .unwrap_or_default()
    }

    /// Snapshot of table, file and record counts.
    pub fn statistics(&self) -> IndexStatistics {
        let state = self.state.read();
        let mut stats = IndexStatistics {
            file_types: state.tables.len(),
            ..Default::default()
        };
        for contributions in state.tables.values() {
            stats.files += contributions.len();
            stats.records += contributions.iter().map(|c| c.records.len()).sum::<usize>();
        }
        stats
    }

    /// Replace the whole index in one step.
    ///
    /// `tables` are applied in order as if loaded one after another into an
    /// empty index. Readers see either the old contents or the new ones.
    pub fn replace_all(&self, tables: Vec<(PathBuf, FileTypeKey, Vec<HoverRecord>)>) {
        let case = self.case_sensitivity();
        let mut fresh: HashMap<FileTypeKey, Vec<Contribution>> = HashMap::new();
        for (path, file_type, records) in tables {
            let contributions = fresh.entry(file_type).or_default();
            contributions.retain(|c| c.path != path);
            if !records.is_empty() {
                contributions.push(Contribution::new(path, records, case));
            }
        }
        fresh.retain(|_, contributions| !contributions.is_empty());

        let mut state = self.state.write();
        if state.case != case {
            let current = state.case;
            for contribution in fresh.values_mut().flatten() {
                contribution.rekey(current);
            }
        }
        state.tables = fresh;
        debug!("Keyword index replaced ({} file types)", state.tables.len());
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.state.write().tables.clear();
    }
}
