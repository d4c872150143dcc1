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

//! Bridge from file-system events to the keyword index.
//!
//! The bridge does no watching itself. Hosts own that (an LSP client sends
//! `workspace/didChangeWatchedFiles`, the CLI does a one-off
//! [`WatcherBridge::scan`]) and push [`FileEvent`]s in. For each relevant
//! event the bridge reads the table, parses it and atomically replaces what
//! that file contributed to the index.
//!
//! # Relevance
//!
//! A path is relevant when its file name follows the
//! `hovercraft.<ext>.(csv|json)` convention and the directory holding it is
//! one of the configured table directories:
//!
//! ```text
//! <root>/.vscode/hovercraft.py.csv     relevant (key "py")
//! <root>/.data/hovercraft.d.ts.json    relevant (key "d.ts")
//! <root>/src/hovercraft.py.csv         ignored (wrong directory)
//! <root>/.vscode/settings.json         ignored (wrong name)
//! ```
//!
//! # Ordering
//!
//! Events for one path must be applied in arrival order; the bridge itself
//! is synchronous, so hosts get that for free by feeding it from a single
//! consumer.

use crate::config::{DEFAULT_MAX_TABLE_SIZE, DEFAULT_TABLE_DIRECTORIES};
use crate::error::{Diagnostic, Result, TableError};
use crate::index::KeywordIndex;
use crate::parser;
use crate::record::{FileTypeKey, HoverRecord, TableFile};
use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileEventKind {
    /// The file appeared.
    Created,
    /// The file's contents changed.
    Changed,
    /// The file (or a directory containing it) was removed.
    Deleted,
}

/// A single file-system notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Affected path.
    pub path: PathBuf,
    /// Kind of change.
    pub kind: FileEventKind,
}

impl FileEvent {
    /// Create an event.
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Result of applying one event to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Table file the report is about.
    pub path: PathBuf,
    /// File type the table serves.
    pub file_type: FileTypeKey,
    /// Event that produced the report.
    pub kind: FileEventKind,
    /// Records now held for this file (0 after a delete or a failed read).
    pub records: usize,
    /// Problems found while reading or parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of scanning a workspace root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// One report per table file, in load order.
    pub files: Vec<LoadReport>,
}

impl ScanReport {
    /// Total records loaded.
    pub fn records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    /// Total diagnostics across all files.
    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Append the files of another scan.
    pub fn merge(&mut self, other: ScanReport) {
        self.files.extend(other.files);
    }
}

#[derive(Debug, Clone)]
struct BridgeSettings {
    table_directories: Vec<String>,
    max_table_size: u64,
}

/// Applies file events to a shared [`KeywordIndex`].
#[derive(Debug)]
pub struct WatcherBridge {
    index: Arc<KeywordIndex>,
    settings: RwLock<BridgeSettings>,
}

impl WatcherBridge {
    /// Create a bridge with the default table directories and size limit.
    pub fn new(index: Arc<KeywordIndex>) -> Self {
        Self::with_settings(
            index,
            DEFAULT_TABLE_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
            DEFAULT_MAX_TABLE_SIZE,
        )
    }

    /// Create a bridge with explicit settings.
    pub fn with_settings(
        index: Arc<KeywordIndex>,
        table_directories: Vec<String>,
        max_table_size: u64,
    ) -> Self {
        Self {
            index,
            settings: RwLock::new(BridgeSettings {
                table_directories,
                max_table_size,
            }),
        }
    }

    /// The index this bridge writes to.
    pub fn index(&self) -> &Arc<KeywordIndex> {
        &self.index
    }

    /// Configured table directory names.
    pub fn table_directories(&self) -> Vec<String> {
        self.settings.read().table_directories.clone()
    }

    /// Replace the table directory names.
    pub fn set_table_directories(&self, table_directories: Vec<String>) {
        self.settings.write().table_directories = table_directories;
    }

    /// Configured size limit in bytes.
    pub fn max_table_size(&self) -> u64 {
        self.settings.read().max_table_size
    }

    /// Replace the size limit.
    pub fn set_max_table_size(&self, max_table_size: u64) {
        self.settings.write().max_table_size = max_table_size;
    }

    /// The table described by `path`, if the path is a table file inside a
    /// table directory.
    ///
    /// ```
    /// use hovercraft_core::{KeywordIndex, WatcherBridge};
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// let bridge = WatcherBridge::new(Arc::new(KeywordIndex::new()));
    /// assert!(bridge.is_relevant(Path::new("/ws/.vscode/hovercraft.py.csv")).is_some());
    /// assert!(bridge.is_relevant(Path::new("/ws/src/hovercraft.py.csv")).is_none());
    /// assert!(bridge.is_relevant(Path::new("/ws/.vscode/settings.json")).is_none());
    /// ```
    pub fn is_relevant(&self, path: &Path) -> Option<TableFile> {
        let table = TableFile::from_path(path)?;
        let parent = path.parent()?;
        let settings = self.settings.read();
        settings
            .table_directories
            .iter()
            .any(|dir| !dir.is_empty() && parent.ends_with(dir))
            .then_some(table)
    }

    /// Apply one event. Returns `None` for paths that are not table files.
    pub fn handle(&self, event: &FileEvent) -> Option<LoadReport> {
        let Some(table) = self.is_relevant(&event.path) else {
            if event.kind == FileEventKind::Deleted {
                self.remove_directory(&event.path);
            }
            return None;
        };

        match event.kind {
            FileEventKind::Created | FileEventKind::Changed => {
                Some(self.load_path(&event.path, &table, event.kind))
            }
            FileEventKind::Deleted => {
                let removed = self.index.remove_file(&event.path, &table.file_type);
                info!(
                    "Removed table {} ({} records)",
                    event.path.display(),
                    removed
                );
                Some(LoadReport {
                    path: event.path.clone(),
                    file_type: table.file_type,
                    kind: event.kind,
                    records: 0,
                    diagnostics: Vec::new(),
                })
            }
        }
    }

    /// Drop every indexed file below a deleted directory.
    fn remove_directory(&self, dir: &Path) {
        for file_type in self.index.file_types() {
            for path in self.index.files(&file_type) {
                if path.starts_with(dir) && path != dir {
                    let removed = self.index.remove_path(&path);
                    info!(
                        "Removed table {} with its directory ({} records)",
                        path.display(),
                        removed
                    );
                }
            }
        }
    }

    /// Read, parse and index one table file.
    ///
    /// A file that cannot be read leaves nothing behind in the index: its
    /// previous records are dropped and the report carries an
    /// `unreadable-file` diagnostic.
    pub fn load_path(&self, path: &Path, table: &TableFile, kind: FileEventKind) -> LoadReport {
        let (records, diagnostics) = self.read_records(path, table);
        let count = records.len();
        self.index.load_file(path, &table.file_type, records);
        info!(
            "Loaded {} records for '{}' from {}",
            count,
            table.file_type,
            path.display()
        );

        LoadReport {
            path: path.to_path_buf(),
            file_type: table.file_type.clone(),
            kind,
            records: count,
            diagnostics,
        }
    }

    /// Read and parse a table file without touching the index.
    fn read_records(
        &self,
        path: &Path,
        table: &TableFile,
    ) -> (Vec<HoverRecord>, Vec<Diagnostic>) {
        let (records, diagnostics) = match self.read_table(path) {
            Ok(bytes) => {
                let outcome = parser::parse(&bytes, table.format);
                (outcome.records, outcome.diagnostics)
            }
            Err(err) => (Vec::new(), vec![err.to_diagnostic()]),
        };

        for diagnostic in &diagnostics {
            warn!("{}: {}", path.display(), diagnostic);
        }
        (records, diagnostics)
    }

    /// Read a table file, enforcing the size limit.
    pub fn read_table(&self, path: &Path) -> Result<Vec<u8>> {
        let limit = self.max_table_size();
        let io_error = |source: io::Error| TableError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(io_error)?;
        if metadata.len() > limit {
            return Err(TableError::TooLarge {
                path: path.to_path_buf(),
                actual: metadata.len(),
                limit,
            });
        }
        fs::read(path).map_err(io_error)
    }

    /// Load every table file found in the table directories of `root`.
    ///
    /// Files in each directory are visited in sorted name order and
    /// directories in configured order, so the resulting load order is
    /// deterministic. Missing directories are skipped.
    pub fn scan(&self, root: &Path) -> ScanReport {
        let mut report = ScanReport::default();
        for (path, table) in self.table_files(root) {
            report
                .files
                .push(self.load_path(&path, &table, FileEventKind::Created));
        }

        info!(
            "Scanned {}: {} table files, {} records, {} diagnostics",
            root.display(),
            report.files.len(),
            report.records(),
            report.diagnostic_count()
        );
        report
    }

    /// Rebuild the index from `roots`, replacing everything it held.
    ///
    /// Tables are read first and swapped in together, so lookups running
    /// meanwhile keep seeing the previous contents until the swap.
    pub fn rescan<P: AsRef<Path>>(&self, roots: &[P]) -> ScanReport {
        let mut report = ScanReport::default();
        let mut staged = Vec::new();

        for root in roots {
            for (path, table) in self.table_files(root.as_ref()) {
                let (records, diagnostics) = self.read_records(&path, &table);
                report.files.push(LoadReport {
                    path: path.clone(),
                    file_type: table.file_type.clone(),
                    kind: FileEventKind::Created,
                    records: records.len(),
                    diagnostics,
                });
                staged.push((path, table.file_type, records));
            }
        }

        self.index.replace_all(staged);
        info!(
            "Rescanned {} roots: {} table files, {} records, {} diagnostics",
            roots.len(),
            report.files.len(),
            report.records(),
            report.diagnostic_count()
        );
        report
    }

    /// Table files under the table directories of `root`, in load order.
    fn table_files(&self, root: &Path) -> Vec<(PathBuf, TableFile)> {
        let mut found = Vec::new();

        for dir in self.table_directories() {
            let table_dir = root.join(&dir);
            let entries = match fs::read_dir(&table_dir) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!("No table directory at {}", table_dir.display());
                    continue;
                }
                Err(err) => {
                    warn!("Cannot list {}: {}", table_dir.display(), err);
                    continue;
                }
            };

            let mut tables: Vec<(PathBuf, TableFile)> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .filter_map(|path| TableFile::from_path(&path).map(|table| (path, table)))
                .collect();
            tables.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
            found.extend(tables);
        }

        found
    }
}
