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

//! The hover engine: one object tying the index, resolver, formatter and
//! watcher bridge together.
//!
//! Hosts keep a single `HoverEngine` (usually in an `Arc`) and call it from
//! any thread. Hover requests only read the index; file events and
//! configuration changes write to it.
//!
//! # Examples
//!
//! ```
//! use hovercraft_core::{EngineConfig, FileTypeKey, HoverEngine};
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let tables = dir.path().join(".vscode");
//! fs::create_dir_all(&tables).unwrap();
//! fs::write(tables.join("hovercraft.py.csv"), "keyword,description\nfoo,does foo\n").unwrap();
//!
//! let engine = HoverEngine::new(EngineConfig::default());
//! engine.scan(dir.path());
//!
//! let hover = engine.hover("foo()", 0, &[FileTypeKey::new("py")]).unwrap();
//! assert_eq!((hover.start, hover.end), (0, 3));
//! assert!(hover.content.markup_text.contains("does foo"));
//! ```

use crate::config::EngineConfig;
use crate::format::{ContentFormatter, FormattedHover};
use crate::index::{IndexStatistics, IndexedRecord, KeywordIndex};
use crate::record::FileTypeKey;
use crate::resolver::{LookupResolver, ResolvedHover};
use crate::watcher::{FileEvent, LoadReport, ScanReport, WatcherBridge};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Formatted hover content with the character span it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    /// Character offset where the hovered word starts.
    pub start: usize,
    /// Character offset one past the hovered word.
    pub end: usize,
    /// The hovered word.
    pub keyword: String,
    /// Number of records rendered.
    pub matches: usize,
    /// Rendered Markdown.
    pub content: FormattedHover,
}

/// What a call to [`HoverEngine::apply_config`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// Table directories or the size limit changed; workspace roots should
    /// be rescanned.
    pub rescan_needed: bool,
    /// Case sensitivity changed and the index was re-keyed.
    pub rekeyed: bool,
}

/// Table-driven hover provider.
#[derive(Debug)]
pub struct HoverEngine {
    index: Arc<KeywordIndex>,
    resolver: LookupResolver,
    formatter: RwLock<ContentFormatter>,
    bridge: WatcherBridge,
    config: RwLock<EngineConfig>,
}

impl Default for HoverEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl HoverEngine {
    /// Create an engine with an empty index.
    pub fn new(config: EngineConfig) -> Self {
        let index = Arc::new(KeywordIndex::with_case_sensitivity(config.case_sensitivity()));
        let bridge = WatcherBridge::with_settings(
            Arc::clone(&index),
            config.normalized_table_directories(),
            config.max_table_size,
        );
        Self {
            resolver: LookupResolver::new(Arc::clone(&index)),
            formatter: RwLock::new(ContentFormatter::new(config.format_options())),
            index,
            bridge,
            config: RwLock::new(config),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    /// The shared keyword index.
    pub fn index(&self) -> &Arc<KeywordIndex> {
        &self.index
    }

    /// The watcher bridge feeding the index.
    pub fn bridge(&self) -> &WatcherBridge {
        &self.bridge
    }

    /// Switch to a new configuration.
    ///
    /// Case sensitivity and provenance apply immediately. Directory and size
    /// changes only affect later events; the returned [`ConfigChange`] tells
    /// the host whether to rescan.
    pub fn apply_config(&self, config: EngineConfig) -> ConfigChange {
        let mut current = self.config.write();
        let mut change = ConfigChange::default();

        if current.case_sensitive != config.case_sensitive {
            self.index.set_case_sensitivity(config.case_sensitivity());
            change.rekeyed = true;
        }

        *self.formatter.write() = ContentFormatter::new(config.format_options());

        let directories = config.normalized_table_directories();
        if current.normalized_table_directories() != directories {
            self.bridge.set_table_directories(directories);
            change.rescan_needed = true;
        }
        if current.max_table_size != config.max_table_size {
            self.bridge.set_max_table_size(config.max_table_size);
            change.rescan_needed = true;
        }

        info!(
            "Configuration applied (case sensitive: {}, show source: {}, rescan: {})",
            config.case_sensitive, config.show_source, change.rescan_needed
        );
        *current = config;
        change
    }

    /// Resolve the word at character `offset` without formatting it.
    pub fn resolve(
        &self,
        text: &str,
        offset: usize,
        file_types: &[FileTypeKey],
    ) -> Option<ResolvedHover> {
        self.resolver.resolve_any(text, offset, file_types)
    }

    /// Hover content for the word at character `offset`.
    ///
    /// `file_types` are tried in order; see
    /// [`FileTypeKey::candidates_for_path`].
    pub fn hover(
        &self,
        text: &str,
        offset: usize,
        file_types: &[FileTypeKey],
    ) -> Option<HoverResult> {
        let resolved = self.resolve(text, offset, file_types)?;
        let content = self.formatter.read().format(&resolved.records);
        debug!(
            "Hover for '{}' at {}..{}",
            resolved.token.value, resolved.token.start, resolved.token.end
        );
        Some(HoverResult {
            start: resolved.token.start,
            end: resolved.token.end,
            matches: resolved.records.len(),
            keyword: resolved.token.value,
            content,
        })
    }

    /// Hover content for a document identified by its path.
    pub fn hover_for_path(&self, path: &Path, text: &str, offset: usize) -> Option<HoverResult> {
        let candidates = FileTypeKey::candidates_for_path(path);
        self.hover(text, offset, &candidates)
    }

    /// Direct keyword lookup.
    pub fn lookup(&self, file_type: &FileTypeKey, keyword: &str) -> Vec<IndexedRecord> {
        self.index.lookup(file_type, keyword)
    }

    /// Render records with the current formatter.
    pub fn format(&self, records: &[IndexedRecord]) -> FormattedHover {
        self.formatter.read().format(records)
    }

    /// Load every table under `root`.
    pub fn scan(&self, root: &Path) -> ScanReport {
        self.bridge.scan(root)
    }

    /// Rebuild the index from `roots`; lookups never see it half-built.
    pub fn rescan<P: AsRef<Path>>(&self, roots: &[P]) -> ScanReport {
        self.bridge.rescan(roots)
    }

    /// Apply one file event.
    pub fn handle_event(&self, event: &FileEvent) -> Option<LoadReport> {
        self.bridge.handle(event)
    }

    /// What the index currently holds.
    pub fn statistics(&self) -> IndexStatistics {
        self.index.statistics()
    }
}
