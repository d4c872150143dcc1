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

//! Open-document store with LRU eviction.
//!
//! The server needs document text only to find the word under the cursor,
//! so each document is kept as a [`Rope`] together with its version and a
//! content hash. Hover requests borrow the rope under a short lock.
//!
//! # Design
//!
//! - **LRU Eviction**: the least recently used document is dropped when the
//!   store is full
//! - **Change Detection**: identical content (by hash) only refreshes the
//!   access time
//! - **Size Limits**: documents over the limit are rejected
//! - **Statistics**: hit, miss and eviction counters

use crate::constants::{DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_DOCUMENT_SIZE};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use ropey::Rope;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

/// Stored state of one open document.
#[derive(Debug)]
pub struct DocumentState {
    /// Current content.
    pub rope: Rope,
    /// Version reported by the client.
    pub version: i32,
    /// Hash of the content, for change detection.
    pub content_hash: u64,
    /// Last access time, for LRU eviction.
    pub last_access: Instant,
}

/// Counters describing store behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Updates to a document already in the store.
    pub hits: u64,
    /// Inserts of a document not in the store.
    pub misses: u64,
    /// Documents dropped to make room.
    pub evictions: u64,
    /// Documents currently stored.
    pub current_size: usize,
    /// Capacity.
    pub max_size: usize,
}

/// Concurrent store of open documents.
///
/// # Thread Safety
///
/// Documents live in a `DashMap`; each state sits behind its own
/// `parking_lot::Mutex`, so requests on different documents never contend.
///
/// # Example
///
/// ```
/// use hovercraft_lsp::document_manager::DocumentManager;
/// use tower_lsp::lsp_types::Url;
///
/// let manager = DocumentManager::new(10, 1024 * 1024);
/// let uri = Url::parse("file:///ws/main.py").unwrap();
/// assert!(manager.insert_or_update(&uri, 1, "print(x)"));
/// assert_eq!(manager.text(&uri).as_deref(), Some("print(x)"));
/// ```
#[derive(Debug)]
pub struct DocumentManager {
    documents: DashMap<Url, Arc<Mutex<DocumentState>>>,
    cache_stats: Mutex<CacheStatistics>,
    max_cache_size: RwLock<usize>,
    max_document_size: RwLock<usize>,
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_DOCUMENT_SIZE)
    }
}

impl DocumentManager {
    /// Create a store with the given capacity and per-document size limit.
    pub fn new(max_cache_size: usize, max_document_size: usize) -> Self {
        Self {
            documents: DashMap::new(),
            cache_stats: Mutex::new(CacheStatistics {
                max_size: max_cache_size,
                ..Default::default()
            }),
            max_cache_size: RwLock::new(max_cache_size),
            max_document_size: RwLock::new(max_document_size),
        }
    }

    /// Snapshot of the store counters.
    pub fn statistics(&self) -> CacheStatistics {
        let mut stats = self.cache_stats.lock();
        stats.current_size = self.documents.len();
        stats.clone()
    }

    /// Change the capacity at runtime.
    pub fn set_max_cache_size(&self, new_max: usize) {
        *self.max_cache_size.write() = new_max;
        self.cache_stats.lock().max_size = new_max;
        debug!("Document store capacity updated to: {}", new_max);
    }

    /// Current capacity.
    pub fn max_cache_size(&self) -> usize {
        *self.max_cache_size.read()
    }

    /// Change the per-document size limit at runtime.
    pub fn set_max_document_size(&self, new_max: usize) {
        *self.max_document_size.write() = new_max;
        debug!("Max document size updated to: {} bytes", new_max);
    }

    /// Current per-document size limit.
    pub fn max_document_size(&self) -> usize {
        *self.max_document_size.read()
    }

    fn hash_content(content: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Store new content for a document.
    ///
    /// Returns `false` when the content exceeds the size limit; any earlier
    /// version of the document is dropped in that case so stale text is
    /// never hovered.
    pub fn insert_or_update(&self, uri: &Url, version: i32, content: &str) -> bool {
        let max_size = self.max_document_size();
        if content.len() > max_size {
            warn!(
                "Document size limit exceeded for {}: {} bytes > {} bytes maximum (rejected)",
                uri,
                content.len(),
                max_size
            );
            self.documents.remove(uri);
            return false;
        }

        let content_hash = Self::hash_content(content);

        if let Some(state_ref) = self.documents.get(uri) {
            self.cache_stats.lock().hits += 1;

            let mut state = state_ref.lock();
            state.version = version;
            state.last_access = Instant::now();
            if state.content_hash != content_hash {
                debug!(
                    "Document content changed for {}: {} -> {} bytes",
                    uri,
                    state.rope.len_bytes(),
                    content.len()
                );
                state.rope = Rope::from_str(content);
                state.content_hash = content_hash;
            }
            return true;
        }

        self.cache_stats.lock().misses += 1;

        let max_cache = self.max_cache_size();
        if self.documents.len() >= max_cache {
            warn!(
                "Document store full ({}/{}), evicting before inserting {}",
                self.documents.len(),
                max_cache,
                uri
            );
            self.evict_lru_document();
        }

        let state = DocumentState {
            rope: Rope::from_str(content),
            version,
            content_hash,
            last_access: Instant::now(),
        };
        self.documents.insert(uri.clone(), Arc::new(Mutex::new(state)));
        debug!(
            "Document stored: {} ({} bytes, version {})",
            uri,
            content.len(),
            version
        );
        true
    }

    /// Run `f` with the document's rope, updating its access time.
    pub fn with_rope<T>(&self, uri: &Url, f: impl FnOnce(&Rope) -> T) -> Option<T> {
        let state_ref = self.get_state(uri)?;
        let mut state = state_ref.lock();
        state.last_access = Instant::now();
        Some(f(&state.rope))
    }

    /// Full text of a document.
    pub fn text(&self, uri: &Url) -> Option<String> {
        self.with_rope(uri, |rope| rope.to_string())
    }

    /// Version of a document.
    pub fn version(&self, uri: &Url) -> Option<i32> {
        self.get_state(uri).map(|state| state.lock().version)
    }

    /// Shared handle to a document's state.
    pub fn get_state(&self, uri: &Url) -> Option<Arc<Mutex<DocumentState>>> {
        self.documents.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a document is stored.
    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Drop a document. Returns `false` if it was not stored.
    pub fn remove(&self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    /// URIs of every stored document.
    pub fn all_uris(&self) -> Vec<Url> {
        self.documents.iter().map(|entry| entry.key().clone()).collect()
    }

    fn evict_lru_document(&self) {
        let mut lru: Option<(Url, Instant)> = None;
        for entry in self.documents.iter() {
            let last_access = entry.value().lock().last_access;
            if lru.as_ref().map_or(true, |(_, time)| last_access < *time) {
                lru = Some((entry.key().clone(), last_access));
            }
        }

        let Some((uri, last_access)) = lru else {
            return;
        };
        warn!(
            "Evicting LRU document {} (idle for {:?})",
            uri,
            last_access.elapsed()
        );
        self.documents.remove(&uri);
        self.cache_stats.lock().evictions += 1;
    }

    /// Drop every document and reset the counters.
    pub fn clear(&self) {
        self.documents.clear();
        let mut stats = self.cache_stats.lock();
        stats.hits = 0;
        stats.misses = 0;
        stats.evictions = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///ws/{}", name)).unwrap()
    }

    #[test]
    fn test_document_manager_new() {
        let manager = DocumentManager::new(100, 1024 * 1024);
        assert_eq!(manager.max_cache_size(), 100);
        assert_eq!(manager.max_document_size(), 1024 * 1024);
        assert_eq!(
            manager.statistics(),
            CacheStatistics {
                max_size: 100,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_insert_and_read() {
        let manager = DocumentManager::new(10, 1024);
        let uri = uri("a.py");
        assert!(manager.insert_or_update(&uri, 1, "foo()\nbar()"));
        assert_eq!(manager.text(&uri).as_deref(), Some("foo()\nbar()"));
        assert_eq!(manager.version(&uri), Some(1));
        assert_eq!(manager.with_rope(&uri, |rope| rope.len_lines()), Some(2));

        let stats = manager.statistics();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.current_size, 1);
    }

    #[test]
    fn test_update_replaces_content() {
        let manager = DocumentManager::new(10, 1024);
        let uri = uri("a.py");
        manager.insert_or_update(&uri, 1, "old");
        manager.insert_or_update(&uri, 2, "new");
        manager.insert_or_update(&uri, 3, "new");
        assert_eq!(manager.text(&uri).as_deref(), Some("new"));
        assert_eq!(manager.version(&uri), Some(3));
        assert_eq!(manager.statistics().hits, 2);
    }

    #[test]
    fn test_document_size_limit() {
        let manager = DocumentManager::new(10, 8);
        let uri = uri("a.py");
        assert!(manager.insert_or_update(&uri, 1, "small"));
        assert!(!manager.insert_or_update(&uri, 2, "much too large"));
        assert!(!manager.contains(&uri));
    }

    #[test]
    fn test_lru_eviction() {
        let manager = DocumentManager::new(3, 1024);
        for i in 0..3 {
            manager.insert_or_update(&uri(&format!("{}.py", i)), 1, "x");
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        manager.text(&uri("0.py"));

        manager.insert_or_update(&uri("3.py"), 1, "x");
        let stats = manager.statistics();
        assert_eq!(stats.current_size, 3);
        assert_eq!(stats.evictions, 1);
        assert!(manager.contains(&uri("0.py")));
        assert!(!manager.contains(&uri("1.py")));
    }

    #[test]
    fn test_remove_and_clear() {
        let manager = DocumentManager::default();
        let a = uri("a.py");
        manager.insert_or_update(&a, 1, "x");
        manager.insert_or_update(&uri("b.py"), 1, "y");
        assert_eq!(manager.all_uris().len(), 2);

        assert!(manager.remove(&a));
        assert!(!manager.remove(&a));
        assert!(manager.text(&a).is_none());

        manager.clear();
        assert_eq!(manager.statistics().current_size, 0);
        assert_eq!(manager.statistics().misses, 0);
    }

    #[test]
    fn test_runtime_config_update() {
        let manager = DocumentManager::new(100, 1024);
        manager.set_max_cache_size(200);
        assert_eq!(manager.max_cache_size(), 200);
        assert_eq!(manager.statistics().max_size, 200);
        manager.set_max_document_size(2048);
        assert_eq!(manager.max_document_size(), 2048);
    }
}
