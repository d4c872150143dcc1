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

//! Hover resolution: word under the cursor, then index lookup.

use crate::index::{IndexedRecord, KeywordIndex};
use crate::record::FileTypeKey;
use crate::tokenizer::{token_at, Token};
use std::sync::Arc;
use tracing::debug;

/// A token together with every record it matched.
#[derive(Debug, Clone)]
pub struct ResolvedHover {
    /// The word under the cursor; its span anchors the tooltip.
    pub token: Token,
    /// Matching records in load order. Never empty.
    pub records: Vec<IndexedRecord>,
}

/// Resolves cursor positions against a shared [`KeywordIndex`].
#[derive(Debug, Clone)]
pub struct LookupResolver {
    index: Arc<KeywordIndex>,
}

impl LookupResolver {
    /// Create a resolver reading from `index`.
    pub fn new(index: Arc<KeywordIndex>) -> Self {
        Self { index }
    }

    /// The index this resolver reads.
    pub fn index(&self) -> &Arc<KeywordIndex> {
        &self.index
    }

    /// Resolve the word at character `offset` in `text` for one file type.
    ///
    /// Returns `None` when there is no word at the offset or the word has no
    /// entry in the table for `file_type`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hovercraft_core::{FileTypeKey, HoverRecord, KeywordIndex, LookupResolver};
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// let index = Arc::new(KeywordIndex::new());
    /// let py = FileTypeKey::new("py");
    /// index.load_file(
    ///     Path::new("/ws/.vscode/hovercraft.py.csv"),
    ///     &py,
    ///     vec![HoverRecord::new("foo", "does foo")],
    /// );
    ///
    /// let resolver = LookupResolver::new(index);
    /// let hit = resolver.resolve("foo()", 0, &py).unwrap();
    /// assert_eq!(hit.token.value, "foo");
    /// assert_eq!(hit.records[0].record.description, "does foo");
    /// assert!(resolver.resolve("bar()", 0, &py).is_none());
    /// ```
    pub fn resolve(
        &self,
        text: &str,
        offset: usize,
        file_type: &FileTypeKey,
    ) -> Option<ResolvedHover> {
        let token = token_at(text, offset)?;
        self.resolve_token(token, std::slice::from_ref(file_type))
    }

    /// Like [`resolve`](Self::resolve), trying each key in order and
    /// returning the first one with a match.
    pub fn resolve_any(
        &self,
        text: &str,
        offset: usize,
        file_types: &[FileTypeKey],
    ) -> Option<ResolvedHover> {
        let token = token_at(text, offset)?;
        self.resolve_token(token, file_types)
    }

    fn resolve_token(&self, token: Token, file_types: &[FileTypeKey]) -> Option<ResolvedHover> {
        for file_type in file_types {
            let records = self.index.lookup(file_type, &token.value);
            if !records.is_empty() {
                debug!(
                    "Resolved '{}' in table '{}' ({} records)",
                    token.value,
                    file_type,
                    records.len()
                );
                return Some(ResolvedHover { token, records });
            }
        }
        debug!("No entry for '{}'", token.value);
        None
    }
}
