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

//! LSP constants and magic number definitions.
//!
//! # Organization
//!
//! - **Memory Limits**: document store constraints
//! - **LSP Protocol**: protocol-specific values and identifiers
//! - **Logging**: default filter directives

// ============================================================================
// Memory Limits
// ============================================================================

/// Bytes per megabyte (1024 * 1024).
pub const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

/// Default maximum size of an open document (64 MB).
///
/// Hover only ever looks at one line, but the whole document is kept in a
/// rope so positions can be converted. Larger documents are not stored and
/// get no hovers.
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 64 * BYTES_PER_MEGABYTE;

/// Default maximum number of simultaneously open documents (1000).
///
/// With LRU eviction an evicted document simply gets no hovers until the
/// editor sends it again on the next change.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

// ============================================================================
// LSP Protocol Constants
// ============================================================================

/// Server name reported in `initialize`.
pub const SERVER_NAME: &str = "hovercraft-lsp";

/// Settings section read from `workspace/didChangeConfiguration`.
pub const CONFIG_SECTION: &str = "hovercraft";

/// Registration id for the dynamic file watcher.
pub const WATCHER_REGISTRATION_ID: &str = "hovercraft-table-watcher";

/// Maximum character position for whole-line diagnostic ranges.
///
/// Table diagnostics know their line but not their column; editors clamp
/// the end to the actual line length.
pub const DIAGNOSTIC_LINE_END_CHAR: u32 = 1000;

/// Line numbering offset between table diagnostics (1-based) and LSP (0-based).
pub const LINE_NUMBER_OFFSET: u64 = 1;

/// Source tag attached to published diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "hovercraft";

// ============================================================================
// Logging
// ============================================================================

/// Filter used when neither `RUST_LOG` nor `--log-level` is given.
pub const DEFAULT_LOG_FILTER: &str = "hovercraft_core=info,hovercraft_lsp=info";

/// Filter used with `--debug`.
pub const DEBUG_LOG_FILTER: &str = "hovercraft_core=debug,hovercraft_lsp=debug,tower_lsp=info";
