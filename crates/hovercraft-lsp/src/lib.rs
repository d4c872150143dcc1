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

//! Hovercraft Language Server Protocol (LSP) host.
//!
//! Serves hover documentation from keyword tables kept in the workspace.
//! Tables are CSV or JSON files named `hovercraft.<filetype>.csv` or
//! `hovercraft.<filetype>.json` inside a table directory (`.vscode` and
//! `.data` by default). Hovering a word in a document whose file name ends
//! with `.<filetype>` shows every record for that word.
//!
//! # Features
//!
//! - **Hover**: Markdown documentation for the word under the cursor
//! - **Live tables**: edits to table files are picked up through
//!   `workspace/didChangeWatchedFiles` without a restart
//! - **Diagnostics**: malformed table rows are reported on the table file
//! - **Settings**: `caseSensitive`, `tableDirectories`, `showSource`,
//!   `maxTableSize` and `logLevel` under the `hovercraft` section
//!
//! # Memory Management
//!
//! - **Document Size Limit**: 64 MB per open document by default
//! - **Open Document Limit**: 1000 documents with LRU eviction
//! - **Table Size Limit**: tables over `maxTableSize` are rejected with a
//!   diagnostic instead of being read
//!
//! # Usage
//!
//! ```bash
//! # Run the language server (stdio transport)
//! hovercraft-lsp
//!
//! # With debug logging written to a file
//! hovercraft-lsp --debug --log-file /tmp/hovercraft.log
//! ```
//!
//! ## Programmatic Usage
//!
//! ```no_run
//! use hovercraft_lsp::HovercraftLanguageServer;
//! use tower_lsp::{LspService, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let stdin = tokio::io::stdin();
//!     let stdout = tokio::io::stdout();
//!
//!     let (service, socket) = LspService::new(HovercraftLanguageServer::new);
//!
//!     Server::new(stdin, stdout, socket).serve(service).await;
//! }
//! ```
//!
//! # Architecture
//!
//! - `backend`: the `LanguageServer` implementation and the table update queue
//! - [`config`]: client settings
//! - [`diagnostics`]: table diagnostics as LSP diagnostics
//! - [`document_manager`]: open documents as ropes with LRU eviction
//! - [`logging`]: subscriber setup with a reloadable filter
//! - [`utils`]: position and URI conversion

mod backend;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod document_manager;
pub mod logging;
pub mod utils;

pub use backend::HovercraftLanguageServer;
pub use config::{ConfigError, ServerConfig};
pub use document_manager::{CacheStatistics, DocumentManager};
pub use logging::LogHandle;

/// LSP server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
