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

//! Table-driven hover engine.
//!
//! Hovercraft answers "what is this word?" for an editor by looking the word
//! under the cursor up in keyword tables that live in the workspace, for
//! example `.vscode/hovercraft.py.csv`:
//!
//! ```text
//! keyword,description,category,url
//! print,Print objects to the text stream,function,https://docs.python.org/3/library/functions.html#print
//! ```
//!
//! # Pipeline
//!
//! - [`parser`]: CSV / JSON bytes into [`HoverRecord`]s plus [`Diagnostic`]s
//! - [`KeywordIndex`]: `(file type, keyword)` to records, replaced per file
//! - [`tokenizer`]: the word at a character offset
//! - [`LookupResolver`]: tokenizer plus index
//! - [`format`]: records into escaped Markdown
//! - [`WatcherBridge`]: file events into index updates
//! - [`HoverEngine`]: all of the above behind one object
//!
//! # Example
//!
//! ```
//! use hovercraft_core::{FileTypeKey, HoverEngine, HoverRecord};
//! use std::path::Path;
//!
//! let engine = HoverEngine::default();
//! engine.index().load_file(
//!     Path::new("/ws/.vscode/hovercraft.py.csv"),
//!     &FileTypeKey::new("py"),
//!     vec![HoverRecord::new("print", "Print objects to the text stream")],
//! );
//!
//! let hover = engine.hover("print(x)", 2, &[FileTypeKey::new("py")]).unwrap();
//! assert_eq!((hover.start, hover.end), (0, 5));
//! assert!(hover.content.markup_text.starts_with("**print**"));
//! ```

mod config;
mod engine;
mod error;
pub mod format;
mod index;
pub mod parser;
mod record;
mod resolver;
pub mod tokenizer;
mod watcher;

pub use config::{EngineConfig, DEFAULT_MAX_TABLE_SIZE, DEFAULT_TABLE_DIRECTORIES};
pub use engine::{ConfigChange, HoverEngine, HoverResult};
pub use error::{Diagnostic, DiagnosticKind, TableError};
pub use format::{ContentFormatter, FormatOptions, FormattedHover};
pub use index::{CaseSensitivity, IndexStatistics, IndexedRecord, KeywordIndex};
pub use parser::{parse, ParseOutcome};
pub use record::{FileTypeKey, HoverRecord, TableFile, TableFormat, TABLE_FILE_PREFIX};
pub use resolver::{LookupResolver, ResolvedHover};
pub use tokenizer::{token_at, Token};
pub use watcher::{FileEvent, FileEventKind, LoadReport, ScanReport, WatcherBridge};
