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

//! Hovercraft Language Server binary.
//!
//! # Usage
//!
//! ```bash
//! # Run the language server (stdio transport)
//! hovercraft-lsp
//!
//! # Debug logging
//! hovercraft-lsp --debug
//!
//! # Explicit filter, logged to a file
//! hovercraft-lsp --log-level "hovercraft_core=trace" --log-file hovercraft.log
//! ```
//!
//! # Editor Integration
//!
//! ## Neovim (nvim-lspconfig)
//!
//! ```lua
//! require('lspconfig.configs').hovercraft = {
//!   default_config = {
//!     cmd = { 'hovercraft-lsp' },
//!     filetypes = { 'python', 'javascript', 'rust' },
//!     root_dir = function() return vim.fn.getcwd() end,
//!     settings = { hovercraft = { caseSensitive = false } },
//!   },
//! }
//! require('lspconfig').hovercraft.setup {}
//! ```

use clap::Parser;
use hovercraft_lsp::constants::{DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_DOCUMENT_SIZE};
use hovercraft_lsp::logging::{self, LoggingOptions};
use hovercraft_lsp::{HovercraftLanguageServer, LogHandle};
use std::path::PathBuf;
use tower_lsp::{LspService, Server};

#[derive(Parser, Debug)]
#[command(name = "hovercraft-lsp")]
#[command(author, version, about = "Hover documentation from workspace keyword tables")]
struct Args {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log filter: a level (info, debug, ...) or tracing directives
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Maximum number of open documents kept in memory
    #[arg(long, default_value_t = DEFAULT_MAX_CACHE_SIZE)]
    max_documents: usize,

    /// Maximum size of an open document in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_DOCUMENT_SIZE)]
    max_document_size: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let options = LoggingOptions {
        debug: args.debug,
        log_level: args.log_level,
        log_file: args.log_file,
    };
    let log_handle = match logging::init(&options) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("hovercraft-lsp: {}; continuing without logs", err);
            LogHandle::disabled()
        }
    };

    tracing::info!("Starting Hovercraft Language Server v{}", hovercraft_lsp::VERSION);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (max_documents, max_document_size) = (args.max_documents, args.max_document_size);
    let (service, socket) = LspService::new(move |client| {
        HovercraftLanguageServer::with_config(
            client,
            log_handle.clone(),
            max_documents,
            max_document_size,
        )
    });

    Server::new(stdin, stdout, socket).serve(service).await;
}
