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

//! Log subscriber setup with a runtime-adjustable filter.
//!
//! stdout carries LSP traffic, so logs go to stderr or to a file. The filter
//! sits behind a `reload` layer; the `logLevel` setting swaps it without a
//! restart.
//!
//! Filter precedence at startup: `--log-level`, then `--debug`, then
//! `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].

use crate::constants::{DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Failure while installing or changing the log filter.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directives could not be parsed.
    #[error("invalid log filter '{directives}': {source}")]
    InvalidFilter {
        /// Directives as given.
        directives: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },

    /// The log file could not be opened.
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("cannot install log subscriber: {0}")]
    Init(String),

    /// The subscriber backing the handle is gone.
    #[error("cannot reload log filter: {0}")]
    Reload(#[from] reload::Error),
}

/// Startup logging options, usually from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Use the debug filter.
    pub debug: bool,
    /// Explicit filter or bare level.
    pub log_level: Option<String>,
    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Handle for changing the log filter at runtime.
///
/// A disabled handle (no subscriber installed, as in tests) accepts and
/// ignores every change.
#[derive(Clone, Default)]
pub struct LogHandle {
    inner: Option<reload::Handle<EnvFilter, Registry>>,
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("enabled", &self.inner.is_some())
            .finish()
    }
}

impl LogHandle {
    /// A handle not attached to any subscriber.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Replace the active filter. Bare levels are expanded with
    /// [`expand_level`].
    pub fn set_filter(&self, level: &str) -> Result<(), LoggingError> {
        let filter = parse_filter(level)?;
        if let Some(handle) = &self.inner {
            handle.reload(filter)?;
            tracing::info!("Log filter changed to '{}'", expand_level(level));
        }
        Ok(())
    }
}

/// Expand a bare level (`"debug"`) into directives for the hovercraft
/// crates; anything else is returned unchanged.
///
/// ```
/// use hovercraft_lsp::logging::expand_level;
///
/// assert_eq!(expand_level("debug"), "hovercraft_core=debug,hovercraft_lsp=debug");
/// assert_eq!(expand_level("tower_lsp=trace"), "tower_lsp=trace");
/// ```
pub fn expand_level(level: &str) -> String {
    let level = level.trim();
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {
            let level = level.to_ascii_lowercase();
            format!("hovercraft_core={},hovercraft_lsp={}", level, level)
        }
        _ => level.to_string(),
    }
}

fn parse_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = expand_level(level);
    EnvFilter::try_new(&directives).map_err(|source| LoggingError::InvalidFilter {
        directives,
        source,
    })
}

fn initial_filter(options: &LoggingOptions) -> Result<EnvFilter, LoggingError> {
    if let Some(level) = &options.log_level {
        return parse_filter(level);
    }
    if options.debug {
        return parse_filter(DEBUG_LOG_FILTER);
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_filter(DEFAULT_LOG_FILTER),
    }
}

fn make_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter, LoggingError> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// Install the global subscriber and return a handle to its filter.
pub fn init(options: &LoggingOptions) -> Result<LogHandle, LoggingError> {
    let filter = initial_filter(options)?;
    let (filter_layer, handle) = reload::Layer::new(filter);
    let writer = make_writer(options.log_file.as_deref())?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    Ok(LogHandle {
        inner: Some(handle),
    })
}
