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

//! Hovercraft CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **check**: Load every table of a workspace and report record counts and
//!   diagnostics, optionally as JSON
//! - **lookup**: Print the hover content for a keyword and file type
//! - **hover**: Resolve the word at a line and column of a source file
//! - **completion**: Generate shell completion scripts
//!
//! # Examples
//!
//! ```no_run
//! use hovercraft_cli::commands::{check, CheckOptions, EngineOptions};
//!
//! # fn main() -> Result<(), hovercraft_cli::error::CliError> {
//! let options = CheckOptions {
//!     json: false,
//!     strict: true,
//! };
//! check(std::path::Path::new("."), &EngineOptions::default(), &options)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Exit Status
//!
//! Commands return [`error::CliError`]; the binary prints it and exits with
//! a failure status. `check --strict` fails when any table has diagnostics,
//! `lookup` and `hover` fail when nothing matches.

pub mod cli;
pub mod commands;
pub mod error;
