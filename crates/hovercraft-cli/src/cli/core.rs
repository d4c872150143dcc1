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

//! Table commands: check, lookup and hover.

use super::EngineArgs;
use crate::commands::{self, CheckOptions};
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

/// Core Hovercraft commands.
///
/// - **Check**: load every table and report diagnostics
/// - **Lookup**: print the hover content for a keyword
/// - **Hover**: resolve the word at a position of a source file
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Check the hover tables of a workspace
    ///
    /// Loads every `hovercraft.<filetype>.csv|json` table in the table
    /// directories and prints record counts and diagnostics per file.
    Check {
        /// Workspace root
        #[arg(value_name = "WORKSPACE", default_value = ".")]
        workspace: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Fail if any table has diagnostics
        #[arg(short, long)]
        strict: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print the hover content for a keyword
    Lookup {
        /// Keyword to look up
        #[arg(value_name = "KEYWORD")]
        keyword: String,

        /// File type (document extension) whose tables are searched, e.g. `py`
        #[arg(short = 't', long, value_name = "EXT")]
        file_type: String,

        /// Workspace root
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        workspace: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Resolve the word at a position of a source file
    ///
    /// Lines and columns are 1-based; columns count characters.
    Hover {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Line number (1-based)
        #[arg(short, long)]
        line: usize,

        /// Column number in characters (1-based)
        #[arg(short, long)]
        column: usize,

        /// Workspace root
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        workspace: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

impl CoreCommands {
    /// Execute the core command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CoreCommands::Check {
                workspace,
                json,
                strict,
                engine,
            } => commands::check(&workspace, &engine.into(), &CheckOptions { json, strict }),
            CoreCommands::Lookup {
                keyword,
                file_type,
                workspace,
                engine,
            } => commands::lookup(&keyword, &file_type, &workspace, &engine.into()),
            CoreCommands::Hover {
                file,
                line,
                column,
                workspace,
                engine,
            } => commands::hover(&file, line, column, &workspace, &engine.into()),
        }
    }
}
