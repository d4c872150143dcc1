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

//! CLI command definitions and argument parsing.
//!
//! - [`core`]: table commands (check, lookup, hover)
//! - [`utility`]: utility commands (completion)

mod core;
mod utility;

use crate::commands::EngineOptions;
use crate::error::CliError;
use clap::{Args, Parser, Subcommand};

pub use self::core::CoreCommands;
pub use utility::UtilityCommands;

/// Hovercraft - hover documentation from keyword tables
#[derive(Parser)]
#[command(name = "hovercraft")]
#[command(author, version, about = "Hovercraft - hover documentation from keyword tables", long_about = None)]
pub struct Cli {
    /// Log table loading to stderr (repeat for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
///
/// ```text
/// Commands
/// ├── Core (check, lookup, hover)
/// └── Utility (completion)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    // Core commands - flattened to appear at top level
    #[command(flatten)]
    Core(CoreCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Core(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}

/// Table loading options shared by the table commands.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Table directory relative to the workspace (repeatable; default: .vscode and .data)
    #[arg(long = "table-dir", value_name = "DIR")]
    pub table_dirs: Vec<String>,

    /// Match keywords case-insensitively
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Name the table each record came from
    #[arg(long)]
    pub show_source: bool,
}

impl From<EngineArgs> for EngineOptions {
    fn from(args: EngineArgs) -> Self {
        EngineOptions {
            table_directories: args.table_dirs,
            ignore_case: args.ignore_case,
            show_source: args.show_source,
        }
    }
}
