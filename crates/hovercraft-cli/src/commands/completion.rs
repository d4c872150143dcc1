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

//! Shell completion generation - Tab completion for various shells

use crate::error::CliError;
use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

/// Write a completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::Shell;
/// use hovercraft_cli::commands::generate_completion;
///
/// # fn main() -> Result<(), hovercraft_cli::error::CliError> {
/// let mut cmd = Command::new("hovercraft");
/// generate_completion(Shell::Bash, &mut cmd)?;
/// # Ok(())
/// # }
/// ```
pub fn generate_completion(shell: Shell, cmd: &mut Command) -> Result<(), CliError> {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
    Ok(())
}

/// Installation instructions for the completion script of `shell`.
///
/// ```
/// use clap_complete::Shell;
/// use hovercraft_cli::commands::installation_instructions;
///
/// assert!(installation_instructions(Shell::Zsh).contains("_hovercraft"));
/// ```
pub fn installation_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => {
            r#"# Bash completion installation:

# For current session only:
eval "$(hovercraft completion bash)"

# For persistent installation, add to your ~/.bashrc:
echo 'eval "$(hovercraft completion bash)"' >> ~/.bashrc
"#
        }
        Shell::Zsh => {
            r#"# Zsh completion installation:

# Save to a completions directory in $fpath:
hovercraft completion zsh > ~/.zsh/completions/_hovercraft
"#
        }
        Shell::Fish => {
            r#"# Fish completion installation:

hovercraft completion fish > ~/.config/fish/completions/hovercraft.fish
"#
        }
        Shell::PowerShell => {
            r#"# PowerShell completion installation:

# Add this line to the profile found at $PROFILE:
hovercraft completion powershell | Out-String | Invoke-Expression
"#
        }
        Shell::Elvish => {
            r#"# Elvish completion installation:

# Add to your ~/.elvish/rc.elv:
eval (hovercraft completion elvish | slurp)
"#
        }
        _ => "No installation instructions for this shell",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installation_instructions_name_the_binary() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Elvish,
        ] {
            let instructions = installation_instructions(shell);
            assert!(instructions.contains("hovercraft completion"), "{:?}", shell);
        }
    }

    #[test]
    fn test_bash_instructions() {
        assert!(installation_instructions(Shell::Bash).contains("~/.bashrc"));
    }
}
