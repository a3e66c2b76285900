//! `completion` command: shell completion scripts for the command tree

use clap_complete::{Shell, generate};

use super::tree::{CommandMeta, CommandNode};
use crate::error::LinkctlError;

/// Shells with a completion subcommand, in listing order
pub const SHELLS: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

/// Build the `completion` command with one child per supported shell
///
/// # Errors
///
/// Returns an error if:
/// - A shell subcommand cannot be registered
pub fn new_cmd_completion(executable_name: &str) -> Result<CommandNode, LinkctlError> {
    let mut cmd = CommandNode::branch(
        CommandMeta::new("completion", "Generate the autocompletion script for the specified shell")
            .long(format!(
                "Generate the autocompletion script for {executable_name} for the specified shell.\n\
                 See each sub-command's help for details on how to use the generated script."
            )),
    );

    for shell in SHELLS {
        cmd.add_command(new_cmd_shell(shell))?;
    }

    Ok(cmd)
}

fn new_cmd_shell(shell: Shell) -> CommandNode {
    CommandNode::leaf(
        CommandMeta::new(
            shell.to_string(),
            format!("Generate the autocompletion script for {shell}"),
        ),
        move |inv| {
            let mut cli = inv.root.to_clap();
            let bin_name = inv.root.meta().name.clone();
            generate(shell, &mut cli, bin_name, &mut inv.io.out);
            Ok(())
        },
    )
}
