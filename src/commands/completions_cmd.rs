use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::commands::base_commands::CliArgs;

pub fn completions_command(shell: Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
