//! Command line interface for generating a command line completion script.

use super::{build, utils};
use clap::{Arg, ArgMatches, Command};
use clap_complete::Shell;
use std::io;

/// Creates a subcommand for printing a shell completion script.
pub fn create_completions_subcommand() -> Command<'static> {
    Command::new("completions")
        .about("Generate tab-completion script for your shell")
        .hide(true)
        .arg(
            Arg::new("shell")
                .value_name("SHELL")
                .required(true)
                .possible_values(&["bash", "zsh", "fish"])
                .help("The shell to generate the script for"),
        )
        .after_help(
            "The script is written to stdout. For example, with Bash:\n\n    \
             $ gyrodrift completions bash > ~/.local/share/bash-completion/completions/gyrodrift",
        )
}

pub fn run_completions_subcommand(arguments: &ArgMatches) {
    let shell: Shell = utils::get_value_from_required_parseable_argument(arguments, "shell");
    clap_complete::generate(
        shell,
        &mut build::build(),
        clap::crate_name!(),
        &mut io::stdout(),
    );
}
