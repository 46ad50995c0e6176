//! Function for building the command line hierarchy.

use super::{
    completions::create_completions_subcommand, simulate::create_simulate_subcommand,
    trajectories::create_trajectories_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `gyrodrift` command line hierarchy.
pub fn build() -> Command<'static> {
    let command = Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .subcommand(create_simulate_subcommand())
        .subcommand(create_trajectories_subcommand());

    #[cfg(feature = "statistics")]
    let command = command.subcommand(super::statistics::create_statistics_subcommand());

    command.subcommand(create_completions_subcommand())
}
