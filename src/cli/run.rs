//! Function for running the command line program.

use super::{
    build, completions::run_completions_subcommand, simulate::run_simulate_subcommand,
    trajectories::run_trajectories_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;

/// Runs the `gyrodrift` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `gyrodrift` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    let start_instant = Instant::now();

    if let Some(simulate_arguments) = arguments.subcommand_matches("simulate") {
        run_simulate_subcommand(simulate_arguments);
    }
    if let Some(trajectories_arguments) = arguments.subcommand_matches("trajectories") {
        run_trajectories_subcommand(trajectories_arguments);
    }
    #[cfg(feature = "statistics")]
    if let Some(statistics_arguments) = arguments.subcommand_matches("statistics") {
        super::statistics::run_statistics_subcommand(statistics_arguments);
    }
    if let Some(completions_arguments) = arguments.subcommand_matches("completions") {
        run_completions_subcommand(completions_arguments);
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}
