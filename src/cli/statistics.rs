//! Command line interface for computing drift statistics of particle ensembles.

use super::{
    regime::{self, Regime},
    utils,
};
use crate::{
    drift::{
        self,
        statistics::{DriftComparison, DriftStatistics},
    },
    exit_on_error, exit_with_error,
    field::FieldSpec,
    integration::{LorentzIntegrator, Trajectory},
    io::Verbosity,
    particle::{fpt, Particle},
    seeding::{self, InitialConditions},
};
use clap::{Arg, ArgMatches, Command};
use float_pretty_print::PrettyPrintFloat;
use pad::{Alignment, PadStr};
use std::fmt::Display;

const TABLE_WIDTH: usize = 80;
const NAME_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 6;

/// Builds a representation of the `statistics` command line subcommand.
pub fn create_statistics_subcommand() -> Command<'static> {
    let command = Command::new("statistics")
        .about("Print drift speed statistics for the default configurations of a regime")
        .long_about(
            "Print drift speed statistics for the default configurations of a regime.\n\
             The same random ensemble is simulated in each of the three field\n\
             configurations of the regime, and the distribution of empirical drift\n\
             speeds is compared with the theoretical drift speed.",
        )
        .arg(regime::create_regime_argument())
        .arg(
            Arg::new("percentages")
                .long("percentages")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_name("PERCENTAGES")
                .help(
                    "List of percentages for which to compute percentiles of the drift speeds\n\
                     (comma-separated)",
                )
                .takes_value(true)
                .multiple_values(true)
                .default_value("5,30,50,70,95"),
        );
    let command = utils::add_particle_count_argument(command, "300");
    let command = utils::add_position_argument(command);
    let command = utils::add_particle_arguments(command);
    let command = utils::add_integrator_arguments(command, "60000");
    utils::add_run_arguments(command)
}

/// Runs the actions for the `statistics` subcommand using the given arguments.
pub fn run_statistics_subcommand(arguments: &ArgMatches) {
    let regime = regime::parse_regime(arguments);
    let particle = utils::construct_particle_from_arguments(arguments);
    let integrator = utils::construct_integrator_from_arguments(arguments);
    let convention = utils::parse_elapsed_time_convention(arguments);
    let n_particles = utils::parse_number_of_particles(arguments);
    let n_steps = utils::parse_number_of_steps(arguments);
    let verbosity = utils::parse_verbosity(arguments, true);
    let shared_position = utils::parse_3d_float_values(arguments, "position");

    let percentages: Vec<fpt> =
        utils::get_finite_float_values_from_parseable_argument(arguments, "percentages")
            .unwrap_or_default();
    for &percentage in &percentages {
        if !(0.0..=100.0).contains(&percentage) {
            exit_with_error!("Error: Percentage not between 0 and 100: {}", percentage);
        }
    }

    let mut rng = utils::create_rng_from_arguments(arguments);
    let positions = match shared_position.as_ref() {
        Some(position) => seeding::shared_positions(position, n_particles),
        None => seeding::random_positions(n_particles, &mut rng),
    };
    let initial_conditions = exit_on_error!(
        InitialConditions::new(positions, seeding::random_velocities(n_particles, &mut rng)),
        "Error: Invalid initial conditions: {}"
    );

    integrate_configurations(
        &integrator,
        &regime.statistics_configurations(),
        &initial_conditions,
        &particle,
        n_steps,
        &verbosity,
        |configuration_idx, fields, trajectory| {
            let empirical_drifts = exit_on_error!(
                drift::empirical_drifts(&trajectory, convention),
                "Error: Could not estimate drift velocities: {}"
            );
            let statistics = exit_on_error!(
                DriftStatistics::from_estimates(&empirical_drifts, &percentages),
                "Error: Could not compute drift statistics: {}"
            );
            let comparison = match drift::theoretical_drift(fields, &trajectory, &particle) {
                Ok(theoretical_drift) => Some(statistics.compare_with(&theoretical_drift)),
                Err(err) => {
                    eprintln!(
                        "Warning: Could not compute theoretical drift velocity: {}",
                        err
                    );
                    None
                }
            };

            print_statistics_report(
                regime,
                configuration_idx,
                fields,
                &particle,
                &statistics,
                comparison.as_ref(),
            );
        },
    );
    print_whole_line('-');
}

/// Integrates the same ensemble in each of the given field configurations,
/// handing each trajectory over before the next configuration is integrated.
fn integrate_configurations<H>(
    integrator: &LorentzIntegrator,
    configurations: &[FieldSpec],
    initial_conditions: &InitialConditions,
    particle: &Particle,
    n_steps: usize,
    verbosity: &Verbosity,
    mut handle_trajectory: H,
) where
    H: FnMut(usize, &FieldSpec, Trajectory),
{
    for (configuration_idx, fields) in configurations.iter().enumerate() {
        let trajectory = utils::integrate_ensemble(
            integrator,
            fields,
            initial_conditions,
            particle,
            n_steps,
            verbosity,
        );
        handle_trajectory(configuration_idx, fields, trajectory);
    }
}

fn print_statistics_report(
    regime: Regime,
    configuration_idx: usize,
    fields: &FieldSpec,
    particle: &Particle,
    statistics: &DriftStatistics,
    comparison: Option<&DriftComparison>,
) {
    print_whole_line('=');
    print_padded_headline(
        &format!(
            "Drift speeds of {} in {} configuration {}",
            particle.name_plural(),
            regime,
            configuration_idx + 1
        ),
        ' ',
    );
    print_whole_line('-');
    print_padded_headline(&format!("{}", fields), ' ');
    print_whole_line('=');

    print_name_value_pair("Number of particles", statistics.count());
    print_name_value_pair("Mean speed", format_value(statistics.mean()));
    print_name_value_pair("Standard deviation", format_value(statistics.std_dev()));
    print_name_value_pair("Minimum speed", format_value(statistics.min()));
    print_name_value_pair("Maximum speed", format_value(statistics.max()));

    if !statistics.percentiles().is_empty() {
        print_whole_line('-');
        for &(percentage, percentile) in statistics.percentiles() {
            print_name_value_pair(
                &format!("{}th percentile", percentage),
                format_value(percentile),
            );
        }
    }

    print_whole_line('-');
    print_padded_headline("Histogram", ' ');
    let histogram = statistics.histogram();
    for bin_idx in 0..histogram.number_of_bins() {
        let (lower_edge, upper_edge) = histogram.bin_edges(bin_idx);
        println!(
            "[{}, {}] {}",
            format_value(lower_edge),
            format_value(upper_edge),
            format!("{}", histogram.bin_counts()[bin_idx]).pad(
                COUNT_WIDTH,
                ' ',
                Alignment::Right,
                false
            )
        );
    }

    print_whole_line('-');
    match comparison {
        Some(comparison) => {
            print_name_value_pair("Theoretical speed", format_value(comparison.theoretical_speed));
            print_name_value_pair(
                "Absolute deviation",
                format_value(comparison.absolute_deviation),
            );
            print_name_value_pair(
                "Relative deviation",
                comparison
                    .relative_deviation
                    .map_or_else(|| "N/A".to_string(), format_value),
            );
        }
        None => print_name_value_pair("Theoretical speed", "N/A"),
    }
}

fn print_padded_headline(text: &str, pad_char: char) {
    println!(
        "{}",
        format!(" {} ", text).pad(TABLE_WIDTH, pad_char, Alignment::Middle, false)
    );
}

fn print_whole_line(line_type: char) {
    println!("{}", "".pad_to_width_with_char(TABLE_WIDTH, line_type));
}

fn print_name_value_pair<S: Display>(name: &str, value: S) {
    println!(
        "{} {}",
        format!("{}:", name).pad_to_width(NAME_WIDTH),
        value
    );
}

fn format_value(value: fpt) -> String {
    format!(
        "{:min_width$.max_width$}",
        PrettyPrintFloat(value),
        min_width = VALUE_WIDTH,
        max_width = VALUE_WIDTH
    )
    .pad_to_width(VALUE_WIDTH)
}
