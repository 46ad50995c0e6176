//! Utilities for creating the command line interface.

use crate::{
    drift::ElapsedTimeConvention,
    exit_on_error, exit_on_false, exit_on_none,
    field::FieldSpec,
    geometry::Vec3,
    integration::{IntegratorConfig, LorentzIntegrator, Trajectory},
    io::Verbosity,
    num::BFloat,
    particle::{fpt, Particle, Species},
    seeding::InitialConditions,
};
use clap::{Arg, ArgMatches, Command};
use rand::{rngs::StdRng, SeedableRng};
use std::str::FromStr;

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn parse_value_strings<'a, 'b, T, I>(argument_name: &'a str, value_strings: I) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
    I: Iterator<Item = &'b str>,
{
    value_strings
        .filter_map(|value_string| {
            if value_string.is_empty() {
                None
            } else {
                Some(parse_value_string(argument_name, value_string))
            }
        })
        .collect()
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .value_of(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_value_from_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

pub fn get_finite_float_value_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> F
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value: F = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_finite_float_values_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<Vec<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let values = arguments
        .values_of(argument_name)
        .map(|value_strings| parse_value_strings(argument_name, value_strings));
    if let Some(values) = values.as_ref() {
        values
            .iter()
            .for_each(|&value| verify_finite_float_value(argument_name, value));
    }
    values
}

/// Parses the three comma-separated finite components of the given vector argument,
/// or returns `None` if the argument is absent.
pub fn parse_3d_float_values<F>(arguments: &ArgMatches, argument_name: &str) -> Option<Vec3<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    arguments.values_of(argument_name).map(|value_strings| {
        let values: Vec<F> = parse_value_strings(argument_name, value_strings);
        verify_argument_value_count(argument_name, &values, 3);
        let vector = exit_on_none!(
            Vec3::from_slice(&values),
            "Error: {} must have 3 values",
            argument_name
        );
        exit_on_false!(
            vector.is_finite(),
            "Error: {} must be finite",
            argument_name
        );
        vector
    })
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::default_progress()
    } else if arguments.is_present("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}

/// Adds arguments for selecting the particle species.
pub fn add_particle_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("species")
                .short('s')
                .long("species")
                .require_equals(true)
                .value_name("CODE")
                .help(
                    "Particle species (e: electron, ae: positron, p: proton, ap: antiproton)\n \
                     [default: p]",
                )
                .takes_value(true)
                .possible_values(&["e", "ae", "p", "ap"])
                .conflicts_with_all(&["mass", "charge"]),
        )
        .arg(
            Arg::new("mass")
                .long("mass")
                .require_equals(true)
                .value_name("VALUE")
                .help("Mass of a custom particle species [kg]")
                .takes_value(true)
                .requires("charge"),
        )
        .arg(
            Arg::new("charge")
                .long("charge")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Charge of a custom particle species [C]")
                .takes_value(true)
                .requires("mass"),
        )
}

/// Adds arguments for configuring the integrator and the drift estimation.
pub fn add_integrator_arguments(
    command: Command<'static>,
    default_steps: &'static str,
) -> Command<'static> {
    command
        .arg(
            Arg::new("steps")
                .short('n')
                .long("steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of states to compute for each particle, including the initial one\n")
                .takes_value(true)
                .default_value(default_steps),
        )
        .arg(
            Arg::new("time-step-fraction")
                .long("time-step-fraction")
                .require_equals(true)
                .value_name("VALUE")
                .help("Fraction of the local cyclotron period to use as time step\n")
                .takes_value(true)
                .default_value("1e-4"),
        )
        .arg(
            Arg::new("zero-field-time-step")
                .long("zero-field-time-step")
                .require_equals(true)
                .value_name("VALUE")
                .help("Time step to use where the magnetic field vanishes [s]\n")
                .takes_value(true)
                .default_value("1e-9"),
        )
        .arg(
            Arg::new("elapsed-time")
                .long("elapsed-time")
                .require_equals(true)
                .value_name("CONVENTION")
                .help(
                    "Time span to divide the net displacement by when estimating drift velocities\n\
                     (last-step: the last time step, total: the sum of all time steps)\n",
                )
                .takes_value(true)
                .possible_values(&["last-step", "total"])
                .default_value("last-step"),
        )
}

/// Adds the argument for the number of particles in the ensemble.
pub fn add_particle_count_argument(
    command: Command<'static>,
    default_particles: &'static str,
) -> Command<'static> {
    command.arg(
        Arg::new("particles")
            .short('N')
            .long("particles")
            .require_equals(true)
            .value_name("NUMBER")
            .help("Number of particles in the ensemble\n")
            .takes_value(true)
            .default_value(default_particles),
    )
}

/// Adds the argument for an initial position shared by all particles.
pub fn add_position_argument(command: Command<'static>) -> Command<'static> {
    command.arg(
        Arg::new("position")
            .short('x')
            .long("position")
            .require_equals(true)
            .use_value_delimiter(true)
            .require_value_delimiter(true)
            .allow_hyphen_values(true)
            .value_names(&["X", "Y", "Z"])
            .help(
                "Initial position shared by all particles [m]\n \
                 [default: origin for a single particle, random otherwise]",
            )
            .takes_value(true)
            .number_of_values(3),
    )
}

pub fn parse_number_of_particles(arguments: &ArgMatches) -> usize {
    let n_particles = get_value_from_required_parseable_argument(arguments, "particles");
    exit_on_false!(
        n_particles > 0,
        "Error: Number of particles must be larger than zero"
    );
    n_particles
}

/// Adds arguments for the random seed and for status output.
pub fn add_run_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random initial conditions [default: random]")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages while simulating"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar while simulating (implies `verbose`)"),
        )
}

/// Constructs the particle species specified by the given arguments.
pub fn construct_particle_from_arguments(arguments: &ArgMatches) -> Particle {
    if arguments.is_present("mass") {
        let mass = get_finite_float_value_from_required_parseable_argument(arguments, "mass");
        let charge = get_finite_float_value_from_required_parseable_argument(arguments, "charge");
        exit_on_error!(
            Particle::new("particle", "particles", mass, charge),
            "Error: Invalid particle: {}"
        )
    } else {
        get_value_from_parseable_argument(arguments, "species")
            .unwrap_or(Species::Proton)
            .particle()
    }
}

pub fn construct_integrator_config_from_arguments(arguments: &ArgMatches) -> IntegratorConfig {
    let time_step_fraction =
        get_finite_float_value_from_required_parseable_argument(arguments, "time-step-fraction");
    let zero_field_time_step =
        get_finite_float_value_from_required_parseable_argument(arguments, "zero-field-time-step");
    IntegratorConfig {
        time_step_fraction,
        zero_field_time_step,
    }
}

pub fn construct_integrator_from_arguments(arguments: &ArgMatches) -> LorentzIntegrator {
    exit_on_error!(
        LorentzIntegrator::new(construct_integrator_config_from_arguments(arguments)),
        "Error: Invalid integrator configuration: {}"
    )
}

pub fn parse_elapsed_time_convention(arguments: &ArgMatches) -> ElapsedTimeConvention {
    get_value_from_required_parseable_argument(arguments, "elapsed-time")
}

pub fn parse_number_of_steps(arguments: &ArgMatches) -> usize {
    let n_steps = get_value_from_required_parseable_argument(arguments, "steps");
    exit_on_false!(
        n_steps > 0,
        "Error: Number of steps must be larger than zero"
    );
    n_steps
}

/// Creates a random number generator seeded from the `seed` argument,
/// or from system entropy if it is absent.
pub fn create_rng_from_arguments(arguments: &ArgMatches) -> StdRng {
    match get_value_from_parseable_argument::<u64>(arguments, "seed") {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Integrates the given initial conditions, showing a progress bar over the
/// particles if requested.
pub fn integrate_ensemble(
    integrator: &LorentzIntegrator,
    fields: &FieldSpec,
    initial_conditions: &InitialConditions,
    particle: &Particle,
    n_steps: usize,
    verbosity: &Verbosity,
) -> Trajectory {
    let n_particles = initial_conditions.number_of_particles();
    if verbosity.print_messages() {
        println!(
            "Integrating {} {} for {} steps",
            n_particles,
            if n_particles == 1 {
                particle.name_singular()
            } else {
                particle.name_plural()
            },
            n_steps
        );
    }
    let progress_bar = verbosity.create_progress_bar(n_particles);
    let trajectory = exit_on_error!(
        integrator.advance_with_callback(
            fields,
            initial_conditions.positions(),
            initial_conditions.velocities(),
            particle,
            n_steps,
            n_particles,
            |_| progress_bar.inc(1),
        ),
        "Error: Could not integrate trajectories: {}"
    );
    progress_bar.finish_and_clear();
    trajectory
}

/// Formats a speed or velocity component compactly [m/s].
pub fn format_speed(value: fpt) -> String {
    format!("{:.4e}", value)
}
