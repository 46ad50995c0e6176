//! Command line interface for simulating particles in a field regime.

use super::{
    regime::{self, Regime},
    utils,
};
use crate::{
    drift::{self, DriftEstimate},
    exit_on_error,
    field::FieldSpec,
    geometry::Vec3,
    integration::Trajectory,
    num::mean,
    particle::{fpt, Particle},
    seeding::{self, InitialConditions},
};
use clap::{Arg, ArgMatches, Command};

/// Largest ensemble for which the drift of each particle is printed.
const MAX_PARTICLES_TO_LIST: usize = 10;

/// Builds a representation of the `simulate` command line subcommand.
pub fn create_simulate_subcommand() -> Command<'static> {
    let command = Command::new("simulate")
        .about("Simulate charged particles and estimate their drift velocity")
        .long_about(
            "Simulate charged particles and estimate their drift velocity.\n\
             Integrates the motion of one or more particles under the Lorentz force\n\
             and compares the drift velocity estimated from the net displacement\n\
             with the theoretical drift velocity of the field regime.",
        )
        .arg(regime::create_regime_argument())
        .arg(
            Arg::new("velocity")
                .short('u')
                .long("velocity")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["VX", "VY", "VZ"])
                .help(
                    "Initial velocity shared by all particles [m/s]\n \
                     [default: random]",
                )
                .takes_value(true)
                .number_of_values(3),
        );
    let command = utils::add_particle_count_argument(command, "1");
    let command = utils::add_position_argument(command);
    let command = regime::add_field_arguments(command);
    let command = utils::add_particle_arguments(command);
    let command = utils::add_integrator_arguments(command, "60000");
    utils::add_run_arguments(command)
}

/// Runs the actions for the `simulate` subcommand using the given arguments.
pub fn run_simulate_subcommand(arguments: &ArgMatches) {
    let regime = regime::parse_regime(arguments);
    let fields = regime::construct_fields_from_arguments(regime, arguments);
    let particle = utils::construct_particle_from_arguments(arguments);
    let integrator = utils::construct_integrator_from_arguments(arguments);
    let convention = utils::parse_elapsed_time_convention(arguments);
    let n_particles = utils::parse_number_of_particles(arguments);
    let n_steps = utils::parse_number_of_steps(arguments);
    let verbosity = utils::parse_verbosity(arguments, true);

    let initial_conditions = construct_initial_conditions(arguments, n_particles);

    let trajectory = utils::integrate_ensemble(
        &integrator,
        &fields,
        &initial_conditions,
        &particle,
        n_steps,
        &verbosity,
    );

    print_summary(regime, &fields, &particle, &initial_conditions, &trajectory);

    let empirical_drifts = exit_on_error!(
        drift::empirical_drifts(&trajectory, convention),
        "Error: Could not estimate drift velocities: {}"
    );
    print_empirical_drifts(&empirical_drifts);

    match drift::theoretical_drift(&fields, &trajectory, &particle) {
        Ok(theoretical_drift) => {
            println!("{}", theoretical_drift);
            print_deviation(&empirical_drifts, &theoretical_drift);
        }
        Err(err) => eprintln!("Warning: Could not compute theoretical drift velocity: {}", err),
    }
}

/// Sets up initial conditions, using the shared position and velocity
/// if given and random values otherwise.
fn construct_initial_conditions(arguments: &ArgMatches, n_particles: usize) -> InitialConditions {
    let mut rng = utils::create_rng_from_arguments(arguments);

    let positions = match utils::parse_3d_float_values(arguments, "position") {
        Some(position) => seeding::shared_positions(&position, n_particles),
        None if n_particles == 1 => vec![Vec3::zero()],
        None => seeding::random_positions(n_particles, &mut rng),
    };
    let velocities = match utils::parse_3d_float_values(arguments, "velocity") {
        Some(velocity) => vec![velocity; n_particles],
        None => seeding::random_velocities(n_particles, &mut rng),
    };

    exit_on_error!(
        InitialConditions::new(positions, velocities),
        "Error: Invalid initial conditions: {}"
    )
}

fn print_summary(
    regime: Regime,
    fields: &FieldSpec,
    particle: &Particle,
    initial_conditions: &InitialConditions,
    trajectory: &Trajectory,
) {
    println!("Regime: {}", regime);
    println!("{}", particle);
    println!("Fields: {}", fields);
    println!(
        "Simulated {} {} for {} steps",
        trajectory.number_of_particles(),
        if trajectory.number_of_particles() == 1 {
            particle.name_singular()
        } else {
            particle.name_plural()
        },
        trajectory.number_of_steps()
    );
    println!("Last time step: {:e} [s]", trajectory.last_time_step());

    if let [position] = initial_conditions.positions() {
        let magnetic_field = fields.evaluate_magnetic_field(position);
        let perpendicular_speed = initial_conditions.velocities()[0].length_xy();
        if let (Ok(frequency), Ok(radius)) = (
            particle.cyclotron_frequency(&magnetic_field),
            particle.larmor_radius(perpendicular_speed, &magnetic_field),
        ) {
            println!("Initial cyclotron frequency: {:e} [rad/s]", frequency);
            println!("Initial Larmor radius: {:e} [m]", radius);
        }
    }
}

fn print_empirical_drifts(empirical_drifts: &[DriftEstimate]) {
    if empirical_drifts.len() <= MAX_PARTICLES_TO_LIST {
        for (idx, estimate) in empirical_drifts.iter().enumerate() {
            if empirical_drifts.len() > 1 {
                print!("Particle {}: ", idx);
            }
            println!("{}", estimate);
        }
    } else {
        println!(
            "Mean empirical drift speed: {} [m/s]",
            utils::format_speed(mean_speed(empirical_drifts))
        );
    }
}

fn print_deviation(empirical_drifts: &[DriftEstimate], theoretical_drift: &DriftEstimate) {
    if let [empirical_drift] = empirical_drifts {
        match empirical_drift.relative_deviation(theoretical_drift) {
            Ok(deviation) => println!("Relative deviation: {:.4}", deviation),
            Err(err) => eprintln!("Warning: {}", err),
        }
    } else {
        let theoretical_speed = theoretical_drift.speed();
        if theoretical_speed > 0.0 {
            println!(
                "Relative deviation of mean speed: {:.4}",
                (mean_speed(empirical_drifts) - theoretical_speed).abs() / theoretical_speed
            );
        }
    }
}

fn mean_speed(estimates: &[DriftEstimate]) -> fpt {
    mean(estimates.iter().map(DriftEstimate::speed)).unwrap_or(0.0)
}
