//! Command line interface for tracing random particles in the default fields.

use super::{regime, utils};
use crate::{
    drift::{self, DriftEstimate},
    exit_on_error,
    geometry::Dim3::{X, Y, Z},
    seeding::{self, InitialConditions},
};
use clap::{ArgMatches, Command};

/// Builds a representation of the `trajectories` command line subcommand.
pub fn create_trajectories_subcommand() -> Command<'static> {
    let command = Command::new("trajectories")
        .about("Trace random particles in the default fields of a regime")
        .long_about(
            "Trace random particles in the default fields of a regime.\n\
             Prints the initial and final position of each particle together\n\
             with its empirical drift velocity and the theoretical drift velocity.",
        )
        .arg(regime::create_regime_argument());
    let command = regime::add_gradient_argument(command);
    let command = utils::add_particle_count_argument(command, "5");
    let command = utils::add_particle_arguments(command);
    let command = utils::add_integrator_arguments(command, "60000");
    utils::add_run_arguments(command)
}

/// Runs the actions for the `trajectories` subcommand using the given arguments.
pub fn run_trajectories_subcommand(arguments: &ArgMatches) {
    let regime = regime::parse_regime(arguments);
    let fields = regime.default_fields(regime::parse_gradient_profile(arguments));
    let particle = utils::construct_particle_from_arguments(arguments);
    let integrator = utils::construct_integrator_from_arguments(arguments);
    let convention = utils::parse_elapsed_time_convention(arguments);
    let n_particles = utils::parse_number_of_particles(arguments);
    let n_steps = utils::parse_number_of_steps(arguments);
    let verbosity = utils::parse_verbosity(arguments, true);

    let mut rng = utils::create_rng_from_arguments(arguments);
    let initial_conditions = exit_on_error!(
        InitialConditions::new(
            seeding::random_positions(n_particles, &mut rng),
            seeding::random_velocities(n_particles, &mut rng),
        ),
        "Error: Invalid initial conditions: {}"
    );

    let trajectory = utils::integrate_ensemble(
        &integrator,
        &fields,
        &initial_conditions,
        &particle,
        n_steps,
        &verbosity,
    );

    println!("Regime: {}", regime);
    println!("Fields: {}", fields);

    let empirical_drifts = exit_on_error!(
        drift::empirical_drifts(&trajectory, convention),
        "Error: Could not estimate drift velocities: {}"
    );
    for (particle_idx, estimate) in empirical_drifts.iter().enumerate() {
        println!(
            "{} {}: start {:e} [m], end {:e} [m], drift {} [m/s]",
            particle.name_singular(),
            particle_idx,
            trajectory.initial_position(particle_idx),
            trajectory.final_position(particle_idx),
            format_drift(estimate)
        );
    }

    match drift::theoretical_drift(&fields, &trajectory, &particle) {
        Ok(theoretical_drift) => println!("{}", theoretical_drift),
        Err(err) => eprintln!("Warning: Could not compute theoretical drift velocity: {}", err),
    }
}

fn format_drift(estimate: &DriftEstimate) -> String {
    let velocity = estimate.velocity();
    format!(
        "[{}, {}, {}]",
        utils::format_speed(velocity[X]),
        utils::format_speed(velocity[Y]),
        utils::format_speed(velocity[Z])
    )
}
