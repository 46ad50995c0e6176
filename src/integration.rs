//! Integration of charged particle trajectories under the Lorentz force.

use crate::{
    error::{DriftError, DriftResult},
    field::FieldSpec,
    geometry::{Dim3, Vec3},
    particle::{fpt, Particle},
};
use ndarray::{Array3, ArrayView3};

/// Configuration parameters for the trajectory integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Fraction of the local cyclotron period to use as time step.
    pub time_step_fraction: fpt,
    /// Time step to use where the magnetic field vanishes [s].
    pub zero_field_time_step: fpt,
}

/// Stepper advancing an ensemble of particles with the forward Euler scheme.
#[derive(Clone, Debug)]
pub struct LorentzIntegrator {
    config: IntegratorConfig,
}

/// Positions and velocities of an ensemble of particles at every time step.
///
/// Produced by a `LorentzIntegrator` and read-only afterwards.
#[derive(Clone, Debug)]
pub struct Trajectory {
    positions: Array3<fpt>,
    velocities: Array3<fpt>,
    last_time_step: fpt,
    elapsed_times: Vec<fpt>,
    config: IntegratorConfig,
}

impl IntegratorConfig {
    pub const DEFAULT_TIME_STEP_FRACTION: fpt = 1e-4;
    pub const DEFAULT_ZERO_FIELD_TIME_STEP: fpt = 1e-9;

    /// Checks that all parameters are positive and finite.
    pub fn validate(&self) -> DriftResult<()> {
        if !(self.time_step_fraction.is_finite() && self.time_step_fraction > 0.0) {
            return Err(DriftError::InvalidParameter(format!(
                "Time step fraction must be positive and finite, got {}",
                self.time_step_fraction
            )));
        }
        if !(self.zero_field_time_step.is_finite() && self.zero_field_time_step > 0.0) {
            return Err(DriftError::InvalidParameter(format!(
                "Zero-field time step must be positive and finite, got {}",
                self.zero_field_time_step
            )));
        }
        Ok(())
    }

    /// Computes the time step to use for the given particle in the given
    /// local magnetic field [s].
    ///
    /// The step is the configured fraction of the cyclotron period, or the
    /// zero-field time step if the field strength vanishes.
    pub fn time_step(&self, particle: &Particle, magnetic_field: &Vec3<fpt>) -> fpt {
        match particle.cyclotron_period(magnetic_field) {
            Ok(period) => self.time_step_fraction * period,
            Err(_) => self.zero_field_time_step,
        }
    }
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            time_step_fraction: Self::DEFAULT_TIME_STEP_FRACTION,
            zero_field_time_step: Self::DEFAULT_ZERO_FIELD_TIME_STEP,
        }
    }
}

impl LorentzIntegrator {
    /// Creates a new integrator with the given configuration.
    pub fn new(config: IntegratorConfig) -> DriftResult<Self> {
        config.validate()?;
        Ok(LorentzIntegrator { config })
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Advances the given particles through the given fields.
    ///
    /// See `advance_with_callback` for details.
    pub fn advance(
        &self,
        fields: &FieldSpec,
        initial_positions: &[Vec3<fpt>],
        initial_velocities: &[Vec3<fpt>],
        particle: &Particle,
        n_steps: usize,
        n_particles: usize,
    ) -> DriftResult<Trajectory> {
        self.advance_with_callback(
            fields,
            initial_positions,
            initial_velocities,
            particle,
            n_steps,
            n_particles,
            |_| {},
        )
    }

    /// Advances the given particles through the given fields, calling the
    /// given closure with the index of each particle once it is done.
    ///
    /// Every particle is integrated independently. For each step `j`, the
    /// magnetic field `B` is evaluated at the current position, the time step
    /// `dt` is computed from the local cyclotron period and the state is
    /// updated as
    ///
    /// `v[j+1] = v[j] + q*(E + v[j] x B)/m*dt`
    ///
    /// `x[j+1] = v[j]*dt + x[j]`
    ///
    /// so the position update uses the velocity from before the step.
    ///
    /// # Parameters
    ///
    /// - `fields`: Electric and magnetic field configuration.
    /// - `initial_positions`: Initial position of each particle [m].
    /// - `initial_velocities`: Initial velocity of each particle [m/s].
    /// - `particle`: Species of all the particles.
    /// - `n_steps`: Number of stored states per particle, including the initial one.
    /// - `n_particles`: Number of particles in the ensemble.
    /// - `on_particle_done`: Closure called with the particle index after each particle.
    ///
    /// # Returns
    ///
    /// A `DriftResult` which is either:
    ///
    /// - `Ok`: Contains the `Trajectory` of the ensemble.
    /// - `Err`: The step or particle count is zero, or the initial conditions
    ///   do not hold one vector per particle.
    ///
    /// # Type parameters
    ///
    /// - `C`: Function type taking a particle index.
    #[allow(clippy::too_many_arguments)]
    pub fn advance_with_callback<C>(
        &self,
        fields: &FieldSpec,
        initial_positions: &[Vec3<fpt>],
        initial_velocities: &[Vec3<fpt>],
        particle: &Particle,
        n_steps: usize,
        n_particles: usize,
        mut on_particle_done: C,
    ) -> DriftResult<Trajectory>
    where
        C: FnMut(usize),
    {
        if n_steps == 0 {
            return Err(DriftError::InvalidParameter(
                "Number of steps must be at least one".to_string(),
            ));
        }
        if n_particles == 0 {
            return Err(DriftError::InvalidParameter(
                "Number of particles must be at least one".to_string(),
            ));
        }
        if initial_positions.len() != n_particles || initial_velocities.len() != n_particles {
            return Err(DriftError::InvalidParameter(format!(
                "Expected {} initial positions and velocities, got {} and {}",
                n_particles,
                initial_positions.len(),
                initial_velocities.len()
            )));
        }

        let mut positions = Array3::zeros((n_steps, n_particles, 3));
        let mut velocities = Array3::zeros((n_steps, n_particles, 3));
        let mut elapsed_times = Vec::with_capacity(n_particles);
        let mut last_time_step = 0.0;

        for (particle_idx, (initial_position, initial_velocity)) in initial_positions
            .iter()
            .zip(initial_velocities.iter())
            .enumerate()
        {
            let mut position = *initial_position;
            let mut velocity = *initial_velocity;
            store(&mut positions, 0, particle_idx, &position);
            store(&mut velocities, 0, particle_idx, &velocity);

            let mut time_step =
                self.config
                    .time_step(particle, &fields.evaluate_magnetic_field(&position));
            let mut elapsed_time = 0.0;

            for step_idx in 1..n_steps {
                let magnetic_field = fields.evaluate_magnetic_field(&position);
                time_step = self.config.time_step(particle, &magnetic_field);

                let force = lorentz_force(
                    particle.charge(),
                    &fields.electric,
                    &velocity,
                    &magnetic_field,
                );
                let new_velocity = &velocity + &(&force * (time_step / particle.mass()));
                position = &(&velocity * time_step) + &position;
                velocity = new_velocity;
                elapsed_time += time_step;

                store(&mut positions, step_idx, particle_idx, &position);
                store(&mut velocities, step_idx, particle_idx, &velocity);
            }

            elapsed_times.push(elapsed_time);
            last_time_step = time_step;
            on_particle_done(particle_idx);
        }

        Ok(Trajectory {
            positions,
            velocities,
            last_time_step,
            elapsed_times,
            config: self.config.clone(),
        })
    }
}

impl Default for LorentzIntegrator {
    fn default() -> Self {
        LorentzIntegrator {
            config: IntegratorConfig::default(),
        }
    }
}

impl Trajectory {
    /// Returns a view of all positions, indexed by `[step, particle, dimension]` [m].
    pub fn positions(&self) -> ArrayView3<fpt> {
        self.positions.view()
    }

    /// Returns a view of all velocities, indexed by `[step, particle, dimension]` [m/s].
    pub fn velocities(&self) -> ArrayView3<fpt> {
        self.velocities.view()
    }

    /// Returns the position of the given particle at the given step [m].
    ///
    /// Panics if either index is out of bounds.
    pub fn position(&self, step_idx: usize, particle_idx: usize) -> Vec3<fpt> {
        load(&self.positions, step_idx, particle_idx)
    }

    /// Returns the velocity of the given particle at the given step [m/s].
    ///
    /// Panics if either index is out of bounds.
    pub fn velocity(&self, step_idx: usize, particle_idx: usize) -> Vec3<fpt> {
        load(&self.velocities, step_idx, particle_idx)
    }

    pub fn initial_position(&self, particle_idx: usize) -> Vec3<fpt> {
        self.position(0, particle_idx)
    }

    pub fn final_position(&self, particle_idx: usize) -> Vec3<fpt> {
        self.position(self.number_of_steps() - 1, particle_idx)
    }

    /// Number of stored states per particle, including the initial one.
    pub fn number_of_steps(&self) -> usize {
        self.positions.shape()[0]
    }

    pub fn number_of_particles(&self) -> usize {
        self.positions.shape()[1]
    }

    /// Returns the time step of the final completed step of the last
    /// particle [s].
    ///
    /// For a trajectory with a single state, this is the time step the last
    /// particle would have taken from its initial state.
    pub fn last_time_step(&self) -> fpt {
        self.last_time_step
    }

    /// Returns the sum of all time steps taken by the given particle [s].
    pub fn elapsed_time(&self, particle_idx: usize) -> Option<fpt> {
        self.elapsed_times.get(particle_idx).copied()
    }

    pub fn elapsed_times(&self) -> &[fpt] {
        &self.elapsed_times
    }

    /// Returns the integrator configuration the trajectory was produced with.
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Computes the time step the integrator would take for the given
    /// particle in the given local magnetic field [s].
    pub fn time_step_at(&self, particle: &Particle, magnetic_field: &Vec3<fpt>) -> fpt {
        self.config.time_step(particle, magnetic_field)
    }
}

/// Advances the given particles through the given fields using the default
/// integrator configuration.
///
/// # Parameters
///
/// - `fields`: Electric and magnetic field configuration.
/// - `initial_positions`: Initial position of each particle [m].
/// - `initial_velocities`: Initial velocity of each particle [m/s].
/// - `particle`: Species of all the particles.
/// - `n_steps`: Number of stored states per particle, including the initial one.
/// - `n_particles`: Number of particles in the ensemble.
///
/// # Returns
///
/// A `DriftResult` with the `Trajectory` of the ensemble.
pub fn advance(
    fields: &FieldSpec,
    initial_positions: &[Vec3<fpt>],
    initial_velocities: &[Vec3<fpt>],
    particle: &Particle,
    n_steps: usize,
    n_particles: usize,
) -> DriftResult<Trajectory> {
    LorentzIntegrator::default().advance(
        fields,
        initial_positions,
        initial_velocities,
        particle,
        n_steps,
        n_particles,
    )
}

/// Computes the Lorentz force `q*(E + v x B)` [N].
pub fn lorentz_force(
    charge: fpt,
    electric_field: &Vec3<fpt>,
    velocity: &Vec3<fpt>,
    magnetic_field: &Vec3<fpt>,
) -> Vec3<fpt> {
    &(electric_field + &velocity.cross(magnetic_field)) * charge
}

fn store(array: &mut Array3<fpt>, step_idx: usize, particle_idx: usize, vector: &Vec3<fpt>) {
    for dim in Dim3::slice() {
        array[[step_idx, particle_idx, dim.num()]] = vector[dim];
    }
}

fn load(array: &Array3<fpt>, step_idx: usize, particle_idx: usize) -> Vec3<fpt> {
    Vec3::with_each_component(|dim| array[[step_idx, particle_idx, dim.num()]])
}
