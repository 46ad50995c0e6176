//! Empirical and theoretical estimation of particle drift velocities.

#[cfg(feature = "statistics")]
pub mod statistics;

use crate::{
    error::{DriftError, DriftResult},
    field::{FieldSpec, GradientProfile, MagneticField},
    geometry::{Dim3::X, Vec3},
    integration::Trajectory,
    num::mean,
    particle::{fpt, Particle},
};
use std::{fmt, str::FromStr};

/// Which time span to divide the net displacement by when estimating
/// the drift velocity from a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElapsedTimeConvention {
    /// Use the time step of the last completed step.
    ///
    /// This is only an approximation of the elapsed time, kept for
    /// compatibility with earlier drift tables.
    LastTimeStep,
    /// Use the sum of all time steps taken by the particle.
    TotalElapsed,
}

/// How a drift estimate was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimateKind {
    Empirical,
    Theoretical,
}

/// A drift velocity estimate [m/s].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftEstimate {
    kind: EstimateKind,
    velocity: Vec3<fpt>,
}

impl ElapsedTimeConvention {
    pub fn name(self) -> &'static str {
        match self {
            Self::LastTimeStep => "last-step",
            Self::TotalElapsed => "total",
        }
    }
}

impl Default for ElapsedTimeConvention {
    fn default() -> Self {
        Self::LastTimeStep
    }
}

impl FromStr for ElapsedTimeConvention {
    type Err = DriftError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "last-step" => Ok(Self::LastTimeStep),
            "total" => Ok(Self::TotalElapsed),
            other => Err(DriftError::InvalidParameter(format!(
                "Invalid elapsed time convention {}, valid conventions are last-step and total",
                other
            ))),
        }
    }
}

impl fmt::Display for ElapsedTimeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl DriftEstimate {
    pub fn empirical(velocity: Vec3<fpt>) -> Self {
        Self {
            kind: EstimateKind::Empirical,
            velocity,
        }
    }

    pub fn theoretical(velocity: Vec3<fpt>) -> Self {
        Self {
            kind: EstimateKind::Theoretical,
            velocity,
        }
    }

    pub fn kind(&self) -> EstimateKind {
        self.kind
    }

    /// Returns the drift velocity [m/s].
    pub fn velocity(&self) -> &Vec3<fpt> {
        &self.velocity
    }

    /// Returns the drift speed [m/s].
    pub fn speed(&self) -> fpt {
        self.velocity.length()
    }

    /// Computes `|v - v_ref|/|v_ref|` with respect to the given reference estimate.
    pub fn relative_deviation(&self, reference: &DriftEstimate) -> DriftResult<fpt> {
        let reference_speed = reference.speed();
        if reference_speed == 0.0 {
            return Err(DriftError::DivisionByZero(
                "Reference drift speed is zero when computing relative deviation".to_string(),
            ));
        }
        Ok((self.velocity - reference.velocity).length() / reference_speed)
    }
}

impl fmt::Display for DriftEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} drift velocity: {:e} [m/s]",
            match self.kind {
                EstimateKind::Empirical => "Empirical",
                EstimateKind::Theoretical => "Theoretical",
            },
            self.velocity
        )
    }
}

/// Estimates the drift velocity of a single particle from its net displacement.
///
/// # Parameters
///
/// - `trajectory`: Trajectory of the ensemble containing the particle.
/// - `particle_idx`: Index of the particle in the ensemble.
/// - `convention`: Which time span to divide the displacement by.
///
/// # Returns
///
/// A `DriftResult` which is either:
///
/// - `Ok`: Contains the empirical `DriftEstimate`.
/// - `Err`: The particle index is out of range, or the time span is zero.
pub fn empirical_drift(
    trajectory: &Trajectory,
    particle_idx: usize,
    convention: ElapsedTimeConvention,
) -> DriftResult<DriftEstimate> {
    let elapsed_time = match convention {
        ElapsedTimeConvention::LastTimeStep => {
            check_particle_idx(trajectory, particle_idx)?;
            trajectory.last_time_step()
        }
        ElapsedTimeConvention::TotalElapsed => trajectory
            .elapsed_time(particle_idx)
            .ok_or_else(|| invalid_particle_idx(trajectory, particle_idx))?,
    };
    if elapsed_time == 0.0 {
        return Err(DriftError::DivisionByZero(format!(
            "Elapsed time is zero when estimating drift of particle {}",
            particle_idx
        )));
    }
    let displacement =
        trajectory.final_position(particle_idx) - trajectory.initial_position(particle_idx);
    Ok(DriftEstimate::empirical(displacement / elapsed_time))
}

/// Estimates the drift velocity of every particle in the ensemble.
pub fn empirical_drifts(
    trajectory: &Trajectory,
    convention: ElapsedTimeConvention,
) -> DriftResult<Vec<DriftEstimate>> {
    (0..trajectory.number_of_particles())
        .map(|particle_idx| empirical_drift(trajectory, particle_idx, convention))
        .collect()
}

/// Computes the E x B drift velocity `(E x B)/|B|^2`.
pub fn theoretical_exb_drift(
    electric_field: &Vec3<fpt>,
    magnetic_field: &Vec3<fpt>,
) -> DriftResult<DriftEstimate> {
    let squared_field_strength = magnetic_field.squared_length();
    if squared_field_strength == 0.0 {
        return Err(DriftError::DivisionByZero(
            "Magnetic field strength is zero when computing E x B drift".to_string(),
        ));
    }
    Ok(DriftEstimate::theoretical(
        electric_field.cross(magnetic_field) / squared_field_strength,
    ))
}

/// Computes the drift velocity due to the gradient of the magnetic field
/// strength along x.
///
/// The perpendicular speed is estimated by finite differencing the positions
/// around the midpoint `m = steps/2` of the trajectory,
/// `v_perp = |x[m] - x[m-1]|_xy/dt`, with `dt` the time step the integrator
/// would take in the local field at `x[m]`. Using the ensemble means of
/// `v_perp` and of the midpoint field `B`, the drift is `[0, y*k, 0]` with
///
/// `y = m_p*v_perp^2/(2*q*B^2)`
///
/// and `k` the slope of the profile.
///
/// `B` is the mean of the midpoint `Bz` over all particles. For a single
/// particle this is its own midpoint field; for larger ensembles it differs
/// from using the midpoint field of the last particle alone.
///
/// # Parameters
///
/// - `trajectory`: Trajectory of the ensemble in the gradient field.
/// - `particle`: Species of the particles.
/// - `profile`: Gradient profile the trajectory was computed for.
///
/// # Returns
///
/// A `DriftResult` which is either:
///
/// - `Ok`: Contains the theoretical `DriftEstimate`.
/// - `Err`: The trajectory has fewer than two steps, or the mean midpoint field vanishes.
pub fn theoretical_grad_drift(
    trajectory: &Trajectory,
    particle: &Particle,
    profile: GradientProfile,
) -> DriftResult<DriftEstimate> {
    let (midpoint_idx, mean_field_strength) = mean_midpoint_field_strength(trajectory, profile)?;
    if mean_field_strength == 0.0 {
        return Err(DriftError::DivisionByZero(
            "Mean magnetic field strength at trajectory midpoint is zero".to_string(),
        ));
    }

    let perpendicular_speeds = (0..trajectory.number_of_particles()).map(|particle_idx| {
        let midpoint = trajectory.position(midpoint_idx, particle_idx);
        let previous = trajectory.position(midpoint_idx - 1, particle_idx);
        let time_step = trajectory.time_step_at(particle, &profile.evaluate(midpoint[X]));
        ((midpoint - previous) / time_step).length_xy()
    });
    let mean_perpendicular_speed = mean(perpendicular_speeds).unwrap_or(0.0);

    let y = particle.mass() * mean_perpendicular_speed * mean_perpendicular_speed
        / (2.0 * particle.charge() * mean_field_strength * mean_field_strength);

    Ok(DriftEstimate::theoretical(Vec3::new(
        0.0,
        y * profile.slope(),
        0.0,
    )))
}

/// Computes the drift velocity in a uniform electric field combined with a
/// gradient magnetic field, as the sum of the E x B drift in the mean
/// midpoint field and the gradient drift.
pub fn theoretical_combined_drift(
    trajectory: &Trajectory,
    particle: &Particle,
    profile: GradientProfile,
    electric_field: &Vec3<fpt>,
) -> DriftResult<DriftEstimate> {
    let (_, mean_field_strength) = mean_midpoint_field_strength(trajectory, profile)?;
    let exb_drift =
        theoretical_exb_drift(electric_field, &Vec3::new(0.0, 0.0, mean_field_strength))?;
    let grad_drift = theoretical_grad_drift(trajectory, particle, profile)?;
    Ok(DriftEstimate::theoretical(
        exb_drift.velocity + grad_drift.velocity,
    ))
}

/// Computes the theoretical drift velocity for the field configuration the
/// trajectory was computed in.
///
/// A uniform magnetic field gives the E x B drift. A gradient field gives the
/// gradient drift, combined with the E x B drift if there is an electric field.
pub fn theoretical_drift(
    fields: &FieldSpec,
    trajectory: &Trajectory,
    particle: &Particle,
) -> DriftResult<DriftEstimate> {
    match &fields.magnetic {
        MagneticField::Uniform(magnetic_field) => {
            theoretical_exb_drift(&fields.electric, magnetic_field)
        }
        MagneticField::Gradient(profile) if fields.electric.is_zero() => {
            theoretical_grad_drift(trajectory, particle, *profile)
        }
        MagneticField::Gradient(profile) => {
            theoretical_combined_drift(trajectory, particle, *profile, &fields.electric)
        }
    }
}

/// Finds the midpoint index of the trajectory and the mean z-component of
/// the gradient field over the ensemble positions at that index.
fn mean_midpoint_field_strength(
    trajectory: &Trajectory,
    profile: GradientProfile,
) -> DriftResult<(usize, fpt)> {
    let n_steps = trajectory.number_of_steps();
    if n_steps < 2 {
        return Err(DriftError::InvalidParameter(format!(
            "Trajectory must have at least two steps to evaluate the midpoint, got {}",
            n_steps
        )));
    }
    let midpoint_idx = n_steps / 2;
    let midpoint_field_strengths = (0..trajectory.number_of_particles()).map(|particle_idx| {
        profile.evaluate_z(trajectory.position(midpoint_idx, particle_idx)[X])
    });
    let mean_field_strength = mean(midpoint_field_strengths).unwrap_or(0.0);
    Ok((midpoint_idx, mean_field_strength))
}

fn check_particle_idx(trajectory: &Trajectory, particle_idx: usize) -> DriftResult<()> {
    if particle_idx < trajectory.number_of_particles() {
        Ok(())
    } else {
        Err(invalid_particle_idx(trajectory, particle_idx))
    }
}

fn invalid_particle_idx(trajectory: &Trajectory, particle_idx: usize) -> DriftError {
    DriftError::InvalidParameter(format!(
        "Particle index {} out of range for ensemble of {} particles",
        particle_idx,
        trajectory.number_of_particles()
    ))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        field::presets,
        geometry::Dim3::{Y, Z},
        integration::advance,
        particle::Species,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn exb_drift_matches_cross_product_formula() {
        let electric_field = Vec3::new(0.01, 0.01, 0.0);
        let magnetic_field = Vec3::new(0.0, 0.0, 1e-4);
        let drift = theoretical_exb_drift(&electric_field, &magnetic_field).unwrap();

        let b2 = 1e-4 * 1e-4;
        let expected = Vec3::new(
            (0.01 * 1e-4 - 0.0 * 0.0) / b2,
            (0.0 * 0.0 - 0.01 * 1e-4) / b2,
            (0.01 * 0.0 - 0.01 * 0.0) / b2,
        );
        assert_eq!(drift.kind(), EstimateKind::Theoretical);
        for dim in crate::geometry::Dim3::slice() {
            assert_relative_eq!(drift.velocity()[dim], expected[dim], max_relative = 1e-12);
        }
        assert_relative_eq!(drift.speed(), 100.0 * 2.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn exb_drift_fails_for_zero_magnetic_field() {
        assert!(matches!(
            theoretical_exb_drift(&Vec3::new(1.0, 0.0, 0.0), &Vec3::zero()),
            Err(DriftError::DivisionByZero(_))
        ));
    }

    #[test]
    fn whole_gyration_periods_give_near_zero_drift() {
        let fields = FieldSpec::uniform(Vec3::zero(), presets::magnetic_field_1());
        let initial_velocity = Vec3::new(1e4, 0.0, 0.0);
        // Two full cyclotron periods with 1e4 steps per period.
        let trajectory = advance(
            &fields,
            &[Vec3::zero()],
            &[initial_velocity],
            &Species::Proton.particle(),
            20_001,
            1,
        )
        .unwrap();
        // The last-step convention would inflate the displacement by 1/dt_last.
        let drift = empirical_drift(&trajectory, 0, ElapsedTimeConvention::TotalElapsed).unwrap();
        assert!(drift.speed() < 2e-3 * initial_velocity.length());
    }

    #[test]
    fn exb_drift_emerges_from_integration() {
        let electric_field = presets::electric_field_1();
        let magnetic_field = presets::magnetic_field_1();
        let fields = FieldSpec::uniform(electric_field, magnetic_field);
        let trajectory = advance(
            &fields,
            &[Vec3::zero()],
            &[Vec3::zero()],
            &Species::Proton.particle(),
            20_001,
            1,
        )
        .unwrap();
        let empirical =
            empirical_drift(&trajectory, 0, ElapsedTimeConvention::TotalElapsed).unwrap();
        let theoretical = theoretical_exb_drift(&electric_field, &magnetic_field).unwrap();

        assert_relative_eq!(empirical.velocity()[X], 100.0, max_relative = 1e-2);
        assert_relative_eq!(empirical.velocity()[Y], -100.0, max_relative = 1e-2);
        assert_eq!(empirical.velocity()[Z], 0.0);
        assert!(empirical.relative_deviation(&theoretical).unwrap() < 1e-2);
    }

    #[test]
    fn last_step_convention_divides_by_single_time_step() {
        let fields = FieldSpec::uniform(presets::electric_field_2(), presets::magnetic_field_2());
        let n_steps = 101;
        let trajectory = advance(
            &fields,
            &[Vec3::new(0.5, -0.5, 0.0); 2],
            &[Vec3::new(1e4, 2e4, -3e3), Vec3::new(-1e4, 5e3, 1e3)],
            &Species::Electron.particle(),
            n_steps,
            2,
        )
        .unwrap();
        let last_step = empirical_drifts(&trajectory, ElapsedTimeConvention::LastTimeStep).unwrap();
        let total = empirical_drifts(&trajectory, ElapsedTimeConvention::TotalElapsed).unwrap();
        assert_eq!(last_step.len(), 2);
        for (last_step_drift, total_drift) in last_step.iter().zip(total.iter()) {
            assert_eq!(last_step_drift.kind(), EstimateKind::Empirical);
            // In a uniform field every step has the same length.
            assert_relative_eq!(
                last_step_drift.speed(),
                (n_steps - 1) as fpt * total_drift.speed(),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn empirical_drift_validates_arguments() {
        let fields = FieldSpec::uniform(Vec3::zero(), presets::magnetic_field_1());
        let trajectory = advance(
            &fields,
            &[Vec3::zero()],
            &[Vec3::new(1e3, 0.0, 0.0)],
            &Species::Proton.particle(),
            1,
            1,
        )
        .unwrap();
        assert!(matches!(
            empirical_drift(&trajectory, 1, ElapsedTimeConvention::LastTimeStep),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            empirical_drift(&trajectory, 1, ElapsedTimeConvention::TotalElapsed),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            empirical_drift(&trajectory, 0, ElapsedTimeConvention::TotalElapsed),
            Err(DriftError::DivisionByZero(_))
        ));
        let drift = empirical_drift(&trajectory, 0, ElapsedTimeConvention::LastTimeStep).unwrap();
        assert!(drift.velocity().is_zero());
    }

    fn gradient_trajectory(species: Species, profile: GradientProfile) -> Trajectory {
        advance(
            &FieldSpec::gradient(Vec3::zero(), profile),
            &[Vec3::new(0.2, 0.0, 0.0), Vec3::new(0.4, 0.3, 0.0)],
            &[Vec3::new(1e3, 2e3, 0.0), Vec3::new(-3e3, 1e3, 5e2)],
            &species.particle(),
            40,
            2,
        )
        .unwrap()
    }

    #[test]
    fn grad_drift_is_along_y_with_sign_of_charge_times_slope() {
        let proton_weak = gradient_trajectory(Species::Proton, GradientProfile::Weak);
        let drift = theoretical_grad_drift(
            &proton_weak,
            &Species::Proton.particle(),
            GradientProfile::Weak,
        )
        .unwrap();
        assert_eq!(drift.velocity()[X], 0.0);
        assert_eq!(drift.velocity()[Z], 0.0);
        assert!(drift.velocity()[Y] > 0.0);

        let electron_weak = gradient_trajectory(Species::Electron, GradientProfile::Weak);
        let drift = theoretical_grad_drift(
            &electron_weak,
            &Species::Electron.particle(),
            GradientProfile::Weak,
        )
        .unwrap();
        assert!(drift.velocity()[Y] < 0.0);

        let proton_reversed = gradient_trajectory(Species::Proton, GradientProfile::Reversed);
        let drift = theoretical_grad_drift(
            &proton_reversed,
            &Species::Proton.particle(),
            GradientProfile::Reversed,
        )
        .unwrap();
        assert!(drift.velocity()[Y] < 0.0);
    }

    #[test]
    fn grad_drift_matches_midpoint_formula() {
        let profile = GradientProfile::Strong;
        let particle = Species::Proton.particle();
        let trajectory = gradient_trajectory(Species::Proton, profile);

        let midpoint_idx = 20;
        let mut speed_sum = 0.0;
        let mut field_sum = 0.0;
        for particle_idx in 0..2 {
            let midpoint = trajectory.position(midpoint_idx, particle_idx);
            let previous = trajectory.position(midpoint_idx - 1, particle_idx);
            let local_field = profile.evaluate_z(midpoint[X]);
            let time_step =
                1e-4 * particle.cyclotron_period(&profile.evaluate(midpoint[X])).unwrap();
            let velocity = (midpoint - previous) / time_step;
            speed_sum += velocity.length_xy();
            field_sum += local_field;
        }
        let speed = speed_sum / 2.0;
        let field = field_sum / 2.0;
        let expected =
            particle.mass() * speed * speed / (2.0 * particle.charge() * field * field) * 2e-2;

        let drift = theoretical_grad_drift(&trajectory, &particle, profile).unwrap();
        assert_relative_eq!(drift.velocity()[Y], expected, max_relative = 1e-10);
    }

    #[test]
    fn grad_drift_validates_trajectory() {
        let particle = Species::Proton.particle();
        let single_state = advance(
            &FieldSpec::gradient(Vec3::zero(), GradientProfile::Weak),
            &[Vec3::zero()],
            &[Vec3::new(1e4, 0.0, 0.0)],
            &particle,
            1,
            1,
        )
        .unwrap();
        assert!(matches!(
            theoretical_grad_drift(&single_state, &particle, GradientProfile::Weak),
            Err(DriftError::InvalidParameter(_))
        ));

        // The strong profile vanishes at x = -0.5, where a particle at rest stays.
        let at_null = advance(
            &FieldSpec::gradient(Vec3::zero(), GradientProfile::Strong),
            &[Vec3::new(-0.5, 0.0, 0.0)],
            &[Vec3::zero()],
            &particle,
            10,
            1,
        )
        .unwrap();
        assert!(matches!(
            theoretical_grad_drift(&at_null, &particle, GradientProfile::Strong),
            Err(DriftError::DivisionByZero(_))
        ));
    }

    #[test]
    fn combined_drift_is_sum_of_exb_and_grad_drift() {
        let profile = GradientProfile::Weak;
        let particle = Species::Proton.particle();
        let electric_field = presets::electric_field_1();
        let trajectory = gradient_trajectory(Species::Proton, profile);

        let midpoint_field = 0.5
            * (profile.evaluate_z(trajectory.position(20, 0)[X])
                + profile.evaluate_z(trajectory.position(20, 1)[X]));
        let exb = theoretical_exb_drift(&electric_field, &Vec3::new(0.0, 0.0, midpoint_field))
            .unwrap();
        let grad = theoretical_grad_drift(&trajectory, &particle, profile).unwrap();

        let combined =
            theoretical_combined_drift(&trajectory, &particle, profile, &electric_field).unwrap();
        for dim in crate::geometry::Dim3::slice() {
            assert_abs_diff_eq!(
                combined.velocity()[dim],
                exb.velocity()[dim] + grad.velocity()[dim],
                epsilon = 1e-9 * combined.speed()
            );
        }
    }

    #[test]
    fn theoretical_drift_follows_field_configuration() {
        let particle = Species::Proton.particle();
        let profile = GradientProfile::Weak;
        let trajectory = gradient_trajectory(Species::Proton, profile);

        let uniform = FieldSpec::uniform(presets::electric_field_1(), presets::magnetic_field_1());
        assert_eq!(
            theoretical_drift(&uniform, &trajectory, &particle),
            theoretical_exb_drift(&presets::electric_field_1(), &presets::magnetic_field_1())
        );

        let gradient = FieldSpec::gradient(Vec3::zero(), profile);
        assert_eq!(
            theoretical_drift(&gradient, &trajectory, &particle),
            theoretical_grad_drift(&trajectory, &particle, profile)
        );

        let combined = FieldSpec::gradient(presets::electric_field_2(), profile);
        assert_eq!(
            theoretical_drift(&combined, &trajectory, &particle),
            theoretical_combined_drift(
                &trajectory,
                &particle,
                profile,
                &presets::electric_field_2()
            )
        );
    }

    #[test]
    fn elapsed_time_conventions_parse() {
        assert_eq!(
            "last-step".parse::<ElapsedTimeConvention>(),
            Ok(ElapsedTimeConvention::LastTimeStep)
        );
        assert_eq!(
            "total".parse::<ElapsedTimeConvention>(),
            Ok(ElapsedTimeConvention::TotalElapsed)
        );
        assert!("sum".parse::<ElapsedTimeConvention>().is_err());
        assert_eq!(
            ElapsedTimeConvention::default(),
            ElapsedTimeConvention::LastTimeStep
        );
    }
}
