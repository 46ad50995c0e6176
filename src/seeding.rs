//! Generation of initial conditions for particle ensembles.

use crate::{
    error::{DriftError, DriftResult},
    geometry::{Dim3, Vec3},
    particle::fpt,
};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// Half-width of the cube in which random initial positions are placed [m].
pub const POSITION_HALF_WIDTH: fpt = 1.5;
/// Smallest magnitude of a random initial velocity component [m/s].
pub const MIN_VELOCITY_COMPONENT: fpt = 1e3;
/// Largest magnitude of a random initial velocity component [m/s].
pub const MAX_VELOCITY_COMPONENT: fpt = 1e5;

/// Initial positions and velocities for an ensemble of particles.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialConditions {
    positions: Vec<Vec3<fpt>>,
    velocities: Vec<Vec3<fpt>>,
}

impl InitialConditions {
    /// Creates a new set of initial conditions.
    ///
    /// # Returns
    ///
    /// A `DriftResult` which is either:
    ///
    /// - `Ok`: Contains the new `InitialConditions`.
    /// - `Err`: The lists are empty or have different lengths.
    pub fn new(positions: Vec<Vec3<fpt>>, velocities: Vec<Vec3<fpt>>) -> DriftResult<Self> {
        if positions.is_empty() {
            return Err(DriftError::InvalidParameter(
                "At least one initial position is required".to_string(),
            ));
        }
        if positions.len() != velocities.len() {
            return Err(DriftError::InvalidParameter(format!(
                "Got {} initial positions but {} initial velocities",
                positions.len(),
                velocities.len()
            )));
        }
        Ok(Self {
            positions,
            velocities,
        })
    }

    /// Creates initial conditions for a single particle.
    pub fn single(position: Vec3<fpt>, velocity: Vec3<fpt>) -> Self {
        Self {
            positions: vec![position],
            velocities: vec![velocity],
        }
    }

    pub fn number_of_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3<fpt>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3<fpt>] {
        &self.velocities
    }
}

/// Generates random initial positions with every coordinate drawn
/// uniformly from `[-POSITION_HALF_WIDTH, POSITION_HALF_WIDTH]`.
pub fn random_positions<R: Rng>(n_particles: usize, rng: &mut R) -> Vec<Vec3<fpt>> {
    let coordinate_distribution = Uniform::new_inclusive(-POSITION_HALF_WIDTH, POSITION_HALF_WIDTH);
    (0..n_particles)
        .map(|_| Vec3::with_each_component(|_| coordinate_distribution.sample(rng)))
        .collect()
}

/// Generates random initial velocities.
///
/// For each dimension, the first `n/2 + n%2` particles get a component drawn
/// uniformly from `[MIN_VELOCITY_COMPONENT, MAX_VELOCITY_COMPONENT]` and the remaining
/// `n/2` particles a component drawn from the mirrored negative range. No
/// component is ever smaller in magnitude than `MIN_VELOCITY_COMPONENT`.
pub fn random_velocities<R: Rng>(n_particles: usize, rng: &mut R) -> Vec<Vec3<fpt>> {
    let n_positive = n_particles / 2 + n_particles % 2;

    let positive_distribution =
        Uniform::new_inclusive(MIN_VELOCITY_COMPONENT, MAX_VELOCITY_COMPONENT);
    let negative_distribution =
        Uniform::new_inclusive(-MAX_VELOCITY_COMPONENT, -MIN_VELOCITY_COMPONENT);

    // Components are drawn dimension by dimension, so each axis gets its own
    // positive and negative band.
    let mut components: Vec<Vec<fpt>> = Vec::with_capacity(3);
    for _ in Dim3::slice() {
        components.push(
            (0..n_particles)
                .map(|idx| {
                    if idx < n_positive {
                        positive_distribution.sample(rng)
                    } else {
                        negative_distribution.sample(rng)
                    }
                })
                .collect(),
        );
    }

    (0..n_particles)
        .map(|idx| Vec3::with_each_component(|dim| components[dim.num()][idx]))
        .collect()
}

/// Repeats the given position for every particle of the ensemble.
pub fn shared_positions(position: &Vec3<fpt>, n_particles: usize) -> Vec<Vec3<fpt>> {
    vec![*position; n_particles]
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::num::mean;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_positions_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let positions = random_positions(1000, &mut rng);
        assert_eq!(positions.len(), 1000);
        for position in &positions {
            for dim in Dim3::slice() {
                assert!((-POSITION_HALF_WIDTH..=POSITION_HALF_WIDTH).contains(&position[dim]));
            }
        }
    }

    #[test]
    fn random_positions_are_centered() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions = random_positions(1000, &mut rng);
        // The standard error of the mean is 1.5/sqrt(3*1000) ~ 0.027.
        for dim in Dim3::slice() {
            let coord_mean = mean(positions.iter().map(|position| position[dim])).unwrap();
            assert_abs_diff_eq!(coord_mean, 0.0, epsilon = 0.15);
        }
    }

    #[test]
    fn random_velocities_avoid_slow_band() {
        let mut rng = StdRng::seed_from_u64(3);
        for n_particles in [1, 2, 7, 500] {
            let velocities = random_velocities(n_particles, &mut rng);
            assert_eq!(velocities.len(), n_particles);
            for velocity in &velocities {
                for dim in Dim3::slice() {
                    assert!(velocity[dim].abs() >= MIN_VELOCITY_COMPONENT);
                    assert!(velocity[dim].abs() <= MAX_VELOCITY_COMPONENT);
                }
            }
        }
    }

    #[test]
    fn random_velocities_split_signs_evenly() {
        let mut rng = StdRng::seed_from_u64(11);
        let velocities = random_velocities(7, &mut rng);
        for dim in Dim3::slice() {
            let n_positive = velocities
                .iter()
                .filter(|velocity| velocity[dim] > 0.0)
                .count();
            assert_eq!(n_positive, 4);
            assert!(velocities[..4].iter().all(|velocity| velocity[dim] > 0.0));
        }
    }

    #[test]
    fn initial_conditions_require_matching_lengths() {
        let positions = shared_positions(&Vec3::new(1.0, 2.0, 3.0), 3);
        assert!(positions.iter().all(|p| *p == Vec3::new(1.0, 2.0, 3.0)));
        assert!(matches!(
            InitialConditions::new(positions.clone(), vec![Vec3::zero(); 2]),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            InitialConditions::new(Vec::new(), Vec::new()),
            Err(DriftError::InvalidParameter(_))
        ));
        let initial = InitialConditions::new(positions, vec![Vec3::zero(); 3]).unwrap();
        assert_eq!(initial.number_of_particles(), 3);
    }
}
