//! Charged particle species.

use crate::{
    constants::{M_ELECTRON, M_PROTON, PI, Q_ELEMENTARY},
    error::{DriftError, DriftResult},
    geometry::Vec3,
};
use std::{fmt, str::FromStr};

/// Floating-point precision to use for particle dynamics.
#[allow(non_camel_case_types)]
pub type fpt = f64;

/// An immutable charged particle species.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    name_singular: String,
    name_plural: String,
    /// Mass [kg].
    mass: fpt,
    /// Charge [C].
    charge: fpt,
}

/// The built-in particle species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Electron,
    Positron,
    Proton,
    Antiproton,
}

impl Particle {
    /// Creates a new particle species.
    ///
    /// # Parameters
    ///
    /// - `name_singular`: Display name for a single particle.
    /// - `name_plural`: Display name for several particles.
    /// - `mass`: Particle mass [kg].
    /// - `charge`: Particle charge [C].
    ///
    /// # Returns
    ///
    /// A `DriftResult` which is either:
    ///
    /// - `Ok`: Contains the new `Particle`.
    /// - `Err`: The mass is not positive or the charge is zero (or either is not finite).
    pub fn new<S1, S2>(
        name_singular: S1,
        name_plural: S2,
        mass: fpt,
        charge: fpt,
    ) -> DriftResult<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(DriftError::InvalidParameter(format!(
                "Particle mass must be positive and finite, got {}",
                mass
            )));
        }
        if !charge.is_finite() || charge == 0.0 {
            return Err(DriftError::InvalidParameter(format!(
                "Particle charge must be nonzero and finite, got {}",
                charge
            )));
        }
        Ok(Self {
            name_singular: name_singular.into(),
            name_plural: name_plural.into(),
            mass,
            charge,
        })
    }

    pub fn name_singular(&self) -> &str {
        &self.name_singular
    }

    pub fn name_plural(&self) -> &str {
        &self.name_plural
    }

    /// Returns the mass of the particle [kg].
    pub fn mass(&self) -> fpt {
        self.mass
    }

    /// Returns the (signed) charge of the particle [C].
    pub fn charge(&self) -> fpt {
        self.charge
    }

    /// Computes the period of the cyclotron orbit in the given magnetic field [s].
    ///
    /// `T = 2*pi*m/(|B|*|q|)`
    pub fn cyclotron_period(&self, magnetic_field: &Vec3<fpt>) -> DriftResult<fpt> {
        let field_strength = nonzero_field_strength(magnetic_field, "cyclotron period")?;
        Ok(2.0 * PI * self.mass / (field_strength * self.charge.abs()))
    }

    /// Computes the angular cyclotron frequency in the given magnetic field [rad/s].
    pub fn cyclotron_frequency(&self, magnetic_field: &Vec3<fpt>) -> DriftResult<fpt> {
        let field_strength = nonzero_field_strength(magnetic_field, "cyclotron frequency")?;
        Ok(self.charge.abs() * field_strength / self.mass)
    }

    /// Computes the Larmor radius for the given speed perpendicular to the
    /// given magnetic field [m].
    pub fn larmor_radius(
        &self,
        perpendicular_speed: fpt,
        magnetic_field: &Vec3<fpt>,
    ) -> DriftResult<fpt> {
        let field_strength = nonzero_field_strength(magnetic_field, "Larmor radius")?;
        Ok(self.mass * perpendicular_speed.abs() / (self.charge.abs() * field_strength))
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particle: {}, mass {:e} [kg], charge {:e} [C]",
            self.name_singular, self.mass, self.charge
        )
    }
}

fn nonzero_field_strength(magnetic_field: &Vec3<fpt>, quantity: &str) -> DriftResult<fpt> {
    let field_strength = magnetic_field.length();
    if field_strength == 0.0 {
        Err(DriftError::DivisionByZero(format!(
            "Magnetic field strength is zero when computing {}",
            quantity
        )))
    } else {
        Ok(field_strength)
    }
}

impl Species {
    /// Returns all the built-in species.
    pub fn all() -> [Self; 4] {
        [
            Self::Electron,
            Self::Positron,
            Self::Proton,
            Self::Antiproton,
        ]
    }

    /// Returns the short code identifying the species.
    pub fn code(self) -> &'static str {
        match self {
            Self::Electron => "e",
            Self::Positron => "ae",
            Self::Proton => "p",
            Self::Antiproton => "ap",
        }
    }

    /// Creates the particle corresponding to the species.
    pub fn particle(self) -> Particle {
        let (name_singular, name_plural, mass, charge) = match self {
            Self::Electron => ("electron", "electrons", M_ELECTRON, -Q_ELEMENTARY),
            Self::Positron => ("positron", "positrons", M_ELECTRON, Q_ELEMENTARY),
            Self::Proton => ("proton", "protons", M_PROTON, Q_ELEMENTARY),
            Self::Antiproton => ("antiproton", "antiprotons", M_PROTON, -Q_ELEMENTARY),
        };
        Particle {
            name_singular: name_singular.to_string(),
            name_plural: name_plural.to_string(),
            mass,
            charge,
        }
    }
}

impl FromStr for Species {
    type Err = DriftError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|species| species.code() == code)
            .ok_or_else(|| {
                DriftError::InvalidParameter(format!(
                    "Unknown particle species {}, valid codes are e, ae, p and ap",
                    code
                ))
            })
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.particle().name_singular())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn invalid_particles_are_rejected() {
        assert!(matches!(
            Particle::new("x", "xs", 0.0, 1.0),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            Particle::new("x", "xs", -1.0, 1.0),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            Particle::new("x", "xs", 1.0, 0.0),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(Particle::new("x", "xs", 1.0, -1.0).is_ok());
    }

    #[test]
    fn catalogue_species_have_expected_signs() {
        assert!(Species::Electron.particle().charge() < 0.0);
        assert!(Species::Positron.particle().charge() > 0.0);
        assert!(Species::Proton.particle().charge() > 0.0);
        assert!(Species::Antiproton.particle().charge() < 0.0);
        assert_eq!(
            Species::Proton.particle().mass(),
            Species::Antiproton.particle().mass()
        );
    }

    #[test]
    fn species_codes_parse() {
        for species in Species::all() {
            assert_eq!(species.code().parse::<Species>(), Ok(species));
        }
        assert_eq!("AP".parse::<Species>(), Ok(Species::Antiproton));
        assert!("n".parse::<Species>().is_err());
    }

    #[test]
    fn cyclotron_period_scales_with_mass() {
        let b = Vec3::new(0.0, 0.0, 1e-4);
        let heavy = Particle::new("a", "as", 2e-27, 1.6e-19).unwrap();
        let light = Particle::new("b", "bs", 1e-27, 1.6e-19).unwrap();
        let heavy_period = heavy.cyclotron_period(&b).unwrap();
        let light_period = light.cyclotron_period(&b).unwrap();
        assert!(light_period > 0.0);
        assert_relative_eq!(light_period, 0.5 * heavy_period, max_relative = 1e-14);
        assert_relative_eq!(
            heavy_period,
            2.0 * PI * 2e-27 / (1e-4 * 1.6e-19),
            max_relative = 1e-14
        );
    }

    #[test]
    fn cyclotron_period_uses_field_norm_and_charge_magnitude() {
        let electron = Species::Electron.particle();
        let positron = Species::Positron.particle();
        let b = Vec3::new(3e-4, 0.0, -4e-4);
        assert_eq!(
            electron.cyclotron_period(&b).unwrap(),
            positron.cyclotron_period(&b).unwrap()
        );
        assert_relative_eq!(
            electron.cyclotron_period(&b).unwrap(),
            2.0 * PI * M_ELECTRON / (5e-4 * Q_ELEMENTARY),
            max_relative = 1e-12
        );
    }

    #[test]
    fn zero_field_quantities_fail() {
        let proton = Species::Proton.particle();
        let zero = Vec3::zero();
        assert!(matches!(
            proton.cyclotron_period(&zero),
            Err(DriftError::DivisionByZero(_))
        ));
        assert!(matches!(
            proton.cyclotron_frequency(&zero),
            Err(DriftError::DivisionByZero(_))
        ));
        assert!(matches!(
            proton.larmor_radius(1e4, &zero),
            Err(DriftError::DivisionByZero(_))
        ));
    }

    #[test]
    fn larmor_radius_matches_speed_over_frequency() {
        let proton = Species::Proton.particle();
        let b = Vec3::new(0.0, 0.0, 1e-2);
        let radius = proton.larmor_radius(1e5, &b).unwrap();
        let frequency = proton.cyclotron_frequency(&b).unwrap();
        assert_relative_eq!(radius, 1e5 / frequency, max_relative = 1e-12);
    }
}
