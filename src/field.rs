//! Electric and magnetic field configurations.

use crate::{
    error::{DriftError, DriftResult},
    geometry::{Dim3::X, Vec3},
    particle::fpt,
};
use std::{fmt, str::FromStr};

/// Linear law `Bz(x) = offset + slope*x` for a magnetic field along z
/// whose strength varies along x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientProfile {
    /// `Bz(x) = 1e-5 + 5e-5 x` [T].
    Weak,
    /// `Bz(x) = 1e-2 + 2e-2 x` [T].
    Strong,
    /// `Bz(x) = -5e-4 - 8e-4 x` [T].
    Reversed,
}

/// Magnetic part of a field configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum MagneticField {
    /// The same field vector everywhere [T].
    Uniform(Vec3<fpt>),
    /// A field along z following a linear gradient profile in x.
    Gradient(GradientProfile),
}

/// A uniform electric field combined with a magnetic field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Electric field [V/m].
    pub electric: Vec3<fpt>,
    pub magnetic: MagneticField,
}

impl GradientProfile {
    /// Returns all the gradient profiles, ordered by tag.
    pub fn all() -> [Self; 3] {
        [Self::Weak, Self::Strong, Self::Reversed]
    }

    /// Looks up the profile with the given numerical tag (1, 2 or 3).
    pub fn from_tag(tag: u8) -> DriftResult<Self> {
        match tag {
            1 => Ok(Self::Weak),
            2 => Ok(Self::Strong),
            3 => Ok(Self::Reversed),
            _ => Err(DriftError::InvalidParameter(format!(
                "Invalid gradient profile {}, valid profiles are 1, 2 and 3",
                tag
            ))),
        }
    }

    /// Returns the numerical tag of the profile.
    pub fn tag(self) -> u8 {
        match self {
            Self::Weak => 1,
            Self::Strong => 2,
            Self::Reversed => 3,
        }
    }

    /// Field strength at `x = 0` [T].
    pub fn offset(self) -> fpt {
        match self {
            Self::Weak => 1e-5,
            Self::Strong => 1e-2,
            Self::Reversed => -5e-4,
        }
    }

    /// Derivative of the field strength with respect to x [T/m].
    pub fn slope(self) -> fpt {
        match self {
            Self::Weak => 5e-5,
            Self::Strong => 2e-2,
            Self::Reversed => -8e-4,
        }
    }

    /// Evaluates the z-component of the field at the given x-coordinate [T].
    pub fn evaluate_z(self, x: fpt) -> fpt {
        self.offset() + self.slope() * x
    }

    /// Evaluates the field vector at the given x-coordinate [T].
    pub fn evaluate(self, x: fpt) -> Vec3<fpt> {
        Vec3::new(0.0, 0.0, self.evaluate_z(x))
    }
}

impl FromStr for GradientProfile {
    type Err = DriftError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        tag.parse::<u8>()
            .map_err(|_| {
                DriftError::InvalidParameter(format!(
                    "Invalid gradient profile {}, valid profiles are 1, 2 and 3",
                    tag
                ))
            })
            .and_then(Self::from_tag)
    }
}

impl fmt::Display for GradientProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slope = self.slope();
        write!(
            f,
            "Bz(x) = {:e} {} {:e} x [T]",
            self.offset(),
            if slope < 0.0 { '-' } else { '+' },
            slope.abs()
        )
    }
}

impl MagneticField {
    /// Evaluates the magnetic field vector at the given position [T].
    ///
    /// A uniform field ignores the position, while a gradient profile only
    /// depends on its x-coordinate.
    pub fn evaluate(&self, position: &Vec3<fpt>) -> Vec3<fpt> {
        match self {
            Self::Uniform(field) => *field,
            Self::Gradient(profile) => profile.evaluate(position[X]),
        }
    }

    /// Returns the gradient profile if the field is not uniform.
    pub fn gradient_profile(&self) -> Option<GradientProfile> {
        match self {
            Self::Uniform(_) => None,
            Self::Gradient(profile) => Some(*profile),
        }
    }
}

impl fmt::Display for MagneticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(field) => write!(f, "B = {:e} [T]", field),
            Self::Gradient(profile) => fmt::Display::fmt(profile, f),
        }
    }
}

impl FieldSpec {
    pub fn uniform(electric: Vec3<fpt>, magnetic: Vec3<fpt>) -> Self {
        Self {
            electric,
            magnetic: MagneticField::Uniform(magnetic),
        }
    }

    pub fn gradient(electric: Vec3<fpt>, profile: GradientProfile) -> Self {
        Self {
            electric,
            magnetic: MagneticField::Gradient(profile),
        }
    }

    /// Evaluates the magnetic field at the given position [T].
    pub fn evaluate_magnetic_field(&self, position: &Vec3<fpt>) -> Vec3<fpt> {
        self.magnetic.evaluate(position)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E = {:e} [V/m]; {}", self.electric, self.magnetic)
    }
}

/// Default field values used for the preset simulation configurations.
pub mod presets {
    use super::*;

    /// `E = (1, 1, 0) x 1e-2 V/m`.
    pub fn electric_field_1() -> Vec3<fpt> {
        Vec3::new(1e-2, 1e-2, 0.0)
    }

    /// `E = (-2, -5, 0) x 1e-2 V/m`.
    pub fn electric_field_2() -> Vec3<fpt> {
        Vec3::new(-2e-2, -5e-2, 0.0)
    }

    /// `B = (0, 0, 1) x 1e-4 T`.
    pub fn magnetic_field_1() -> Vec3<fpt> {
        Vec3::new(0.0, 0.0, 1e-4)
    }

    /// `B = (0, 0, -3) x 1e-4 T`.
    pub fn magnetic_field_2() -> Vec3<fpt> {
        Vec3::new(0.0, 0.0, -3e-4)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weak_profile_evaluates_correctly() {
        assert_eq!(GradientProfile::Weak.evaluate(0.0), Vec3::new(0.0, 0.0, 1e-5));
        let at_one = GradientProfile::Weak.evaluate(1.0);
        assert_eq!(at_one[crate::geometry::Dim3::X], 0.0);
        assert_eq!(at_one[crate::geometry::Dim3::Y], 0.0);
        assert_relative_eq!(at_one[crate::geometry::Dim3::Z], 6e-5, max_relative = 1e-12);
    }

    #[test]
    fn gradient_field_only_depends_on_x() {
        let field = MagneticField::Gradient(GradientProfile::Reversed);
        let a = field.evaluate(&Vec3::new(0.5, -1.0, 2.0));
        let b = field.evaluate(&Vec3::new(0.5, 1.4, -0.3));
        assert_eq!(a, b);
        assert_relative_eq!(
            a[crate::geometry::Dim3::Z],
            -5e-4 - 8e-4 * 0.5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn uniform_field_ignores_position() {
        let b0 = Vec3::new(1e-5, -2e-5, 3e-4);
        let spec = FieldSpec::uniform(Vec3::zero(), b0);
        assert_eq!(spec.evaluate_magnetic_field(&Vec3::new(7.0, 8.0, 9.0)), b0);
        assert_eq!(spec.magnetic.gradient_profile(), None);
    }

    #[test]
    fn profile_tags_round_trip_and_invalid_tags_fail() {
        for profile in GradientProfile::all() {
            assert_eq!(GradientProfile::from_tag(profile.tag()), Ok(profile));
        }
        assert!(matches!(
            GradientProfile::from_tag(0),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            "4".parse::<GradientProfile>(),
            Err(DriftError::InvalidParameter(_))
        ));
        assert!(matches!(
            "x".parse::<GradientProfile>(),
            Err(DriftError::InvalidParameter(_))
        ));
        assert_eq!("2".parse::<GradientProfile>(), Ok(GradientProfile::Strong));
    }

    #[test]
    fn profile_slopes_match_laws() {
        assert_eq!(GradientProfile::Weak.slope(), 5e-5);
        assert_eq!(GradientProfile::Strong.slope(), 2e-2);
        assert_eq!(GradientProfile::Reversed.slope(), -8e-4);
        assert_eq!(
            GradientProfile::Reversed.to_string(),
            "Bz(x) = -5e-4 - 8e-4 x [T]"
        );
    }
}
