//! Physical and mathematical constants.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;

// Physical constants (SI units)

/// Elementary charge [C].
pub const Q_ELEMENTARY: fcn = 1.602_176_63e-19;
/// Electron mass [kg].
pub const M_ELECTRON: fcn = 9.109_383_56e-31;
/// Proton mass [kg].
pub const M_PROTON: fcn = 1.672_621_9e-27;
