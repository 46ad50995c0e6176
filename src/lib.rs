//! The `gyrodrift` crate simulates charged particles moving under the Lorentz
//! force and estimates their drift velocities, both from the integrated
//! trajectories and from the closed-form drift formulas.

pub mod constants;
pub mod drift;
pub mod error;
pub mod field;
pub mod geometry;
pub mod integration;
pub mod io;
pub mod num;
pub mod particle;
pub mod seeding;

#[cfg(feature = "cli")]
pub mod cli;
