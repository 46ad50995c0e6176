//! Command line interface.

pub mod build;
pub mod completions;
pub mod regime;
pub mod run;
pub mod simulate;
pub mod trajectories;
pub mod utils;

#[cfg(feature = "statistics")]
pub mod statistics;
