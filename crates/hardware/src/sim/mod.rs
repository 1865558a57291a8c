//! Simulation orchestration.
//!
//! Provides program loading, system bring-up, and the energy/time
//! co-simulation loop that drives a run from reset to the exit sentinel.

pub mod loader;
pub mod simulator;

pub use simulator::{Simulator, simulate};
