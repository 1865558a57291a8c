//! Common types shared across the simulator.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** Memory map, clock, and timing constants.
//! 2. **Error Handling:** CPU fault and simulation error types.

/// System-wide constants for the memory map and instruction timing.
pub mod constants;

/// Error types for CPU faults and run-level failures.
pub mod error;

pub use error::{Fault, SimError};
