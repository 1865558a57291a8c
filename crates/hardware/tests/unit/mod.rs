//! # Unit Tests
//!
//! Fine-grained tests for the simulator's components, organized to
//! mirror the source layout: the CPU core and its execution semantics,
//! the ISA decoder, the memory map, the power models, the checkpointing
//! schemes, and the simulation loop.


/// CPU core: reset, flag laws, and whole-program execution.
pub mod core;

/// Fault and simulation-error formatting and conversion.
pub mod error;



/// Capacitor and voltage-trace models.
pub mod power;
