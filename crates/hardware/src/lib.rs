//! Energy-harvesting microcontroller simulator library.
//!
//! This crate implements a cycle-accurate simulator for a microcontroller
//! running on intermittent harvested power, with the following:
//! 1. **Core:** 16-bit-instruction CPU with flags, step driver, and execution units.
//! 2. **ISA:** Decoding and execution for the double-operand, single-operand,
//!    and branch instruction classes.
//! 3. **Memory:** Flash and RAM regions, little-endian, bounds-checked.
//! 4. **Power:** Storage capacitor model and supply-voltage trace playback.
//! 5. **Schemes:** Pluggable checkpointing policies (baseline, periodic).
//! 6. **Simulation:** Loader, co-simulation loop, configuration, and statistics.

/// Common types and constants (memory map, timings, errors).
pub mod common;
/// Simulator configuration (defaults, scheme selection, hierarchical structures).
pub mod config;
/// CPU core (architectural state, flags, step driver, execution units).
pub mod core;
/// Instruction set (decode, instruction classes, condition codes).
pub mod isa;
/// Flash and RAM memory model.
pub mod mem;
/// Power supply modeling (capacitor, voltage trace).
pub mod power;
/// Checkpointing schemes (baseline, periodic).
pub mod scheme;
/// Binary loader and the energy/time co-simulation loop.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Architectural CPU state; reset it through a loaded `Memory`.
pub use crate::core::CpuState;
/// Byte-addressable memory map; construct with `Memory::new`.
pub use crate::mem::Memory;
/// One-call entry point: load an image and run it under a configuration.
pub use crate::sim::simulate;
