//! CPU core: state, flag arithmetic, execution units, and the step driver.
//!
//! This module contains the execution side of the simulator:
//! 1. **State:** The architectural register/flag/control record.
//! 2. **Flag Logic:** Shared negative/zero/carry/overflow helpers.
//! 3. **Execution Units:** One handler per instruction shape.
//! 4. **Step Driver:** The fetch-decode-execute-writeback cycle.

/// Architectural CPU state.
pub mod cpu;

/// Execution units for the three instruction shapes.
pub mod execute;

/// Condition-flag arithmetic helpers.
pub mod flags;

/// Single-instruction step driver.
pub mod step;

pub use cpu::CpuState;
pub use step::{StepOutcome, step};
