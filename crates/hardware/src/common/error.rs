//! Fault and simulation error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Faults:** Fatal conditions raised by the CPU core while stepping.
//! 2. **Simulation Errors:** Run-level failures, including input loading and
//!    the forward-progress liveness check.
//!
//! Every condition here is unrecoverable at this layer. The core never
//! retries; a caller should treat a failure as "this scheme/trace
//! combination is infeasible" and try a different configuration.

use thiserror::Error;

/// Fatal conditions raised by the CPU core during fetch, decode, or execute.
///
/// A fault aborts the simulation run. Each variant carries the offending
/// address or instruction word so the failure can be diagnosed offline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// Unrecognized instruction encoding.
    ///
    /// Raised when a fetched word matches no known instruction pattern,
    /// including reserved opcode space and invalid addressing-mode bits.
    #[error("malformed instruction {word:#06x} at {addr:#010x}")]
    MalformedInstruction {
        /// The instruction word that failed to decode.
        word: u16,
        /// Fetch address of the word.
        addr: u32,
    },

    /// Indirect branch to a target without the required mode bit.
    ///
    /// Raised when `BX`, `BLX`, `CALL`, or a pop into the program counter
    /// redirects to an address whose low bit is clear. Only one execution
    /// mode is supported, so interworking is always fatal.
    #[error("unsupported interworking to {target:#010x}")]
    UnsupportedInterworking {
        /// The rejected branch target.
        target: u32,
    },

    /// Program counter lost its mode bit.
    ///
    /// Raised at the top of a step when the program counter's low bit is
    /// clear, meaning a previous instruction wrote an invalid value.
    #[error("program counter {pc:#010x} lost the execution-mode bit")]
    ModeViolation {
        /// The invalid program counter.
        pc: u32,
    },

    /// Load or store outside the flash and RAM regions.
    ///
    /// Raised on any access that does not fall inside a mapped region.
    /// The contract assumes well-formed images, so this points at a bug
    /// in the program under simulation.
    #[error("memory access outside mapped regions at {addr:#010x}")]
    InvalidMemoryAccess {
        /// The faulting address.
        addr: u32,
    },
}

/// Run-level simulation failures.
///
/// Wraps CPU faults and adds the conditions detected by the outer loop
/// and the input loaders.
#[derive(Debug, Error)]
pub enum SimError {
    /// The checkpointing policy made no forward progress.
    ///
    /// Raised when the configured threshold of consecutive active periods
    /// complete without a single backup. Signals that the scheme is not
    /// viable in the given energy environment.
    #[error("no forward progress after {periods} consecutive active periods without a backup")]
    NoForwardProgress {
        /// How many zero-backup periods completed back to back.
        periods: u32,
    },

    /// The program image could not be loaded.
    ///
    /// Surfaced before the simulation loop starts.
    #[error("failed to load program image `{path}`: {reason}")]
    ImageLoad {
        /// Path of the image that failed to load.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The voltage trace could not be loaded or parsed.
    ///
    /// Surfaced before the simulation loop starts.
    #[error("failed to load voltage trace `{path}`: {reason}")]
    TraceLoad {
        /// Path of the trace that failed to load.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// A CPU fault terminated the run.
    #[error(transparent)]
    Fault(#[from] Fault),
}
