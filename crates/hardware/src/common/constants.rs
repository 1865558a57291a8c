//! Global system constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Memory Map:** Base addresses and sizes of the flash and RAM regions.
//! 2. **Reset Constants:** Reset vector location and the fetch-offset convention.
//! 3. **Timing Constants:** Per-class instruction cycle costs.
//! 4. **Liveness Constants:** The forward-progress failure threshold.

/// Base address of the persistent program store (flash).
pub const FLASH_BASE: u32 = 0x0000_0000;

/// Size of the flash region in bytes (64 KiB).
pub const FLASH_SIZE: u32 = 0x0001_0000;

/// Base address of the volatile data store (RAM).
pub const RAM_BASE: u32 = 0x4000_0000;

/// Size of the RAM region in bytes (64 KiB).
pub const RAM_SIZE: u32 = 0x0001_0000;

/// Flash offset holding the 16-bit reset vector.
pub const RESET_VECTOR_ADDR: u32 = 0xFFFE;

/// Distance the architectural program counter leads the fetch address.
///
/// Branch offsets are computed against the architectural value, so fetch
/// happens at `pc - PC_FETCH_OFFSET`.
pub const PC_FETCH_OFFSET: u32 = 4;

/// Size of a primary instruction word in bytes.
pub const INSTRUCTION_SIZE: u32 = 2;

/// Size of a two-word instruction (or one carrying an immediate literal).
pub const INSTRUCTION_SIZE_WIDE: u32 = 4;

/// Instruction word that signals end of simulation.
pub const EXIT_INSTRUCTION: u16 = 0x3FAA;

/// Base cycle cost of a data-processing instruction.
pub const TIMING_DATA: u64 = 1;

/// Cycle cost of one memory or literal fetch beyond the base cost.
pub const TIMING_MEM: u64 = 1;

/// Additional cycle cost when a data instruction writes the program counter.
pub const TIMING_PC_WRITE: u64 = 1;

/// Cycle cost of a taken branch or an indirect branch.
pub const TIMING_BRANCH: u64 = 2;

/// Cycle cost of a conditional branch that falls through.
pub const TIMING_BRANCH_NOT_TAKEN: u64 = 1;

/// Cycle cost of a branch that writes the link register.
pub const TIMING_BRANCH_LINK: u64 = 3;

/// Cycle cost of a stack push or pop.
pub const TIMING_STACK: u64 = 2;

/// Cycle cost of a call through a register.
pub const TIMING_CALL: u64 = 3;

/// Cycle cost of a return from exception.
pub const TIMING_RETI: u64 = 4;

/// Consecutive zero-backup active periods tolerated before the run aborts.
pub const FORWARD_PROGRESS_THRESHOLD: u32 = 5;
