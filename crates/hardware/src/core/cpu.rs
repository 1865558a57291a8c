//! CPU architectural state.
//!
//! This module defines the `CpuState` structure holding everything the
//! processor needs to resume execution exactly where it left off:
//! 1. **Register File:** Sixteen 32-bit general-purpose registers, three of
//!    which double as stack pointer, link register, and program counter.
//! 2. **Status Flags:** The negative, zero, carry, and overflow bits.
//! 3. **Control Fields:** Interrupt mask, processor mode, and exception
//!    mask, carried to support reset and exception-return semantics.
//!
//! The state is one plain value owned by the simulator and passed by
//! exclusive reference into decode, execute, and the checkpoint scheme's
//! backup/restore methods. A checkpoint is a bitwise copy of this struct.

use serde::{Deserialize, Serialize};

use crate::common::constants::{PC_FETCH_OFFSET, RESET_VECTOR_ADDR};
use crate::common::error::Fault;
use crate::mem::Memory;

/// Register index of the stack pointer.
pub const GPR_SP: usize = 13;

/// Register index of the link register.
pub const GPR_LR: usize = 14;

/// Register index of the program counter.
pub const GPR_PC: usize = 15;

/// Number of general-purpose registers.
pub const GPR_COUNT: usize = 16;

/// Status-word bit holding the negative flag (for exception frames).
const STATUS_N: u32 = 1 << 31;
/// Status-word bit holding the zero flag.
const STATUS_Z: u32 = 1 << 30;
/// Status-word bit holding the carry flag.
const STATUS_C: u32 = 1 << 29;
/// Status-word bit holding the overflow flag.
const STATUS_V: u32 = 1 << 28;
/// Status-word bit holding the interrupt mask.
const STATUS_PRIMASK: u32 = 1;

/// Full architectural state of the simulated core.
///
/// The program counter (`gpr[15]`) holds the architectural value, which
/// leads the fetch address by four bytes and keeps its low bit set while
/// execution stays in the supported mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    /// General-purpose registers; `r13` = SP, `r14` = LR, `r15` = PC.
    pub gpr: [u32; GPR_COUNT],
    /// Negative flag.
    pub flag_n: bool,
    /// Zero flag.
    pub flag_z: bool,
    /// Carry flag.
    pub flag_c: bool,
    /// Overflow flag.
    pub flag_v: bool,
    /// Interrupt mask; bit 0 set masks interrupts.
    pub primask: u32,
    /// Processor mode word, zero in the only supported mode.
    pub mode: u32,
    /// Pending-exception mask.
    pub exceptmask: u32,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuState {
    /// Creates a fully zeroed state.
    pub const fn new() -> Self {
        Self {
            gpr: [0; GPR_COUNT],
            flag_n: false,
            flag_z: false,
            flag_c: false,
            flag_v: false,
            primask: 0,
            mode: 0,
            exceptmask: 0,
        }
    }

    /// Resets the core to its deterministic power-on state.
    ///
    /// Every register, flag, and control field is zeroed, then the program
    /// counter is loaded from the 16-bit reset vector in flash, adjusted by
    /// the fetch-offset convention. The vector must carry the mode bit.
    ///
    /// # Arguments
    ///
    /// * `mem` - Memory holding the program image with its reset vector.
    pub fn reset(&mut self, mem: &Memory) -> Result<(), Fault> {
        *self = Self::new();
        let vector = u32::from(mem.load_u16(RESET_VECTOR_ADDR)?);
        self.gpr[GPR_PC] = vector + PC_FETCH_OFFSET;
        Ok(())
    }

    /// Reads a general-purpose register.
    ///
    /// Reads of `r15` observe the architectural program counter including
    /// the mode bit.
    #[inline(always)]
    pub const fn read_gpr(&self, idx: usize) -> u32 {
        self.gpr[idx]
    }

    /// Writes a general-purpose register.
    #[inline(always)]
    pub const fn write_gpr(&mut self, idx: usize, val: u32) {
        self.gpr[idx] = val;
    }

    /// The architectural program counter.
    #[inline(always)]
    pub const fn pc(&self) -> u32 {
        self.gpr[GPR_PC]
    }

    /// Sets the architectural program counter.
    #[inline(always)]
    pub const fn set_pc(&mut self, pc: u32) {
        self.gpr[GPR_PC] = pc;
    }

    /// Packs the flags and interrupt mask into an exception status word.
    ///
    /// Layout: bit 31 N, bit 30 Z, bit 29 C, bit 28 V, bit 0 interrupt
    /// mask. This is the word pushed on exception entry and popped by
    /// return-from-exception.
    pub const fn status_word(&self) -> u32 {
        let mut word = 0;
        if self.flag_n {
            word |= STATUS_N;
        }
        if self.flag_z {
            word |= STATUS_Z;
        }
        if self.flag_c {
            word |= STATUS_C;
        }
        if self.flag_v {
            word |= STATUS_V;
        }
        word | (self.primask & STATUS_PRIMASK)
    }

    /// Restores the flags and interrupt mask from an exception status word.
    pub const fn set_status_word(&mut self, word: u32) {
        self.flag_n = word & STATUS_N != 0;
        self.flag_z = word & STATUS_Z != 0;
        self.flag_c = word & STATUS_C != 0;
        self.flag_v = word & STATUS_V != 0;
        self.primask = word & STATUS_PRIMASK;
    }
}
