//! Single-instruction step driver.
//!
//! This module advances the core by exactly one instruction. It provides:
//! 1. **Fetch:** reads the halfword behind the architectural program
//!    counter, which always points one fetch width past the instruction
//!    being executed.
//! 2. **Dispatch:** decodes the word and routes it to the matching
//!    execution unit.
//! 3. **Retire:** advances the program counter past the instruction, or
//!    past the redirect target when a branch was taken.
//!
//! The low bit of the program counter is the execution-mode bit and must
//! be set before every fetch; a clear bit is a fatal mode violation.

use tracing::trace;

use crate::common::constants::PC_FETCH_OFFSET;
use crate::common::error::Fault;
use crate::core::cpu::CpuState;
use crate::core::execute::execute;
use crate::isa::decode;
use crate::mem::Memory;

/// Mask clearing the mode bit from a fetch address.
const ALIGN_MASK: u32 = !1;

/// The externally visible result of one instruction step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cycles consumed by the instruction.
    pub cycles: u64,

    /// The instruction was the program-exit sentinel.
    pub exit: bool,
}

/// Fetches, decodes, and executes one instruction.
///
/// # Arguments
///
/// * `cpu` - Architectural state to advance.
/// * `mem` - Backing memory for fetch and data traffic.
///
/// # Returns
///
/// The cycle cost of the retired instruction, or the fault that stopped
/// it. On fault the program counter still points at the faulting
/// instruction.
pub fn step(cpu: &mut CpuState, mem: &mut Memory) -> Result<StepOutcome, Fault> {
    let pc = cpu.pc();
    if pc & 1 == 0 {
        return Err(Fault::ModeViolation { pc });
    }

    let fetch_addr = pc.wrapping_sub(PC_FETCH_OFFSET) & ALIGN_MASK;
    let word = mem.load_u16(fetch_addr)?;
    let insn = decode(word, fetch_addr, mem)?;
    let outcome = execute(cpu, mem, &insn)?;

    if outcome.branch_taken {
        // The unit wrote the raw target; re-point the fetch window at it.
        cpu.set_pc(cpu.pc().wrapping_add(PC_FETCH_OFFSET));
    } else {
        cpu.set_pc(pc.wrapping_add(insn.width));
    }

    trace!(
        addr = format_args!("{fetch_addr:#010X}"),
        word = format_args!("{word:#06X}"),
        cycles = outcome.cycles,
        taken = outcome.branch_taken,
        "retired"
    );

    Ok(StepOutcome {
        cycles: outcome.cycles,
        exit: outcome.exit,
    })
}
