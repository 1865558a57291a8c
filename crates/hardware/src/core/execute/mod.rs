//! Execution units and dispatch.
//!
//! This module routes a decoded instruction to the unit implementing its
//! shape and collects the outcome. It provides:
//! 1. **Dispatch:** A match over the closed operation set, one arm per
//!    shape, constant-time and allocation-free.
//! 2. **Outcome:** The cycle cost plus the control signals the fetch
//!    stage consumes.
//!
//! Each unit is pure with respect to its declared side effects: it reads
//! the operands it needs, writes exactly the registers, memory, and flags
//! the instruction defines, and reports its cycle cost.

/// Branch-class execution unit.
pub mod branch;

/// Double-operand (data-processing) execution unit.
pub mod double;

/// Single-operand (stack and indirect-control) execution unit.
pub mod single;

use crate::common::error::Fault;
use crate::core::cpu::CpuState;
use crate::isa::instruction::{DecodedInsn, Op};
use crate::mem::Memory;

/// Address top nibble marking an exception return instead of a branch.
pub(crate) const EXCEPTION_RETURN_NIBBLE: u32 = 0xF;

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Cycles the instruction consumed.
    pub cycles: u64,
    /// A branch redirected control, selecting the taken next-PC policy.
    pub branch_taken: bool,
    /// The end-of-simulation sentinel was executed.
    pub exit: bool,
}

impl ExecOutcome {
    /// Outcome of a straight-line instruction.
    pub const fn normal(cycles: u64) -> Self {
        Self {
            cycles,
            branch_taken: false,
            exit: false,
        }
    }

    /// Outcome of an instruction that redirected control.
    pub const fn taken(cycles: u64) -> Self {
        Self {
            cycles,
            branch_taken: true,
            exit: false,
        }
    }
}

/// Executes one decoded instruction against the CPU state.
///
/// # Arguments
///
/// * `cpu`  - Architectural state, mutated per the instruction semantics.
/// * `mem`  - Memory for operand loads and stores.
/// * `insn` - The decoded instruction to execute.
///
/// # Returns
///
/// The cycle cost and control signals, or the fault that aborted the
/// instruction.
pub fn execute(
    cpu: &mut CpuState,
    mem: &mut Memory,
    insn: &DecodedInsn,
) -> Result<ExecOutcome, Fault> {
    match insn.op {
        Op::Double(op) => double::execute(cpu, mem, insn, op),
        Op::Single(op) => single::execute(cpu, mem, insn, op),
        Op::Branch(op) => Ok(branch::execute(cpu, insn, op)),
    }
}
