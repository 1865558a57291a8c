//! Branch execution unit.
//!
//! Implements the relative control-flow instructions: the unconditional
//! branch, the fourteen conditional forms, branch-with-link, and the
//! program-exit sentinel. All offsets are taken relative to the
//! architectural program counter, which already points past the fetched
//! instruction.
//!
//! Branches cannot fault. A taken branch costs a pipeline refill; a
//! not-taken conditional falls through at single-cycle cost.

use crate::common::constants::{
    TIMING_BRANCH, TIMING_BRANCH_LINK, TIMING_BRANCH_NOT_TAKEN, TIMING_DATA,
};
use crate::core::cpu::{CpuState, GPR_LR};
use crate::core::execute::ExecOutcome;
use crate::isa::instruction::{BranchOp, Cond, DecodedInsn};

/// Executes one relative branch.
///
/// # Arguments
///
/// * `cpu`  - Architectural state.
/// * `insn` - Decoded fields (signed offset).
/// * `op`   - The branch form.
///
/// # Returns
///
/// Cycle cost and control signals. Branches never fault.
pub fn execute(cpu: &mut CpuState, insn: &DecodedInsn, op: BranchOp) -> ExecOutcome {
    match op {
        BranchOp::B => {
            redirect(cpu, insn.imm);
            ExecOutcome::taken(TIMING_BRANCH)
        }
        BranchOp::Cond(cond) => {
            if condition_holds(cond, cpu) {
                redirect(cpu, insn.imm);
                ExecOutcome::taken(TIMING_BRANCH)
            } else {
                ExecOutcome::normal(TIMING_BRANCH_NOT_TAKEN)
            }
        }
        BranchOp::Bl => {
            cpu.write_gpr(GPR_LR, cpu.pc());
            redirect(cpu, insn.imm);
            ExecOutcome::taken(TIMING_BRANCH_LINK)
        }
        BranchOp::Exit => ExecOutcome {
            cycles: TIMING_DATA,
            branch_taken: false,
            exit: true,
        },
    }
}

/// Adds a signed offset to the program counter.
#[inline(always)]
fn redirect(cpu: &mut CpuState, offset: i32) {
    cpu.set_pc(cpu.pc().wrapping_add(offset as u32));
}

/// Evaluates a branch condition against the current flags.
pub(crate) const fn condition_holds(cond: Cond, cpu: &CpuState) -> bool {
    match cond {
        Cond::Eq => cpu.flag_z,
        Cond::Ne => !cpu.flag_z,
        Cond::Cs => cpu.flag_c,
        Cond::Cc => !cpu.flag_c,
        Cond::Mi => cpu.flag_n,
        Cond::Pl => !cpu.flag_n,
        Cond::Vs => cpu.flag_v,
        Cond::Vc => !cpu.flag_v,
        Cond::Hi => cpu.flag_c && !cpu.flag_z,
        Cond::Ls => !cpu.flag_c || cpu.flag_z,
        Cond::Ge => cpu.flag_n == cpu.flag_v,
        Cond::Lt => cpu.flag_n != cpu.flag_v,
        Cond::Gt => !cpu.flag_z && cpu.flag_n == cpu.flag_v,
        Cond::Le => cpu.flag_z || cpu.flag_n != cpu.flag_v,
    }
}
