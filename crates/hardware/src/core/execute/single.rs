//! Single-operand execution unit.
//!
//! Implements the stack and indirect-control instructions: push/pop,
//! call-through-register, return-from-exception, the indirect branches,
//! and the one-bit rotate and shift. Stack operations move the stack
//! pointer by the native word size and access memory through it;
//! return-from-exception pops a saved status word before the return
//! address.
//!
//! Every indirect control transfer validates the target's mode bit; a
//! clear bit is fatal. A branch target whose top nibble is the exception
//! sentinel performs the exception-return sequence instead of a plain
//! redirect.

use crate::common::constants::{
    TIMING_BRANCH, TIMING_CALL, TIMING_DATA, TIMING_PC_WRITE, TIMING_RETI, TIMING_STACK,
};
use crate::common::error::Fault;
use crate::core::cpu::{CpuState, GPR_LR, GPR_PC, GPR_SP};
use crate::core::execute::{EXCEPTION_RETURN_NIBBLE, ExecOutcome};
use crate::core::flags;
use crate::isa::instruction::{DecodedInsn, SingleOp};
use crate::mem::Memory;

/// Native word size of the stack, in bytes.
const WORD_BYTES: u32 = 4;

/// Shift isolating the top nibble of a branch target.
const TARGET_NIBBLE_SHIFT: u32 = 28;

/// Executes one single-operand instruction.
///
/// # Arguments
///
/// * `cpu`  - Architectural state.
/// * `mem`  - Memory for stack traffic.
/// * `insn` - Decoded fields (register, width).
/// * `op`   - The operation to perform.
///
/// # Returns
///
/// Cycle cost and control signals, or the fault that rejected the
/// instruction.
pub fn execute(
    cpu: &mut CpuState,
    mem: &mut Memory,
    insn: &DecodedInsn,
    op: SingleOp,
) -> Result<ExecOutcome, Fault> {
    match op {
        SingleOp::Push => {
            let val = cpu.read_gpr(insn.rd);
            let sp = cpu.read_gpr(GPR_SP).wrapping_sub(WORD_BYTES);
            mem.store_u32(sp, val)?;
            cpu.write_gpr(GPR_SP, sp);
            Ok(ExecOutcome::normal(TIMING_STACK))
        }
        SingleOp::Pop => {
            let sp = cpu.read_gpr(GPR_SP);
            let val = mem.load_u32(sp)?;
            cpu.write_gpr(GPR_SP, sp.wrapping_add(WORD_BYTES));
            if insn.rd == GPR_PC {
                interworking_check(val)?;
                cpu.set_pc(val);
                Ok(ExecOutcome::taken(TIMING_STACK))
            } else {
                cpu.write_gpr(insn.rd, val);
                Ok(ExecOutcome::normal(TIMING_STACK))
            }
        }
        SingleOp::Call => {
            let target = cpu.read_gpr(insn.rd);
            interworking_check(target)?;
            let sp = cpu.read_gpr(GPR_SP).wrapping_sub(WORD_BYTES);
            mem.store_u32(sp, return_address(cpu))?;
            cpu.write_gpr(GPR_SP, sp);
            cpu.set_pc(target);
            Ok(ExecOutcome::taken(TIMING_CALL))
        }
        SingleOp::Reti => exception_return(cpu, mem, TIMING_RETI),
        SingleOp::Bx => {
            let target = cpu.read_gpr(insn.rd);
            if target >> TARGET_NIBBLE_SHIFT == EXCEPTION_RETURN_NIBBLE {
                exception_return(cpu, mem, TIMING_BRANCH)
            } else {
                interworking_check(target)?;
                cpu.set_pc(target);
                Ok(ExecOutcome::taken(TIMING_BRANCH))
            }
        }
        SingleOp::Blx => {
            let target = cpu.read_gpr(insn.rd);
            interworking_check(target)?;
            cpu.write_gpr(GPR_LR, return_address(cpu));
            cpu.set_pc(target);
            Ok(ExecOutcome::taken(TIMING_BRANCH))
        }
        SingleOp::Rrc => {
            let val = cpu.read_gpr(insn.rd) & flags::width_mask(insn.byte);
            let mut result = val >> 1;
            if cpu.flag_c {
                result |= flags::sign_bit(insn.byte);
            }
            cpu.flag_c = val & 1 != 0;
            Ok(shift_writeback(cpu, insn, result))
        }
        SingleOp::Rra => {
            let val = cpu.read_gpr(insn.rd) & flags::width_mask(insn.byte);
            let result = (val >> 1) | (val & flags::sign_bit(insn.byte));
            cpu.flag_c = val & 1 != 0;
            Ok(shift_writeback(cpu, insn, result))
        }
    }
}

/// Address of the instruction following a two-byte indirect call.
#[inline(always)]
const fn return_address(cpu: &CpuState) -> u32 {
    cpu.pc().wrapping_sub(2)
}

/// Rejects an indirect branch target without the mode bit.
const fn interworking_check(target: u32) -> Result<(), Fault> {
    if target & 1 == 0 {
        Err(Fault::UnsupportedInterworking { target })
    } else {
        Ok(())
    }
}

/// Pops the saved status word and return address.
///
/// The status word restores the flags and interrupt mask; the return
/// address is mode-checked like any indirect branch target.
fn exception_return(cpu: &mut CpuState, mem: &Memory, cycles: u64) -> Result<ExecOutcome, Fault> {
    let sp = cpu.read_gpr(GPR_SP);
    let status = mem.load_u32(sp)?;
    let ret = mem.load_u32(sp.wrapping_add(WORD_BYTES))?;
    interworking_check(ret)?;
    cpu.write_gpr(GPR_SP, sp.wrapping_add(2 * WORD_BYTES));
    cpu.set_status_word(status);
    cpu.set_pc(ret);
    Ok(ExecOutcome::taken(cycles))
}

/// Writes a rotate or shift result and sets its flags.
fn shift_writeback(cpu: &mut CpuState, insn: &DecodedInsn, result: u32) -> ExecOutcome {
    cpu.flag_n = flags::negative(result, insn.byte);
    cpu.flag_z = flags::zero(result, insn.byte);
    cpu.flag_v = false;
    cpu.write_gpr(insn.rd, result);
    if insn.rd == GPR_PC {
        ExecOutcome::taken(TIMING_DATA + TIMING_PC_WRITE)
    } else {
        ExecOutcome::normal(TIMING_DATA)
    }
}
