//! Double-operand execution unit.
//!
//! Implements the data-processing instructions. Each operation reads the
//! destination register and a source operand resolved through the
//! addressing mode, computes at the selected width, and writes the result
//! back to the destination register; byte-width results zero-extend. The
//! compare and test operations update flags without writing back.
//!
//! A write to the program counter redirects control: the raised
//! branch-taken signal selects the taken next-PC policy, and the written
//! value is validated against the mode-bit invariant at the next fetch.

use crate::common::constants::{TIMING_DATA, TIMING_MEM, TIMING_PC_WRITE};
use crate::common::error::Fault;
use crate::core::cpu::{CpuState, GPR_PC};
use crate::core::execute::ExecOutcome;
use crate::core::flags;
use crate::isa::instruction::{AddrMode, DecodedInsn, DoubleOp};
use crate::mem::Memory;

/// Executes one data-processing instruction.
///
/// # Arguments
///
/// * `cpu`  - Architectural state.
/// * `mem`  - Memory, read for indirect operands.
/// * `insn` - Decoded fields (registers, mode, width).
/// * `op`   - The operation to perform.
///
/// # Returns
///
/// Cycle cost and control signals; a fault only from an indirect operand
/// load outside the mapped regions.
pub fn execute(
    cpu: &mut CpuState,
    mem: &Memory,
    insn: &DecodedInsn,
    op: DoubleOp,
) -> Result<ExecOutcome, Fault> {
    let mask = flags::width_mask(insn.byte);
    let (src, src_cycles) = match insn.mode {
        AddrMode::Register => (cpu.read_gpr(insn.rs), 0),
        AddrMode::Indirect => (
            mem.load_operand(cpu.read_gpr(insn.rs), insn.byte)?,
            TIMING_MEM,
        ),
        AddrMode::Immediate => (insn.imm as u32, TIMING_MEM),
    };
    let a = cpu.read_gpr(insn.rd) & mask;
    let b = src & mask;
    let carry_in = cpu.flag_c;

    let (result, writes_back) = match op {
        DoubleOp::Mov => (b, true),
        DoubleOp::Add => (add_with_flags(cpu, a, b, false, insn.byte), true),
        DoubleOp::Addc => (add_with_flags(cpu, a, b, carry_in, insn.byte), true),
        DoubleOp::Sub => (add_with_flags(cpu, a, !b & mask, true, insn.byte), true),
        DoubleOp::Subc => (add_with_flags(cpu, a, !b & mask, carry_in, insn.byte), true),
        DoubleOp::Cmp => (add_with_flags(cpu, a, !b & mask, true, insn.byte), false),
        DoubleOp::Cmn => (add_with_flags(cpu, a, b, false, insn.byte), false),
        DoubleOp::Tst => (test_flags(cpu, a & b, insn.byte), false),
        DoubleOp::And => (logic_with_flags(cpu, a & b, insn.byte), true),
        DoubleOp::Or => (logic_with_flags(cpu, a | b, insn.byte), true),
        DoubleOp::Xor => (logic_with_flags(cpu, a ^ b, insn.byte), true),
    };

    let mut cycles = TIMING_DATA + src_cycles;
    if writes_back {
        cpu.write_gpr(insn.rd, result);
        if insn.rd == GPR_PC {
            cycles += TIMING_PC_WRITE;
            return Ok(ExecOutcome::taken(cycles));
        }
    }
    Ok(ExecOutcome::normal(cycles))
}

/// Adds `a + b + carry_in` at the operating width and sets all four flags.
///
/// Subtractive forms pass the complemented second operand, so carry and
/// overflow come out of the same extended-precision addition.
fn add_with_flags(cpu: &mut CpuState, a: u32, b: u32, carry_in: bool, byte: bool) -> u32 {
    let result = (a as u64 + b as u64 + carry_in as u64) as u32 & flags::width_mask(byte);
    cpu.flag_n = flags::negative(result, byte);
    cpu.flag_z = flags::zero(result, byte);
    cpu.flag_c = flags::carry(a, b, carry_in, byte);
    cpu.flag_v = flags::overflow(a, b, result, byte);
    result
}

/// Sets flags for a logical result; carry and overflow always clear.
fn logic_with_flags(cpu: &mut CpuState, result: u32, byte: bool) -> u32 {
    cpu.flag_n = flags::negative(result, byte);
    cpu.flag_z = flags::zero(result, byte);
    cpu.flag_c = false;
    cpu.flag_v = false;
    result
}

/// Sets only negative and zero, leaving carry and overflow untouched.
fn test_flags(cpu: &mut CpuState, result: u32, byte: bool) -> u32 {
    cpu.flag_n = flags::negative(result, byte);
    cpu.flag_z = flags::zero(result, byte);
    result
}
