//! Instruction decoder.
//!
//! This module turns a raw 16-bit instruction word into a structured
//! [`DecodedInsn`]. Classification is driven by the top nibble, which
//! selects one of three disjoint shapes: double-operand data processing,
//! single-operand stack/control, and the branch class. Multi-word
//! encodings (branch-and-link, immediate-literal operands) fetch their
//! trailing word through the memory reference; decode never mutates any
//! state.
//!
//! Branch offsets are stored in the instruction as halfword counts, so
//! each is left-shifted by one before sign extension at its exact field
//! width (9, 12, or 25 bits).

use crate::common::constants::{EXIT_INSTRUCTION, INSTRUCTION_SIZE, INSTRUCTION_SIZE_WIDE};
use crate::common::error::Fault;
use crate::isa::instruction::{
    AddrMode, BRANCH_COND_IMM_BITS, BRANCH_COND_IMM_MASK, BRANCH_IMM_BITS, BRANCH_IMM_MASK,
    BRANCH_LINK_IMM_BITS, BRANCH_LINK_IMM_MASK, BRANCH_RESERVED_BIT, BranchOp, CLASS_BRANCH,
    CLASS_BRANCH_COND, CLASS_BRANCH_LINK, CLASS_DOUBLE_FIRST, CLASS_DOUBLE_LAST, CLASS_SHIFT,
    CLASS_SINGLE, COND_MASK, COND_SHIFT, Cond, DOUBLE_BYTE_BIT, DOUBLE_MODE_SHIFT,
    DOUBLE_RS_SHIFT, DecodedInsn, DoubleOp, MODE_MASK, Op, REG_MASK, SINGLE_BYTE_BIT,
    SINGLE_MODE_SHIFT, SINGLE_OP_MASK, SINGLE_OP_SHIFT, SingleOp, sign_extend,
};
use crate::mem::Memory;

/// Width of one offset halfword step.
const OFFSET_SHIFT: u32 = 1;

/// Decodes one instruction.
///
/// # Arguments
///
/// * `word`       - The primary instruction word.
/// * `fetch_addr` - Address the word was fetched from, used to fetch a
///   trailing word and to report malformed encodings.
/// * `mem`        - Memory, read only for trailing words.
///
/// # Returns
///
/// The decoded record, or [`Fault::MalformedInstruction`] for any word
/// outside the recognized encoding space.
pub fn decode(word: u16, fetch_addr: u32, mem: &Memory) -> Result<DecodedInsn, Fault> {
    match word >> CLASS_SHIFT {
        CLASS_SINGLE => decode_single(word, fetch_addr),
        CLASS_BRANCH_COND => decode_branch_cond(word, fetch_addr),
        CLASS_BRANCH => decode_branch(word, fetch_addr),
        CLASS_DOUBLE_FIRST..=CLASS_DOUBLE_LAST => decode_double(word, fetch_addr, mem),
        CLASS_BRANCH_LINK => decode_branch_link(word, fetch_addr, mem),
        _ => Err(malformed(word, fetch_addr)),
    }
}

const fn malformed(word: u16, addr: u32) -> Fault {
    Fault::MalformedInstruction { word, addr }
}

/// Decodes the single-operand shape.
///
/// Only register addressing is defined for this shape; the mode field
/// must be zero. The byte bit is meaningful to the rotate and shift
/// operations and ignored by the rest.
fn decode_single(word: u16, fetch_addr: u32) -> Result<DecodedInsn, Fault> {
    if (word >> SINGLE_MODE_SHIFT) & MODE_MASK != 0 {
        return Err(malformed(word, fetch_addr));
    }
    let op = match (word >> SINGLE_OP_SHIFT) & SINGLE_OP_MASK {
        0 => SingleOp::Push,
        1 => SingleOp::Pop,
        2 => SingleOp::Call,
        3 => SingleOp::Reti,
        4 => SingleOp::Bx,
        5 => SingleOp::Blx,
        6 => SingleOp::Rrc,
        _ => SingleOp::Rra,
    };
    Ok(DecodedInsn {
        rd: usize::from(word & REG_MASK),
        byte: word & SINGLE_BYTE_BIT != 0,
        ..DecodedInsn::of(Op::Single(op))
    })
}

/// Decodes a conditional branch.
fn decode_branch_cond(word: u16, fetch_addr: u32) -> Result<DecodedInsn, Fault> {
    let Some(cond) = Cond::from_bits((word >> COND_SHIFT) & COND_MASK) else {
        return Err(malformed(word, fetch_addr));
    };
    let offset = u32::from(word & BRANCH_COND_IMM_MASK) << OFFSET_SHIFT;
    Ok(DecodedInsn {
        imm: sign_extend(offset, BRANCH_COND_IMM_BITS),
        ..DecodedInsn::of(Op::Branch(BranchOp::Cond(cond)))
    })
}

/// Decodes the unconditional branch and the end-of-simulation sentinel.
///
/// The half of this class with the reserved bit set is undefined except
/// for the one sentinel word.
fn decode_branch(word: u16, fetch_addr: u32) -> Result<DecodedInsn, Fault> {
    if word == EXIT_INSTRUCTION {
        return Ok(DecodedInsn::of(Op::Branch(BranchOp::Exit)));
    }
    if word & BRANCH_RESERVED_BIT != 0 {
        return Err(malformed(word, fetch_addr));
    }
    let offset = u32::from(word & BRANCH_IMM_MASK) << OFFSET_SHIFT;
    Ok(DecodedInsn {
        imm: sign_extend(offset, BRANCH_IMM_BITS),
        ..DecodedInsn::of(Op::Branch(BranchOp::B))
    })
}

/// Decodes the double-operand shape.
///
/// Immediate addressing consumes the literal word following the
/// instruction, widening the fetch to four bytes.
fn decode_double(word: u16, fetch_addr: u32, mem: &Memory) -> Result<DecodedInsn, Fault> {
    let op = match word >> CLASS_SHIFT {
        0x4 => DoubleOp::Mov,
        0x5 => DoubleOp::Add,
        0x6 => DoubleOp::Addc,
        0x7 => DoubleOp::Sub,
        0x8 => DoubleOp::Subc,
        0x9 => DoubleOp::Cmp,
        0xA => DoubleOp::Cmn,
        0xB => DoubleOp::Tst,
        0xC => DoubleOp::And,
        0xD => DoubleOp::Or,
        _ => DoubleOp::Xor,
    };
    let mode = match (word >> DOUBLE_MODE_SHIFT) & MODE_MASK {
        0 => AddrMode::Register,
        1 => AddrMode::Indirect,
        2 => AddrMode::Immediate,
        _ => return Err(malformed(word, fetch_addr)),
    };
    let mut insn = DecodedInsn {
        rd: usize::from(word & REG_MASK),
        rs: usize::from((word >> DOUBLE_RS_SHIFT) & REG_MASK),
        mode,
        byte: word & DOUBLE_BYTE_BIT != 0,
        ..DecodedInsn::of(Op::Double(op))
    };
    if mode == AddrMode::Immediate {
        insn.imm = i32::from(mem.load_u16(fetch_addr + INSTRUCTION_SIZE)?);
        insn.width = INSTRUCTION_SIZE_WIDE;
    }
    Ok(insn)
}

/// Decodes the two-word branch-and-link.
///
/// Both words carry the class nibble; a trailing word without it means
/// the pair was split by a bad branch and is rejected.
fn decode_branch_link(word: u16, fetch_addr: u32, mem: &Memory) -> Result<DecodedInsn, Fault> {
    let trailer_addr = fetch_addr + INSTRUCTION_SIZE;
    let trailer = mem.load_u16(trailer_addr)?;
    if trailer >> CLASS_SHIFT != CLASS_BRANCH_LINK {
        return Err(malformed(trailer, trailer_addr));
    }
    let high = u32::from(word & BRANCH_LINK_IMM_MASK);
    let low = u32::from(trailer & BRANCH_LINK_IMM_MASK);
    let offset = ((high << 12) | low) << OFFSET_SHIFT;
    Ok(DecodedInsn {
        imm: sign_extend(offset, BRANCH_LINK_IMM_BITS),
        width: INSTRUCTION_SIZE_WIDE,
        ..DecodedInsn::of(Op::Branch(BranchOp::Bl))
    })
}
