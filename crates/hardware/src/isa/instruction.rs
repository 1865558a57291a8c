//! Instruction record and field definitions.
//!
//! This module defines the structured form of one decoded instruction. It
//! provides:
//! 1. **Operation Tags:** The closed set of instruction mnemonics.
//! 2. **Condition Codes:** The fourteen branch predicates.
//! 3. **Addressing Modes:** Source-operand addressing for data instructions.
//! 4. **Field Constants:** Bit positions shared with the decoder.
//!
//! A [`DecodedInsn`] is created fresh for every step, consumed once by the
//! matching execution unit, and discarded.

use crate::common::constants::INSTRUCTION_SIZE;

/// Shift of the class nibble selecting the instruction shape.
pub const CLASS_SHIFT: u16 = 12;

/// Class nibble of the single-operand shape.
pub const CLASS_SINGLE: u16 = 0x1;

/// Class nibble of the conditional-branch shape.
pub const CLASS_BRANCH_COND: u16 = 0x2;

/// Class nibble of the unconditional-branch shape.
pub const CLASS_BRANCH: u16 = 0x3;

/// First class nibble of the double-operand shape.
pub const CLASS_DOUBLE_FIRST: u16 = 0x4;

/// Last class nibble of the double-operand shape.
pub const CLASS_DOUBLE_LAST: u16 = 0xE;

/// Class nibble of the branch-and-link shape.
pub const CLASS_BRANCH_LINK: u16 = 0xF;

/// Shift of the sub-opcode field in the single-operand shape.
pub const SINGLE_OP_SHIFT: u16 = 9;

/// Mask of the sub-opcode field in the single-operand shape.
pub const SINGLE_OP_MASK: u16 = 0x7;

/// Byte-width bit in the single-operand shape.
pub const SINGLE_BYTE_BIT: u16 = 1 << 8;

/// Shift of the addressing-mode field in the single-operand shape.
pub const SINGLE_MODE_SHIFT: u16 = 6;

/// Shift of the source-register field in the double-operand shape.
pub const DOUBLE_RS_SHIFT: u16 = 8;

/// Byte-width bit in the double-operand shape.
pub const DOUBLE_BYTE_BIT: u16 = 1 << 7;

/// Shift of the addressing-mode field in the double-operand shape.
pub const DOUBLE_MODE_SHIFT: u16 = 5;

/// Mask of a two-bit addressing-mode field.
pub const MODE_MASK: u16 = 0x3;

/// Mask of a four-bit register field.
pub const REG_MASK: u16 = 0xF;

/// Shift of the condition field in the conditional-branch shape.
pub const COND_SHIFT: u16 = 8;

/// Mask of the condition field.
pub const COND_MASK: u16 = 0xF;

/// Mask of the conditional-branch offset field.
pub const BRANCH_COND_IMM_MASK: u16 = 0xFF;

/// Significant bits of a conditional-branch offset after the shift.
pub const BRANCH_COND_IMM_BITS: u32 = 9;

/// Reserved bit distinguishing the unconditional branch from the rest of
/// its class nibble.
pub const BRANCH_RESERVED_BIT: u16 = 1 << 11;

/// Mask of the unconditional-branch offset field.
pub const BRANCH_IMM_MASK: u16 = 0x7FF;

/// Significant bits of an unconditional-branch offset after the shift.
pub const BRANCH_IMM_BITS: u32 = 12;

/// Mask of one branch-and-link offset half.
pub const BRANCH_LINK_IMM_MASK: u16 = 0xFFF;

/// Significant bits of a branch-and-link offset after the shift.
pub const BRANCH_LINK_IMM_BITS: u32 = 25;

/// Sign-extends the low `bits` bits of `value`.
///
/// # Arguments
///
/// * `value` - Field value with the significant bits in the low positions.
/// * `bits`  - Number of significant bits, including the sign bit.
///
/// # Returns
///
/// The field as a signed 32-bit value.
#[inline(always)]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Instruction operation, tagged by shape.
///
/// The three encoding shapes are disjoint, and each execution unit
/// handles exactly one of them; keeping the split in the type lets every
/// unit match its own operations exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// A double-operand data-processing instruction.
    Double(DoubleOp),

    /// A single-operand stack or indirect-control instruction.
    Single(SingleOp),

    /// A branch-class instruction.
    Branch(BranchOp),
}

/// Double-operand (data-processing) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoubleOp {
    /// Move source to destination.
    Mov,

    /// Add source to destination.
    Add,

    /// Add source and the carry flag to destination.
    Addc,

    /// Subtract source from destination.
    Sub,

    /// Subtract source from destination with borrow.
    Subc,

    /// Compare destination with source (subtraction flags only).
    Cmp,

    /// Compare negated (addition flags only).
    Cmn,

    /// Bit test (AND flags only).
    Tst,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise exclusive OR.
    Xor,
}

/// Single-operand (stack and indirect-control) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SingleOp {
    /// Push a register onto the stack.
    Push,

    /// Pop a register from the stack.
    Pop,

    /// Call through a register, pushing the return address.
    Call,

    /// Return from exception, popping the status word and return address.
    Reti,

    /// Indirect branch through a register.
    Bx,

    /// Indirect branch with link through a register.
    Blx,

    /// Rotate right one bit through the carry flag.
    Rrc,

    /// Arithmetic shift right one bit.
    Rra,
}

/// Branch-class operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOp {
    /// Unconditional relative branch.
    B,

    /// Conditional relative branch.
    Cond(Cond),

    /// Relative branch writing the link register.
    Bl,

    /// End-of-simulation sentinel.
    Exit,
}

/// Branch condition codes evaluated against the status flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    /// Equal (Z set).
    Eq,

    /// Not equal (Z clear).
    Ne,

    /// Carry set.
    Cs,

    /// Carry clear.
    Cc,

    /// Minus (N set).
    Mi,

    /// Plus (N clear).
    Pl,

    /// Overflow set.
    Vs,

    /// Overflow clear.
    Vc,

    /// Unsigned higher (C set and Z clear).
    Hi,

    /// Unsigned lower or same (C clear or Z set).
    Ls,

    /// Signed greater or equal (N equals V).
    Ge,

    /// Signed less than (N differs from V).
    Lt,

    /// Signed greater than (Z clear and N equals V).
    Gt,

    /// Signed less or equal (Z set or N differs from V).
    Le,
}

impl Cond {
    /// Decodes a condition field.
    ///
    /// # Arguments
    ///
    /// * `bits` - The four-bit condition field.
    ///
    /// # Returns
    ///
    /// The condition, or `None` for the two reserved encodings.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Self::Eq),
            1 => Some(Self::Ne),
            2 => Some(Self::Cs),
            3 => Some(Self::Cc),
            4 => Some(Self::Mi),
            5 => Some(Self::Pl),
            6 => Some(Self::Vs),
            7 => Some(Self::Vc),
            8 => Some(Self::Hi),
            9 => Some(Self::Ls),
            10 => Some(Self::Ge),
            11 => Some(Self::Lt),
            12 => Some(Self::Gt),
            13 => Some(Self::Le),
            _ => None,
        }
    }
}

/// Source-operand addressing modes of the data-processing shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AddrMode {
    /// Operand is the source register itself.
    #[default]
    Register,

    /// Operand is loaded through the address in the source register.
    Indirect,

    /// Operand is the literal word following the instruction.
    Immediate,
}

/// One decoded instruction, consumed by exactly one execution unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInsn {
    /// Operation tag.
    pub op: Op,

    /// Destination (or only) register index.
    pub rd: usize,

    /// Source register index, where the shape has one.
    pub rs: usize,

    /// Source addressing mode.
    pub mode: AddrMode,

    /// Operate at byte width instead of word width.
    pub byte: bool,

    /// Branch offset in bytes, or the immediate literal.
    pub imm: i32,

    /// Total width fetched for this instruction, in bytes.
    pub width: u32,
}

impl DecodedInsn {
    /// Creates a record with neutral fields for the given operation.
    ///
    /// The decoder fills in only the fields its shape defines; everything
    /// else stays at the neutral value.
    pub const fn of(op: Op) -> Self {
        Self {
            op,
            rd: 0,
            rs: 0,
            mode: AddrMode::Register,
            byte: false,
            imm: 0,
            width: INSTRUCTION_SIZE,
        }
    }
}
