//! Instruction encoders and a fluent flash-image builder.
//!
//! The encoders construct raw 16-bit instruction words from the decoded
//! field values, so a test can state "ADD r1, r2" instead of a literal.
//! `ImageBuilder` lays encoded words into a full-size flash image with
//! the reset vector wired to the program entry.

use ehsim_core::common::constants::{EXIT_INSTRUCTION, FLASH_SIZE, RESET_VECTOR_ADDR};
use ehsim_core::isa::{AddrMode, Cond, DoubleOp, SingleOp};

/// Condition-field encoding, the inverse of `Cond::from_bits`.
pub fn cond_bits(cond: Cond) -> u16 {
    match cond {
        Cond::Eq => 0,
        Cond::Ne => 1,
        Cond::Cs => 2,
        Cond::Cc => 3,
        Cond::Mi => 4,
        Cond::Pl => 5,
        Cond::Vs => 6,
        Cond::Vc => 7,
        Cond::Hi => 8,
        Cond::Ls => 9,
        Cond::Ge => 10,
        Cond::Lt => 11,
        Cond::Gt => 12,
        Cond::Le => 13,
    }
}

/// Class nibble of a data-processing operation.
pub fn double_nibble(op: DoubleOp) -> u16 {
    match op {
        DoubleOp::Mov => 0x4,
        DoubleOp::Add => 0x5,
        DoubleOp::Addc => 0x6,
        DoubleOp::Sub => 0x7,
        DoubleOp::Subc => 0x8,
        DoubleOp::Cmp => 0x9,
        DoubleOp::Cmn => 0xA,
        DoubleOp::Tst => 0xB,
        DoubleOp::And => 0xC,
        DoubleOp::Or => 0xD,
        DoubleOp::Xor => 0xE,
    }
}

/// Sub-opcode of a single-operand operation.
pub fn single_bits(op: SingleOp) -> u16 {
    match op {
        SingleOp::Push => 0,
        SingleOp::Pop => 1,
        SingleOp::Call => 2,
        SingleOp::Reti => 3,
        SingleOp::Bx => 4,
        SingleOp::Blx => 5,
        SingleOp::Rrc => 6,
        SingleOp::Rra => 7,
    }
}

/// Addressing-mode field of the data-processing shape.
pub fn mode_bits(mode: AddrMode) -> u16 {
    match mode {
        AddrMode::Register => 0,
        AddrMode::Indirect => 1,
        AddrMode::Immediate => 2,
    }
}

/// Encode a data-processing instruction.
///
/// Immediate addressing needs the literal laid as a trailing word; the
/// builder's `*_imm` helpers do both at once.
pub fn encode_double(op: DoubleOp, rd: usize, rs: usize, mode: AddrMode, byte: bool) -> u16 {
    double_nibble(op) << 12
        | (rs as u16 & 0xF) << 8
        | u16::from(byte) << 7
        | mode_bits(mode) << 5
        | (rd as u16 & 0xF)
}

/// Encode a single-operand instruction.
pub fn encode_single(op: SingleOp, rd: usize, byte: bool) -> u16 {
    0x1000 | single_bits(op) << 9 | u16::from(byte) << 8 | (rd as u16 & 0xF)
}

/// Encode an unconditional branch with a byte offset (even, ±2 KiB).
pub fn encode_branch(offset: i32) -> u16 {
    assert_eq!(offset & 1, 0, "branch offsets are halfword-aligned");
    assert!((-2048..=2046).contains(&offset), "branch offset out of field range");
    0x3000 | ((offset >> 1) & 0x7FF) as u16
}

/// Encode a conditional branch with a byte offset (even, ±256 B).
pub fn encode_branch_cond(cond: Cond, offset: i32) -> u16 {
    assert_eq!(offset & 1, 0, "branch offsets are halfword-aligned");
    assert!((-256..=254).contains(&offset), "branch offset out of field range");
    0x2000 | cond_bits(cond) << 8 | ((offset >> 1) & 0xFF) as u16
}

/// Encode the two words of a branch-and-link with a byte offset (±16 MiB).
pub fn encode_branch_link(offset: i32) -> [u16; 2] {
    assert_eq!(offset & 1, 0, "branch offsets are halfword-aligned");
    assert!(
        (-(1 << 24)..(1 << 24)).contains(&offset),
        "branch offset out of field range"
    );
    let halfwords = (offset >> 1) & 0xFF_FFFF;
    [
        0xF000 | ((halfwords >> 12) & 0xFFF) as u16,
        0xF000 | (halfwords & 0xFFF) as u16,
    ]
}

/// Fluent builder for a complete flash image.
///
/// Starts zero-filled at full flash size with the reset vector pointing
/// at offset zero (mode bit set). Words lay down at a cursor that
/// advances as they are appended.
pub struct ImageBuilder {
    bytes: Vec<u8>,
    cursor: usize,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; FLASH_SIZE as usize],
            cursor: 0,
        }
        .reset_vector(0)
    }

    /// Point the reset vector at `entry`. The mode bit is set here.
    pub fn reset_vector(mut self, entry: u32) -> Self {
        let vector = (entry | 1) as u16;
        self.put_u16(RESET_VECTOR_ADDR as usize, vector);
        self
    }

    /// Move the cursor to an absolute flash offset.
    pub fn at(mut self, offset: u32) -> Self {
        self.cursor = offset as usize;
        self
    }

    /// Append one raw instruction word at the cursor.
    pub fn raw(mut self, word: u16) -> Self {
        self.put_u16(self.cursor, word);
        self.cursor += 2;
        self
    }

    /// Append a sequence of raw words at the cursor.
    pub fn words(mut self, words: &[u16]) -> Self {
        for &word in words {
            self = self.raw(word);
        }
        self
    }

    /// MOV rd, #imm (immediate literal in the trailing word).
    pub fn mov_imm(self, rd: usize, imm: u16) -> Self {
        self.raw(encode_double(DoubleOp::Mov, rd, 0, AddrMode::Immediate, false))
            .raw(imm)
    }

    /// A register-to-register data-processing instruction.
    pub fn op_reg(self, op: DoubleOp, rd: usize, rs: usize) -> Self {
        self.raw(encode_double(op, rd, rs, AddrMode::Register, false))
    }

    /// A data-processing instruction with an immediate literal operand.
    pub fn op_imm(self, op: DoubleOp, rd: usize, imm: u16) -> Self {
        self.raw(encode_double(op, rd, 0, AddrMode::Immediate, false))
            .raw(imm)
    }

    pub fn push(self, rd: usize) -> Self {
        self.raw(encode_single(SingleOp::Push, rd, false))
    }

    pub fn pop(self, rd: usize) -> Self {
        self.raw(encode_single(SingleOp::Pop, rd, false))
    }

    pub fn call(self, rd: usize) -> Self {
        self.raw(encode_single(SingleOp::Call, rd, false))
    }

    pub fn bx(self, rd: usize) -> Self {
        self.raw(encode_single(SingleOp::Bx, rd, false))
    }

    pub fn b(self, offset: i32) -> Self {
        self.raw(encode_branch(offset))
    }

    pub fn b_cond(self, cond: Cond, offset: i32) -> Self {
        self.raw(encode_branch_cond(cond, offset))
    }

    pub fn bl(self, offset: i32) -> Self {
        let words = encode_branch_link(offset);
        self.words(&words)
    }

    /// The end-of-simulation sentinel.
    pub fn exit(self) -> Self {
        self.raw(EXIT_INSTRUCTION)
    }

    /// The finished image, full flash size.
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    fn put_u16(&mut self, offset: usize, word: u16) {
        self.bytes[offset..offset + 2].copy_from_slice(&word.to_le_bytes());
    }
}
