//! Exhaustive decode tables and the malformed-encoding grid.
//!
//! The words here are raw literals rather than encoder output, so the
//! tables pin the wire format itself. The builder encoders get their own
//! round-trip checks next to the harness.

use rstest::rstest;

use ehsim_core::common::constants::{EXIT_INSTRUCTION, INSTRUCTION_SIZE_WIDE};
use ehsim_core::common::error::Fault;
use ehsim_core::isa::{AddrMode, BranchOp, Cond, DecodedInsn, DoubleOp, Op, SingleOp, decode};
use ehsim_core::mem::Memory;

fn decode_word(word: u16) -> Result<DecodedInsn, Fault> {
    decode(word, 0, &Memory::new())
}

// ─── Operation tables ────────────────────────────────────────────────────

#[rstest]
#[case(0x4, DoubleOp::Mov)]
#[case(0x5, DoubleOp::Add)]
#[case(0x6, DoubleOp::Addc)]
#[case(0x7, DoubleOp::Sub)]
#[case(0x8, DoubleOp::Subc)]
#[case(0x9, DoubleOp::Cmp)]
#[case(0xA, DoubleOp::Cmn)]
#[case(0xB, DoubleOp::Tst)]
#[case(0xC, DoubleOp::And)]
#[case(0xD, DoubleOp::Or)]
#[case(0xE, DoubleOp::Xor)]
fn double_operand_class_nibbles(#[case] nibble: u16, #[case] op: DoubleOp) {
    let insn = decode_word(nibble << 12 | (2 << 8) | 1).unwrap();
    assert_eq!(insn.op, Op::Double(op));
    assert_eq!(insn.rs, 2);
    assert_eq!(insn.rd, 1);
    assert_eq!(insn.mode, AddrMode::Register);
    assert!(!insn.byte);
}

#[rstest]
#[case(0, SingleOp::Push)]
#[case(1, SingleOp::Pop)]
#[case(2, SingleOp::Call)]
#[case(3, SingleOp::Reti)]
#[case(4, SingleOp::Bx)]
#[case(5, SingleOp::Blx)]
#[case(6, SingleOp::Rrc)]
#[case(7, SingleOp::Rra)]
fn single_operand_sub_opcodes(#[case] bits: u16, #[case] op: SingleOp) {
    let insn = decode_word(0x1000 | bits << 9 | 3).unwrap();
    assert_eq!(insn.op, Op::Single(op));
    assert_eq!(insn.rd, 3);
}

#[rstest]
#[case(0, Cond::Eq)]
#[case(1, Cond::Ne)]
#[case(2, Cond::Cs)]
#[case(3, Cond::Cc)]
#[case(4, Cond::Mi)]
#[case(5, Cond::Pl)]
#[case(6, Cond::Vs)]
#[case(7, Cond::Vc)]
#[case(8, Cond::Hi)]
#[case(9, Cond::Ls)]
#[case(10, Cond::Ge)]
#[case(11, Cond::Lt)]
#[case(12, Cond::Gt)]
#[case(13, Cond::Le)]
fn conditional_branch_predicates(#[case] bits: u16, #[case] cond: Cond) {
    let insn = decode_word(0x2000 | bits << 8 | 0x08).unwrap();
    assert_eq!(insn.op, Op::Branch(BranchOp::Cond(cond)));
    assert_eq!(insn.imm, 16);
}

// ─── Offset field widths ─────────────────────────────────────────────────

#[rstest]
#[case::most_negative(0x2080, -256)]
#[case::most_positive(0x207F, 254)]
#[case::minus_one_halfword(0x20FF, -2)]
fn conditional_offsets_span_nine_bits(#[case] word: u16, #[case] imm: i32) {
    assert_eq!(decode_word(word).unwrap().imm, imm);
}

#[rstest]
#[case::most_negative(0x3400, -2048)]
#[case::most_positive(0x33FF, 2046)]
#[case::minus_one_halfword(0x37FF, -2)]
fn unconditional_offsets_span_twelve_bits(#[case] word: u16, #[case] imm: i32) {
    assert_eq!(decode_word(word).unwrap().imm, imm);
}

#[rstest]
#[case::most_negative(0xF800, 0xF000, -(1 << 24))]
#[case::most_positive(0xF7FF, 0xFFFF, (1 << 24) - 2)]
#[case::minus_one_halfword(0xFFFF, 0xFFFF, -2)]
fn linked_offsets_span_both_words(#[case] high: u16, #[case] low: u16, #[case] imm: i32) {
    let mut mem = Memory::new();
    mem.store_u16(2, low).unwrap();
    let insn = decode(high, 0, &mem).unwrap();
    assert_eq!(insn.op, Op::Branch(BranchOp::Bl));
    assert_eq!(insn.imm, imm);
    assert_eq!(insn.width, INSTRUCTION_SIZE_WIDE);
}

// ─── Wide encodings ──────────────────────────────────────────────────────

#[test]
fn immediate_literal_is_zero_extended() {
    let mut mem = Memory::new();
    let word = 0x7000 | (2 << 5) | 4; // SUB r4, #literal
    mem.store_u16(0, word).unwrap();
    mem.store_u16(2, 0x8001).unwrap();
    let insn = decode(word, 0, &mem).unwrap();
    assert_eq!(insn.op, Op::Double(DoubleOp::Sub));
    assert_eq!(insn.mode, AddrMode::Immediate);
    assert_eq!(insn.imm, 0x8001);
    assert_eq!(insn.width, INSTRUCTION_SIZE_WIDE);
}

#[test]
fn exit_sentinel_lives_in_the_reserved_branch_half() {
    let insn = decode_word(EXIT_INSTRUCTION).unwrap();
    assert_eq!(insn.op, Op::Branch(BranchOp::Exit));
}

// ─── Malformed encodings ─────────────────────────────────────────────────

#[rstest]
#[case::reserved_class(0x0ABC)]
#[case::reserved_condition_fourteen(0x2E00)]
#[case::reserved_condition_fifteen(0x2F42)]
#[case::reserved_branch_half(0x3800)]
#[case::near_the_sentinel(0x3FAB)]
#[case::double_mode_three(0x4000 | (3 << 5))]
#[case::single_mode_one(0x1000 | (1 << 6))]
#[case::single_mode_two(0x1000 | (2 << 6))]
fn undefined_words_are_malformed(#[case] word: u16) {
    let err = decode_word(word);
    assert!(matches!(err, Err(Fault::MalformedInstruction { .. })), "{word:#06x} decoded");
}

#[test]
fn malformed_fault_reports_the_fetch_address() {
    let err = decode(0x0ABC, 0x42, &Memory::new());
    assert_eq!(
        err,
        Err(Fault::MalformedInstruction {
            word: 0x0ABC,
            addr: 0x42
        })
    );
}

#[test]
fn split_link_pair_is_rejected_at_the_trailer() {
    let mut mem = Memory::new();
    mem.store_u16(2, 0x5001).unwrap(); // an ADD where the trailer belongs
    let err = decode(0xF123, 0, &mem);
    assert_eq!(
        err,
        Err(Fault::MalformedInstruction {
            word: 0x5001,
            addr: 2
        })
    );
}
