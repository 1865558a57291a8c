//! Instruction-set definitions and decoding.
//!
//! This module owns everything about the encoding side of the ISA:
//! 1. **Instruction Records:** The structured decoded form and the closed
//!    sets of operations, conditions, and addressing modes.
//! 2. **Decoder:** Classification by the top nibble into the three
//!    instruction shapes, with exact immediate sign extension.

/// Instruction decoder.
pub mod decode;

/// Decoded-instruction record and field definitions.
pub mod instruction;

pub use decode::decode;
pub use instruction::{AddrMode, BranchOp, Cond, DecodedInsn, DoubleOp, Op, SingleOp};
