//! Condition-flag arithmetic.
//!
//! Centralized helpers for the four status flags shared by every execution
//! unit. All additive forms (including subtraction, which is addition of the
//! complemented operand with carry-in) compute carry through extended
//! precision, and overflow through the sign-change rule. Byte-width
//! operations evaluate every flag at 8 bits.

/// Operand mask for the selected width.
#[inline(always)]
pub const fn width_mask(byte: bool) -> u32 {
    if byte { 0xFF } else { 0xFFFF_FFFF }
}

/// Sign bit for the selected width.
#[inline(always)]
pub const fn sign_bit(byte: bool) -> u32 {
    if byte { 0x80 } else { 0x8000_0000 }
}

/// Zero flag: the result is zero at the operating width.
#[inline(always)]
pub const fn zero(result: u32, byte: bool) -> bool {
    result & width_mask(byte) == 0
}

/// Negative flag: the top bit of the result at the operating width.
#[inline(always)]
pub const fn negative(result: u32, byte: bool) -> bool {
    result & sign_bit(byte) != 0
}

/// Carry flag for `a + b + carry_in` computed in extended precision.
///
/// Subtractive forms pass the complemented second operand and carry-in 1
/// (or the current carry for subtract-with-borrow). Operands must already
/// be masked to the operating width.
///
/// # Arguments
///
/// * `a`        - First operand, masked to width.
/// * `b`        - Second operand (complemented for subtraction), masked to width.
/// * `carry_in` - Incoming carry.
/// * `byte`     - Evaluate at 8-bit width instead of 32.
///
/// # Returns
///
/// `true` when the sum does not fit in the operating width.
#[inline(always)]
pub const fn carry(a: u32, b: u32, carry_in: bool, byte: bool) -> bool {
    let sum = a as u64 + b as u64 + carry_in as u64;
    sum > width_mask(byte) as u64
}

/// Overflow flag by the sign-change rule.
///
/// Set when both operands share a sign that differs from the result's
/// sign. Subtractive forms pass the complemented second operand, the same
/// value used for the carry computation.
#[inline(always)]
pub const fn overflow(a: u32, b: u32, result: u32, byte: bool) -> bool {
    let sign = sign_bit(byte);
    (a & sign) == (b & sign) && (a & sign) != (result & sign)
}
