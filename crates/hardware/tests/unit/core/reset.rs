//! Power-on reset semantics.
//!
//! Reset must be fully deterministic: every register and flag cleared,
//! then the program counter loaded from the flash reset vector with the
//! fetch-offset adjustment. Every run starts here, so any field that
//! leaks through makes runs irreproducible.

use ehsim_core::common::constants::PC_FETCH_OFFSET;
use ehsim_core::core::CpuState;
use ehsim_core::core::cpu::{GPR_COUNT, GPR_LR, GPR_PC, GPR_SP};
use ehsim_core::mem::Memory;

use crate::common::{ImageBuilder, TestContext};

#[test]
fn reset_loads_the_vector_with_the_fetch_offset() {
    let ctx = TestContext::from_image(&ImageBuilder::new().reset_vector(0x0200).build());
    assert_eq!(ctx.cpu.pc(), 0x0201 + PC_FETCH_OFFSET);
}

#[test]
fn reset_clears_every_register_and_flag() {
    let mut ctx = TestContext::with_program(&[]);
    ctx.set_reg(GPR_SP, 0x4000_1000);
    ctx.set_reg(GPR_LR, 0xDEAD);
    ctx.set_reg(7, 0x1234);
    ctx.cpu.flag_c = true;
    ctx.cpu.flag_v = true;
    ctx.cpu.primask = 1;

    ctx.cpu.reset(&ctx.mem).unwrap();

    for idx in 0..GPR_COUNT - 1 {
        assert_eq!(ctx.cpu.read_gpr(idx), 0, "r{idx} survived reset");
    }
    assert!(!ctx.cpu.flag_n && !ctx.cpu.flag_z && !ctx.cpu.flag_c && !ctx.cpu.flag_v);
    assert_eq!(ctx.cpu.primask, 0);
    assert_eq!(ctx.cpu.mode, 0);
    assert_eq!(ctx.cpu.exceptmask, 0);
}

#[test]
fn reset_is_idempotent() {
    let mut ctx = TestContext::from_image(&ImageBuilder::new().reset_vector(0x80).build());
    let first = ctx.cpu.clone();
    ctx.cpu.reset(&ctx.mem).unwrap();
    assert_eq!(ctx.cpu, first);
}

#[test]
fn reset_vector_carries_the_mode_bit() {
    // A fresh (all-zero) flash image yields vector 0 and a PC without the
    // mode bit; the first step must refuse to run it.
    let mut cpu = CpuState::new();
    let mut mem = Memory::new();
    cpu.reset(&mem).unwrap();
    assert_eq!(cpu.pc() & 1, 0);
    assert!(ehsim_core::core::step(&mut cpu, &mut mem).is_err());
}

#[test]
fn reset_pc_points_the_fetch_window_at_the_entry() {
    // Entry at 0x40: the first retired instruction must be the one laid
    // down there.
    let mut ctx = TestContext::from_image(
        &ImageBuilder::new()
            .reset_vector(0x40)
            .at(0x40)
            .mov_imm(1, 0xBEEF)
            .build(),
    );
    let _ = ctx.step();
    assert_eq!(ctx.reg(1), 0xBEEF);
    assert_eq!(ctx.cpu.gpr[GPR_PC], 0x41 + PC_FETCH_OFFSET + 4);
}
