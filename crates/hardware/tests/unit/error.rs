//! Fault and simulation-error formatting.
//!
//! The diagnostics carry the offending address or word; these pin the
//! rendered forms a user sees when a run dies.

use ehsim_core::common::{Fault, SimError};

#[test]
fn malformed_instruction_reports_word_and_address() {
    let fault = Fault::MalformedInstruction {
        word: 0x0ABC,
        addr: 0x10,
    };
    assert_eq!(
        fault.to_string(),
        "malformed instruction 0x0abc at 0x00000010"
    );
}

#[test]
fn interworking_fault_reports_the_target() {
    let fault = Fault::UnsupportedInterworking { target: 0x4000_0000 };
    assert_eq!(fault.to_string(), "unsupported interworking to 0x40000000");
}

#[test]
fn mode_violation_reports_the_program_counter() {
    let fault = Fault::ModeViolation { pc: 0x44 };
    assert_eq!(
        fault.to_string(),
        "program counter 0x00000044 lost the execution-mode bit"
    );
}

#[test]
fn memory_fault_reports_the_address() {
    let fault = Fault::InvalidMemoryAccess { addr: 0x2000_0000 };
    assert_eq!(
        fault.to_string(),
        "memory access outside mapped regions at 0x20000000"
    );
}

#[test]
fn no_forward_progress_reports_the_streak() {
    let err = SimError::NoForwardProgress { periods: 5 };
    assert_eq!(
        err.to_string(),
        "no forward progress after 5 consecutive active periods without a backup"
    );
}

#[test]
fn load_errors_carry_the_path() {
    let err = SimError::ImageLoad {
        path: "missing.bin".into(),
        reason: "gone".into(),
    };
    assert!(err.to_string().contains("`missing.bin`"));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn cpu_faults_convert_into_run_errors() {
    let fault = Fault::ModeViolation { pc: 0x2 };
    let err = SimError::from(fault);
    // Transparent wrapping: the run-level error reads as the fault itself.
    assert_eq!(err.to_string(), fault.to_string());
    assert!(matches!(err, SimError::Fault(f) if f == fault));
}
