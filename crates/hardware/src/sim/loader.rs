//! Binary loader and system initialization.
//!
//! This module provides utilities for loading program images and setting
//! up the initial machine state. It performs:
//! 1. **Image loading:** Reads a flat binary from disk into a byte buffer.
//! 2. **System bring-up:** Zeroed memory, image copied to flash offset
//!    zero, CPU reset through the vector at the top of flash.

use std::fs;

use crate::common::error::{Fault, SimError};
use crate::core::CpuState;
use crate::mem::Memory;

/// Loads a program image from disk.
///
/// # Arguments
///
/// * `path` - Path to the flat binary file.
///
/// # Returns
///
/// The raw bytes of the file, or [`SimError::ImageLoad`] when it cannot
/// be read.
pub fn load_image(path: &str) -> Result<Vec<u8>, SimError> {
    fs::read(path).map_err(|e| SimError::ImageLoad {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the initial machine state for a program image.
///
/// Memory starts zeroed, the image lands at flash offset zero, and the
/// CPU resets through the vector stored at the top of flash.
///
/// # Arguments
///
/// * `image` - Raw bytes of the flat binary; must fit in flash.
///
/// # Returns
///
/// The reset CPU and loaded memory, or the fault that rejected the
/// image.
pub fn initialize_system(image: &[u8]) -> Result<(CpuState, Memory), Fault> {
    let mut mem = Memory::new();
    mem.load_image(image)?;

    let mut cpu = CpuState::new();
    cpu.reset(&mem)?;

    Ok((cpu, mem))
}
