//! Flash and RAM memory model.
//!
//! This module provides the two fixed memory regions of the simulated
//! microcontroller:
//! 1. **Flash:** Persistent program storage at [`FLASH_BASE`], loaded once
//!    from a flat binary image and never erased by a power loss.
//! 2. **RAM:** Volatile data storage at [`RAM_BASE`].
//!
//! All accesses are little-endian and bounds-checked. An address outside
//! both regions raises [`Fault::InvalidMemoryAccess`]; the contract assumes
//! well-formed images, so such a fault is fatal rather than recoverable.

use crate::common::constants::{FLASH_BASE, FLASH_SIZE, RAM_BASE, RAM_SIZE};
use crate::common::error::Fault;

/// Byte-addressable memory backing both regions of the device map.
///
/// Owned by the simulator and lent to the execution units through
/// exclusive references; no access happens outside the step function.
#[derive(Debug, Clone)]
pub struct Memory {
    flash: Box<[u8]>,
    ram: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zero-filled memory map.
    pub fn new() -> Self {
        Self {
            flash: vec![0; FLASH_SIZE as usize].into_boxed_slice(),
            ram: vec![0; RAM_SIZE as usize].into_boxed_slice(),
        }
    }

    /// Copies a program image into flash starting at offset zero.
    ///
    /// # Arguments
    ///
    /// * `image` - Raw bytes of the flat binary; must fit in flash.
    ///
    /// # Returns
    ///
    /// `Err` with the first out-of-range address when the image exceeds
    /// the flash capacity.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > self.flash.len() {
            return Err(Fault::InvalidMemoryAccess {
                addr: FLASH_BASE + FLASH_SIZE,
            });
        }
        self.flash[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Resolves an address to its backing region and offset.
    fn region(&self, addr: u32) -> Result<(&[u8], usize), Fault> {
        if (FLASH_BASE..FLASH_BASE + FLASH_SIZE).contains(&addr) {
            Ok((&self.flash, (addr - FLASH_BASE) as usize))
        } else if (RAM_BASE..RAM_BASE + RAM_SIZE).contains(&addr) {
            Ok((&self.ram, (addr - RAM_BASE) as usize))
        } else {
            Err(Fault::InvalidMemoryAccess { addr })
        }
    }

    fn region_mut(&mut self, addr: u32) -> Result<(&mut [u8], usize), Fault> {
        if (FLASH_BASE..FLASH_BASE + FLASH_SIZE).contains(&addr) {
            Ok((&mut self.flash, (addr - FLASH_BASE) as usize))
        } else if (RAM_BASE..RAM_BASE + RAM_SIZE).contains(&addr) {
            Ok((&mut self.ram, (addr - RAM_BASE) as usize))
        } else {
            Err(Fault::InvalidMemoryAccess { addr })
        }
    }

    /// Reads one byte.
    pub fn load_u8(&self, addr: u32) -> Result<u8, Fault> {
        let (region, offset) = self.region(addr)?;
        Ok(region[offset])
    }

    /// Reads a little-endian 16-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the low byte; the high byte must fall in the
    ///   same region.
    pub fn load_u16(&self, addr: u32) -> Result<u16, Fault> {
        let (region, offset) = self.region(addr)?;
        let hi = offset + 1;
        if hi >= region.len() {
            return Err(Fault::InvalidMemoryAccess { addr });
        }
        Ok(u16::from_le_bytes([region[offset], region[hi]]))
    }

    /// Reads a little-endian 32-bit value.
    pub fn load_u32(&self, addr: u32) -> Result<u32, Fault> {
        let (region, offset) = self.region(addr)?;
        let end = offset + 4;
        if end > region.len() {
            return Err(Fault::InvalidMemoryAccess { addr });
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&region[offset..end]);
        Ok(u32::from_le_bytes(bytes))
    }

    /// Writes one byte.
    pub fn store_u8(&mut self, addr: u32, val: u8) -> Result<(), Fault> {
        let (region, offset) = self.region_mut(addr)?;
        region[offset] = val;
        Ok(())
    }

    /// Writes a little-endian 16-bit value.
    pub fn store_u16(&mut self, addr: u32, val: u16) -> Result<(), Fault> {
        let (region, offset) = self.region_mut(addr)?;
        let hi = offset + 1;
        if hi >= region.len() {
            return Err(Fault::InvalidMemoryAccess { addr });
        }
        region[offset..=hi].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// Writes a little-endian 32-bit value.
    pub fn store_u32(&mut self, addr: u32, val: u32) -> Result<(), Fault> {
        let (region, offset) = self.region_mut(addr)?;
        let end = offset + 4;
        if end > region.len() {
            return Err(Fault::InvalidMemoryAccess { addr });
        }
        region[offset..end].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// Reads a value at the width selected by the byte flag, zero-extended.
    ///
    /// Byte-width loads return the byte in the low bits with the upper
    /// bits clear, matching how byte operands enter the register file.
    pub fn load_operand(&self, addr: u32, byte: bool) -> Result<u32, Fault> {
        if byte {
            Ok(u32::from(self.load_u8(addr)?))
        } else {
            self.load_u32(addr)
        }
    }

    /// Writes a value at the width selected by the byte flag.
    pub fn store_operand(&mut self, addr: u32, val: u32, byte: bool) -> Result<(), Fault> {
        if byte {
            self.store_u8(addr, val as u8)
        } else {
            self.store_u32(addr, val)
        }
    }
}
