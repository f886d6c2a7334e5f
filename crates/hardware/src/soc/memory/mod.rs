//! Memory behind the OBI ports.
//!
//! This module implements the single memory region both the instruction
//! and the data port of the subsystem reach. It provides:
//! 1. **Storage:** A little-endian byte array mapped at a base address.
//! 2. **Access:** Aligned word reads and byte-enabled word writes, faulting outside the region.
//! 3. **Loading:** Bulk copy of a program image or data initializer.

use crate::common::error::SimError;

/// Memory region mapped at `base`.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Backing bytes, little-endian.
    bytes: Vec<u8>,
    /// The address where this memory is mapped.
    base: u32,
}

impl Memory {
    /// Creates `size` bytes of zeroed memory at `base`.
    ///
    /// # Arguments
    ///
    /// * `base` - Starting address.
    /// * `size` - Size in bytes.
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            base,
        }
    }

    /// Base address.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// True if the `len` bytes starting at `addr` are mapped.
    pub fn contains(&self, addr: u32, len: usize) -> bool {
        self.offset(addr, len).is_some()
    }

    fn offset(&self, addr: u32, len: usize) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        (offset.checked_add(len)? <= self.bytes.len()).then_some(offset)
    }

    fn word_offset(&self, addr: u32) -> Result<usize, SimError> {
        if addr % 4 != 0 {
            return Err(SimError::BusFault {
                addr,
                reason: "misaligned word access",
            });
        }
        self.offset(addr, 4).ok_or(SimError::BusFault {
            addr,
            reason: "address outside memory",
        })
    }

    /// Reads the aligned word at `addr`.
    ///
    /// # Errors
    ///
    /// `BusFault` if `addr` is misaligned or unmapped.
    pub fn read_word(&self, addr: u32) -> Result<u32, SimError> {
        let offset = self.word_offset(addr)?;
        let mut word = [0; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        Ok(u32::from_le_bytes(word))
    }

    /// Writes the bytes of `data` selected by `be` to the aligned word at `addr`.
    ///
    /// # Errors
    ///
    /// `BusFault` if `addr` is misaligned or unmapped.
    pub fn write_word(&mut self, addr: u32, data: u32, be: u8) -> Result<(), SimError> {
        let offset = self.word_offset(addr)?;
        for (lane, byte) in data.to_le_bytes().into_iter().enumerate() {
            if be & (1 << lane) != 0 {
                self.bytes[offset + lane] = byte;
            }
        }
        Ok(())
    }

    /// Copies `data` into memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// `BusFault` if any byte falls outside the region.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<(), SimError> {
        let offset = self.offset(addr, data.len()).ok_or(SimError::BusFault {
            addr,
            reason: "image does not fit in memory",
        })?;
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}
