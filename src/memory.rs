use log::debug;

use crate::constants::{
    FONT, FONT_ADDR, FONT_GLYPH_SIZE, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START,
};
use crate::error::{Error, Result};
use crate::opcode;

// NB. addresses are u16 as per the machine; lengths are usize to stop endless casting

/// # Memory
/// 4096 bytes of addressable memory.
///
/// ```text
///   0x000-0x04f  unused
///   0x050-0x09f  font glyphs 0..F
///   0x0a0-0x1ff  unused
///   0x200-0xfff  program
/// ```
///
/// Every access is bounds-checked; reaching past the end of memory is an
/// `AddressOutOfRange` rather than a panic.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font installed
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_ADDR as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    /// Copies a program image to `PROGRAM_START`.
    ///
    /// Images that don't fit are rejected outright rather than truncated.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.slice_mut(PROGRAM_START, program.len())?
            .copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), PROGRAM_START);
        Ok(())
    }

    pub fn byte(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::AddressOutOfRange(addr as usize))
    }

    pub fn set_byte(&mut self, addr: u16, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Error::AddressOutOfRange(addr as usize))?;
        *byte = value;
        Ok(())
    }

    /// Two consecutive bytes, high byte at the lower address
    pub fn word(&self, addr: u16) -> Result<u16> {
        let word = self.slice(addr, 2)?;
        Ok(opcode::from_bytes(word[0], word[1]))
    }

    /// A read-only view of `len` bytes starting at `addr`
    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        self.bytes
            .get(start..start + len)
            .ok_or(Error::AddressOutOfRange(start + len - 1))
    }

    /// A writable view of `len` bytes starting at `addr`
    pub fn slice_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let start = addr as usize;
        self.bytes
            .get_mut(start..start + len)
            .ok_or(Error::AddressOutOfRange(start + len - 1))
    }

    /// The installed font glyphs
    pub fn font(&self) -> &[u8] {
        let font = FONT_ADDR as usize;
        &self.bytes[font..font + FONT.len()]
    }

    /// Everything from `PROGRAM_START` to the end of memory
    pub fn program(&self) -> &[u8] {
        &self.bytes[PROGRAM_START as usize..]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// The address of the glyph for the low nibble of `digit`
pub fn glyph_addr(digit: u8) -> u16 {
    FONT_ADDR + u16::from(digit & 0xF) * FONT_GLYPH_SIZE as u16
}
