use log::debug;

use crate::error::{Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START_ADDRESS: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDRESS as usize;

const FONTSET_BASE_ADDRESS: u16 = 0x000;
const FONTSET_GLYPH_SIZE: u16 = 5;
const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Main memory holding 4KiB of data.
///
/// The first 0x200 locations are reserved for the interpreter, the built in
/// font lives at the very start of that region. Programs are loaded at 0x200.
///
#[derive(Clone)]
pub struct Memory {
    memory: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Construct a new instance of `Memory` with the font in place and
    /// everything else zeroed.
    fn new() -> Self {
        let mut memory = Self {
            memory: [0; MEMORY_SIZE],
        };
        memory.reset();

        memory
    }

    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        let base = FONTSET_BASE_ADDRESS as usize;
        self.memory[base..(base + FONTSET.len())].copy_from_slice(&FONTSET);
    }

    /// Copy a program image to 0x200.
    ///
    /// Fails without touching memory if the image doesn't fit below 0x1000.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        debug!(
            "Loading {} byte program at {:#05x}",
            rom.len(),
            PROGRAM_START_ADDRESS
        );
        self.copy_from_slice(PROGRAM_START_ADDRESS, rom)
    }

    pub fn read(&self, address: u16) -> Result<u8> {
        self.memory
            .get(address as usize)
            .copied()
            .ok_or(Error::OutOfRange {
                address: address as usize,
            })
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        let cell = self
            .memory
            .get_mut(address as usize)
            .ok_or(Error::OutOfRange {
                address: address as usize,
            })?;
        *cell = value;

        Ok(())
    }

    pub fn font_address_for_character(&self, character: u8) -> u16 {
        FONTSET_BASE_ADDRESS + (character as u16 * FONTSET_GLYPH_SIZE)
    }

    pub fn copy_from_slice(&mut self, base_address: u16, slice: &[u8]) -> Result<()> {
        let range = Self::range(base_address, slice.len())?;
        self.memory[range].copy_from_slice(slice);

        Ok(())
    }

    pub fn as_slice(&self, base_address: u16, length: u16) -> Result<&[u8]> {
        let range = Self::range(base_address, length as usize)?;

        Ok(&self.memory[range])
    }

    fn range(base_address: u16, length: usize) -> Result<std::ops::Range<usize>> {
        let start = base_address as usize;
        let end = start + length;
        if end > MEMORY_SIZE {
            return Err(Error::OutOfRange {
                address: end - 1,
            });
        }

        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.memory.len())
            .finish()
    }
}
