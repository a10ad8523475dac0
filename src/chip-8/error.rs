use thiserror::Error;

/// Everything that can stop the machine.
///
/// All of these are fatal for the running program. The core never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("ROM is too large ({size} bytes), at most {max} bytes fit in program memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("Memory access out of range at address {address:#06x}")]
    OutOfRange { address: usize },

    #[error("Pixel ({x}, {y}) is outside of the framebuffer")]
    PixelOutOfRange { x: usize, y: usize },

    #[error("Cannot fetch an instruction at {pc:#06x}")]
    InvalidFetch { pc: u16 },

    #[error("Unknown opcode {opcode:#06x} at {address:#06x}")]
    UnknownOpcode { address: u16, opcode: u16 },

    #[error("Stack overflow calling from {address:#06x}")]
    StackOverflow { address: u16 },

    #[error("Stack underflow returning from {address:#06x}")]
    StackUnderflow { address: u16 },

    #[error("Invalid key {key:#04x}, keys range from 0x0 to 0xF")]
    InvalidKey { key: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
