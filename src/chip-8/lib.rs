//! A CHIP-8 virtual machine.
//!
//! [`Emulator`] owns the whole machine. A frontend feeds it key state through
//! [`Keypad`], calls [`Emulator::cycle`] at whatever rate it likes, draws the
//! [`Framebuffer`] whenever it is dirty, and plays a sound when its [`Audio`]
//! implementation is told to beep.
mod cpu;
mod display;
mod emulator;
mod error;
mod input;
mod instruction;
mod memory;
mod opcode;
mod quirks;
mod registers;
mod timer;

pub use cpu::Cpu;
pub use display::{Framebuffer, FRAME_BUFFER_PIXEL_HEIGHT, FRAME_BUFFER_PIXEL_WIDTH};
pub use emulator::Emulator;
pub use error::{Error, Result};
pub use input::Keypad;
pub use instruction::{AluOp, Instruction, KeyOp, RegisterOp};
pub use memory::{Memory, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START_ADDRESS};
pub use opcode::Opcode;
pub use quirks::{IndexOverflow, Quirks, SpriteEdges};
pub use registers::{CallStack, Registers};
pub use timer::Timer;

/// Source of the random bytes used by `CXNN`.
pub type RandomNumberProvider = dyn FnMut() -> u8;

/// A [`RandomNumberProvider`] backed by the thread local generator.
pub fn thread_rng_provider() -> Box<RandomNumberProvider> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    Box::new(move || rng.gen::<u8>())
}

pub trait Input {
    fn is_key_down(&self, key: u8) -> bool;
    fn first_key_down(&self) -> Option<u8>;
}

pub trait Audio {
    /// Called once each time the sound timer runs out.
    fn beep(&mut self);
}
