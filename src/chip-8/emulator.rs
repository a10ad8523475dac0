use log::debug;

use crate::cpu::Cpu;
use crate::display::Framebuffer;
use crate::error::Result;
use crate::input::Keypad;
use crate::quirks::Quirks;
use crate::{Audio, RandomNumberProvider};

/// A complete machine: the CPU, its keypad and the program it runs.
pub struct Emulator {
    cpu: Cpu,
    keypad: Keypad,
    current_rom: Vec<u8>,
    is_initial_state: bool,
}

impl Emulator {
    pub fn new(random_number_provider: Box<RandomNumberProvider>) -> Self {
        Self::with_quirks(Quirks::default(), random_number_provider)
    }

    pub fn with_quirks(quirks: Quirks, random_number_provider: Box<RandomNumberProvider>) -> Self {
        Self {
            cpu: Cpu::new(quirks, random_number_provider),
            keypad: Keypad::default(),
            current_rom: Vec::new(),
            is_initial_state: true,
        }
    }

    /// Replace the running program. On error the machine is left exactly as
    /// it was.
    pub fn load(&mut self, rom: Vec<u8>) -> Result<()> {
        self.cpu.load(&rom)?;
        self.keypad.release_all();
        self.current_rom = rom;
        self.is_initial_state = true;

        Ok(())
    }

    pub fn is_initial_state(&self) -> bool {
        self.is_initial_state
    }

    /// Restart the current program from a clean machine.
    pub fn reset(&mut self) -> Result<()> {
        debug!("Resetting with {} byte program", self.current_rom.len());
        self.cpu.load(&self.current_rom)?;
        self.keypad.release_all();
        self.is_initial_state = true;

        Ok(())
    }

    /// One fetch, decode, execute and timer tick.
    pub fn cycle(&mut self, audio: &mut dyn Audio) -> Result<()> {
        self.is_initial_state = false;

        self.cpu.cycle(&self.keypad, audio)
    }

    /// Execute one instruction, leaving the timers for [`Emulator::tick_timers`].
    pub fn step(&mut self) -> Result<()> {
        self.is_initial_state = false;

        self.cpu.step(&self.keypad)
    }

    pub fn tick_timers(&mut self, audio: &mut dyn Audio) {
        if self.cpu.tick_timers() {
            audio.beep();
        }
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn display(&self) -> &Framebuffer {
        self.cpu.framebuffer()
    }

    pub fn display_mut(&mut self) -> &mut Framebuffer {
        self.cpu.framebuffer_mut()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }
}

#[cfg(test)]
mod tests {
    use super::Emulator;
    use crate::error::Error;
    use crate::{Audio, Input};

    struct Silence;

    impl Audio for Silence {
        fn beep(&mut self) {}
    }

    fn emulator_with_rom(rom: Vec<u8>) -> Emulator {
        let mut emulator = Emulator::new(Box::new(|| 0));
        emulator.load(rom).unwrap();

        emulator
    }

    #[test]
    fn test_load_and_cycle() {
        let mut emulator = emulator_with_rom(vec![0x61, 0x42, 0x12, 0x02]);
        assert_eq!(emulator.is_initial_state(), true);

        emulator.cycle(&mut Silence).unwrap();

        assert_eq!(emulator.is_initial_state(), false);
        assert_eq!(emulator.cpu().registers()[1], 0x42);
        assert_eq!(emulator.cpu().pc(), 0x202);
    }

    #[test]
    fn test_load_rom_too_large_keeps_state() {
        let mut emulator = emulator_with_rom(vec![0x61, 0x42, 0x12, 0x02]);
        emulator.cycle(&mut Silence).unwrap();

        assert_eq!(
            emulator.load(vec![0xFF; 3585]),
            Err(Error::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
        assert_eq!(emulator.is_initial_state(), false);
        assert_eq!(emulator.cpu().registers()[1], 0x42);
        assert_eq!(emulator.cpu().memory().read(0x200), Ok(0x61));

        emulator.reset().unwrap();
        assert_eq!(emulator.cpu().registers()[1], 0x00);
        assert_eq!(emulator.cpu().memory().read(0x200), Ok(0x61));
    }

    #[test]
    fn test_load_replaces_program() {
        let mut emulator = emulator_with_rom(vec![0x61, 0x42, 0x12, 0x02]);
        emulator.cycle(&mut Silence).unwrap();

        emulator.load(vec![0x00, 0xE0]).unwrap();

        assert_eq!(emulator.is_initial_state(), true);
        assert_eq!(emulator.cpu().pc(), 0x200);
        assert_eq!(emulator.cpu().registers()[1], 0x00);
        assert_eq!(emulator.cpu().memory().read(0x200), Ok(0x00));
        assert_eq!(emulator.cpu().memory().read(0x201), Ok(0xE0));
        assert_eq!(emulator.cpu().memory().read(0x202), Ok(0x00));
    }

    #[test]
    fn test_reset() {
        let mut emulator = emulator_with_rom(vec![0x61, 0x42, 0xA0, 0x00, 0xD1, 0x15]);
        emulator.keypad_mut().set_key(0x4, true).unwrap();
        for _ in 0..3 {
            emulator.cycle(&mut Silence).unwrap();
        }
        assert_eq!(emulator.display().is_dirty(), true);

        emulator.reset().unwrap();

        assert_eq!(emulator.is_initial_state(), true);
        assert_eq!(emulator.cpu().pc(), 0x200);
        assert_eq!(emulator.cpu().i(), 0);
        assert_eq!(emulator.display().is_dirty(), false);
        assert!(emulator.display().pixels().iter().all(|&p| p == 0));
        assert_eq!(emulator.keypad().first_key_down(), None);
    }

    #[test]
    fn test_wait_key_through_keypad() {
        let mut emulator = emulator_with_rom(vec![0xF2, 0x0A]);

        emulator.cycle(&mut Silence).unwrap();
        emulator.cycle(&mut Silence).unwrap();
        assert_eq!(emulator.cpu().pc(), 0x200);

        emulator.keypad_mut().set_key(0x7, true).unwrap();
        emulator.cycle(&mut Silence).unwrap();
        assert_eq!(emulator.cpu().registers()[2], 0x7);
        assert_eq!(emulator.cpu().pc(), 0x202);
    }

    #[test]
    fn test_step_and_tick_timers() {
        struct Count(usize);
        impl Audio for Count {
            fn beep(&mut self) {
                self.0 += 1;
            }
        }

        // V0 = 1, sound = V0, jump to self
        let mut emulator = emulator_with_rom(vec![0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]);
        let mut audio = Count(0);

        emulator.step().unwrap();
        emulator.step().unwrap();
        emulator.step().unwrap();
        assert_eq!(emulator.cpu().sound_timer().current_value(), 1);

        emulator.tick_timers(&mut audio);
        emulator.tick_timers(&mut audio);
        assert_eq!(audio.0, 1);
    }

    #[test]
    fn test_clear_dirty() {
        let mut emulator = emulator_with_rom(vec![0x00, 0xE0]);
        emulator.cycle(&mut Silence).unwrap();
        assert_eq!(emulator.display().is_dirty(), true);

        emulator.display_mut().clear_dirty();

        assert_eq!(emulator.display().is_dirty(), false);
    }
}
