use crate::error::{Error, Result};
use crate::Input;

pub const KEY_COUNT: usize = 16;

/// Pressed state of the 16 key hex keypad.
///
/// Written by the frontend, read by the CPU through [`Input`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    key_states: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set_key(&mut self, key: u8, down: bool) -> Result<()> {
        let state = self
            .key_states
            .get_mut(key as usize)
            .ok_or(Error::InvalidKey { key })?;
        *state = down;

        Ok(())
    }

    pub fn release_all(&mut self) {
        self.key_states = [false; KEY_COUNT];
    }
}

impl Input for Keypad {
    /// Keys above 0xF are never down.
    fn is_key_down(&self, key: u8) -> bool {
        self.key_states.get(key as usize).copied().unwrap_or(false)
    }

    fn first_key_down(&self) -> Option<u8> {
        self.key_states
            .iter()
            .position(|&down| down)
            .map(|key| key as u8)
    }
}
