use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;
pub const STACK_SIZE: usize = 16;

/// The general purpose registers V0 through VF.
///
/// VF doubles as the carry, borrow and collision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Registers {
    pub fn as_slice_through(&self, idx: u8) -> &[u8] {
        &self.0[0..=(idx as usize & 0xF)]
    }

    pub fn copy_from_slice(&mut self, slice: &[u8]) {
        let len = slice.len().min(REGISTER_COUNT);
        self.0[0..len].copy_from_slice(&slice[0..len])
    }

    pub fn set_flag(&mut self, flag: bool) {
        self[FLAG_REGISTER] = flag as u8;
    }

    pub fn flag(&self) -> u8 {
        self[FLAG_REGISTER]
    }
}

impl Index<u8> for Registers {
    type Output = u8;

    fn index(&self, register: u8) -> &Self::Output {
        &self.0[(register & 0xF) as usize]
    }
}

impl IndexMut<u8> for Registers {
    fn index_mut(&mut self, register: u8) -> &mut Self::Output {
        &mut self.0[(register & 0xF) as usize]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self([0; REGISTER_COUNT])
    }
}

/// Return addresses for subroutine calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStack {
    stack: [u16; STACK_SIZE],
    sp: usize,
}

impl CallStack {
    /// Push a return address. `address` is where the call instruction lives
    /// and is only used for error reporting.
    pub fn push(&mut self, return_address: u16, address: u16) -> Result<()> {
        if self.sp >= STACK_SIZE {
            return Err(Error::StackOverflow { address });
        }
        self.stack[self.sp] = return_address;
        self.sp += 1;

        Ok(())
    }

    pub fn pop(&mut self, address: u16) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow { address });
        }
        self.sp -= 1;

        Ok(self.stack[self.sp])
    }

    pub fn stack_pointer(&self) -> usize {
        self.sp
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.stack[..self.sp]
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self {
            stack: [0; STACK_SIZE],
            sp: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallStack, Registers, STACK_SIZE};
    use crate::error::Error;

    #[test]
    fn test_registers_slice_through() {
        let mut v = Registers::default();
        v.copy_from_slice(&[1, 2, 3, 4, 5]);

        assert_eq!(v.as_slice_through(3), &[1, 2, 3, 4]);
        assert_eq!(v.as_slice_through(0xF).len(), 16);
        assert_eq!(v[4], 5);
        assert_eq!(v[5], 0);
    }

    #[test]
    fn test_flag() {
        let mut v = Registers::default();

        v.set_flag(true);
        assert_eq!(v.flag(), 1);
        assert_eq!(v[0xF], 1);

        v.set_flag(false);
        assert_eq!(v.flag(), 0);
    }

    #[test]
    fn test_stack_push_pop() {
        let mut stack = CallStack::default();

        stack.push(0x202, 0x200).unwrap();
        stack.push(0x302, 0x300).unwrap();
        assert_eq!(stack.stack_pointer(), 2);
        assert_eq!(stack.as_slice(), &[0x202, 0x302]);

        assert_eq!(stack.pop(0x400), Ok(0x302));
        assert_eq!(stack.pop(0x304), Ok(0x202));
        assert_eq!(stack.stack_pointer(), 0);
    }

    #[test]
    fn test_stack_underflow() {
        let mut stack = CallStack::default();

        assert_eq!(
            stack.pop(0x200),
            Err(Error::StackUnderflow { address: 0x200 })
        );
    }

    #[test]
    fn test_stack_overflow() {
        let mut stack = CallStack::default();
        for i in 0..STACK_SIZE {
            stack.push(i as u16, 0x200).unwrap();
        }

        assert_eq!(
            stack.push(0x222, 0x220),
            Err(Error::StackOverflow { address: 0x220 })
        );
        assert_eq!(stack.stack_pointer(), STACK_SIZE);
        assert_eq!(stack.pop(0x200), Ok(15));
    }
}
