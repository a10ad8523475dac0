use log::{debug, trace};

use crate::display::Framebuffer;
use crate::error::{Error, Result};
use crate::instruction::{AluOp, Instruction, KeyOp, RegisterOp};
use crate::memory::{Memory, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START_ADDRESS};
use crate::quirks::{IndexOverflow, Quirks};
use crate::registers::{CallStack, Registers};
use crate::timer::Timer;
use crate::{Audio, Input, RandomNumberProvider};

/// Addresses formed from the index register are 12 bits wide.
const ADDRESS_MASK: u16 = 0x0FFF;

pub struct Cpu {
    // Registers
    v: Registers,
    i: u16,

    // Program Counter
    pc: u16,

    stack: CallStack,

    memory: Memory,
    framebuffer: Framebuffer,

    delay_timer: Timer,
    sound_timer: Timer,

    quirks: Quirks,
    random_number_provider: Box<RandomNumberProvider>,
}

impl Cpu {
    pub fn new(quirks: Quirks, random_number_provider: Box<RandomNumberProvider>) -> Self {
        Self {
            v: Registers::default(),
            i: 0,
            // Program Counter starts at 0x200
            pc: PROGRAM_START_ADDRESS,

            stack: CallStack::default(),

            memory: Memory::default(),
            framebuffer: Framebuffer::default(),

            delay_timer: Timer::default(),
            sound_timer: Timer::default(),

            quirks,
            random_number_provider,
        }
    }

    /// Put every register, the memory, the screen and the timers back in their
    /// power on state. Quirks and the random source are kept.
    pub fn reset(&mut self) {
        self.v = Registers::default();
        self.i = 0;
        self.pc = PROGRAM_START_ADDRESS;
        self.stack = CallStack::default();
        self.memory.reset();
        self.framebuffer = Framebuffer::default();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
    }

    /// Reset and load a program image at 0x200.
    ///
    /// An image that doesn't fit is rejected before anything is reset.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        self.reset();
        self.memory.load(rom)
    }

    /// Run one full cycle: fetch, decode, execute and tick both timers.
    ///
    /// `audio` is told to beep when the sound timer runs out.
    pub fn cycle(&mut self, input: &dyn Input, audio: &mut dyn Audio) -> Result<()> {
        self.step(input)?;
        if self.tick_timers() {
            audio.beep();
        }

        Ok(())
    }

    /// Fetch, decode and execute a single instruction without touching the
    /// timers. On error the program counter still points at the faulting
    /// instruction.
    pub fn step(&mut self, input: &dyn Input) -> Result<()> {
        let address = self.pc;
        let opcode = self.fetch()?;
        let instruction =
            Instruction::decode(opcode).ok_or(Error::UnknownOpcode { address, opcode })?;

        trace!("{:04x}: {:04x} {:?}", address, opcode, instruction);
        self.pc = self.execute(instruction, address, input)?;

        Ok(())
    }

    /// Count both timers down once. Returns `true` if the sound timer just
    /// ran out.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer.tick();
        let beep = self.sound_timer.tick();
        if beep {
            debug!("Sound timer expired");
        }

        beep
    }

    fn fetch(&self) -> Result<u16> {
        if self.pc as usize + 1 >= MEMORY_SIZE {
            return Err(Error::InvalidFetch { pc: self.pc });
        }

        let high = self.memory.read(self.pc)?;
        let low = self.memory.read(self.pc + 1)?;

        Ok((high as u16) << 8 | low as u16)
    }

    /// Execute `instruction`, fetched from `address`, and return the new
    /// program counter.
    fn execute(
        &mut self,
        instruction: Instruction,
        address: u16,
        input: &dyn Input,
    ) -> Result<u16> {
        let next_pc = address + 2;
        let skip_pc = next_pc + 2;
        let skip_if = |condition: bool| if condition { skip_pc } else { next_pc };

        let pc = match instruction {
            // 00E0: Clear screen
            Instruction::ClearScreen => {
                self.framebuffer.cls();

                next_pc
            }

            // 00EE: Return from subroutine
            Instruction::Return => self.stack.pop(address)?,

            // 1NNN: Jump to address NNN
            Instruction::Jump { address: target } => target,

            // 2NNN: Call NNN
            Instruction::Call { address: target } => {
                self.stack.push(next_pc, address)?;

                target
            }

            // 3XNN: Skip next instruction if VX is equal to NN.
            Instruction::SkipIfEqual { x, value } => skip_if(self.v[x] == value),

            // 4XNN: Skip next instruction if VX is not equal to NN.
            Instruction::SkipIfNotEqual { x, value } => skip_if(self.v[x] != value),

            // 5XY0: Skip next instruction if VX is equal to VY.
            Instruction::SkipIfRegistersEqual { x, y } => skip_if(self.v[x] == self.v[y]),

            // 6XNN: Set VX to NN.
            Instruction::Load { x, value } => {
                self.v[x] = value;

                next_pc
            }

            // 7XNN: Add NN to VX, carry flag is not changed.
            Instruction::Add { x, value } => {
                self.v[x] = self.v[x].wrapping_add(value);

                next_pc
            }

            Instruction::Alu { x, y, op } => {
                self.execute_alu(x, y, op);

                next_pc
            }

            // 9XY0: Skip the next instruction if VX is not equal VY
            Instruction::SkipIfRegistersNotEqual { x, y } => skip_if(self.v[x] != self.v[y]),

            // ANNN: Set `I` to address NNN
            Instruction::LoadIndex { address: target } => {
                self.i = target;

                next_pc
            }

            // BNNN: Jump to the address NNN + V0
            Instruction::JumpOffset { address: target } => target + self.v[0] as u16,

            // CXNN: Set the VX to the result of rand() & NN.
            Instruction::Random { x, mask } => {
                let random: u8 = (self.random_number_provider)();
                self.v[x] = random & mask;

                next_pc
            }

            // DXYN: Draw a sprite at VX, VY of width 8 and height N.
            Instruction::Draw { x, y, height } => {
                let sprite = (0..height as u16)
                    .map(|row| self.memory.read(self.indexed(row)))
                    .collect::<Result<Vec<u8>>>()?;
                let collided = self.framebuffer.draw_sprite(
                    self.v[x],
                    self.v[y],
                    &sprite,
                    self.quirks.sprite_edges,
                );
                self.v.set_flag(collided);

                next_pc
            }

            Instruction::Key { x, op } => {
                let is_down = input.is_key_down(self.v[x]);

                match op {
                    // EX9E: Skip the next instruction if the key stored in VX is pressed
                    KeyOp::SkipIfDown => skip_if(is_down),
                    // EXA1: Skip the next instruction if the key stored in VX isn't pressed
                    KeyOp::SkipIfUp => skip_if(!is_down),
                }
            }

            Instruction::Register { x, op } => {
                let blocked = self.execute_register(x, op, input)?;

                if blocked {
                    address
                } else {
                    next_pc
                }
            }
        };

        Ok(pc)
    }

    fn execute_alu(&mut self, x: u8, y: u8, op: AluOp) {
        let vx = self.v[x];
        let vy = self.v[y];

        match op {
            // 8XY0: Set VX to the value of VY.
            AluOp::Assign => self.v[x] = vy,

            // 8XY1: Set VX to the result of VX | VY
            AluOp::Or => self.v[x] = vx | vy,

            // 8XY2: Set VX to the result of VX & VY
            AluOp::And => self.v[x] = vx & vy,

            // 8XY3: Set VX to the result of VX ^ VY
            AluOp::Xor => self.v[x] = vx ^ vy,

            // 8XY4: Add VY to VX. VF is set to 1 if there is a carry, 0 if not.
            AluOp::Add => {
                let (result, carry) = vx.overflowing_add(vy);
                self.v[x] = result;
                self.v.set_flag(carry);
            }

            // 8XY5: Subtract VY from VX. VF is set to 0 if there is a borrow, 1 if not.
            AluOp::Sub => {
                let (result, borrow) = vx.overflowing_sub(vy);
                self.v[x] = result;
                self.v.set_flag(!borrow);
            }

            // 8XY6: Store the least significant bit of VX in VF and then shift VX to the
            // right by 1.
            AluOp::ShiftRight => {
                self.v[x] = vx >> 1;
                self.v.set_flag(vx & 0x1 == 1);
            }

            // 8XY7: Set VX to the result of VY - VX. VF is set 0 when there is a borrow, 1
            // if not.
            AluOp::SubReversed => {
                let (result, borrow) = vy.overflowing_sub(vx);
                self.v[x] = result;
                self.v.set_flag(!borrow);
            }

            // 8XYE: Store the most significant bit of VX in VF and then shift VX to the
            // left by 1.
            AluOp::ShiftLeft => {
                self.v[x] = vx << 1;
                self.v.set_flag(vx & 0x80 != 0);
            }
        }
    }

    /// Returns `true` when the instruction has to run again next cycle.
    fn execute_register(&mut self, x: u8, op: RegisterOp, input: &dyn Input) -> Result<bool> {
        match op {
            // FX07: Set the VX value to the value of the delay timer
            RegisterOp::LoadDelay => self.v[x] = self.delay_timer.current_value(),

            // FX0A: Block execution until a key is pressed. Pressed key is stored in VX.
            RegisterOp::WaitKey => match input.first_key_down() {
                Some(key) => self.v[x] = key,
                None => return Ok(true),
            },

            // FX15: Set the delay timer to the value of VX
            RegisterOp::SetDelay => self.delay_timer.set_value(self.v[x]),

            // FX18: Set the sound timer to the value of VX
            RegisterOp::SetSound => self.sound_timer.set_value(self.v[x]),

            // FX1E: Add VX to I
            RegisterOp::AddIndex => {
                let value = self.v[x] as u16;
                let sum = self.i as u32 + value as u32;
                self.i = self.i.wrapping_add(value);

                match self.quirks.index_overflow {
                    IndexOverflow::Byte => self.v.set_flag(sum > 0xFF),
                    IndexOverflow::Address => self.v.set_flag(sum > ADDRESS_MASK as u32),
                    IndexOverflow::Unflagged => {}
                }
            }

            // FX29: Set I to the location of the sprite for the character in VX.
            RegisterOp::LoadFont => {
                self.i = self.memory.font_address_for_character(self.v[x]);
            }

            // FX33: Store BCD representation of VX in memory locations I, I+1, and I+2.
            RegisterOp::StoreBcd => {
                let value = self.v[x];
                let digits = [value / 100, (value / 10) % 10, value % 10];

                for (offset, &digit) in digits.iter().enumerate() {
                    let address = self.indexed(offset as u16);
                    self.memory.write(address, digit)?;
                }
            }

            // FX55: Store registers V0 through VX in memory starting at I.
            RegisterOp::StoreRegisters => {
                for register in 0..=x {
                    let address = self.indexed(register as u16);
                    self.memory.write(address, self.v[register])?;
                }
            }

            // FX65: Read into register V0 through VX starting at I.
            RegisterOp::LoadRegisters => {
                for register in 0..=x {
                    let address = self.indexed(register as u16);
                    self.v[register] = self.memory.read(address)?;
                }
            }
        }

        Ok(false)
    }

    fn indexed(&self, offset: u16) -> u16 {
        self.i.wrapping_add(offset) & ADDRESS_MASK
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &Registers {
        &self.v
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn delay_timer(&self) -> &Timer {
        &self.delay_timer
    }

    pub fn sound_timer(&self) -> &Timer {
        &self.sound_timer
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}
