use crate::opcode::Opcode;

/// Register to register operations of the 8XYN family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    /// 8XY0: VX = VY
    Assign,
    /// 8XY1: VX |= VY
    Or,
    /// 8XY2: VX &= VY
    And,
    /// 8XY3: VX ^= VY
    Xor,
    /// 8XY4: VX += VY, VF = carry
    Add,
    /// 8XY5: VX -= VY, VF = not borrow
    Sub,
    /// 8XY6: VF = lsb, VX >>= 1
    ShiftRight,
    /// 8XY7: VX = VY - VX, VF = not borrow
    SubReversed,
    /// 8XYE: VF = msb, VX <<= 1
    ShiftLeft,
}

/// Keypad skips of the EX family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    /// EX9E
    SkipIfDown,
    /// EXA1
    SkipIfUp,
}

/// Timer, index and memory operations of the FX family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    /// FX07: VX = delay timer
    LoadDelay,
    /// FX0A: wait for a key, store it in VX
    WaitKey,
    /// FX15: delay timer = VX
    SetDelay,
    /// FX18: sound timer = VX
    SetSound,
    /// FX1E: I += VX
    AddIndex,
    /// FX29: I = font glyph for VX
    LoadFont,
    /// FX33: BCD of VX at I..I+2
    StoreBcd,
    /// FX55: V0..=VX to memory at I
    StoreRegisters,
    /// FX65: memory at I to V0..=VX
    LoadRegisters,
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { address: u16 },
    /// 2NNN
    Call { address: u16 },
    /// 3XNN
    SkipIfEqual { x: u8, value: u8 },
    /// 4XNN
    SkipIfNotEqual { x: u8, value: u8 },
    /// 5XY0
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6XNN
    Load { x: u8, value: u8 },
    /// 7XNN
    Add { x: u8, value: u8 },
    /// 8XYN
    Alu { x: u8, y: u8, op: AluOp },
    /// 9XY0
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// ANNN
    LoadIndex { address: u16 },
    /// BNNN
    JumpOffset { address: u16 },
    /// CXNN
    Random { x: u8, mask: u8 },
    /// DXYN
    Draw { x: u8, y: u8, height: u8 },
    /// EX9E, EXA1
    Key { x: u8, op: KeyOp },
    /// FXNN
    Register { x: u8, op: RegisterOp },
}

impl Instruction {
    /// Decode a raw opcode. Returns `None` for words that aren't instructions.
    ///
    /// Dispatch is on the leading nibble. The 0, E and F families are further
    /// told apart by `op & 0xF0FF` and the 8 family by `op & 0xF00F`. The 5
    /// and 9 families ignore their low nibble.
    pub fn decode(opcode: u16) -> Option<Instruction> {
        let x = opcode.x();
        let y = opcode.y();

        let instruction = match opcode.family() {
            0x0000 => match opcode & 0xF0FF {
                0x00E0 => Instruction::ClearScreen,
                0x00EE => Instruction::Return,
                _ => return None,
            },
            0x1000 => Instruction::Jump {
                address: opcode.nnn(),
            },
            0x2000 => Instruction::Call {
                address: opcode.nnn(),
            },
            0x3000 => Instruction::SkipIfEqual {
                x,
                value: opcode.nn(),
            },
            0x4000 => Instruction::SkipIfNotEqual {
                x,
                value: opcode.nn(),
            },
            0x5000 => Instruction::SkipIfRegistersEqual { x, y },
            0x6000 => Instruction::Load {
                x,
                value: opcode.nn(),
            },
            0x7000 => Instruction::Add {
                x,
                value: opcode.nn(),
            },
            0x8000 => {
                let op = match opcode & 0xF00F {
                    0x8000 => AluOp::Assign,
                    0x8001 => AluOp::Or,
                    0x8002 => AluOp::And,
                    0x8003 => AluOp::Xor,
                    0x8004 => AluOp::Add,
                    0x8005 => AluOp::Sub,
                    0x8006 => AluOp::ShiftRight,
                    0x8007 => AluOp::SubReversed,
                    0x800E => AluOp::ShiftLeft,
                    _ => return None,
                };

                Instruction::Alu { x, y, op }
            }
            0x9000 => Instruction::SkipIfRegistersNotEqual { x, y },
            0xA000 => Instruction::LoadIndex {
                address: opcode.nnn(),
            },
            0xB000 => Instruction::JumpOffset {
                address: opcode.nnn(),
            },
            0xC000 => Instruction::Random {
                x,
                mask: opcode.nn(),
            },
            0xD000 => Instruction::Draw {
                x,
                y,
                height: opcode.n(),
            },
            0xE000 => {
                let op = match opcode & 0xF0FF {
                    0xE09E => KeyOp::SkipIfDown,
                    0xE0A1 => KeyOp::SkipIfUp,
                    _ => return None,
                };

                Instruction::Key { x, op }
            }
            0xF000 => {
                let op = match opcode & 0xF0FF {
                    0xF007 => RegisterOp::LoadDelay,
                    0xF00A => RegisterOp::WaitKey,
                    0xF015 => RegisterOp::SetDelay,
                    0xF018 => RegisterOp::SetSound,
                    0xF01E => RegisterOp::AddIndex,
                    0xF029 => RegisterOp::LoadFont,
                    0xF033 => RegisterOp::StoreBcd,
                    0xF055 => RegisterOp::StoreRegisters,
                    0xF065 => RegisterOp::LoadRegisters,
                    _ => return None,
                };

                Instruction::Register { x, op }
            }
            _ => unreachable!("family is masked to the leading nibble"),
        };

        Some(instruction)
    }
}
