/// Operand extraction for raw 16 bit instruction words.
///
/// Nibbles that don't select the operation usually carry its operands:
/// - `[_nnn]` a 12 bit address
/// - `[__nn]` an immediate byte
/// - `[_x__]` the register VX, or the range V0..=VX
/// - `[__y_]` the register VY
/// - `[___n]` a 4 bit immediate, the sprite height for DXYN
pub trait Opcode {
    /// The leading nibble, `op & 0xF000`.
    fn family(&self) -> u16;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__nn]`
    fn nn(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u16 {
        self & 0xF000
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0xF) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0xFFF
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn test_operands() {
        let op: u16 = 0xD1A5;

        assert_eq!(op.family(), 0xD000);
        assert_eq!(op.x(), 0x1);
        assert_eq!(op.y(), 0xA);
        assert_eq!(op.n(), 0x5);
        assert_eq!(op.nn(), 0xA5);
        assert_eq!(op.nnn(), 0x1A5);
    }
}
