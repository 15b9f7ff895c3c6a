/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices, `nnn` a 12-bit address, `kk` an 8-bit
/// immediate and `n` a 4-bit sprite height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 0nnn, legacy machine-code call. Ignored.
    Sys(u16),
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipEqImm { x: usize, kk: u8 },
    /// 4xkk
    SkipNeImm { x: usize, kk: u8 },
    /// 5xy0. The low nibble is not checked.
    SkipEqReg { x: usize, y: usize },
    /// 6xkk
    LoadImm { x: usize, kk: u8 },
    /// 7xkk
    AddImm { x: usize, kk: u8 },
    /// 8xy0
    Move { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    Add { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6
    Shr { x: usize },
    /// 8xy7
    SubN { x: usize, y: usize },
    /// 8xyE
    Shl { x: usize },
    /// 9xy0. The low nibble is not checked.
    SkipNeReg { x: usize, y: usize },
    /// Annn
    LoadIndex(u16),
    /// Bnnn
    JumpV0(u16),
    /// Cxkk
    Rand { x: usize, kk: u8 },
    /// Dxyn
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E
    SkipKey { x: usize },
    /// ExA1
    SkipNotKey { x: usize },
    /// Fx07
    LoadDelay { x: usize },
    /// Fx0A
    WaitKey { x: usize },
    /// Fx15
    SetDelay { x: usize },
    /// Fx18
    SetSound { x: usize },
    /// Fx1E
    AddIndex { x: usize },
    /// Fx29
    Glyph { x: usize },
    /// Fx33
    Bcd { x: usize },
    /// Fx55
    StoreRegs { x: usize },
    /// Fx65
    LoadRegs { x: usize },
    /// Any opcode in the 8, E or F families that matches no instruction.
    Unknown(u16),
}

impl Instr {
    /// Decodes a big-endian opcode word. Never fails: unrecognized encodings
    /// become [`Instr::Unknown`].
    pub fn decode(opcode: u16) -> Self {
        let x = ((opcode >> 8) & 0x0F) as usize;
        let y = ((opcode >> 4) & 0x0F) as usize;
        let n = (opcode & 0x0F) as u8;
        let kk = (opcode & 0xFF) as u8;
        let nnn = opcode & 0x0FFF;

        match opcode >> 12 {
            0x0 => match opcode {
                0x00E0 => Instr::Cls,
                0x00EE => Instr::Ret,
                _ => Instr::Sys(nnn),
            },
            0x1 => Instr::Jump(nnn),
            0x2 => Instr::Call(nnn),
            0x3 => Instr::SkipEqImm { x, kk },
            0x4 => Instr::SkipNeImm { x, kk },
            0x5 => Instr::SkipEqReg { x, y },
            0x6 => Instr::LoadImm { x, kk },
            0x7 => Instr::AddImm { x, kk },
            0x8 => match n {
                0x0 => Instr::Move { x, y },
                0x1 => Instr::Or { x, y },
                0x2 => Instr::And { x, y },
                0x3 => Instr::Xor { x, y },
                0x4 => Instr::Add { x, y },
                0x5 => Instr::Sub { x, y },
                0x6 => Instr::Shr { x },
                0x7 => Instr::SubN { x, y },
                0xE => Instr::Shl { x },
                _ => Instr::Unknown(opcode),
            },
            0x9 => Instr::SkipNeReg { x, y },
            0xA => Instr::LoadIndex(nnn),
            0xB => Instr::JumpV0(nnn),
            0xC => Instr::Rand { x, kk },
            0xD => Instr::Draw { x, y, n },
            0xE => match kk {
                0x9E => Instr::SkipKey { x },
                0xA1 => Instr::SkipNotKey { x },
                _ => Instr::Unknown(opcode),
            },
            0xF => match kk {
                0x07 => Instr::LoadDelay { x },
                0x0A => Instr::WaitKey { x },
                0x15 => Instr::SetDelay { x },
                0x18 => Instr::SetSound { x },
                0x1E => Instr::AddIndex { x },
                0x29 => Instr::Glyph { x },
                0x33 => Instr::Bcd { x },
                0x55 => Instr::StoreRegs { x },
                0x65 => Instr::LoadRegs { x },
                _ => Instr::Unknown(opcode),
            },
            _ => unreachable!("opcode family is a 4-bit value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_system_family() {
        assert_eq!(Instr::decode(0x00E0), Instr::Cls);
        assert_eq!(Instr::decode(0x00EE), Instr::Ret);
        assert_eq!(Instr::decode(0x0123), Instr::Sys(0x123));
        assert_eq!(Instr::decode(0x0000), Instr::Sys(0x000));
    }

    #[test]
    fn decodes_address_fields() {
        assert_eq!(Instr::decode(0x1ABC), Instr::Jump(0xABC));
        assert_eq!(Instr::decode(0x2300), Instr::Call(0x300));
        assert_eq!(Instr::decode(0xA123), Instr::LoadIndex(0x123));
        assert_eq!(Instr::decode(0xBFFF), Instr::JumpV0(0xFFF));
    }

    #[test]
    fn decodes_register_and_immediate_fields() {
        assert_eq!(Instr::decode(0x3A42), Instr::SkipEqImm { x: 0xA, kk: 0x42 });
        assert_eq!(Instr::decode(0x7F01), Instr::AddImm { x: 0xF, kk: 0x01 });
        assert_eq!(Instr::decode(0x5120), Instr::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instr::decode(0xD125), Instr::Draw { x: 1, y: 2, n: 5 });
        assert_eq!(Instr::decode(0xC3F0), Instr::Rand { x: 3, kk: 0xF0 });
    }

    #[test]
    fn decodes_alu_family() {
        assert_eq!(Instr::decode(0x8AB0), Instr::Move { x: 0xA, y: 0xB });
        assert_eq!(Instr::decode(0x8AB4), Instr::Add { x: 0xA, y: 0xB });
        assert_eq!(Instr::decode(0x8AB6), Instr::Shr { x: 0xA });
        assert_eq!(Instr::decode(0x8ABE), Instr::Shl { x: 0xA });
        assert_eq!(Instr::decode(0x8AB8), Instr::Unknown(0x8AB8));
    }

    #[test]
    fn decodes_key_and_misc_families() {
        assert_eq!(Instr::decode(0xE39E), Instr::SkipKey { x: 3 });
        assert_eq!(Instr::decode(0xE3A1), Instr::SkipNotKey { x: 3 });
        assert_eq!(Instr::decode(0xE3FF), Instr::Unknown(0xE3FF));
        assert_eq!(Instr::decode(0xF50A), Instr::WaitKey { x: 5 });
        assert_eq!(Instr::decode(0xF533), Instr::Bcd { x: 5 });
        assert_eq!(Instr::decode(0xF599), Instr::Unknown(0xF599));
    }

    #[test]
    fn ignores_low_nibble_on_register_compares() {
        assert_eq!(Instr::decode(0x5121), Instr::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instr::decode(0x912F), Instr::SkipNeReg { x: 1, y: 2 });
    }
}
