use std::fmt;

/// A raw 16-bit instruction word, as fetched from memory. Gives the usual
/// CHIP-8 field views without interpreting them:
///
/// ```text
///   c x y n
///   | | | `-- N   (bits 0-3)
///   | | `---- Y   (bits 4-7)     NN  = bits 0-7
///   | `------ X   (bits 8-11)    NNN = bits 0-11
///   `-------- class (bits 12-15)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn class(self) -> u8 {
        (self.0 >> 12) as u8
    }
    pub fn x(self) -> u8 {
        ((self.0 & 0x0f00) >> 8) as u8
    }
    pub fn y(self) -> u8 {
        ((self.0 & 0x00f0) >> 4) as u8
    }
    pub fn n(self) -> u8 {
        (self.0 & 0x000f) as u8
    }
    pub fn nn(self) -> u8 {
        (self.0 & 0x00ff) as u8
    }
    pub fn nnn(self) -> u16 {
        self.0 & 0x0fff
    }
}

/// The CHIP-8 instruction set. Register operands are indexes 0x0-0xf into
/// the V registers; addresses are 12 bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: call native code at NNN. Not emulated
    Sys(u16),
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(u8, u8),
    /// 4XNN
    SkipNeImm(u8, u8),
    /// 5XY0
    SkipEqReg(u8, u8),
    /// 6XNN
    LoadImm(u8, u8),
    /// 7XNN: no carry
    AddImm(u8, u8),
    /// 8XY0
    Copy(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4: VF = carry
    AddReg(u8, u8),
    /// 8XY5: VX = VX - VY, VF = not borrow
    SubReg(u8, u8),
    /// 8XY6: VF = bit shifted out
    ShiftRight(u8),
    /// 8XY7: VX = VY - VX, VF = not borrow
    SubRegReverse(u8, u8),
    /// 8XYE: VF = bit shifted out
    ShiftLeft(u8),
    /// 9XY0
    SkipNeReg(u8, u8),
    /// ANNN
    SetIndex(u16),
    /// BNNN: jump to NNN + V0
    JumpOffset(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN: VF = collision
    Draw(u8, u8, u8),
    /// EX9E
    SkipKeyDown(u8),
    /// EXA1
    SkipKeyUp(u8),
    /// FX07
    GetDelayTimer(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelayTimer(u8),
    /// FX18
    SetSoundTimer(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    LoadFontAddr(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    DumpRegisters(u8),
    /// FX65
    LoadRegisters(u8),
}

impl Instruction {
    /// Decode a word into an instruction, or `None` if the word isn't part of
    /// the instruction set.
    pub fn decode(op: Opcode) -> Option<Instruction> {
        use Instruction::*;
        let (x, y) = (op.x(), op.y());
        let instr = match op.class() {
            0x0 => match op.0 {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => Sys(op.nnn()),
            },
            0x1 => Jump(op.nnn()),
            0x2 => Call(op.nnn()),
            0x3 => SkipEqImm(x, op.nn()),
            0x4 => SkipNeImm(x, op.nn()),
            0x5 if op.n() == 0 => SkipEqReg(x, y),
            0x6 => LoadImm(x, op.nn()),
            0x7 => AddImm(x, op.nn()),
            0x8 => match op.n() {
                0x0 => Copy(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddReg(x, y),
                0x5 => SubReg(x, y),
                0x6 => ShiftRight(x),
                0x7 => SubRegReverse(x, y),
                0xe => ShiftLeft(x),
                _ => return None,
            },
            0x9 if op.n() == 0 => SkipNeReg(x, y),
            0xa => SetIndex(op.nnn()),
            0xb => JumpOffset(op.nnn()),
            0xc => Random(x, op.nn()),
            0xd => Draw(x, y, op.n()),
            0xe => match op.nn() {
                0x9e => SkipKeyDown(x),
                0xa1 => SkipKeyUp(x),
                _ => return None,
            },
            0xf => match op.nn() {
                0x07 => GetDelayTimer(x),
                0x0a => WaitKey(x),
                0x15 => SetDelayTimer(x),
                0x18 => SetSoundTimer(x),
                0x1e => AddIndex(x),
                0x29 => LoadFontAddr(x),
                0x33 => StoreBcd(x),
                0x55 => DumpRegisters(x),
                0x65 => LoadRegisters(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instr)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(a) => write!(f, "SYS 0x{:03x}", a),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP 0x{:03x}", a),
            Call(a) => write!(f, "CALL 0x{:03x}", a),
            SkipEqImm(x, nn) => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            SkipNeImm(x, nn) => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm(x, nn) => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            AddImm(x, nn) => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            Copy(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubReg(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x) => write!(f, "SHR V{:X}", x),
            SubRegReverse(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x) => write!(f, "SHL V{:X}", x),
            SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetIndex(a) => write!(f, "LD I, 0x{:03x}", a),
            JumpOffset(a) => write!(f, "JP V0, 0x{:03x}", a),
            Random(x, nn) => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyDown(x) => write!(f, "SKP V{:X}", x),
            SkipKeyUp(x) => write!(f, "SKNP V{:X}", x),
            GetDelayTimer(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelayTimer(x) => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            LoadFontAddr(x) => write!(f, "LD F, V{:X}", x),
            StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            DumpRegisters(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_fields() {
        let op = Opcode(0xd7b3);
        assert_eq!(op.class(), 0xd);
        assert_eq!(op.x(), 0x7);
        assert_eq!(op.y(), 0xb);
        assert_eq!(op.n(), 0x3);
        assert_eq!(op.nn(), 0xb3);
        assert_eq!(op.nnn(), 0x7b3);
    }

    #[test]
    fn test_decode_every_class() {
        let cases = [
            (0x0123, Sys(0x123)),
            (0x00e0, ClearScreen),
            (0x00ee, Return),
            (0x1234, Jump(0x234)),
            (0x2456, Call(0x456)),
            (0x342a, SkipEqImm(0x4, 0x2a)),
            (0x4a75, SkipNeImm(0xa, 0x75)),
            (0x5ae0, SkipEqReg(0xa, 0xe)),
            (0x63f5, LoadImm(0x3, 0xf5)),
            (0x7b12, AddImm(0xb, 0x12)),
            (0x8590, Copy(0x5, 0x9)),
            (0x8101, Or(0x1, 0x0)),
            (0x8642, And(0x6, 0x4)),
            (0x87f3, Xor(0x7, 0xf)),
            (0x8264, AddReg(0x2, 0x6)),
            (0x8c45, SubReg(0xc, 0x4)),
            (0x8106, ShiftRight(0x1)),
            (0x86d7, SubRegReverse(0x6, 0xd)),
            (0x8e0e, ShiftLeft(0xe)),
            (0x9990, SkipNeReg(0x9, 0x9)),
            (0xa568, SetIndex(0x568)),
            (0xbabc, JumpOffset(0xabc)),
            (0xc5af, Random(0x5, 0xaf)),
            (0xd7b0, Draw(0x7, 0xb, 0)),
            (0xe49e, SkipKeyDown(0x4)),
            (0xeca1, SkipKeyUp(0xc)),
            (0xf907, GetDelayTimer(0x9)),
            (0xfd0a, WaitKey(0xd)),
            (0xf315, SetDelayTimer(0x3)),
            (0xf718, SetSoundTimer(0x7)),
            (0xf91e, AddIndex(0x9)),
            (0xff29, LoadFontAddr(0xf)),
            (0xf533, StoreBcd(0x5)),
            (0xf655, DumpRegisters(0x6)),
            (0xf865, LoadRegisters(0x8)),
        ];
        for (word, instr) in cases {
            assert_eq!(Instruction::decode(Opcode(word)), Some(instr), "0x{:04x}", word);
        }
    }

    #[test]
    fn test_decode_unknown() {
        for word in [
            0x5121, 0x912f, 0x8008, 0x800f, 0xe000, 0xe09f, 0xf000, 0xf0ff, 0xf156,
        ] {
            assert_eq!(Instruction::decode(Opcode(word)), None, "0x{:04x}", word);
        }
    }

    #[test]
    fn test_disassembly() {
        assert_eq!(Jump(0x2a0).to_string(), "JP 0x2a0");
        assert_eq!(LoadImm(3, 0x1f).to_string(), "LD V3, 0x1f");
        assert_eq!(Draw(0, 1, 5).to_string(), "DRW V0, V1, 5");
        assert_eq!(DumpRegisters(0xf).to_string(), "LD [I], VF");
    }
}
