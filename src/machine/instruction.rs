use std::fmt::{Display, Formatter};

use crate::machine::error::Chip8Error;

fn x_register_index(opcode: u16) -> usize {
    ((opcode & 0x0F00) >> 8) as usize
}

fn y_register_index(opcode: u16) -> usize {
    ((opcode & 0x00F0) >> 4) as usize
}

fn address_nnn(opcode: u16) -> u16 {
    opcode & 0x0FFF
}

fn byte_kk(opcode: u16) -> u8 {
    (opcode & 0x00FF) as u8
}

fn nibble_n(opcode: u16) -> u8 {
    (opcode & 0x000F) as u8
}

/// One decoded CHIP-8 instruction. Register operands are always < 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Jump { nnn: u16 },
    Call { nnn: u16 },
    SkipIfEqualByte { x: usize, kk: u8 },
    SkipIfNotEqualByte { x: usize, kk: u8 },
    SkipIfEqualRegister { x: usize, y: usize },
    LoadByte { x: usize, kk: u8 },
    AddByte { x: usize, kk: u8 },
    Load { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddRegister { x: usize, y: usize },
    Sub { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubReverse { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    SkipIfNotEqualRegister { x: usize, y: usize },
    LoadIndex { nnn: u16 },
    JumpOffset { nnn: u16 },
    Random { x: usize, kk: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipIfKeyPressed { x: usize },
    SkipIfKeyNotPressed { x: usize },
    LoadDelayTimer { x: usize },
    WaitForKey { x: usize },
    SetDelayTimer { x: usize },
    SetSoundTimer { x: usize },
    AddIndex { x: usize },
    LoadFontSprite { x: usize },
    StoreBcd { x: usize },
    StoreRegisters { x: usize },
    LoadRegisters { x: usize },
}

impl Instruction {
    /// Classifies `opcode` by its high nibble, then by whatever low bits
    /// the family uses. Encodings outside the CHIP-8 set, including 0nnn
    /// machine-code calls, are `InvalidOpcode`.
    pub fn decode(opcode: u16) -> Result<Self, Chip8Error> {
        let x = x_register_index(opcode);
        let y = y_register_index(opcode);
        let kk = byte_kk(opcode);
        let nnn = address_nnn(opcode);
        let n = nibble_n(opcode);

        let instruction = match opcode & 0xF000 {
            0x0000 => match opcode {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                _ => return Err(Chip8Error::InvalidOpcode(opcode)),
            },
            0x1000 => Self::Jump { nnn },
            0x2000 => Self::Call { nnn },
            0x3000 => Self::SkipIfEqualByte { x, kk },
            0x4000 => Self::SkipIfNotEqualByte { x, kk },
            0x5000 if n == 0 => Self::SkipIfEqualRegister { x, y },
            0x6000 => Self::LoadByte { x, kk },
            0x7000 => Self::AddByte { x, kk },
            0x8000 => match n {
                0x0 => Self::Load { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::AddRegister { x, y },
                0x5 => Self::Sub { x, y },
                0x6 => Self::ShiftRight { x, y },
                0x7 => Self::SubReverse { x, y },
                0xE => Self::ShiftLeft { x, y },
                _ => return Err(Chip8Error::InvalidOpcode(opcode)),
            },
            0x9000 if n == 0 => Self::SkipIfNotEqualRegister { x, y },
            0xA000 => Self::LoadIndex { nnn },
            0xB000 => Self::JumpOffset { nnn },
            0xC000 => Self::Random { x, kk },
            0xD000 => Self::Draw { x, y, n },
            0xE000 => match kk {
                0x9E => Self::SkipIfKeyPressed { x },
                0xA1 => Self::SkipIfKeyNotPressed { x },
                _ => return Err(Chip8Error::InvalidOpcode(opcode)),
            },
            0xF000 => match kk {
                0x07 => Self::LoadDelayTimer { x },
                0x0A => Self::WaitForKey { x },
                0x15 => Self::SetDelayTimer { x },
                0x18 => Self::SetSoundTimer { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::LoadFontSprite { x },
                0x33 => Self::StoreBcd { x },
                0x55 => Self::StoreRegisters { x },
                0x65 => Self::LoadRegisters { x },
                _ => return Err(Chip8Error::InvalidOpcode(opcode)),
            },
            _ => return Err(Chip8Error::InvalidOpcode(opcode)),
        };

        Ok(instruction)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump { nnn } => write!(f, "JP 0x{nnn:03X}"),
            Self::Call { nnn } => write!(f, "CALL 0x{nnn:03X}"),
            Self::SkipIfEqualByte { x, kk } => write!(f, "SE V{x:X}, 0x{kk:02X}"),
            Self::SkipIfNotEqualByte { x, kk } => write!(f, "SNE V{x:X}, 0x{kk:02X}"),
            Self::SkipIfEqualRegister { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Self::LoadByte { x, kk } => write!(f, "LD V{x:X}, 0x{kk:02X}"),
            Self::AddByte { x, kk } => write!(f, "ADD V{x:X}, 0x{kk:02X}"),
            Self::Load { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Self::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::AddRegister { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::ShiftRight { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            Self::SubReverse { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::ShiftLeft { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            Self::SkipIfNotEqualRegister { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::LoadIndex { nnn } => write!(f, "LD I, 0x{nnn:03X}"),
            Self::JumpOffset { nnn } => write!(f, "JP V0, 0x{nnn:03X}"),
            Self::Random { x, kk } => write!(f, "RND V{x:X}, 0x{kk:02X}"),
            Self::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipIfKeyPressed { x } => write!(f, "SKP V{x:X}"),
            Self::SkipIfKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            Self::LoadDelayTimer { x } => write!(f, "LD V{x:X}, DT"),
            Self::WaitForKey { x } => write!(f, "LD V{x:X}, K"),
            Self::SetDelayTimer { x } => write!(f, "LD DT, V{x:X}"),
            Self::SetSoundTimer { x } => write!(f, "LD ST, V{x:X}"),
            Self::AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            Self::LoadFontSprite { x } => write!(f, "LD F, V{x:X}"),
            Self::StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisters { x } => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisters { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
