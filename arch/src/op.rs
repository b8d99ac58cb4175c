use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Instruction class held in the top nibble of a word.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum OpKind {
    JNS = 0x0,
    LOAD = 0x1,
    STORE = 0x2,
    ADD = 0x3,
    SUBT = 0x4,
    INPUT = 0x5,
    OUTPUT = 0x6,
    HALT = 0x7,
    SKIPCOND = 0x8,
    JUMP = 0x9,
    CLEAR = 0xA,
    ADDI = 0xB,
    JUMPI = 0xC,
    LOADI = 0xD,
    STOREI = 0xE,
}

pub const OPCODE_MASK: u16 = 0xF000;
pub const OPERAND_MASK: u16 = 0x0FFF;

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }

    /// Opcode placed in the top nibble, operand bits zero.
    pub fn to_bin(self) -> u16 {
        (u8::from(self) as u16) << 12
    }

    /// Recovers the opcode of an instruction word. `None` for nibble 0xF.
    pub fn from_bin(word: u16) -> Option<Self> {
        Self::try_from(((word & OPCODE_MASK) >> 12) as u8).ok()
    }

    pub fn mnemonic(self) -> &'static str {
        self.into()
    }
}
