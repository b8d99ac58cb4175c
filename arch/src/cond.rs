use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Operand of `skipcond`, already shifted into the operand field.
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
#[repr(u16)]
pub enum Cond {
    Lesser = 0x000,
    Equal = 0x400,
    Greater = 0xC00,
}

impl Cond {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown condition: {s}")),
        }
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        Self::try_from(bits).ok()
    }

    pub fn bits(self) -> u16 {
        self.into()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Longest condition spelling, used for listing column widths.
    pub const LONGEST: usize = "greater".len();
}
