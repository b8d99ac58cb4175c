use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::IntoEnumIterator;

use crate::op::OpKind;

/// Everything that may start a statement in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Op(OpKind),
    SetAddr,
    Ident,
    Data,
}

/// What a keyword expects after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// 12-bit address literal or an identifier.
    AddrOrIdent,
    /// `lesser` / `equal` / `greater` or a raw 12-bit code.
    Cond,
    LiteralAddr,
    LiteralValue,
    Ident,
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    OpKind::iter()
        .map(Keyword::Op)
        .chain([Keyword::SetAddr, Keyword::Ident, Keyword::Data])
        .map(|kw| (kw.spelling(), kw))
        .collect()
});

impl Keyword {
    /// Exact, case-sensitive lookup of a keyword spelling.
    pub fn parse(s: &str) -> Option<Self> {
        KEYWORDS.get(s).copied()
    }

    pub fn spelling(&self) -> &'static str {
        match self {
            Keyword::Op(op) => op.mnemonic(),
            Keyword::SetAddr => ".SetAddr",
            Keyword::Ident => ".Ident",
            Keyword::Data => "data",
        }
    }

    /// Opcode placed in the top nibble; zero for directives, which never
    /// take an instruction operand class.
    pub fn opcode_bits(&self) -> u16 {
        match self {
            Keyword::Op(op) => op.to_bin(),
            _ => 0,
        }
    }

    pub fn operand(&self) -> Operand {
        use OpKind::*;
        match self {
            Keyword::Op(JNS | LOAD | STORE | ADD | SUBT | JUMP | ADDI | JUMPI | LOADI | STOREI) => {
                Operand::AddrOrIdent
            }
            Keyword::Op(INPUT | OUTPUT | HALT | CLEAR) => Operand::None,
            Keyword::Op(SKIPCOND) => Operand::Cond,
            Keyword::SetAddr => Operand::LiteralAddr,
            Keyword::Ident => Operand::Ident,
            Keyword::Data => Operand::LiteralValue,
        }
    }
}
