//! Disassembly listing with a reconstructed high-level reading of each
//! instruction.

use std::io::Write;

use arch::{
    cond::Cond,
    keyword::{Keyword, Operand},
    op::{OpKind, OPERAND_MASK},
};

use crate::{error::ReportError, image::Meta, Assembly};

/// Operand recovered from an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    None,
    /// Identifier name and the address it resolved to.
    Ident(&'a str, u16),
    Addr(u16),
    Cond(u16),
}

impl Target<'_> {
    fn value(&self) -> u16 {
        match self {
            Target::None => 0,
            Target::Ident(_, v) | Target::Addr(v) | Target::Cond(v) => *v,
        }
    }

    /// `X`, or the memory cell at a literal address.
    fn direct(&self) -> String {
        match self {
            Target::Ident(name, _) => name.to_string(),
            _ => format!("RAM[0x{:03X}]", self.value()),
        }
    }

    /// The cell whose address is stored at the operand.
    fn indirect(&self) -> String {
        format!("RAM[{}]", self.direct())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<'a> {
    Data(u16),
    Op { op: OpKind, target: Target<'a> },
}

/// Recover the instruction in one occupied slot.
pub fn decode(asm: &Assembly, addr: u16, word: u16, meta: Meta) -> Result<Decoded<'_>, ReportError> {
    if meta.is_data {
        return Ok(Decoded::Data(word));
    }
    let op = OpKind::from_bin(word).ok_or(ReportError::UnknownOpcode(addr, word))?;
    let operand = word & OPERAND_MASK;
    let target = match Keyword::Op(op).operand() {
        Operand::None => Target::None,
        _ if meta.uses_ident => {
            let u = asm
                .idents
                .use_at(addr)
                .ok_or(ReportError::UnresolvedUse(addr))?;
            Target::Ident(&u.name, operand)
        }
        Operand::Cond => Target::Cond(operand),
        _ => Target::Addr(operand),
    };
    Ok(Decoded::Op { op, target })
}

/// Every occupied slot in address order, decoded.
pub fn disassemble(asm: &Assembly) -> Result<Vec<(u16, Decoded<'_>)>, ReportError> {
    asm.image
        .occupied()
        .map(|(addr, word, meta)| decode(asm, addr, word, meta).map(|d| (addr, d)))
        .collect()
}

fn listing_text(asm: &Assembly, addr: u16, meta: Meta, decoded: &Decoded) -> Result<String, ReportError> {
    let mut text = match decoded {
        Decoded::Data(value) => format!("data 0x{:04X}", value),
        Decoded::Op { op, target } => {
            let operand = match target {
                Target::None => String::new(),
                Target::Ident(name, _) => format!(" {}", name),
                Target::Addr(a) => format!(" 0x{:03X}", a),
                Target::Cond(bits) => match Cond::from_bits(*bits) {
                    Some(cond) => format!(" {}", cond.name()),
                    None => format!(" 0x{:03X}", bits),
                },
            };
            format!("{}{}", op.mnemonic(), operand)
        }
    };
    if meta.defines_ident {
        let def = asm
            .idents
            .def_at(addr)
            .ok_or(ReportError::UnresolvedDef(addr))?;
        text.push_str(&format!(" {} {}", Keyword::Ident.spelling(), def.name));
    }
    Ok(text)
}

// ----------------------------------------------------------------------------
// High level reconstruction

/// Symbolic reading of the program carried from one word to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HighLevel {
    /// What the accumulator holds, as an expression.
    ac: String,
    /// The previous word was a skipcond.
    indent: bool,
}

impl Default for HighLevel {
    fn default() -> Self {
        HighLevel {
            ac: "0".to_string(),
            indent: false,
        }
    }
}

impl HighLevel {
    fn step(mut self, decoded: &Decoded) -> (Self, Vec<String>) {
        let prefix = if std::mem::take(&mut self.indent) { "    " } else { "" };
        let lines = match decoded {
            Decoded::Data(_) => vec![],
            Decoded::Op { op, target } => self.op(*op, target),
        };
        let lines = lines
            .into_iter()
            .map(|line| format!("{}{}", prefix, line))
            .collect();
        (self, lines)
    }

    fn accumulate(&mut self, sign: &str, operand: String) {
        self.ac = match (self.ac.as_str(), sign) {
            ("0", "+") => operand,
            ("0", _) => format!("-{}", operand),
            (ac, _) => format!("{} {} {}", ac, sign, operand),
        };
    }

    fn op(&mut self, op: OpKind, target: &Target) -> Vec<String> {
        use OpKind::*;
        let a = target.value();
        match op {
            JNS => match target {
                Target::Ident(name, _) => vec![
                    format!("{} = PC", name),
                    format!("Goto ({} + 0x1) // (0x{:03X} + 0x1)", name, a),
                ],
                _ => vec![
                    format!("0x{:03X} = PC", a),
                    format!("Goto (0x{:03X} + 0x1)", a),
                ],
            },
            LOAD => {
                self.ac = target.direct();
                vec![]
            }
            STORE => {
                let line = format!("{} = {}", target.direct(), self.ac);
                self.ac = target.direct();
                vec![line]
            }
            ADD => {
                self.accumulate("+", target.direct());
                vec![]
            }
            SUBT => {
                self.accumulate("-", target.direct());
                vec![]
            }
            INPUT => {
                self.ac = "Input".to_string();
                vec![]
            }
            OUTPUT => vec![format!("Output = {}", self.ac)],
            HALT => vec!["End execution".to_string()],
            SKIPCOND => {
                self.indent = true;
                let line = match Cond::from_bits(a) {
                    Some(Cond::Greater) => format!("if (({}) <= 0)", self.ac),
                    Some(Cond::Equal) => format!("if (({}) != 0)", self.ac),
                    Some(Cond::Lesser) => format!("if (({}) >= 0)", self.ac),
                    None => "Skip next if (unknown operation)".to_string(),
                };
                vec![line]
            }
            JUMP => match target {
                Target::Ident(name, _) => vec![format!("Goto {} // 0x{:03X}", name, a)],
                _ => vec![format!("Goto 0x{:03X}", a)],
            },
            CLEAR => {
                self.ac = "0".to_string();
                vec!["AC = 0".to_string()]
            }
            ADDI => {
                self.accumulate("+", target.indirect());
                vec![]
            }
            JUMPI => vec![format!("Goto {}", target.indirect())],
            LOADI => {
                self.ac = target.indirect();
                vec![]
            }
            STOREI => {
                let line = format!("{} = {}", target.indirect(), self.ac);
                self.ac = target.indirect();
                vec![line]
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Output

/// `skipcond <operand> .Ident <name>` is the widest listing text.
fn column_width(asm: &Assembly) -> usize {
    let operand = asm.idents.longest_def().max(Cond::LONGEST);
    let skipcond = Keyword::Op(OpKind::SKIPCOND).spelling().len();
    let ident = Keyword::Ident.spelling().len();
    skipcond + 1 + operand + 1 + ident + 1 + operand
}

pub fn write<W: Write>(asm: &Assembly, w: &mut W) -> Result<(), ReportError> {
    let width = column_width(asm);
    writeln!(w, "| Address | Opcode | {:<width$} | High Level Code", "Listing")?;

    asm.image.occupied().try_fold(
        (HighLevel::default(), None::<u16>),
        |(state, prev), (addr, word, meta)| -> Result<_, ReportError> {
            let gap = match prev {
                None => addr > 0,
                Some(prev) => addr > prev + 1,
            };
            if gap {
                let marker = format!("{} 0x{:03X}", Keyword::SetAddr.spelling(), addr);
                writeln!(w, "|         |        | {:<width$} |", marker)?;
            }

            let decoded = decode(asm, addr, word, meta)?;
            let text = listing_text(asm, addr, meta, &decoded)?;
            let (state, lines) = state.step(&decoded);

            let mut lines = lines.into_iter();
            let first = lines.next().unwrap_or_default();
            writeln!(w, "| 0x{:03X}   | 0x{:04X} | {:<width$} | {}", addr, word, text, first)?;
            for line in lines {
                writeln!(w, "|         |        | {:<width$} | {}", "", line)?;
            }
            Ok((state, Some(addr)))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;

    fn render(src: &str) -> Vec<String> {
        let asm = assemble(src).0.unwrap();
        let mut out = vec![];
        write(&asm, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Listing and pseudocode columns of each row.
    fn columns(src: &str) -> Vec<(String, String)> {
        render(src)
            .iter()
            .skip(1)
            .map(|row| {
                let cells: Vec<&str> = row.split(" | ").collect();
                (cells[2].trim_end().to_string(), cells.get(3).unwrap_or(&"").to_string())
            })
            .collect()
    }

    fn pseudo(src: &str) -> Vec<String> {
        columns(src).into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn header_width() {
        let rows = render("halt");
        // skipcond greater .Ident greater
        assert_eq!(rows[0], format!("| Address | Opcode | {:<31} | High Level Code", "Listing"));
    }

    #[test]
    fn rows_and_text() {
        let cols = columns("load X\nskipcond 0x123\ndata 0d7 .Ident X\ninput");
        assert_eq!(cols[0].0, "load X");
        assert_eq!(cols[1].0, "skipcond 0x123");
        assert_eq!(cols[2].0, "data 0x0007 .Ident X");
        assert_eq!(cols[3].0, "input");
        let rows = render("load 0x00A");
        assert!(rows[1].starts_with("| 0x000   | 0x100A | load 0x00A "));
    }

    #[test]
    fn gap_markers() {
        let rows = render(".SetAddr 0x010\nhalt\nhalt\n.SetAddr 0x020\nhalt");
        assert!(rows[1].starts_with("|         |        | .SetAddr 0x010 "));
        assert!(rows[2].starts_with("| 0x010   |"));
        assert!(rows[3].starts_with("| 0x011   |"));
        assert!(rows[4].starts_with("|         |        | .SetAddr 0x020 "));
        assert!(rows[5].starts_with("| 0x020   |"));
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn accumulator_carries_across_rows() {
        let src = "load A\nadd B\nsubt 0x010\nstore C\noutput\nhalt\n\
                   data 0d0 .Ident A\ndata 0d0 .Ident B\ndata 0d0 .Ident C";
        assert_eq!(
            pseudo(src)[..6],
            [
                "",
                "",
                "",
                "C = A + B - RAM[0x010]",
                "Output = C",
                "End execution",
            ]
        );
    }

    #[test]
    fn from_zero() {
        assert_eq!(pseudo("add 0x1\noutput")[1], "Output = RAM[0x001]");
        assert_eq!(pseudo("subt 0x1\noutput")[1], "Output = -RAM[0x001]");
        assert_eq!(pseudo("addi 0x1\noutput")[1], "Output = RAM[RAM[0x001]]");
        assert_eq!(pseudo("input\nclear\noutput")[1..], ["AC = 0", "Output = 0"]);
    }

    #[test]
    fn indirect() {
        let src = "loadi P\naddi Q\nstorei P\njumpi Q\n\
                   data 0d0 .Ident P\ndata 0d0 .Ident Q";
        assert_eq!(
            pseudo(src)[..4],
            ["", "", "RAM[P] = RAM[P] + RAM[Q]", "Goto RAM[Q]"]
        );
        assert_eq!(pseudo("storei 0x5")[0], "RAM[RAM[0x005]] = 0");
    }

    #[test]
    fn skipcond_indents_next_row() {
        let src = "input\nskipcond greater\njump 0x010\nskipcond equal\nhalt\nskipcond lesser\nskipcond 0x001\nhalt";
        assert_eq!(
            pseudo(src),
            [
                "",
                "if ((Input) <= 0)",
                "    Goto 0x010",
                "if ((Input) != 0)",
                "    End execution",
                "if ((Input) >= 0)",
                "    Skip next if (unknown operation)",
                "    End execution",
            ]
        );
    }

    #[test]
    fn jns_takes_two_rows() {
        let rows = render("skipcond equal\njns Sub\nhalt .Ident Sub");
        assert!(rows[2].ends_with(" |     Sub = PC"));
        assert!(rows[3].starts_with("|         |        | "));
        assert!(rows[3].ends_with(" |     Goto (Sub + 0x1) // (0x002 + 0x1)"));
        let rows = render("jns 0x00F");
        assert!(rows[1].ends_with(" | 0x00F = PC"));
        assert!(rows[2].ends_with(" | Goto (0x00F + 0x1)"));
    }

    #[test]
    fn jump_names_target() {
        assert_eq!(pseudo("jump End\nhalt .Ident End")[0], "Goto End // 0x001");
    }

    #[test]
    fn multibyte_names_align() {
        let rows = render("load Größenordnung\nhalt .Ident Größenordnung");
        let fourth_bar = |row: &str| {
            row.chars()
                .enumerate()
                .filter(|(_, c)| *c == '|')
                .nth(3)
                .map(|(i, _)| i)
        };
        assert_eq!(fourth_bar(&rows[0]), fourth_bar(&rows[1]));
        assert_eq!(fourth_bar(&rows[0]), fourth_bar(&rows[2]));
        assert!(rows[2].contains("| halt .Ident Größenordnung "));
    }

    #[test]
    fn decode_reports_missing_use() {
        let mut asm = assemble("").0.unwrap();
        asm.image.write(0, 0x1000, Meta::op_with_ident()).unwrap();
        let err = disassemble(&asm).unwrap_err();
        assert!(matches!(err, ReportError::UnresolvedUse(0)));
    }

    #[test]
    fn decode_reports_unknown_opcode() {
        let mut asm = assemble("").0.unwrap();
        asm.image.write(3, 0xF123, Meta::op()).unwrap();
        let err = disassemble(&asm).unwrap_err();
        assert!(matches!(err, ReportError::UnknownOpcode(3, 0xF123)));
    }
}
