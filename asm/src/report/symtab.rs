use std::io::Write;

use crate::{error::ReportError, Assembly};

const MIN_WIDTH: usize = "Identifier".len();

/// One row per definition, in definition order, listing every address that
/// uses it.
pub fn write<W: Write>(asm: &Assembly, w: &mut W) -> Result<(), ReportError> {
    let width = asm.idents.longest_def().max(MIN_WIDTH);

    writeln!(
        w,
        "| {:<width$} | Identifier's Value | Addresses that use Identifier",
        "Identifier"
    )?;
    for def in asm.idents.defs() {
        write!(
            w,
            "| {:<width$} | 0x{:<16} | ",
            def.name,
            format!("{:03X}", def.value)
        )?;
        for u in asm.idents.uses_of(&def.name) {
            write!(w, " 0x{:03X}", u.addr)?;
        }
        writeln!(w)?;
    }
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

    #[test]
    fn header_only() {
        assert_eq!(
            render("halt"),
            vec!["| Identifier | Identifier's Value | Addresses that use Identifier"]
        );
    }

    #[test]
    fn rows() {
        let src = "load Count\nadd One\nstore Count\njump Loop .Ident Loop\nhalt\ndata 0d0 .Ident Count\ndata 0d1 .Ident One";
        let rows = render(src);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], "| Loop       | 0x003              |  0x003");
        assert_eq!(rows[2], "| Count      | 0x005              |  0x000 0x002");
        assert_eq!(rows[3], "| One        | 0x006              |  0x001");
    }

    #[test]
    fn pads_to_longest_name_in_chars() {
        let rows = render("halt .Ident Überschreitung\nhalt .Ident x");
        assert!(rows[0].starts_with("| Identifier     | "));
        assert!(rows[1].starts_with("| Überschreitung | 0x000 "));
        assert!(rows[2].starts_with("| x              | 0x001 "));
    }
}
