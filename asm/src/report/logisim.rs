use std::io::Write;

use crate::{error::ReportError, Assembly};

/// Logisim ROM image: a `v2.0 raw` header, then one run-length group of
/// equal words per line.
pub fn write<W: Write>(asm: &Assembly, w: &mut W) -> Result<(), ReportError> {
    write!(w, "v2.0 raw\r\n")?;
    for run in asm.image.words().chunk_by(|a, b| a == b) {
        match run.len() {
            1 => writeln!(w, "{:X}", run[0])?,
            n => writeln!(w, "{}*{:X}", n, run[0])?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;

    fn render(src: &str) -> String {
        let asm = assemble(src).0.unwrap();
        let mut out = vec![];
        write(&asm, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_program() {
        assert_eq!(render(""), "v2.0 raw\r\n4096*0\n");
    }

    #[test]
    fn runs_cross_occupied_boundary() {
        let src = "load 0d5\nclear\nclear\ndata 0d0\n.SetAddr 0xFFF\nhalt";
        assert_eq!(
            render(src),
            "v2.0 raw\r\n1005\n2*A000\n4092*0\n7000\n"
        );
    }
}
