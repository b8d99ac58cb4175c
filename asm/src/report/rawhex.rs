use std::io::Write;

use crate::{error::ReportError, Assembly};

/// All 4096 words as little-endian bytes, no framing.
pub fn write<W: Write>(asm: &Assembly, w: &mut W) -> Result<(), ReportError> {
    let bytes: Vec<u8> = asm
        .image
        .words()
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect();
    w.write_all(&bytes)?;
    Ok(())
}
