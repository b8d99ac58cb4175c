use crate::error::CliError;

/// Decode raw file contents into text, honouring a byte order mark.
///
/// UTF-8 is assumed when there is no mark. UTF-32 is refused.
pub fn decode(bytes: &[u8]) -> Result<String, CliError> {
    match bytes {
        [0xFF, 0xFE, 0x00, 0x00, ..] => Err(CliError::UnsupportedEncoding("Little Endian UTF-32")),
        [0x00, 0x00, 0xFE, 0xFF, ..] => Err(CliError::UnsupportedEncoding("Big Endian UTF-32")),
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => Ok(String::from_utf8(non_empty(rest)?.to_vec())?),
        _ => Ok(String::from_utf8(bytes.to_vec())?),
    }
}

fn non_empty(rest: &[u8]) -> Result<&[u8], CliError> {
    if rest.is_empty() {
        Err(CliError::NoContent)
    } else {
        Ok(rest)
    }
}

fn utf16(rest: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, CliError> {
    let rest = non_empty(rest)?;
    if rest.len() % 2 != 0 {
        return Err(CliError::OddUtf16);
    }
    let units = rest.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(CliError::InvalidUtf16)
}
