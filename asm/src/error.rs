use color_print::ceprintln;
use std::fmt;
use thiserror::Error;

/// 1-based line, 0-based column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L:{} C:{}", self.line, self.col)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("The current address (0x{0:X}) is greater than 0xFFF. This was likely caused by a .SetAddr that was too high, or by more than 4096 words in this program")]
    AddressCounterOverflow(u32),

    #[error("The address provided ({0}) was not between 0x000 and 0xFFF")]
    AddressOutOfRange(i64),

    #[error("Failed to find a keyword")]
    NoKeyword,

    #[error("\"{0}\" is not a valid keyword")]
    InvalidKeyword(String),

    #[error("Failed to read an argument for {0} operation. Please provide a hex address or an identifier")]
    MissingAddress(&'static str),

    #[error("Failed to read an argument for skipcond operation. Please provide either a named condition (\"lesser\", \"equal\", or \"greater\") or the raw condition value (0x000, 0x400, 0xC00 respectively)")]
    MissingCond,

    #[error("The condition provided (0x{0:X}) does not fit in the 12-bit operand field")]
    CondOutOfRange(i64),

    #[error("Unable to extract a hexadecimal number for .SetAddr")]
    MissingSetAddr,

    #[error("Identifiers must follow right after an operation on the same line. Ex: data 0d0 .Ident Foo")]
    IdentNotAfterOperation,

    #[error("Failed to find an identifier name after .Ident")]
    MissingIdentName,

    #[error("Identifier \"{0}\" was redefined")]
    Redefined(String),

    #[error("Identifier \"{0}\" was never defined")]
    Undefined(String),

    #[error("Failed to read an argument for the data directive. Please provide a number constant within 0 - 65535 (0x0 - 0xFFFF)")]
    MissingData,

    #[error("Invalid argument ({0}) for the data directive. Please provide a number constant within 0 - 65535 (0x0 - 0xFFFF)")]
    DataOutOfRange(i64),

    #[error("An instruction overlapped another instruction at 0x{0:03X}! Pay mind to your usage of .SetAddr")]
    Overlap(u16),
}

/// Error that stops the assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[Error {pos}] {kind}")]
pub struct Fatal {
    pub pos: Pos,
    pub kind: ErrorKind,
}

impl Fatal {
    pub fn new(pos: Pos, kind: ErrorKind) -> Self {
        Fatal { pos, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    #[error("A jns instruction was provided 0xFFF as a destination address. Make sure you know what your processor does when the program counter is > 0xFFF!")]
    JnsToLastAddress,

    #[error("The condition provided (0x{0:03X}) is not a known condition. Assembly continues, but this skipcond may behave unexpectedly. Known conditions are lesser (0x000), equal (0x400), or greater (0xC00)")]
    UnknownCond(u16),
}

/// Diagnostic that does not stop the assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[Warning {pos}] {kind}")]
pub struct Warning {
    pub pos: Pos,
    pub kind: WarningKind,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),

    #[error("Failed to resolve an identifier used at 0x{0:03X}")]
    UnresolvedUse(u16),

    #[error("Failed to resolve an identifier defined at 0x{0:03X}")]
    UnresolvedDef(u16),

    #[error("Word 0x{1:04X} at 0x{0:03X} has no opcode")]
    UnknownOpcode(u16, u16),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] ReportError),

    #[error("{0} encoding is not supported. Please use UTF-16 or UTF-8")]
    UnsupportedEncoding(&'static str),

    #[error("This file contains no textual content")]
    NoContent,

    #[error("This file is not valid UTF-16: odd number of bytes")]
    OddUtf16,

    #[error("This file is not valid UTF-16")]
    InvalidUtf16(#[source] std::char::DecodeUtf16Error),

    #[error("This file is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Print a diagnostic with the offending source line underneath.
fn print_diag(tag: String, msg: &dyn fmt::Display, pos: Pos, file: &str, src: &str) {
    ceprintln!("{} {}", tag, msg);
    ceprintln!("     <blue>--></> <underline>{}:{}:{}</>", file, pos.line, pos.col);
    ceprintln!("      <blue>|</>");

    let line_content = src.lines().nth(pos.line.saturating_sub(1)).unwrap_or("");
    ceprintln!(" <blue>{:>4} |</> {}", pos.line, line_content);
    ceprintln!("      <blue>|</> {}<red>^</>", " ".repeat(pos.col));
}

impl Fatal {
    pub fn print_diag(&self, file: &str, src: &str) {
        let tag = color_print::cformat!("<red,bold>[Error {}]</>", self.pos);
        print_diag(tag, &self.kind, self.pos, file, src);
    }
}

impl Warning {
    pub fn print_diag(&self, file: &str, src: &str) {
        let tag = color_print::cformat!("<yellow,bold>[Warning {}]</>", self.pos);
        print_diag(tag, &self.kind, self.pos, file, src);
    }
}

/// Print an error followed by its chain of sources.
pub fn print_error(err: &dyn std::error::Error) {
    ceprintln!("<red,bold>error</>: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        ceprintln!("  <blue>caused by</>: {}", cause);
        source = cause.source();
    }
}
