//! Output artifacts rendered from a finished [`Assembly`].
//!
//! Every reporter only reads the assembly, so any combination may run in any
//! order.

pub mod listing;
pub mod logisim;
pub mod rawhex;
pub mod symtab;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{error::ReportError, Assembly};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    RawHex,
    Logisim,
    SymbolTable,
    Listing,
}

impl Report {
    pub fn name(self) -> &'static str {
        match self {
            Report::RawHex => "raw hex",
            Report::Logisim => "Logisim image",
            Report::SymbolTable => "symbol table",
            Report::Listing => "listing",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Report::RawHex => "hex",
            Report::Logisim => "LogisimImage",
            Report::SymbolTable => "sym",
            Report::Listing => "lst",
        }
    }

    /// `input` with its extension replaced by the one for this report.
    pub fn default_path(self, input: &Path) -> PathBuf {
        input.with_extension(self.extension())
    }

    pub fn write<W: Write>(self, asm: &Assembly, w: &mut W) -> Result<(), ReportError> {
        match self {
            Report::RawHex => rawhex::write(asm, w),
            Report::Logisim => logisim::write(asm, w),
            Report::SymbolTable => symtab::write(asm, w),
            Report::Listing => listing::write(asm, w),
        }
    }
}

/// Write and flush every report into its own sink.
///
/// A failing sink does not stop the others. The failures come back in the
/// order the sinks were given.
pub fn write_reports<W: Write>(
    asm: &Assembly,
    sinks: impl IntoIterator<Item = (Report, W)>,
) -> Vec<(Report, ReportError)> {
    sinks
        .into_iter()
        .filter_map(|(report, mut w)| {
            report
                .write(asm, &mut w)
                .and_then(|()| Ok(w.flush()?))
                .err()
                .map(|err| (report, err))
        })
        .collect()
}
