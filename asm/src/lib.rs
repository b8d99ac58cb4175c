//! Two-pass assembler for the MARIE teaching machine.
//!
//! [`assemble`] turns source text into a 4096-word [`image::Image`] with its
//! identifier tables; the [`report`] module renders that into output files.

pub mod assembler;
pub mod error;
pub mod ident;
pub mod image;
pub mod report;
pub mod resolve;
pub mod scanner;
pub mod source;

pub use assembler::{assemble, Assembly};
