pub mod cond;
pub mod keyword;
pub mod op;

/// Number of addressable words.
pub const MEMORY_WORDS: usize = 0x1000;
/// Highest valid address.
pub const MAX_ADDR: u16 = 0x0FFF;
