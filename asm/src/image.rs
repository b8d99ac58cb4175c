use arch::MEMORY_WORDS;

use crate::error::ErrorKind;

/// Per-word bookkeeping kept alongside the memory image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meta {
    pub occupied: bool,
    /// Operand field is an identifier still to be resolved.
    pub uses_ident: bool,
    /// An `.Ident` names this word.
    pub defines_ident: bool,
    /// Written by `data`, not by an operation.
    pub is_data: bool,
}

impl Meta {
    pub fn op() -> Self {
        Meta {
            occupied: true,
            ..Default::default()
        }
    }

    pub fn op_with_ident() -> Self {
        Meta {
            occupied: true,
            uses_ident: true,
            ..Default::default()
        }
    }

    pub fn data() -> Self {
        Meta {
            occupied: true,
            is_data: true,
            ..Default::default()
        }
    }
}

/// The full 4096-word memory of the target machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    words: Box<[u16; MEMORY_WORDS]>,
    meta: Box<[Meta; MEMORY_WORDS]>,
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Image {
    pub fn new() -> Self {
        Image {
            words: Box::new([0; MEMORY_WORDS]),
            meta: Box::new([Meta::default(); MEMORY_WORDS]),
        }
    }

    /// Store a word. An occupied slot is never overwritten.
    pub fn write(&mut self, addr: u16, value: u16, meta: Meta) -> Result<(), ErrorKind> {
        let slot = &mut self.meta[addr as usize];
        if slot.occupied {
            return Err(ErrorKind::Overlap(addr));
        }
        *slot = meta;
        self.words[addr as usize] = value;
        Ok(())
    }

    pub fn mark_defines(&mut self, addr: u16) {
        self.meta[addr as usize].defines_ident = true;
    }

    /// OR a resolved value into the operand field.
    pub fn patch(&mut self, addr: u16, value: u16) {
        self.words[addr as usize] |= value;
    }

    pub fn word(&self, addr: u16) -> u16 {
        self.words[addr as usize]
    }

    pub fn meta(&self, addr: u16) -> Meta {
        self.meta[addr as usize]
    }

    pub fn words(&self) -> &[u16] {
        &self.words[..]
    }

    /// Occupied slots in ascending address order.
    pub fn occupied(&self) -> impl Iterator<Item = (u16, u16, Meta)> + '_ {
        self.meta
            .iter()
            .enumerate()
            .filter(|(_, m)| m.occupied)
            .map(|(i, m)| (i as u16, self.words[i], *m))
    }
}
