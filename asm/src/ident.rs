use indexmap::IndexMap;

use crate::{
    error::{ErrorKind, Pos},
    scanner::Span,
};

/// An operand that names an identifier instead of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentUse {
    pub name: String,
    /// Width of `name` in characters, as counted by the scanner.
    pub chars: usize,
    /// Address of the word whose operand field refers to `name`.
    pub addr: u16,
    pub pos: Pos,
}

/// A `.Ident` definition. `value` is the address it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentDef {
    pub name: String,
    pub chars: usize,
    pub value: u16,
    pub pos: Pos,
}

/// Definitions keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Idents {
    uses: Vec<IdentUse>,
    defs: IndexMap<String, IdentDef>,
}

impl Idents {
    pub fn new() -> Self {
        Idents::default()
    }

    pub fn add_use(&mut self, span: Span, addr: u16) {
        self.uses.push(IdentUse {
            name: span.text.to_string(),
            chars: span.chars,
            addr,
            pos: span.pos,
        });
    }

    pub fn define(&mut self, span: Span, value: u16) -> Result<(), ErrorKind> {
        if self.defs.contains_key(span.text) {
            return Err(ErrorKind::Redefined(span.text.to_string()));
        }
        self.defs.insert(
            span.text.to_string(),
            IdentDef {
                name: span.text.to_string(),
                chars: span.chars,
                value,
                pos: span.pos,
            },
        );
        Ok(())
    }

    pub fn find_def(&self, name: &str) -> Option<&IdentDef> {
        self.defs.get(name)
    }

    pub fn uses_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IdentUse> + 'a {
        self.uses.iter().filter(move |u| u.name == name)
    }

    pub fn use_at(&self, addr: u16) -> Option<&IdentUse> {
        self.uses.iter().find(|u| u.addr == addr)
    }

    pub fn def_at(&self, addr: u16) -> Option<&IdentDef> {
        self.defs.values().find(|d| d.value == addr)
    }

    pub fn defs(&self) -> impl Iterator<Item = &IdentDef> {
        self.defs.values()
    }

    pub fn uses(&self) -> &[IdentUse] {
        &self.uses
    }

    /// Widest definition name in characters.
    pub fn longest_def(&self) -> usize {
        self.defs().map(|d| d.chars).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn span(text: &str) -> Span<'_> {
        Scanner::new(text).extract_identifier().unwrap()
    }

    #[test]
    fn redefinition() {
        let mut ids = Idents::new();
        ids.define(span("Foo"), 0x10).unwrap();
        assert_eq!(
            ids.define(span("Foo"), 0x20),
            Err(ErrorKind::Redefined("Foo".into()))
        );
        assert_eq!(ids.find_def("Foo").map(|d| d.value), Some(0x10));
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut ids = Idents::new();
        ids.define(span("foo"), 1).unwrap();
        ids.define(span("Foo"), 2).unwrap();
        assert_eq!(ids.defs().count(), 2);
    }

    #[test]
    fn lookups() {
        let mut ids = Idents::new();
        ids.define(span("Loop"), 0x000).unwrap();
        ids.define(span("Ünïcode"), 0x005).unwrap();
        ids.add_use(span("Loop"), 0x003);
        ids.add_use(span("Loop"), 0x004);
        assert_eq!(ids.uses_of("Loop").count(), 2);
        assert_eq!(ids.use_at(0x004).map(|u| u.name.as_str()), Some("Loop"));
        assert_eq!(ids.def_at(0x005).map(|d| d.name.as_str()), Some("Ünïcode"));
        assert!(ids.def_at(0x001).is_none());
        assert_eq!(ids.longest_def(), 7);
    }
}
