use arch::{
    cond::Cond,
    keyword::{Keyword, Operand},
    op::OpKind,
    MAX_ADDR,
};

use crate::{
    error::{ErrorKind, Fatal, Pos, Warning, WarningKind},
    ident::Idents,
    image::{Image, Meta},
    resolve::resolve,
    scanner::Scanner,
};

/// Result of a successful assembly: the memory image and every identifier
/// seen while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub image: Image,
    pub idents: Idents,
}

/// Assemble a whole source text.
///
/// Warnings raised before a fatal error are returned alongside it.
pub fn assemble(src: &str) -> (Result<Assembly, Fatal>, Vec<Warning>) {
    let mut pass = Pass::new(src);
    let result = pass
        .run()
        .and_then(|()| resolve(&mut pass.image, &pass.idents));
    let Pass {
        image,
        idents,
        warnings,
        ..
    } = pass;
    (result.map(|()| Assembly { image, idents }), warnings)
}

struct Pass<'a> {
    scan: Scanner<'a>,
    image: Image,
    idents: Idents,
    /// Wider than an address so that running past 0xFFF is observable.
    addr: u32,
    pending: bool,
    /// Line and address of the last emitted word.
    last_op: Option<(usize, u16)>,
    warnings: Vec<Warning>,
}

impl<'a> Pass<'a> {
    fn new(src: &'a str) -> Self {
        Pass {
            scan: Scanner::new(src),
            image: Image::new(),
            idents: Idents::new(),
            addr: 0,
            pending: false,
            last_op: None,
            warnings: vec![],
        }
    }

    fn run(&mut self) -> Result<(), Fatal> {
        loop {
            self.scan.skip_blank();
            if self.pending {
                self.addr += 1;
                self.pending = false;
            }
            if self.scan.is_eof() {
                return Ok(());
            }

            let pos = self.scan.pos();
            let word = self
                .scan
                .peek_keyword()
                .ok_or(Fatal::new(pos, ErrorKind::NoKeyword))?;
            let keyword = Keyword::parse(word)
                .ok_or_else(|| Fatal::new(pos, ErrorKind::InvalidKeyword(word.to_string())))?;

            // `.Ident` only names the word before it, so it may follow 0xFFF.
            if keyword != Keyword::Ident && self.addr > MAX_ADDR as u32 {
                return Err(Fatal::new(pos, ErrorKind::AddressCounterOverflow(self.addr)));
            }
            self.scan.advance(word.len());

            match keyword.operand() {
                Operand::None => self.emit(pos, keyword.opcode_bits(), Meta::op())?,
                Operand::AddrOrIdent => self.addressed(pos, keyword)?,
                Operand::Cond => self.skipcond(pos, keyword)?,
                Operand::LiteralAddr => self.set_addr()?,
                Operand::Ident => self.ident(pos)?,
                Operand::LiteralValue => self.data(pos)?,
            }
        }
    }

    fn warn(&mut self, pos: Pos, kind: WarningKind) {
        self.warnings.push(Warning { pos, kind });
    }

    /// Write a word at the address counter and schedule the increment.
    fn emit(&mut self, pos: Pos, value: u16, meta: Meta) -> Result<(), Fatal> {
        let addr = self.addr as u16;
        self.image
            .write(addr, value, meta)
            .map_err(|kind| Fatal::new(pos, kind))?;
        self.last_op = Some((pos.line, addr));
        self.pending = true;
        Ok(())
    }

    fn literal_addr(&mut self) -> Option<i64> {
        self.scan
            .extract_hex()
            .or_else(|| self.scan.extract_decimal())
    }

    fn addressed(&mut self, pos: Pos, keyword: Keyword) -> Result<(), Fatal> {
        self.scan.skip_inline_space();
        let at = self.scan.pos();

        if let Some(target) = self.literal_addr() {
            if !(0..=MAX_ADDR as i64).contains(&target) {
                return Err(Fatal::new(at, ErrorKind::AddressOutOfRange(target)));
            }
            if keyword == Keyword::Op(OpKind::JNS) && target == MAX_ADDR as i64 {
                self.warn(at, WarningKind::JnsToLastAddress);
            }
            return self.emit(pos, keyword.opcode_bits() | target as u16, Meta::op());
        }

        if let Some(span) = self.scan.extract_identifier() {
            self.idents.add_use(span, self.addr as u16);
            return self.emit(pos, keyword.opcode_bits(), Meta::op_with_ident());
        }

        Err(Fatal::new(at, ErrorKind::MissingAddress(keyword.spelling())))
    }

    fn skipcond(&mut self, pos: Pos, keyword: Keyword) -> Result<(), Fatal> {
        self.scan.skip_inline_space();
        let at = self.scan.pos();

        let bits = if let Some(word) = self.scan.peek_letters() {
            let cond = Cond::parse(word).map_err(|_| Fatal::new(at, ErrorKind::MissingCond))?;
            self.scan.advance(word.len());
            cond.bits()
        } else if let Some(raw) = self.scan.extract_hex() {
            if !(0..=MAX_ADDR as i64).contains(&raw) {
                return Err(Fatal::new(at, ErrorKind::CondOutOfRange(raw)));
            }
            let raw = raw as u16;
            if Cond::from_bits(raw).is_none() {
                self.warn(at, WarningKind::UnknownCond(raw));
            }
            raw
        } else {
            return Err(Fatal::new(at, ErrorKind::MissingCond));
        };

        self.emit(pos, keyword.opcode_bits() | bits, Meta::op())
    }

    fn set_addr(&mut self) -> Result<(), Fatal> {
        self.scan.skip_inline_space();
        let at = self.scan.pos();
        let addr = self
            .scan
            .extract_hex()
            .ok_or(Fatal::new(at, ErrorKind::MissingSetAddr))?;
        if !(0..=MAX_ADDR as i64).contains(&addr) {
            return Err(Fatal::new(at, ErrorKind::AddressOutOfRange(addr)));
        }
        self.addr = addr as u32;
        Ok(())
    }

    fn ident(&mut self, pos: Pos) -> Result<(), Fatal> {
        let target = match self.last_op {
            Some((line, addr)) if line == pos.line => addr,
            _ => return Err(Fatal::new(pos, ErrorKind::IdentNotAfterOperation)),
        };

        self.scan.skip_inline_space();
        let at = self.scan.pos();
        let span = self
            .scan
            .extract_identifier()
            .ok_or(Fatal::new(at, ErrorKind::MissingIdentName))?;
        self.idents
            .define(span, target)
            .map_err(|kind| Fatal::new(span.pos, kind))?;
        self.image.mark_defines(target);
        Ok(())
    }

    fn data(&mut self, pos: Pos) -> Result<(), Fatal> {
        self.scan.skip_inline_space();
        let at = self.scan.pos();
        let value = self
            .literal_addr()
            .ok_or(Fatal::new(at, ErrorKind::MissingData))?;
        if !(0..=0xFFFF).contains(&value) {
            return Err(Fatal::new(at, ErrorKind::DataOutOfRange(value)));
        }
        self.emit(pos, value as u16, Meta::data())
    }
}
