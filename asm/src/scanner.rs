use crate::error::Pos;

/// Cursor over decoded source text.
///
/// The column counts characters, not bytes. A NUL character ends the input
/// just like the end of the string does.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    at: usize,
    line: usize,
    col: usize,
}

/// Text of an identifier together with where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub chars: usize,
    pub pos: Pos,
}

fn ends_identifier(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\0')
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.'
}

// ----------------------------------------------------------------------------
// Helpers

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            at: 0,
            line: 1,
            col: 0,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            col: self.col,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.at..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next().filter(|c| *c != '\0')
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Moves past `count` characters and returns how many bytes that was.
    pub fn advance(&mut self, count: usize) -> usize {
        let start = self.at;
        for _ in 0..count {
            let Some(c) = self.peek() else { break };
            self.at += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.at - start
    }

    /// Runs `f` on a copy of the cursor and keeps the copy only on success.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mut trial = self.clone();
        let result = f(&mut trial)?;
        *self = trial;
        Some(result)
    }
}

// ----------------------------------------------------------------------------
// Skipping

impl<'a> Scanner<'a> {
    /// Skips whitespace and `/` comments, which run to the end of the line.
    pub fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance(1);
                }
                '/' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance(1);
                    }
                }
                _ => break,
            }
        }
    }

    /// Skips whitespace without leaving the current line.
    pub fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance(1);
        }
    }
}

// ----------------------------------------------------------------------------
// Tokens

impl<'a> Scanner<'a> {
    /// The maximal run of ASCII letters and `.` at the cursor, without
    /// consuming it. The caller decides whether it is a keyword.
    pub fn peek_keyword(&self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !is_keyword_char(c))
            .unwrap_or(rest.len());
        (len > 0).then(|| &rest[..len])
    }

    /// Like `peek_keyword`, but stops at `.` as well.
    pub fn peek_letters(&self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        (len > 0).then(|| &rest[..len])
    }

    /// An identifier is anything not starting with a decimal digit or a
    /// comment, up to the next space, tab, line break or NUL.
    pub fn extract_identifier(&mut self) -> Option<Span<'a>> {
        let first = self.peek()?;
        if first.is_ascii_digit() || first == '/' || ends_identifier(first) {
            return None;
        }
        let pos = self.pos();
        let start = self.at;
        let mut chars = 0;
        while self.peek().is_some_and(|c| !ends_identifier(c)) {
            self.advance(1);
            chars += 1;
        }
        Some(Span {
            text: &self.src[start..self.at],
            chars,
            pos,
        })
    }

    /// `0d` followed by digits. `+` and `-` may appear among the digits;
    /// the last one seen sets the sign.
    pub fn extract_decimal(&mut self) -> Option<i64> {
        self.attempt(|s| {
            if !s.rest().starts_with("0d") {
                return None;
            }
            s.advance(2);
            let mut value: i64 = 0;
            let mut sign = 1;
            let mut digits = 0;
            while let Some(c) = s.peek() {
                match c {
                    '-' => sign = -1,
                    '+' => sign = 1,
                    '0'..='9' => {
                        let d = i64::from(c as u8 - b'0');
                        value = value.saturating_mul(10).saturating_add(d);
                    }
                    _ => break,
                }
                digits += 1;
                s.advance(1);
            }
            (digits > 0).then_some(value * sign)
        })
    }

    /// `0x` followed by hex digits. No sign.
    pub fn extract_hex(&mut self) -> Option<i64> {
        self.attempt(|s| {
            if !s.rest().starts_with("0x") {
                return None;
            }
            s.advance(2);
            let mut value: i64 = 0;
            let mut digits = 0;
            while let Some(d) = s.peek().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(0x10).saturating_add(i64::from(d));
                digits += 1;
                s.advance(1);
            }
            (digits > 0).then_some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_tracks_lines() {
        let mut s = Scanner::new("  // note\n\t/ also a comment\n  halt");
        s.skip_blank();
        assert_eq!(s.pos(), Pos { line: 3, col: 2 });
        assert_eq!(s.peek_keyword(), Some("halt"));
    }

    #[test]
    fn inline_space_stays_on_line() {
        let mut s = Scanner::new(" \t\r\nload");
        s.skip_inline_space();
        assert_eq!(s.pos(), Pos { line: 1, col: 3 });
        assert!(s.peek_keyword().is_none());
    }

    #[test]
    fn keyword_run() {
        let s = Scanner::new(".SetAddr 0x10");
        assert_eq!(s.peek_keyword(), Some(".SetAddr"));
        let s = Scanner::new("load0x1");
        assert_eq!(s.peek_keyword(), Some("load"));
        let s = Scanner::new("0x1");
        assert_eq!(s.peek_keyword(), None);
    }

    #[test]
    fn letter_run_stops_at_dot() {
        let s = Scanner::new("greater.Ident Top");
        assert_eq!(s.peek_letters(), Some("greater"));
        assert_eq!(s.peek_keyword(), Some("greater.Ident"));
        assert_eq!(Scanner::new(".Ident").peek_letters(), None);
    }

    #[test]
    fn identifier_counts_chars_and_bytes() {
        let mut s = Scanner::new("Zähler rest");
        let span = s.extract_identifier().unwrap();
        assert_eq!(span.text, "Zähler");
        assert_eq!(span.chars, 6);
        assert_eq!(span.text.len(), 7);
        assert_eq!(s.pos(), Pos { line: 1, col: 6 });
    }

    #[test]
    fn identifier_rejects_digit_and_blank() {
        assert!(Scanner::new("1abc").extract_identifier().is_none());
        assert!(Scanner::new("\nabc").extract_identifier().is_none());
        assert!(Scanner::new("// note").extract_identifier().is_none());
        assert!(Scanner::new("").extract_identifier().is_none());
    }

    #[test]
    fn decimal() {
        assert_eq!(Scanner::new("0d42").extract_decimal(), Some(42));
        assert_eq!(Scanner::new("0d-42").extract_decimal(), Some(-42));
        assert_eq!(Scanner::new("0d4-2").extract_decimal(), Some(-42));
        assert_eq!(Scanner::new("0d-4+2").extract_decimal(), Some(42));
        assert_eq!(Scanner::new("0x42").extract_decimal(), None);
    }

    #[test]
    fn failed_number_consumes_nothing() {
        let mut s = Scanner::new("0dX");
        assert_eq!(s.extract_decimal(), None);
        assert_eq!(s.pos(), Pos { line: 1, col: 0 });
        let mut s = Scanner::new("0xG");
        assert_eq!(s.extract_hex(), None);
        assert_eq!(s.pos(), Pos { line: 1, col: 0 });
    }

    #[test]
    fn hexadecimal() {
        assert_eq!(Scanner::new("0xfFf").extract_hex(), Some(0xFFF));
        assert_eq!(Scanner::new("0x1000 ").extract_hex(), Some(0x1000));
        assert_eq!(Scanner::new("0d10").extract_hex(), None);
    }

    #[test]
    fn nul_ends_input() {
        let mut s = Scanner::new("  \0halt");
        s.skip_blank();
        assert!(s.is_eof());
    }

    #[test]
    fn advance_multibyte() {
        let mut s = Scanner::new("日本\nx");
        assert_eq!(s.advance(2), 6);
        assert_eq!(s.pos(), Pos { line: 1, col: 2 });
        assert_eq!(s.advance(1), 1);
        assert_eq!(s.pos(), Pos { line: 2, col: 0 });
    }
}
