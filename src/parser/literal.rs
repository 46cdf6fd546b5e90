//! Literal-data parser.
//!
//! Level files are written as nested literal mappings. This parser accepts
//! only literal data: mappings, tuples, lists, strings, numbers, `True`,
//! `False` and `None`. There are no names, calls or operators, so nothing in
//! a level file can ever be evaluated.

use crate::error::{LevelError, Result};

use super::span::{Span, Spanned};

/// Deepest container nesting accepted before the input is rejected.
pub const MAX_DEPTH: usize = 64;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Spanned<Literal>>),
    List(Vec<Spanned<Literal>>),
    /// Entries in source order; duplicate keys are kept here and resolved
    /// (last one wins) by the decoder.
    Dict(Vec<(Spanned<Literal>, Spanned<Literal>)>),
}

impl Literal {
    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::None => "None",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::Tuple(_) => "tuple",
            Literal::List(_) => "list",
            Literal::Dict(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse a complete literal; trailing content other than whitespace and
/// comments is an error.
pub fn parse_literal(source: &str) -> Result<Spanned<Literal>> {
    let mut parser = Parser {
        source,
        pos: 0,
        depth: 0,
    };

    parser.skip_trivia();
    if parser.at_end() {
        return Err(parser.error_at(0, "empty level file"));
    }

    let value = parser.value()?;
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error_here("unexpected content after the level mapping"));
    }
    Ok(value)
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn value(&mut self) -> Result<Spanned<Literal>> {
        self.skip_trivia();
        let start = self.pos;

        match self.peek() {
            Some('{') => self.nested(start, Self::dict),
            Some('(') => self.nested(start, Self::paren),
            Some('[') => self.nested(start, Self::list),
            Some(q @ ('\'' | '"')) => {
                let s = self.string(q)?;
                Ok(self.spanned(Literal::Str(s), start))
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => Err(self.error_here(format!("unexpected character '{}'", c))),
            None => Err(self.error_here("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        start: usize,
        f: fn(&mut Self, usize) -> Result<Spanned<Literal>>,
    ) -> Result<Spanned<Literal>> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error_at(start, "nesting too deep"));
        }
        let result = f(self, start);
        self.depth -= 1;
        result
    }

    fn dict(&mut self, start: usize) -> Result<Spanned<Literal>> {
        self.expect('{')?;
        let mut entries = Vec::new();

        loop {
            self.skip_trivia();
            if self.eat('}') {
                break;
            }

            let key = self.value()?;
            self.skip_trivia();
            if !self.eat(':') {
                if matches!(self.peek(), Some(',') | Some('}')) {
                    return Err(self.error_here("sets are not supported; expected ':'"));
                }
                return Err(self.error_here("expected ':' after mapping key"));
            }
            let value = self.value()?;
            entries.push((key, value));

            self.skip_trivia();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.error_here("expected ',' or '}' in mapping"));
        }

        Ok(self.spanned(Literal::Dict(entries), start))
    }

    fn paren(&mut self, start: usize) -> Result<Spanned<Literal>> {
        self.expect('(')?;
        self.skip_trivia();
        if self.eat(')') {
            return Ok(self.spanned(Literal::Tuple(Vec::new()), start));
        }

        let first = self.value()?;
        self.skip_trivia();
        if self.eat(')') {
            // parenthesised value, not a tuple
            return Ok(first);
        }

        let mut items = vec![first];
        loop {
            if !self.eat(',') {
                return Err(self.error_here("expected ',' or ')' in tuple"));
            }
            self.skip_trivia();
            if self.eat(')') {
                break;
            }
            items.push(self.value()?);
            self.skip_trivia();
            if self.eat(')') {
                break;
            }
        }

        Ok(self.spanned(Literal::Tuple(items), start))
    }

    fn list(&mut self, start: usize) -> Result<Spanned<Literal>> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            if self.eat(']') {
                break;
            }
            items.push(self.value()?);
            self.skip_trivia();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error_here("expected ',' or ']' in list"));
        }

        Ok(self.spanned(Literal::List(items), start))
    }

    fn string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '\n' => return Err(self.error_at(start, "unterminated string")),
                '\\' => {
                    let escape_start = self.pos - 1;
                    let Some(e) = self.bump() else {
                        return Err(self.error_at(start, "unterminated string"));
                    };
                    match e {
                        '\\' => out.push('\\'),
                        '\'' => out.push('\''),
                        '"' => out.push('"'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        '0' => out.push('\0'),
                        '\n' => {}
                        'x' => out.push(self.hex_escape(2, escape_start)?),
                        'u' => out.push(self.hex_escape(4, escape_start)?),
                        other => {
                            // unknown escapes are kept verbatim
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize, escape_start: usize) -> Result<char> {
        let end = self.pos + digits;
        let hex = self
            .source
            .get(self.pos..end)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(escape_start, "invalid escape sequence"))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| self.error_at(escape_start, "invalid escape sequence"))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error_at(escape_start, "invalid escape sequence"))
    }

    fn number(&mut self) -> Result<Spanned<Literal>> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
            self.skip_trivia();
        }
        let digits_start = self.pos;

        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        let digits: String = self.source[digits_start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if digits.is_empty() || digits == "." {
            return Err(self.error_at(start, "expected a number"));
        }
        let negative = self.source[start..digits_start].starts_with('-');

        let literal = if is_float {
            let value: f64 = digits
                .parse()
                .map_err(|_| self.error_at(start, format!("invalid number '{}'", digits)))?;
            Literal::Float(if negative { -value } else { value })
        } else {
            let signed = if negative { format!("-{}", digits) } else { digits };
            let value: i64 = signed
                .parse()
                .map_err(|_| self.error_at(start, format!("integer out of range: {}", signed)))?;
            Literal::Int(value)
        };

        Ok(self.spanned(literal, start))
    }

    fn name(&mut self) -> Result<Spanned<Literal>> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }

        let literal = match &self.source[start..self.pos] {
            "True" => Literal::Bool(true),
            "False" => Literal::Bool(false),
            "None" => Literal::None,
            other => {
                return Err(self.error_at(
                    start,
                    format!("'{}' is not literal data; names are not allowed", other),
                ))
            }
        };
        Ok(self.spanned(literal, start))
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{}'", expected)))
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn spanned(&self, value: Literal, start: usize) -> Spanned<Literal> {
        Spanned::new(value, Span::from_offsets(self.source, start, self.pos))
    }

    fn error_here(&self, message: impl Into<String>) -> LevelError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> LevelError {
        LevelError::Syntax {
            message: message.into(),
            span: Span::from_offsets(self.source, offset, (offset + 1).min(self.source.len())),
        }
    }
}
