// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

use core::cmp;
use core::fmt::{self, Debug, Formatter};
use core::iter::Peekable;
use core::str::CharIndices;

use anyhow::{anyhow, Result};

/// Words reserved by the expression grammar. They can never be used as
/// identifiers, which makes statements such as `import "fmt"` fail to parse.
pub const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

struct SourceInternal {
    pub file: String,
    pub contents: String,
    pub lines: Vec<(u32, u32)>,
}

#[derive(Clone)]
pub struct Source {
    src: Rc<SourceInternal>,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        Rc::as_ptr(&self.src) == Rc::as_ptr(&other.src)
    }
}

impl cmp::Eq for Source {}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        self.src.file.fmt(f)
    }
}

impl Source {
    pub fn from_contents(file: String, contents: String) -> Result<Source> {
        let max_size = u32::MAX as usize - 2; // Account for rows, cols possibly starting at 1, EOF etc.
        if contents.len() > max_size {
            return Err(anyhow!(
                "{file} exceeds maximum allowed path size {max_size}"
            ));
        }
        let mut lines = vec![];
        let mut prev_ch = ' ';
        let mut prev_pos = 0u32;
        let mut start = 0u32;
        for (i, ch) in contents.char_indices() {
            if ch == '\n' {
                let end = match prev_ch {
                    '\r' => prev_pos,
                    _ => i as u32,
                };
                lines.push((start, end));
                start = i as u32 + 1;
            }
            prev_ch = ch;
            prev_pos = i as u32;
        }

        if (start as usize) < contents.len() {
            lines.push((start, contents.len() as u32));
        } else if contents.is_empty() {
            lines.push((0, 0));
        } else {
            let s = (contents.len() - 1) as u32;
            lines.push((s, s));
        }
        Ok(Self {
            src: Rc::new(SourceInternal {
                file,
                contents,
                lines,
            }),
        })
    }

    pub fn contents(&self) -> &String {
        &self.src.contents
    }

    pub fn line(&self, idx: u32) -> &str {
        let idx = idx as usize;
        if idx < self.src.lines.len() {
            let (start, end) = self.src.lines[idx];
            &self.src.contents[start as usize..end as usize]
        } else {
            ""
        }
    }

    pub fn message(&self, line: u32, col: u32, kind: &str, msg: &str) -> String {
        if line as usize > self.src.lines.len() {
            return format!("{}: invalid line {} specified", self.src.file, line);
        }

        let line_str = format!("{line}");
        let line_num_width = line_str.len() + 1;
        let col_spaces = (col as usize).saturating_sub(1);

        format!(
            "\n--> {}:{}:{}\n{:<line_num_width$}|\n\
		{:<line_num_width$}| {}\n\
		{:<line_num_width$}| {:<col_spaces$}^\n\
		{}: {}",
            self.src.file,
            line,
            col,
            "",
            line,
            self.line(line.saturating_sub(1)),
            "",
            "",
            kind,
            msg
        )
    }

    pub fn error(&self, line: u32, col: u32, msg: &str) -> anyhow::Error {
        anyhow!(self.message(line, col, "error", msg))
    }
}

#[derive(Clone)]
pub struct Span {
    pub source: Source,
    pub line: u32,
    pub col: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn text(&self) -> &str {
        &self.source.contents()[self.start as usize..self.end as usize]
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let t = self.text().escape_debug().to_string();
        let max = 32;
        let (txt, trailer) = if t.len() > max {
            (&t[0..max], "...")
        } else {
            (t.as_str(), "")
        };

        f.write_fmt(format_args!(
            "{}:{}:{}:{}, \"{}{}\"",
            self.line, self.col, self.start, self.end, txt, trailer
        ))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Symbol,
    Ident,
    Int,
    Float,
    Char,
    String,
    RawString,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token(pub TokenKind, pub Span);

#[derive(Clone)]
pub struct Lexer<'source> {
    source: Source,
    iter: Peekable<CharIndices<'source>>,
    line: u32,
    col: u32,
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source Source) -> Self {
        Self {
            source: source.clone(),
            iter: source.contents().char_indices().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> (usize, char) {
        match self.iter.peek() {
            Some((index, chr)) => (*index, *chr),
            _ => (self.source.contents().len(), '\x00'),
        }
    }

    fn peekahead(&mut self, n: usize) -> (usize, char) {
        match self.iter.clone().nth(n) {
            Some((index, chr)) => (index, chr),
            _ => (self.source.contents().len(), '\x00'),
        }
    }

    fn make_token(&self, kind: TokenKind, col: u32, start: usize, end: usize) -> Token {
        Token(
            kind,
            Span {
                source: self.source.clone(),
                line: self.line,
                col,
                start: start as u32,
                end: end as u32,
            },
        )
    }

    fn read_ident(&mut self) -> Result<Token> {
        let start = self.peek().0;
        let col = self.col;
        loop {
            let ch = self.peek().1;
            if is_ident_char(ch) {
                self.iter.next();
                self.col += 1;
            } else {
                break;
            }
        }
        let end = self.peek().0;
        Ok(self.make_token(TokenKind::Ident, col, start, end))
    }

    // Reads digits valid in the given radix, allowing `_` between digits.
    // Returns the number of digits read.
    fn read_digits(&mut self, radix: u32) -> Result<usize> {
        let mut count = 0;
        let mut prev_underscore = false;
        loop {
            let ch = self.peek().1;
            if ch == '_' {
                if prev_underscore {
                    return Err(self.source.error(
                        self.line,
                        self.col,
                        "'_' must separate successive digits",
                    ));
                }
                prev_underscore = true;
            } else if ch.is_digit(radix) {
                prev_underscore = false;
                count += 1;
            } else {
                break;
            }
            self.iter.next();
            self.col += 1;
        }
        if prev_underscore {
            return Err(self.source.error(
                self.line,
                self.col - 1,
                "'_' must separate successive digits",
            ));
        }
        Ok(count)
    }

    fn read_number(&mut self) -> Result<Token> {
        let (start, chr) = self.peek();
        let col = self.col;
        let mut kind = TokenKind::Int;

        let prefix = if chr == '0' {
            match self.peekahead(1).1 {
                'x' | 'X' => Some(16),
                'o' | 'O' => Some(8),
                'b' | 'B' => Some(2),
                _ => None,
            }
        } else {
            None
        };

        if let Some(radix) = prefix {
            self.iter.next();
            self.iter.next();
            self.col += 2;
            if self.peek().1 == '_' {
                self.iter.next();
                self.col += 1;
            }
            if self.read_digits(radix)? == 0 {
                return Err(self.source.error(self.line, col, "number has no digits"));
            }
            if radix == 16 && matches!(self.peek().1, '.' | 'p' | 'P') {
                return Err(self.source.error(
                    self.line,
                    col,
                    "hexadecimal floating-point literals are not supported",
                ));
            }
        } else {
            // Integer part. Absent when the literal starts with `.`.
            self.read_digits(10)?;

            // Fraction part.
            if self.peek().1 == '.' {
                kind = TokenKind::Float;
                self.iter.next();
                self.col += 1;
                self.read_digits(10)?;
            }

            // Exponent part.
            if matches!(self.peek().1, 'e' | 'E') {
                kind = TokenKind::Float;
                self.iter.next();
                self.col += 1;
                if matches!(self.peek().1, '+' | '-') {
                    self.iter.next();
                    self.col += 1;
                }
                if self.read_digits(10)? == 0 {
                    return Err(self
                        .source
                        .error(self.line, self.col, "exponent has no digits"));
                }
            }
        }

        let end = self.peek().0;

        // A valid number cannot be immediately followed by these characters.
        let ch = self.peek().1;
        if ch == 'i' {
            return Err(self.source.error(
                self.line,
                self.col,
                "imaginary literals are not supported",
            ));
        }
        if is_ident_char(ch) || ch == '.' {
            return Err(self.source.error(self.line, self.col, "invalid number"));
        }

        // Legacy octal form: 0755.
        let text = &self.source.contents()[start..end];
        if kind == TokenKind::Int && prefix.is_none() && text.len() > 1 && text.starts_with('0') {
            if let Some((offset, digit)) = text.char_indices().find(|(_, c)| matches!(c, '8' | '9'))
            {
                return Err(self.source.error(
                    self.line,
                    col + offset as u32,
                    &format!("invalid digit '{digit}' in octal literal"),
                ));
            }
        }

        Ok(self.make_token(kind, col, start, end))
    }

    fn read_raw_string(&mut self) -> Result<Token> {
        let (start, _) = self.peek();
        let (line, col) = (self.line, self.col);
        self.iter.next();
        self.col += 1;
        loop {
            let (_, ch) = self.peek();
            self.iter.next();
            match ch {
                '`' => {
                    self.col += 1;
                    break;
                }
                '\x00' => {
                    return Err(self.source.error(line, col, "unmatched `"));
                }
                '\t' => self.col += 4,
                '\n' => {
                    self.line += 1;
                    self.col = 1;
                }
                _ => self.col += 1,
            }
        }
        let end = self.peek().0;
        Ok(Token(
            TokenKind::RawString,
            Span {
                source: self.source.clone(),
                line,
                col,
                start: start as u32,
                end: end as u32,
            },
        ))
    }

    // Reads a quoted literal delimited by `quote`. Escape sequences are
    // validated here so that malformed literals are reported with a position.
    fn read_quoted(&mut self, quote: char, kind: TokenKind) -> Result<Token> {
        let (start, _) = self.peek();
        let col = self.col;
        self.iter.next();
        self.col += 1;
        loop {
            let (_, ch) = self.peek();
            match ch {
                '\x00' | '\n' => {
                    return Err(self
                        .source
                        .error(self.line, col, &format!("unmatched {quote}")));
                }
                '\\' => {
                    self.iter.next();
                    self.iter.next();
                    self.col += 2;
                }
                c if c == quote => {
                    self.iter.next();
                    self.col += 1;
                    break;
                }
                _ => {
                    self.iter.next();
                    self.col += 1;
                }
            }
        }
        let end = self.peek().0;
        let token = self.make_token(kind, col, start, end);
        if let Err(msg) = unquote(token.1.text()) {
            return Err(self.source.error(self.line, col, msg));
        }
        Ok(token)
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek().1 {
                ' ' | '\r' => self.col += 1,
                '\t' => self.col += 4,
                '\n' => {
                    self.col = 1;
                    self.line += 1;
                }
                _ => break,
            }
            self.iter.next();
        }
    }

    fn symbol(&mut self, start: usize, col: u32, len: usize) -> Result<Token> {
        for _ in 0..len {
            self.iter.next();
        }
        self.col += len as u32;
        Ok(self.make_token(TokenKind::Symbol, col, start, start + len))
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_ws();

        let (start, chr) = self.peek();
        let col = self.col;
        let next = self.peekahead(1).1;

        match chr {
            // . followed by digit is a float such as .5
            '.' if next.is_ascii_digit() => self.read_number(),
            _ if chr.is_ascii_digit() => self.read_number(),

            // two character operators
            '&' if next == '&' || next == '^' => self.symbol(start, col, 2),
            '|' if next == '|' => self.symbol(start, col, 2),
            '<' if next == '<' || next == '=' => self.symbol(start, col, 2),
            '>' if next == '>' || next == '=' => self.symbol(start, col, 2),
            '=' | '!' if next == '=' => self.symbol(start, col, 2),

            // grouping characters
            '{' | '}' | '[' | ']' | '(' | ')' |
            // arith operators
            '+' | '-' | '*' | '/' | '%' |
            // bitwise and logical operators
            '&' | '|' | '^' | '!' |
            // comparison operators
            '<' | '>' | '=' |
            // separators
            ',' | ';' | ':' | '.' => self.symbol(start, col, 1),

            '"' => self.read_quoted('"', TokenKind::String),
            '\'' => self.read_quoted('\'', TokenKind::Char),
            '`' => self.read_raw_string(),
            '\x00' if start >= self.source.contents().len() => {
                Ok(self.make_token(TokenKind::Eof, col, start, start))
            }
            _ if is_ident_start(chr) => self.read_ident(),
            _ => Err(self.source.error(self.line, self.col, "invalid character")),
        }
    }
}

fn read_hex(chars: &mut core::str::Chars<'_>, n: usize) -> Result<u32, &'static str> {
    let mut value = 0u32;
    for _ in 0..n {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or("invalid hex escape sequence")?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn read_octal(first: char, chars: &mut core::str::Chars<'_>) -> Result<u32, &'static str> {
    let mut value = first.to_digit(8).ok_or("invalid octal escape sequence")?;
    for _ in 0..2 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(8))
            .ok_or("invalid octal escape sequence")?;
        value = value * 8 + digit;
    }
    if value > 255 {
        return Err("octal escape value > 255");
    }
    Ok(value)
}

/// Resolves a quoted literal (`"..."`, `'...'` or `` `...` ``) including its
/// delimiters into the text it denotes.
///
/// In strings, `\xhh` and `\ooo` escapes denote single bytes, so a multi
/// byte character can be spelled out byte by byte. In character literals
/// they denote the code point.
pub fn unquote(raw: &str) -> Result<String, &'static str> {
    let quote = raw.chars().next().ok_or("empty literal")?;
    if raw.len() < 2 || !raw.ends_with(quote) {
        return Err("unterminated literal");
    }
    let body = &raw[quote.len_utf8()..raw.len() - quote.len_utf8()];

    if quote == '`' {
        // Carriage returns are discarded from raw strings.
        return Ok(body.chars().filter(|c| *c != '\r').collect());
    }

    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut buf = [0u8; 4];
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        let decoded = if ch != '\\' {
            ch
        } else {
            let esc = chars.next().ok_or("invalid escape sequence")?;
            match esc {
                'a' => '\x07',
                'b' => '\x08',
                'f' => '\x0c',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'v' => '\x0b',
                '\\' => '\\',
                '\'' if quote == '\'' => '\'',
                '"' if quote == '"' => '"',
                '0'..='7' | 'x' => {
                    let value = match esc {
                        'x' => read_hex(&mut chars, 2)?,
                        _ => read_octal(esc, &mut chars)?,
                    };
                    if quote == '"' {
                        let byte = u8::try_from(value).map_err(|_| "octal escape value > 255")?;
                        out.push(byte);
                        continue;
                    }
                    char::from_u32(value).ok_or("invalid escape sequence")?
                }
                'u' => char::from_u32(read_hex(&mut chars, 4)?)
                    .ok_or("escape sequence is invalid Unicode code point")?,
                'U' => char::from_u32(read_hex(&mut chars, 8)?)
                    .ok_or("escape sequence is invalid Unicode code point")?,
                _ => return Err("unknown escape sequence"),
            }
        };
        out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
    }

    let out = String::from_utf8(out).map_err(|_| "string literal is not valid UTF-8")?;
    if quote == '\'' && out.chars().count() != 1 {
        return Err("character literal must contain exactly one character");
    }
    Ok(out)
}
