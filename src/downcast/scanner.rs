//! Floating-point literal scanner for C++ sources.
//!
//! This is a token-level scan, not a parser. It skips comments, string and
//! character literals (raw strings included) and preprocessor directive
//! lines, reads every preprocessing number whole, and keeps the ones that
//! denote a `float`, `double` or `long double` literal.

use std::ops::Range;

/// Type a floating literal has, from its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralType {
    Float,
    Double,
    LongDouble,
}

/// One floating literal as it appears in the source
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    /// Token text including digit separators and suffix
    pub text: String,
    /// Byte range of the token in the source
    pub span: Range<usize>,
    /// 1-based line
    pub line: usize,
    /// 1-based byte column
    pub column: usize,
    pub ty: LiteralType,
    /// Value of the literal in its own type, widened to `f64`
    pub value: f64,
}

/// Collect every floating literal in `source`, in source order.
pub fn scan_float_literals(source: &str) -> Vec<FloatLiteral> {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    /// Only whitespace seen since the last newline
    line_start: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            line_start: true,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
            self.line_start = true;
        } else {
            self.col += 1;
        }
        Some(byte)
    }

    fn run(mut self) -> Vec<FloatLiteral> {
        let mut literals = Vec::new();

        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() {
                self.bump();
                continue;
            }

            let at_line_start = self.line_start;
            self.line_start = false;

            match byte {
                b'#' if at_line_start => self.skip_directive(),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'"' | b'\'' => self.skip_quoted(byte),
                b'0'..=b'9' => {
                    if let Some(literal) = self.lex_number() {
                        literals.push(literal);
                    }
                }
                b'.' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                    if let Some(literal) = self.lex_number() {
                        literals.push(literal);
                    }
                }
                b if is_ident_start(b) => self.lex_identifier(),
                _ => {
                    self.bump();
                }
            }
        }

        literals
    }

    fn skip_line_comment(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(byte) = self.bump() {
            if byte == b'*' && self.peek() == Some(b'/') {
                self.bump();
                return;
            }
        }
    }

    /// Skip a directive up to the first newline not preceded by `\`.
    fn skip_directive(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b'\n' => break,
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump();
                    self.line_start = false;
                }
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn skip_quoted(&mut self, quote: u8) {
        self.bump();
        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => {
                    self.bump();
                    self.bump();
                }
                // Unterminated literal; resume on the next line
                b'\n' => return,
                _ => {
                    self.bump();
                    if byte == quote {
                        return;
                    }
                }
            }
        }
    }

    /// `R"delim( ... )delim"`; the position is on the opening quote.
    fn skip_raw_string(&mut self) {
        self.bump();
        let delim_start = self.pos;
        while let Some(byte) = self.peek() {
            if byte == b'(' || byte == b'\n' || byte == b'"' {
                break;
            }
            self.bump();
        }
        if self.peek() != Some(b'(') {
            return;
        }
        let closing = format!("){}\"", &self.src[delim_start..self.pos]);
        self.bump();

        while self.peek().is_some() {
            if self.bytes[self.pos..].starts_with(closing.as_bytes()) {
                for _ in 0..closing.len() {
                    self.bump();
                }
                return;
            }
            self.bump();
        }
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }

        // Encoding prefixes glue onto the literal that follows
        let ident = &self.src[start..self.pos];
        if self.peek() == Some(b'"') && matches!(ident, "R" | "u8R" | "uR" | "UR" | "LR") {
            self.skip_raw_string();
        }
    }

    /// Read one preprocessing number and keep it if it is floating.
    fn lex_number(&mut self) -> Option<FloatLiteral> {
        let start = self.pos;
        let (line, column) = (self.line, self.col);

        self.bump();
        while let Some(byte) = self.peek() {
            let next = self.peek_at(1);
            match byte {
                b'e' | b'E' | b'p' | b'P' if matches!(next, Some(b'+') | Some(b'-')) => {
                    self.bump();
                    self.bump();
                }
                b'\'' if next.is_some_and(is_ident_continue) => {
                    self.bump();
                    self.bump();
                }
                b'.' => {
                    self.bump();
                }
                b if is_ident_continue(b) => {
                    self.bump();
                }
                _ => break,
            }
        }

        let text = &self.src[start..self.pos];
        let (value, ty) = parse_floating(text)?;
        Some(FloatLiteral {
            text: text.to_string(),
            span: start..self.pos,
            line,
            column,
            ty,
            value,
        })
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || !byte.is_ascii()
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || !byte.is_ascii()
}

/// Value and type of a preprocessing number, if it is a floating literal.
fn parse_floating(text: &str) -> Option<(f64, LiteralType)> {
    let cleaned: String = text.chars().filter(|&c| c != '\'').collect();

    let (value, suffix) = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => parse_hex_floating(hex)?,
        None => parse_decimal_floating(&cleaned)?,
    };

    let ty = match suffix {
        "" => LiteralType::Double,
        "f" | "F" => LiteralType::Float,
        "l" | "L" => LiteralType::LongDouble,
        // User-defined and extended-width suffixes
        _ => return None,
    };

    let value = match ty {
        LiteralType::Float => value as f32 as f64,
        LiteralType::Double | LiteralType::LongDouble => value,
    };
    Some((value, ty))
}

/// `digits[.digits][e[+-]digits]suffix`; requires a `.` or an exponent.
fn parse_decimal_floating(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut floating = false;

    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        floating |= bytes[end] == b'.';
        end += 1;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
            floating = true;
        }
    }

    if !floating {
        return None;
    }
    let value = text[..end].parse::<f64>().ok()?;
    Some((value, &text[end..]))
}

/// `hexdigits[.hexdigits]p[+-]digits suffix`, without the `0x` prefix.
fn parse_hex_floating(text: &str) -> Option<(f64, &str)> {
    let (mantissa, rest) = text.split_once(['p', 'P'])?;

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0.0f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16)?) * scale;
        scale /= 16.0;
    }

    let sign_len = usize::from(rest.starts_with(['+', '-']));
    let digits_len = rest[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    let exponent: i32 = rest[..sign_len + digits_len].parse().ok()?;

    Some((value * 2f64.powi(exponent), &rest[sign_len + digits_len..]))
}
