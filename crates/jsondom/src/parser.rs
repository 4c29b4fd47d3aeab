//! The single-pass JSON scanner.
//!
//! One cursor walks the input left to right; every byte is classified
//! through a 256-entry table and routed to the string, number, constant or
//! container handler. Strings without escapes and all number texts come out
//! borrowing the input, so parsing a large document allocates only for the
//! containers and for strings that actually contain escapes.

use alloc::vec::Vec;

use thiserror::Error;

use crate::escape::{unescape, EscapeError, Unescaped};
use crate::number::Number;
use crate::object::Object;
use crate::text::JsonStr;
use crate::value::JsonValue;

/// What went wrong, without the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A byte that no JSON production starts with, or a structural
    /// character in the wrong place.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// The input ended inside a value or before any value.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// Non-whitespace bytes after the top-level value.
    #[error("trailing characters after the top-level value")]
    TrailingCharacters,
    /// A number that does not follow the JSON grammar (leading zero,
    /// missing digits after `.` or an exponent).
    #[error("malformed number")]
    MalformedNumber,
    /// Something that starts like `true`, `false` or `null` but is not.
    #[error("expected 'true', 'false' or 'null'")]
    MalformedConstant,
    /// An object key that is not a string.
    #[error("object keys must be strings")]
    KeyMustBeString,
    /// A missing `:` between an object key and its value.
    #[error("expected ':' after object key")]
    ExpectedColon,
    /// A string body that cannot be decoded.
    #[error("invalid string: {0}")]
    Escape(#[from] EscapeError),
    /// Containers nested deeper than the configured limit.
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// A parse failure with its location: 1-based line, 0-based byte column
/// within that line. The first failure aborts the parse; no partial tree is
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at line {line} column {column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// 0-based byte offset within the line.
    pub column: usize,
}

/// Knobs for [`parse_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum container nesting depth. Opening a container at depth
    /// `max_depth + 1` fails with [`ErrorKind::DepthLimitExceeded`].
    ///
    /// # Default
    ///
    /// `64`
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_depth: 64 }
    }
}

/// What a byte can start. Pure data, built once at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteClass {
    Invalid,
    Space,
    Newline,
    Quote,
    Number,
    Constant,
    ArrayOpen,
    ArrayClose,
    ObjectOpen,
    ObjectClose,
    Comma,
    Colon,
}

static BYTE_CLASS: [ByteClass; 256] = build_byte_class();

const fn build_byte_class() -> [ByteClass; 256] {
    let mut table = [ByteClass::Invalid; 256];
    table[b' ' as usize] = ByteClass::Space;
    table[b'\t' as usize] = ByteClass::Space;
    table[b'\r' as usize] = ByteClass::Space;
    table[b'\n' as usize] = ByteClass::Newline;
    table[b'"' as usize] = ByteClass::Quote;
    table[b'-' as usize] = ByteClass::Number;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = ByteClass::Number;
        digit += 1;
    }
    table[b't' as usize] = ByteClass::Constant;
    table[b'f' as usize] = ByteClass::Constant;
    table[b'n' as usize] = ByteClass::Constant;
    table[b'[' as usize] = ByteClass::ArrayOpen;
    table[b']' as usize] = ByteClass::ArrayClose;
    table[b'{' as usize] = ByteClass::ObjectOpen;
    table[b'}' as usize] = ByteClass::ObjectClose;
    table[b',' as usize] = ByteClass::Comma;
    table[b':' as usize] = ByteClass::Colon;
    table
}

/// Parses a complete JSON document with default options.
///
/// The returned tree borrows `text`: strings without escapes and number
/// texts are slices of it. Use [`JsonDoc`](crate::JsonDoc) when the tree
/// must outlive the input, or call
/// [`take_ownership`](JsonValue::take_ownership) on the result.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first deviation from the JSON grammar,
/// on empty input, and on trailing non-whitespace.
pub fn parse(text: &str) -> Result<JsonValue<'_>, ParseError> {
    parse_with_options(text, ParseOptions::default())
}

/// [`parse`] with explicit [`ParseOptions`].
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(text: &str, options: ParseOptions) -> Result<JsonValue<'_>, ParseError> {
    let mut parser = Parser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        line: 1,
        line_start: 0,
        depth: 0,
        max_depth: options.max_depth,
        values: Vec::new(),
        keys: Vec::new(),
    };
    parser.skip_whitespace();
    if parser.pos == parser.bytes.len() {
        return Err(parser.error(ErrorKind::UnexpectedEnd));
    }
    let root = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(parser.error(ErrorKind::TrailingCharacters));
    }
    Ok(root)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    depth: usize,
    max_depth: usize,
    // Scratch stacks shared by every nesting level; each container remembers
    // the length at which its slice starts and drains from there when it
    // closes.
    values: Vec<JsonValue<'a>>,
    keys: Vec<JsonStr<'a>>,
}

impl<'a> Parser<'a> {
    fn error(&self, kind: ErrorKind) -> ParseError {
        self.error_at(self.pos, kind)
    }

    fn error_at(&self, pos: usize, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
            column: pos - self.line_start,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// The error for a byte no production starts with: the full character,
    /// not its first UTF-8 byte.
    fn unexpected(&self) -> ParseError {
        match self.text[self.pos..].chars().next() {
            Some(c) => self.error(ErrorKind::UnexpectedCharacter(c)),
            None => self.error(ErrorKind::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            match BYTE_CLASS[byte as usize] {
                ByteClass::Space => self.pos += 1,
                ByteClass::Newline => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<JsonValue<'a>, ParseError> {
        let Some(byte) = self.peek() else {
            return Err(self.error(ErrorKind::UnexpectedEnd));
        };
        match BYTE_CLASS[byte as usize] {
            ByteClass::Quote => Ok(JsonValue::String(self.parse_string()?)),
            ByteClass::Number => Ok(JsonValue::Number(self.parse_number()?)),
            ByteClass::Constant => Ok(self.parse_constant()?),
            ByteClass::ArrayOpen => self.parse_array(),
            ByteClass::ObjectOpen => self.parse_object(),
            _ => Err(self.unexpected()),
        }
    }

    /// Scans a string starting at its opening quote and decodes the body
    /// eagerly. Bodies without escapes borrow the input.
    ///
    /// Escape sequences are validated during the scan so the error points
    /// at the offending byte. The decoder afterwards can only fail on
    /// surrogate pairing, which spans sequences; those errors point at the
    /// opening quote.
    fn parse_string(&mut self) -> Result<JsonStr<'a>, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let body_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error(ErrorKind::UnexpectedEnd)),
                Some(b'"') => break,
                Some(b'\\') => self.scan_escape()?,
                Some(byte) if byte <= 0x1F => {
                    return Err(self.error(EscapeError::RawControlCharacter(byte).into()));
                }
                Some(_) => self.pos += 1,
            }
        }
        let body = &self.text[body_start..self.pos];
        self.pos += 1;
        match unescape(body) {
            Ok(Unescaped::Untouched(s)) => Ok(JsonStr::borrowed(s)),
            Ok(Unescaped::Decoded(s)) => Ok(JsonStr::owned(s)),
            Err(e) => Err(self.error_at(open, e.into())),
        }
    }

    /// Validates one escape sequence with the cursor on its backslash and
    /// advances past it.
    fn scan_escape(&mut self) -> Result<(), ParseError> {
        let escape_pos = self.pos;
        match self.bytes.get(self.pos + 1).copied() {
            None => {
                self.pos = self.bytes.len();
                Err(self.error(ErrorKind::UnexpectedEnd))
            }
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.pos += 2;
                Ok(())
            }
            Some(b'u') => {
                for offset in 0..4 {
                    match self.bytes.get(self.pos + 2 + offset).copied() {
                        Some(digit) if digit.is_ascii_hexdigit() => {}
                        Some(b'"') | None => {
                            return Err(self.error_at(
                                escape_pos,
                                EscapeError::ShortUnicodeEscape.into(),
                            ));
                        }
                        Some(digit) => {
                            let c = self.text[self.pos + 2 + offset..]
                                .chars()
                                .next()
                                .unwrap_or(digit as char);
                            return Err(self.error_at(
                                self.pos + 2 + offset,
                                EscapeError::InvalidHexDigit(c).into(),
                            ));
                        }
                    }
                }
                self.pos += 6;
                Ok(())
            }
            Some(other) => {
                // Reported as the full character, not its first UTF-8 byte.
                let c = self.text[self.pos + 1..]
                    .chars()
                    .next()
                    .unwrap_or(other as char);
                Err(self.error_at(escape_pos, EscapeError::InvalidEscape(c).into()))
            }
        }
    }

    /// The number state machine: optional sign, integer part without
    /// leading zeros, optional fraction and exponent each requiring at
    /// least one digit. Keeps the source text and the int hint.
    fn parse_number(&mut self) -> Result<Number<'a>, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => return Err(self.error(ErrorKind::MalformedNumber)),
        }
        let mut int_like = true;
        if self.peek() == Some(b'.') {
            int_like = false;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::MalformedNumber));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            int_like = false;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::MalformedNumber));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        // Catches a leading zero followed by more digits ("01").
        if matches!(self.peek(), Some(b'0'..=b'9')) {
            return Err(self.error(ErrorKind::MalformedNumber));
        }
        let text = JsonStr::borrowed(&self.text[start..self.pos]);
        Ok(Number::from_text(text, int_like))
    }

    /// `true`, `false` and `null`, matched exactly and case-sensitively.
    fn parse_constant(&mut self) -> Result<JsonValue<'a>, ParseError> {
        let rest = &self.text[self.pos..];
        for (spelling, value) in [
            ("true", JsonValue::Bool(true)),
            ("false", JsonValue::Bool(false)),
            ("null", JsonValue::Null),
        ] {
            if rest.starts_with(spelling) {
                self.pos += spelling.len();
                return Ok(value);
            }
        }
        Err(self.error(ErrorKind::MalformedConstant))
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(ErrorKind::DepthLimitExceeded(self.max_depth)));
        }
        Ok(())
    }

    /// `[]` or `[v(,v)*]`; anything else is an error at the offending byte.
    fn parse_array(&mut self) -> Result<JsonValue<'a>, ParseError> {
        self.enter()?;
        self.pos += 1;
        let start = self.values.len();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(JsonValue::Array(Vec::new()));
        }
        loop {
            let element = self.parse_value()?;
            self.values.push(element);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.unexpected()),
                None => return Err(self.error(ErrorKind::UnexpectedEnd)),
            }
        }
        self.depth -= 1;
        Ok(JsonValue::Array(self.values.drain(start..).collect()))
    }

    /// `{}` or `{"k":v(,"k":v)*}`. A repeated key overwrites the earlier
    /// member in place, so the result has exactly one member per key.
    fn parse_object(&mut self) -> Result<JsonValue<'a>, ParseError> {
        self.enter()?;
        self.pos += 1;
        let keys_start = self.keys.len();
        let values_start = self.values.len();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(JsonValue::Object(Object::new()));
        }
        loop {
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.error(ErrorKind::KeyMustBeString)),
                None => return Err(self.error(ErrorKind::UnexpectedEnd)),
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(match self.peek() {
                    Some(_) => self.error(ErrorKind::ExpectedColon),
                    None => self.error(ErrorKind::UnexpectedEnd),
                });
            }
            self.pos += 1;
            self.skip_whitespace();
            let value = self.parse_value()?;
            self.keys.push(key);
            self.values.push(value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.unexpected()),
                None => return Err(self.error(ErrorKind::UnexpectedEnd)),
            }
        }
        self.depth -= 1;
        let mut object = Object::with_capacity(self.values.len() - values_start);
        let members = self
            .keys
            .drain(keys_start..)
            .zip(self.values.drain(values_start..));
        for (key, value) in members {
            object.insert(key, value);
        }
        Ok(JsonValue::Object(object))
    }
}
