//! The JSON escape codec.
//!
//! Both directions share the same "touch nothing unless necessary" contract:
//! scanning returns the input slice unchanged when no work is needed, so the
//! common no-escape case stays zero-copy. The tree's dumper and the streaming
//! creator both emit strings through [`write_escaped`], which keeps their
//! output textually interchangeable.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Errors produced while decoding a JSON-escaped string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// A backslash was the last character of the input.
    #[error("escape character '\\' is the last character")]
    TruncatedEscape,
    /// The character following a backslash is not one of the eight
    /// escapable characters or `u`.
    #[error("'\\{0}' is not a valid escape sequence")]
    InvalidEscape(char),
    /// Fewer than four characters followed `\u`.
    #[error("unicode escape must be followed by 4 hex digits")]
    ShortUnicodeEscape,
    /// A non-hex character appeared inside a `\uXXXX` escape.
    #[error("'{0}' is not a hex digit")]
    InvalidHexDigit(char),
    /// A high surrogate without a following low surrogate, a lone low
    /// surrogate, or a combination outside the Unicode range.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
    /// A raw control byte (<= 0x1F) that must be escaped in JSON text.
    #[error("control character 0x{0:02X} must be escaped")]
    RawControlCharacter(u8),
}

/// Result of [`unescape`]: either the input needed no work, or it was decoded
/// into a fresh string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unescaped<'a> {
    /// No escape sequence found; the original text may be used unchanged.
    Untouched(&'a str),
    /// Escapes were found and decoded.
    Decoded(String),
}

impl Unescaped<'_> {
    /// View of the decoded text, whichever variant holds it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Unescaped::Untouched(s) => s,
            Unescaped::Decoded(s) => s,
        }
    }
}

/// Result of [`escape`], mirroring [`Unescaped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escaped<'a> {
    /// Nothing in the input needs escaping.
    Untouched(&'a str),
    /// At least one character was escaped.
    Escaped(String),
}

impl Escaped<'_> {
    /// View of the escaped text, whichever variant holds it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Escaped::Untouched(s) => s,
            Escaped::Escaped(s) => s,
        }
    }
}

const fn is_high_surrogate(code_point: u32) -> bool {
    code_point >= 0xD800 && code_point <= 0xDBFF
}

const fn is_low_surrogate(code_point: u32) -> bool {
    code_point >= 0xDC00 && code_point <= 0xDFFF
}

fn parse_hex4(bytes: &[u8], at: usize) -> Result<u32, EscapeError> {
    let Some(digits) = bytes.get(at..at + 4) else {
        return Err(EscapeError::ShortUnicodeEscape);
    };
    let mut code_point = 0u32;
    for &digit in digits {
        code_point <<= 4;
        code_point |= match digit {
            b'0'..=b'9' => u32::from(digit - b'0'),
            b'a'..=b'f' => u32::from(digit - b'a') + 0xA,
            b'A'..=b'F' => u32::from(digit - b'A') + 0xA,
            other => return Err(EscapeError::InvalidHexDigit(char::from(other))),
        };
    }
    Ok(code_point)
}

/// Decodes `\uXXXX` at `bytes[at..]` (the four hex digits start at `at`),
/// combining a surrogate pair when present. Returns the code point and the
/// number of bytes consumed (4 or 10).
fn decode_unicode_escape(bytes: &[u8], at: usize) -> Result<(char, usize), EscapeError> {
    let first = parse_hex4(bytes, at)?;
    if is_low_surrogate(first) {
        return Err(EscapeError::UnpairedSurrogate(first));
    }
    let (code_point, consumed) = if is_high_surrogate(first) {
        if bytes.get(at + 4) != Some(&b'\\') || bytes.get(at + 5) != Some(&b'u') {
            return Err(EscapeError::UnpairedSurrogate(first));
        }
        let second = parse_hex4(bytes, at + 6)?;
        if !is_low_surrogate(second) {
            return Err(EscapeError::UnpairedSurrogate(second));
        }
        (
            0x10000 + (((first & 0x03FF) << 10) | (second & 0x03FF)),
            10,
        )
    } else {
        (first, 4)
    };
    match char::from_u32(code_point) {
        Some(c) => Ok((c, consumed)),
        None => Err(EscapeError::UnpairedSurrogate(code_point)),
    }
}

/// Decodes the JSON escape sequences in `text`.
///
/// The fast path scans for the first backslash or raw control byte; if none
/// is found the original slice is returned as [`Unescaped::Untouched`] and no
/// allocation happens. Surrogate pairs (`\uD83C\uDFE1`) combine into a single
/// code point before re-encoding as UTF-8.
///
/// # Errors
///
/// Returns an [`EscapeError`] for truncated or invalid escapes, unpaired
/// surrogates, and raw control bytes.
pub fn unescape(text: &str) -> Result<Unescaped<'_>, EscapeError> {
    let bytes = text.as_bytes();
    let first = match bytes.iter().position(|&b| b == b'\\' || b <= 0x1F) {
        None => return Ok(Unescaped::Untouched(text)),
        Some(i) => i,
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut i = first;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte == b'\\' {
            let Some(&escape_char) = bytes.get(i + 1) else {
                return Err(EscapeError::TruncatedEscape);
            };
            i += 2;
            match escape_char {
                b'"' => out.push('"'),
                b'\\' => out.push('\\'),
                b'/' => out.push('/'),
                b'b' => out.push('\u{0008}'),
                b'f' => out.push('\u{000C}'),
                b'n' => out.push('\n'),
                b'r' => out.push('\r'),
                b't' => out.push('\t'),
                b'u' => {
                    let (c, consumed) = decode_unicode_escape(bytes, i)?;
                    out.push(c);
                    i += consumed;
                }
                other => return Err(EscapeError::InvalidEscape(char::from(other))),
            }
        } else if byte <= 0x1F {
            return Err(EscapeError::RawControlCharacter(byte));
        } else {
            // Copy the run up to the next backslash or control byte in one
            // go. Both stop bytes are ASCII, so the run ends on a character
            // boundary.
            let run_end = bytes[i..]
                .iter()
                .position(|&b| b == b'\\' || b <= 0x1F)
                .map_or(bytes.len(), |n| i + n);
            out.push_str(&text[i..run_end]);
            i = run_end;
        }
    }
    Ok(Unescaped::Decoded(out))
}

const fn escape_for(byte: u8) -> Option<&'static str> {
    match byte {
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        0x08 => Some("\\b"),
        0x0C => Some("\\f"),
        b'\n' => Some("\\n"),
        b'\r' => Some("\\r"),
        b'\t' => Some("\\t"),
        _ => None,
    }
}

const fn needs_escape(byte: u8) -> bool {
    byte <= 0x1F || byte == b'"' || byte == b'\\'
}

/// Writes `text` to `out` with JSON escapes applied.
///
/// The named control characters get their two-character escapes, remaining
/// control bytes get `\u00XX`, everything else is copied verbatim.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_escaped<W: fmt::Write>(text: &str, out: &mut W) -> fmt::Result {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let run_end = bytes[i..]
            .iter()
            .position(|&b| needs_escape(b))
            .map_or(bytes.len(), |n| i + n);
        out.write_str(&text[i..run_end])?;
        i = run_end;
        if let Some(&byte) = bytes.get(i) {
            match escape_for(byte) {
                Some(two_chars) => out.write_str(two_chars)?,
                None => write!(out, "\\u{:04X}", u32::from(byte))?,
            }
            i += 1;
        }
    }
    Ok(())
}

/// Escapes `text` for inclusion in a JSON string literal.
///
/// Returns [`Escaped::Untouched`] without allocating when nothing needs to be
/// escaped.
#[must_use]
pub fn escape(text: &str) -> Escaped<'_> {
    if !text.as_bytes().iter().any(|&b| needs_escape(b)) {
        return Escaped::Untouched(text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    write_escaped(text, &mut out).expect("writing to a String cannot fail");
    Escaped::Escaped(out)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn untouched_when_no_escapes() {
        assert_eq!(unescape("plain text"), Ok(Unescaped::Untouched("plain text")));
        assert_eq!(escape("plain text"), Escaped::Untouched("plain text"));
    }

    #[test]
    fn simple_escapes_decode() {
        let decoded = unescape("a\\\"b\\\\c\\/d\\ne\\tf").unwrap();
        assert_eq!(decoded.as_str(), "a\"b\\c/d\ne\tf");
    }

    #[test]
    fn unicode_escape_bmp() {
        assert_eq!(unescape("\\u0041").unwrap().as_str(), "A");
        assert_eq!(unescape("\\u00E9").unwrap().as_str(), "\u{00E9}");
        assert_eq!(unescape("\\u05D0").unwrap().as_str(), "\u{05D0}");
    }

    #[test]
    fn surrogate_pair_combines() {
        // U+1F3E1 HOUSE WITH GARDEN, 4-byte UTF-8.
        let decoded = unescape("\\uD83C\\uDFE1").unwrap();
        assert_eq!(decoded.as_str(), "\u{1F3E1}");
        assert_eq!(decoded.as_str().len(), 4);
    }

    #[test]
    fn lone_surrogates_fail() {
        assert_eq!(
            unescape("\\uD83C"),
            Err(EscapeError::UnpairedSurrogate(0xD83C))
        );
        assert_eq!(
            unescape("\\uDFE1"),
            Err(EscapeError::UnpairedSurrogate(0xDFE1))
        );
        assert_eq!(
            unescape("\\uD83CAB"),
            Err(EscapeError::UnpairedSurrogate(0xD83C))
        );
    }

    #[test]
    fn invalid_escapes_fail() {
        assert_eq!(unescape("\\x"), Err(EscapeError::InvalidEscape('x')));
        assert_eq!(unescape("tail\\"), Err(EscapeError::TruncatedEscape));
        assert_eq!(unescape("\\u12"), Err(EscapeError::ShortUnicodeEscape));
        assert_eq!(unescape("\\u12G4"), Err(EscapeError::InvalidHexDigit('G')));
        assert_eq!(
            unescape("a\u{0001}b"),
            Err(EscapeError::RawControlCharacter(0x01))
        );
    }

    #[test]
    fn escape_control_characters() {
        assert_eq!(escape("a\nb").as_str(), "a\\nb");
        assert_eq!(escape("q\"q").as_str(), "q\\\"q");
        assert_eq!(escape("\u{0001}").as_str(), "\\u0001");
    }

    #[test]
    fn escape_then_unescape_round_trips() {
        let raw = "tab\t newline\n quote\" backslash\\ unicode \u{00E9} \u{1F3E1}";
        let escaped = escape(raw).as_str().to_string();
        assert_eq!(unescape(&escaped).unwrap().as_str(), raw);
    }

    #[test]
    fn unescape_then_escape_is_stable() {
        // Already-escaped bodies that use the canonical escape choices come
        // back byte-for-byte.
        for body in ["a\\nb", "say \\\"hi\\\"", "back\\\\slash", "plain"] {
            let decoded = unescape(body).unwrap();
            assert_eq!(escape(decoded.as_str()).as_str(), body);
        }
    }
}
