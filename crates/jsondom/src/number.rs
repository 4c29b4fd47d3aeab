//! JSON number representation.
//!
//! Parsed numbers keep their source characters and defer binary conversion
//! until a read asks for it, so re-dumping a parsed document reproduces the
//! original spelling exactly. Programmatically built numbers store a binary
//! value and are formatted on output.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::text::JsonStr;

/// A JSON number, either as retained source text or as a binary value.
#[derive(Debug, Clone)]
pub enum Number<'a> {
    /// Parsed form: the exact characters from the input, plus a hint
    /// recorded during scanning. `int_like` is true when the text contained
    /// no `.`, `e` or `E`.
    Text {
        /// The number's source characters, e.g. `-12.5e3`.
        text: JsonStr<'a>,
        /// Whether the text spells an integer.
        int_like: bool,
    },
    /// A programmatic integer.
    Int(i64),
    /// A programmatic float.
    Float(f64),
}

impl<'a> Number<'a> {
    pub(crate) fn from_text(text: JsonStr<'a>, int_like: bool) -> Self {
        Number::Text { text, int_like }
    }

    /// True for integers: programmatic `i64` values and parsed text without
    /// a fraction or exponent.
    #[must_use]
    pub fn is_int(&self) -> bool {
        match self {
            Number::Text { int_like, .. } => *int_like,
            Number::Int(_) => true,
            Number::Float(_) => false,
        }
    }

    /// True when [`is_int`](Self::is_int) is false.
    #[must_use]
    pub fn is_float(&self) -> bool {
        !self.is_int()
    }

    /// The value as a float. Unparseable text reads as `0.0`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Text { text, .. } => text.as_str().parse().unwrap_or(0.0),
            Number::Int(i) => {
                #[allow(clippy::cast_precision_loss)]
                {
                    *i as f64
                }
            }
            Number::Float(f) => *f,
        }
    }

    /// The value as an integer. Float-shaped values truncate toward zero.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self {
            Number::Text { text, int_like } => {
                if *int_like {
                    text.as_str().parse().unwrap_or(0)
                } else {
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        text.as_str().parse::<f64>().unwrap_or(0.0) as i64
                    }
                }
            }
            Number::Int(i) => *i,
            #[allow(clippy::cast_possible_truncation)]
            Number::Float(f) => *f as i64,
        }
    }

    /// Writes the number the way the dumper and the creator both spell it:
    /// retained text verbatim, binary values formatted.
    pub(crate) fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Number::Text { text, .. } => out.write_str(text.as_str()),
            Number::Int(i) => write!(out, "{i}"),
            Number::Float(f) => out.write_str(&format_f64(*f)),
        }
    }

    pub(crate) fn refers_to_external_memory(&self) -> bool {
        match self {
            Number::Text { text, .. } => text.refers_to_external_memory(),
            Number::Int(_) | Number::Float(_) => false,
        }
    }

    pub(crate) fn take_ownership(&mut self) {
        if let Number::Text { text, .. } = self {
            text.take_ownership();
        }
    }

    pub(crate) fn into_owned(self) -> Number<'static> {
        match self {
            Number::Text { text, int_like } => Number::Text {
                text: text.into_owned(),
                int_like,
            },
            Number::Int(i) => Number::Int(i),
            Number::Float(f) => Number::Float(f),
        }
    }

    pub(crate) fn anchored(self, buffer: &Arc<str>) -> Number<'static> {
        match self {
            Number::Text { text, int_like } => Number::Text {
                text: text.anchored(buffer),
                int_like,
            },
            Number::Int(i) => Number::Int(i),
            Number::Float(f) => Number::Float(f),
        }
    }
}

impl PartialEq for Number<'_> {
    /// Two parsed numbers compare by their source text, so `1.0` and `1.00`
    /// differ. Every other combination compares numerically, as integers
    /// when both sides are integer-shaped.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Text { text: a, .. }, Number::Text { text: b, .. }) => a == b,
            _ => {
                if self.is_int() && other.is_int() {
                    self.as_i64() == other.as_i64()
                } else {
                    (self.as_f64() - other.as_f64()).abs() < f64::EPSILON
                }
            }
        }
    }
}

impl From<i64> for Number<'_> {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number<'_> {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Formats a float for JSON output.
///
/// Finite values use the shortest representation that round-trips, with at
/// least one digit after the decimal point so the result still reads back as
/// a float (`2.0`, never `2`). Zero, NaN and infinity are spelled `0.0`,
/// `nan` and `inf`.
pub(crate) fn format_f64(value: f64) -> String {
    use alloc::string::ToString;

    if value == 0.0 {
        return String::from("0.0");
    }
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from("inf");
    }
    let mut out = value.to_string();
    if !out.contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
    out
}
