//! Rendering a tree back to JSON text.
//!
//! One recursive traversal drives both styles. Values hold decoded text, so
//! strings and keys are re-escaped on the way out through the same codec the
//! parser used on the way in.

use alloc::string::String;
use core::fmt;

use crate::escape::write_escaped;
use crate::value::JsonValue;

/// How [`JsonValue::write_json`] lays out its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpStyle {
    /// No whitespace at all.
    #[default]
    Compact,
    /// One child per line, 4-space indent, `": "` after keys.
    Pretty,
}

impl JsonValue<'_> {
    /// The compact rendering.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, DumpStyle::Compact)
            .expect("writing to a String cannot fail");
        out
    }

    /// The pretty rendering.
    #[must_use]
    pub fn dump_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, DumpStyle::Pretty)
            .expect("writing to a String cannot fail");
        out
    }

    /// Writes the rendering to `out`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn write_json<W: fmt::Write>(&self, out: &mut W, style: DumpStyle) -> fmt::Result {
        write_value(self, out, style, 0)
    }
}

/// Compact rendering, same as [`JsonValue::dump`].
impl fmt::Display for JsonValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_json(f, DumpStyle::Compact)
    }
}

const INDENT: &str = "    ";

fn write_indent<W: fmt::Write>(out: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_string<W: fmt::Write>(text: &str, out: &mut W) -> fmt::Result {
    out.write_char('"')?;
    write_escaped(text, out)?;
    out.write_char('"')
}

fn write_value<W: fmt::Write>(
    value: &JsonValue<'_>,
    out: &mut W,
    style: DumpStyle,
    level: usize,
) -> fmt::Result {
    match value {
        JsonValue::Null => out.write_str("null"),
        JsonValue::Bool(true) => out.write_str("true"),
        JsonValue::Bool(false) => out.write_str("false"),
        JsonValue::Number(n) => n.write_to(out),
        JsonValue::String(s) => write_string(s.as_str(), out),
        JsonValue::Array(elements) => {
            if elements.is_empty() {
                return out.write_str("[]");
            }
            out.write_char('[')?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                if style == DumpStyle::Pretty {
                    out.write_char('\n')?;
                    write_indent(out, level + 1)?;
                }
                write_value(element, out, style, level + 1)?;
            }
            if style == DumpStyle::Pretty {
                out.write_char('\n')?;
                write_indent(out, level)?;
            }
            out.write_char(']')
        }
        JsonValue::Object(object) => {
            if object.is_empty() {
                return out.write_str("{}");
            }
            out.write_char('{')?;
            for (i, (key, member)) in object.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                if style == DumpStyle::Pretty {
                    out.write_char('\n')?;
                    write_indent(out, level + 1)?;
                }
                write_string(key.as_str(), out)?;
                out.write_str(if style == DumpStyle::Pretty { ": " } else { ":" })?;
                write_value(member, out, style, level + 1)?;
            }
            if style == DumpStyle::Pretty {
                out.write_char('\n')?;
                write_indent(out, level)?;
            }
            out.write_char('}')
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::parse;

    #[test]
    fn compact_has_no_whitespace() {
        let mut v = JsonValue::Null;
        v["a"] = JsonValue::from(1);
        v["b"].push(true);
        v["b"].push("x");
        assert_eq!(v.dump(), r#"{"a":1,"b":[true,"x"]}"#);
        assert_eq!(v.to_string(), v.dump());
    }

    #[test]
    fn parsed_documents_round_trip_compactly() {
        let text = r#"{"s":"a\nb","n":-12.50e2,"list":[1,2.0,null],"empty":{}}"#;
        assert_eq!(parse(text).unwrap().dump(), text);
    }

    #[test]
    fn pretty_layout() {
        let v = parse(r#"{"a":1,"b":[true],"c":{}}"#).unwrap();
        let expected = "{\n    \"a\": 1,\n    \"b\": [\n        true\n    ],\n    \"c\": {}\n}";
        assert_eq!(v.dump_pretty(), expected);
    }

    #[test]
    fn empty_containers_stay_on_one_line() {
        assert_eq!(parse("[]").unwrap().dump_pretty(), "[]");
        assert_eq!(parse("{}").unwrap().dump_pretty(), "{}");
    }

    #[test]
    fn strings_are_re_escaped() {
        let v = parse(r#""tab\tquote\" end""#).unwrap();
        assert_eq!(v.get_string(""), "tab\tquote\" end");
        assert_eq!(v.dump(), r#""tab\tquote\" end""#);
    }
}
