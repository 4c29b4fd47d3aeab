//! An in-memory JSON document model with a zero-copy parser.
//!
//! The crate offers two independent ways of producing JSON:
//!
//! - A mutable, dynamically-typed tree ([`JsonValue`]) built either by parsing
//!   text or programmatically. Parsing is zero-copy: string and number nodes
//!   reference slices of the input buffer and only allocate when a string
//!   actually contains escape sequences. [`JsonDoc`] bundles a tree together
//!   with a retained copy of its source text when the caller's buffer cannot
//!   be kept alive.
//! - A streaming text builder ([`ObjectCreator`] / [`ArrayCreator`]) that
//!   appends directly to a growing string without materializing a tree.
//!
//! # Examples
//!
//! ```
//! use jsondom::JsonValue;
//!
//! let tree = jsondom::parse(r#"{"one":1,"two":[1,2,3]}"#).unwrap();
//! assert_eq!(tree["two"][1].get_int(0), 2);
//! assert_eq!(tree.dump(), r#"{"one":1,"two":[1,2,3]}"#);
//!
//! let mut built = JsonValue::Null;
//! built["name"] = JsonValue::from("jsondom");
//! built["tags"].push(1);
//! assert_eq!(built.dump(), r#"{"name":"jsondom","tags":[1]}"#);
//! ```
#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod creator;
mod doc;
mod dump;
mod escape;
mod number;
mod object;
mod parser;
mod text;
mod value;

#[cfg(test)]
mod tests;

pub use creator::{ArrayCreator, CreateValue, Null, ObjectCreator};
pub use doc::JsonDoc;
pub use dump::DumpStyle;
pub use escape::{escape, unescape, EscapeError, Escaped, Unescaped};
pub use number::Number;
pub use object::Object;
pub use parser::{parse, parse_with_options, ErrorKind, ParseError, ParseOptions};
pub use text::JsonStr;
pub use value::{FromJson, JsonValue, ValueKind};
