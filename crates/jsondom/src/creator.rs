//! Streaming creation of JSON text without building a tree.
//!
//! An [`ObjectCreator`] or [`ArrayCreator`] appends directly to a growing
//! string. The buffer ends with the full chain of closing brackets at all
//! times, so `as_str()` is well-formed JSON after every append; each append
//! truncates that tail, writes, and puts it back. Nested levels hand out
//! sub-builders that borrow the same buffer, which keeps appends at the
//! right level by construction: while a sub-builder lives, its parent is
//! inaccessible.
//!
//! Strings go through the same escape codec and floats through the same
//! formatting as the tree dumper, so creator output and dumper output are
//! interchangeable for the same logical values.

use alloc::string::String;

use crate::escape::write_escaped;
use crate::number::format_f64;

/// A value the creators can append: booleans, integers, floats, strings
/// and [`Null`].
pub trait CreateValue {
    /// Appends the JSON spelling of `self` to `out`.
    fn write_value(&self, out: &mut String);
}

/// The JSON `null` for [`CreateValue`] positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl CreateValue for Null {
    fn write_value(&self, out: &mut String) {
        out.push_str("null");
    }
}

impl CreateValue for bool {
    fn write_value(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

macro_rules! create_integer {
    ($($ty:ty),*) => {
        $(impl CreateValue for $ty {
            fn write_value(&self, out: &mut String) {
                use core::fmt::Write;
                write!(out, "{self}").expect("writing to a String cannot fail");
            }
        })*
    };
}

create_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl CreateValue for f64 {
    fn write_value(&self, out: &mut String) {
        out.push_str(&format_f64(*self));
    }
}

impl CreateValue for f32 {
    fn write_value(&self, out: &mut String) {
        out.push_str(&format_f64(f64::from(*self)));
    }
}

impl CreateValue for &str {
    fn write_value(&self, out: &mut String) {
        write_quoted(out, self);
    }
}

impl CreateValue for String {
    fn write_value(&self, out: &mut String) {
        write_quoted(out, self);
    }
}

impl<T: CreateValue + ?Sized> CreateValue for &T {
    fn write_value(&self, out: &mut String) {
        (**self).write_value(out);
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    write_escaped(text, out).expect("writing to a String cannot fail");
    out.push('"');
}

enum Buf<'b> {
    Owned(String),
    Borrowed(&'b mut String),
}

impl Buf<'_> {
    fn get(&self) -> &String {
        match self {
            Buf::Owned(s) => s,
            Buf::Borrowed(s) => s,
        }
    }

    fn get_mut(&mut self) -> &mut String {
        match self {
            Buf::Owned(s) => s,
            Buf::Borrowed(s) => s,
        }
    }
}

/// One nesting level of creator state: where this level's opener sits and
/// the closer chain that must stay at the end of the buffer.
struct Level<'b> {
    buffer: Buf<'b>,
    /// Byte index of this level's opening bracket.
    start: usize,
    /// This level's closer followed by every ancestor closer, e.g. `"}]}"`.
    tail: String,
    opener: char,
}

impl<'b> Level<'b> {
    fn top(opener: char, closer: char, capacity: usize) -> Level<'static> {
        let mut buffer = String::with_capacity(capacity.max(2));
        buffer.push(opener);
        buffer.push(closer);
        let mut tail = String::new();
        tail.push(closer);
        Level {
            buffer: Buf::Owned(buffer),
            start: 0,
            tail,
            opener,
        }
    }

    /// Removes the closer chain, lets `write` append one element (with a
    /// separating comma when needed), and restores the chain.
    fn splice(&mut self, write: impl FnOnce(&mut String)) {
        let tail_len = self.tail.len();
        let buffer = self.buffer.get_mut();
        buffer.truncate(buffer.len() - tail_len);
        // After truncation the buffer ends with this level's opener exactly
        // when the level is still empty; no complete value ends with an
        // opening bracket.
        if !buffer.ends_with(self.opener) {
            buffer.push(',');
        }
        write(buffer);
        buffer.push_str(&self.tail);
    }

    /// Opens a child container and returns its level, borrowing the buffer.
    fn open_child(&mut self, prefix: impl FnOnce(&mut String), opener: char, closer: char) -> Level<'_> {
        let mut child_start = 0;
        self.splice(|buffer| {
            prefix(buffer);
            child_start = buffer.len();
            buffer.push(opener);
            buffer.push(closer);
        });
        let mut tail = String::with_capacity(self.tail.len() + 1);
        tail.push(closer);
        tail.push_str(&self.tail);
        Level {
            buffer: Buf::Borrowed(self.buffer.get_mut()),
            start: child_start,
            tail,
            opener,
        }
    }

    /// This level's text, opener through closer.
    fn as_str(&self) -> &str {
        let buffer = self.buffer.get();
        &buffer[self.start..buffer.len() - self.tail.len() + 1]
    }

    /// Drops everything appended at this level.
    fn clear(&mut self) {
        let start = self.start;
        let buffer = self.buffer.get_mut();
        buffer.truncate(start + 1);
        buffer.push_str(&self.tail);
    }
}

/// Streams a JSON object into a growing string.
///
/// ```
/// use jsondom::{ObjectCreator, Null};
///
/// let mut obj = ObjectCreator::new();
/// obj.append_value("name", "mitzi");
/// obj.append_value("none", Null);
/// {
///     let mut sizes = obj.append_array("sizes");
///     sizes.append_value(2.5);
///     sizes.append_value(3.0);
/// }
/// assert_eq!(obj.as_str(), r#"{"name":"mitzi","none":null,"sizes":[2.5,3.0]}"#);
/// ```
pub struct ObjectCreator<'b> {
    level: Level<'b>,
}

impl ObjectCreator<'static> {
    /// An empty object: `{}`.
    #[must_use]
    pub fn new() -> Self {
        ObjectCreator {
            level: Level::top('{', '}', 0),
        }
    }

    /// An empty object with buffer room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ObjectCreator {
            level: Level::top('{', '}', capacity),
        }
    }
}

impl Default for ObjectCreator<'static> {
    fn default() -> Self {
        ObjectCreator::new()
    }
}

impl<'b> ObjectCreator<'b> {
    /// Appends one `"key": value` member.
    pub fn append_value(&mut self, key: &str, value: impl CreateValue) {
        self.level.splice(|buffer| {
            write_quoted(buffer, key);
            buffer.push(':');
            value.write_value(buffer);
        });
    }

    /// Opens a nested object under `key` and returns its builder. The
    /// parent is unusable until the builder goes out of scope.
    pub fn append_object(&mut self, key: &str) -> ObjectCreator<'_> {
        ObjectCreator {
            level: self.level.open_child(
                |buffer| {
                    write_quoted(buffer, key);
                    buffer.push(':');
                },
                '{',
                '}',
            ),
        }
    }

    /// Opens a nested array under `key` and returns its builder.
    pub fn append_array(&mut self, key: &str) -> ArrayCreator<'_> {
        ArrayCreator {
            level: self.level.open_child(
                |buffer| {
                    write_quoted(buffer, key);
                    buffer.push(':');
                },
                '[',
                ']',
            ),
        }
    }

    /// Appends `fragment` verbatim as the value of `key`. The fragment is
    /// trusted to be well-formed JSON.
    pub fn push_json_fragment(&mut self, key: &str, fragment: &str) {
        self.level.splice(|buffer| {
            write_quoted(buffer, key);
            buffer.push(':');
            buffer.push_str(fragment);
        });
    }

    /// Splices every member of `other` into this object.
    pub fn merge(&mut self, other: &ObjectCreator<'_>) {
        let interior = &other.as_str()[1..other.as_str().len() - 1];
        if !interior.is_empty() {
            self.level.splice(|buffer| buffer.push_str(interior));
        }
    }

    /// Appends every `(key, value)` pair of an iterator.
    pub fn extend<K, V, I>(&mut self, members: I)
    where
        K: AsRef<str>,
        V: CreateValue,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in members {
            self.append_value(key.as_ref(), value);
        }
    }

    /// The object as JSON text, well-formed at every point.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.level.as_str()
    }

    /// Byte length of [`as_str`](Self::as_str).
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// True when no member has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 2
    }

    /// Drops every member appended so far.
    pub fn clear(&mut self) {
        self.level.clear();
    }
}

/// Streams a JSON array into a growing string; the array counterpart of
/// [`ObjectCreator`].
pub struct ArrayCreator<'b> {
    level: Level<'b>,
}

impl ArrayCreator<'static> {
    /// An empty array: `[]`.
    #[must_use]
    pub fn new() -> Self {
        ArrayCreator {
            level: Level::top('[', ']', 0),
        }
    }

    /// An empty array with buffer room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ArrayCreator {
            level: Level::top('[', ']', capacity),
        }
    }
}

impl Default for ArrayCreator<'static> {
    fn default() -> Self {
        ArrayCreator::new()
    }
}

impl<'b> ArrayCreator<'b> {
    /// Appends one element.
    pub fn append_value(&mut self, value: impl CreateValue) {
        self.level.splice(|buffer| value.write_value(buffer));
    }

    /// Opens a nested object element and returns its builder.
    pub fn append_object(&mut self) -> ObjectCreator<'_> {
        ObjectCreator {
            level: self.level.open_child(|_| {}, '{', '}'),
        }
    }

    /// Opens a nested array element and returns its builder.
    pub fn append_array(&mut self) -> ArrayCreator<'_> {
        ArrayCreator {
            level: self.level.open_child(|_| {}, '[', ']'),
        }
    }

    /// Appends `fragment` verbatim as one element. The fragment is trusted
    /// to be well-formed JSON.
    pub fn push_json_fragment(&mut self, fragment: &str) {
        self.level.splice(|buffer| buffer.push_str(fragment));
    }

    /// Splices every element of `other` into this array.
    pub fn merge(&mut self, other: &ArrayCreator<'_>) {
        let interior = &other.as_str()[1..other.as_str().len() - 1];
        if !interior.is_empty() {
            self.level.splice(|buffer| buffer.push_str(interior));
        }
    }

    /// Appends every value of an iterator.
    pub fn extend<V: CreateValue, I: IntoIterator<Item = V>>(&mut self, values: I) {
        for value in values {
            self.append_value(value);
        }
    }

    /// The array as JSON text, well-formed at every point.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.level.as_str()
    }

    /// Byte length of [`as_str`](Self::as_str).
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// True when no element has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 2
    }

    /// Drops every element appended so far.
    pub fn clear(&mut self) {
        self.level.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn starts_well_formed_and_stays_well_formed() {
        let mut obj = ObjectCreator::new();
        assert_eq!(obj.as_str(), "{}");
        assert!(obj.is_empty());

        obj.append_value("a", 1);
        assert_eq!(obj.as_str(), r#"{"a":1}"#);
        obj.append_value("b", true);
        assert_eq!(obj.as_str(), r#"{"a":1,"b":true}"#);
        assert!(!obj.is_empty());
    }

    #[test]
    fn scalar_spellings() {
        let mut arr = ArrayCreator::new();
        arr.append_value(Null);
        arr.append_value(false);
        arr.append_value(-7);
        arr.append_value(2.0);
        arr.append_value("text with \"quotes\"");
        assert_eq!(arr.as_str(), r#"[null,false,-7,2.0,"text with \"quotes\""]"#);
    }

    #[test]
    fn nested_builders_write_at_their_level() {
        let mut obj = ObjectCreator::new();
        obj.append_value("id", 1);
        {
            let mut inner = obj.append_object("inner");
            inner.append_value("x", 10);
            {
                let mut list = inner.append_array("list");
                list.append_value(1);
                list.append_value(2);
                assert_eq!(list.as_str(), "[1,2]");
            }
            inner.append_value("y", 20);
        }
        obj.append_value("after", true);
        assert_eq!(
            obj.as_str(),
            r#"{"id":1,"inner":{"x":10,"list":[1,2],"y":20},"after":true}"#
        );
    }

    #[test]
    fn opening_a_child_keeps_the_buffer_closed() {
        let mut obj = ObjectCreator::new();
        {
            let inner = obj.append_object("empty");
            assert_eq!(inner.as_str(), "{}");
        }
        {
            let mut list = obj.append_array("list");
            list.append_value(1);
            assert_eq!(list.as_str(), "[1]");
        }
        // No stray comma before the first child element, closers intact.
        assert_eq!(obj.as_str(), r#"{"empty":{},"list":[1]}"#);
    }

    #[test]
    fn buffer_is_valid_json_mid_nesting() {
        let mut obj = ObjectCreator::new();
        let mut inner = obj.append_object("nested");
        inner.append_value("k", 1);
        // Closers for every open level are present in the text.
        assert_eq!(inner.as_str(), r#"{"k":1}"#);
    }

    #[test]
    fn fragments_and_merge() {
        let mut part = ObjectCreator::new();
        part.append_value("from", "part");

        let mut obj = ObjectCreator::new();
        obj.push_json_fragment("raw", r#"[1,{"deep":null}]"#);
        obj.merge(&part);
        assert_eq!(
            obj.as_str(),
            r#"{"raw":[1,{"deep":null}],"from":"part"}"#
        );

        let empty = ObjectCreator::new();
        obj.merge(&empty);
        assert_eq!(
            obj.as_str(),
            r#"{"raw":[1,{"deep":null}],"from":"part"}"#
        );
    }

    #[test]
    fn extend_appends_in_order() {
        let mut arr = ArrayCreator::new();
        arr.extend(vec![1, 2, 3]);
        assert_eq!(arr.as_str(), "[1,2,3]");

        let mut obj = ObjectCreator::new();
        obj.extend([("a", 1), ("b", 2)]);
        assert_eq!(obj.as_str(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut arr = ArrayCreator::new();
        arr.extend([1, 2]);
        arr.clear();
        assert_eq!(arr.as_str(), "[]");
        arr.append_value(9);
        assert_eq!(arr.as_str(), "[9]");
    }

    #[test]
    fn keys_and_strings_are_escaped() {
        let mut obj = ObjectCreator::new();
        obj.append_value("line\nbreak", "tab\there");
        assert_eq!(obj.as_str(), "{\"line\\nbreak\":\"tab\\there\"}");
    }
}
