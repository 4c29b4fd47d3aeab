//! The value node: a tagged union over the six JSON kinds.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops;

use crate::number::Number;
use crate::object::Object;
use crate::text::JsonStr;

/// The six JSON kinds, without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

/// A JSON value: exactly one kind is active at a time, and re-assignment
/// drops the previous payload, children included.
///
/// `Clone` produces a deep, fully-owning copy: no clone borrows the source
/// buffer its original was parsed from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue<'a> {
    /// `null`, the default.
    #[default]
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A number, see [`Number`].
    Number(Number<'a>),
    /// Decoded string text, see [`JsonStr`].
    String(JsonStr<'a>),
    /// An ordered list of values.
    Array(Vec<JsonValue<'a>>),
    /// Insertion-ordered members, see [`Object`].
    Object(Object<'a>),
}

/// Shared placeholder returned by read indexing on any miss or shape
/// mismatch.
static NULL: JsonValue<'static> = JsonValue::Null;

impl<'a> JsonValue<'a> {
    /// An empty value of the given kind: `0` for numbers, `""` for strings,
    /// `false`, `[]`, `{}`.
    #[must_use]
    pub fn of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Null => JsonValue::Null,
            ValueKind::Bool => JsonValue::Bool(false),
            ValueKind::Number => JsonValue::Number(Number::Int(0)),
            ValueKind::String => JsonValue::String(JsonStr::EMPTY),
            ValueKind::Array => JsonValue::Array(Vec::new()),
            ValueKind::Object => JsonValue::Object(Object::new()),
        }
    }

    /// The active kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Null => ValueKind::Null,
            JsonValue::Bool(_) => ValueKind::Bool,
            JsonValue::Number(_) => ValueKind::Number,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::Object(_) => ValueKind::Object,
        }
    }

    /// True for `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// True for `true` / `false`.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// True for any number.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// True for integer-shaped numbers.
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, JsonValue::Number(n) if n.is_int())
    }

    /// True for float-shaped numbers.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, JsonValue::Number(n) if n.is_float())
    }

    /// True for strings.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// True for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// True for objects.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// True for everything that is not a container.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonValue::Array(_) | JsonValue::Object(_))
    }

    /// The string content, or `default` when this is not a string.
    #[must_use]
    pub fn get_string<'s>(&'s self, default: &'s str) -> &'s str {
        match self {
            JsonValue::String(s) => s.as_str(),
            _ => default,
        }
    }

    /// The number as an integer, or `default` when this is not a number.
    #[must_use]
    pub fn get_int(&self, default: i64) -> i64 {
        match self {
            JsonValue::Number(n) => n.as_i64(),
            _ => default,
        }
    }

    /// The number as a float, or `default` when this is not a number.
    #[must_use]
    pub fn get_float(&self, default: f64) -> f64 {
        match self {
            JsonValue::Number(n) => n.as_f64(),
            _ => default,
        }
    }

    /// The boolean, or `default` when this is not a boolean.
    #[must_use]
    pub fn get_bool(&self, default: bool) -> bool {
        match self {
            JsonValue::Bool(b) => *b,
            _ => default,
        }
    }

    /// Best-effort conversion to `T`, coercing across kinds; see the
    /// [`FromJson`] impls for the exact rules. Never fails, falls back to
    /// `T`'s zero value.
    #[must_use]
    pub fn get_as<T: FromJson>(&self) -> T {
        T::from_json(self)
    }

    /// The size this value has *when viewed as* `kind`: member or element
    /// count for containers, byte length for strings, 1 for the other
    /// scalars. A kind mismatch reads as 0.
    #[must_use]
    pub fn size_as(&self, kind: ValueKind) -> usize {
        if self.kind() != kind {
            return 0;
        }
        match self {
            JsonValue::Array(a) => a.len(),
            JsonValue::Object(o) => o.len(),
            JsonValue::String(s) => s.len(),
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => 1,
        }
    }

    /// `size_as(kind) == 0`; a kind mismatch reads as empty.
    #[must_use]
    pub fn empty_as(&self, kind: ValueKind) -> bool {
        self.size_as(kind) == 0
    }

    /// Element or member count for containers, byte length for strings,
    /// 0 for `null`, 1 for the other scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            JsonValue::Null => 0,
            _ => self.size_as(self.kind()),
        }
    }

    /// `len() == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The member under `key`, when this is an object that has it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue<'a>> {
        match self {
            JsonValue::Object(o) => o.get(key),
            _ => None,
        }
    }

    /// Mutable access to the member under `key`, when this is an object
    /// that has it.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue<'a>> {
        match self {
            JsonValue::Object(o) => o.get_mut(key),
            _ => None,
        }
    }

    /// The element at `pos`, when this is an array that long.
    #[must_use]
    pub fn get_index(&self, pos: usize) -> Option<&JsonValue<'a>> {
        match self {
            JsonValue::Array(a) => a.get(pos),
            _ => None,
        }
    }

    /// Mutable access to the element at `pos`, when this is an array that
    /// long.
    pub fn get_index_mut(&mut self, pos: usize) -> Option<&mut JsonValue<'a>> {
        match self {
            JsonValue::Array(a) => a.get_mut(pos),
            _ => None,
        }
    }

    /// Appends to an array. A `null` value becomes a one-element array
    /// first; anything else that is not an array ignores the push.
    pub fn push(&mut self, value: impl Into<JsonValue<'a>>) {
        if self.is_null() {
            *self = JsonValue::Array(Vec::new());
        }
        if let JsonValue::Array(a) = self {
            a.push(value.into());
        }
    }

    /// Removes the member under `key` and returns how many members were
    /// removed (0 or 1). Not an object: 0.
    pub fn remove(&mut self, key: &str) -> usize {
        match self {
            JsonValue::Object(o) => usize::from(o.remove(key).is_some()),
            _ => 0,
        }
    }

    /// Removes the array element at `pos` and returns how many elements
    /// were removed (0 or 1). Positional erase applies to arrays only;
    /// objects (and everything else) report 0 and stay untouched.
    pub fn remove_index(&mut self, pos: usize) -> usize {
        match self {
            JsonValue::Array(a) if pos < a.len() => {
                a.remove(pos);
                1
            }
            _ => 0,
        }
    }

    /// Replaces this value with `null` and returns what was here.
    pub fn take(&mut self) -> JsonValue<'a> {
        core::mem::take(self)
    }

    /// Resets the payload to the empty value of the current kind: containers
    /// lose their children, strings become `""`, numbers `0`, booleans
    /// `false`.
    pub fn clear(&mut self) {
        match self {
            JsonValue::Null => {}
            JsonValue::Bool(b) => *b = false,
            JsonValue::Number(n) => *n = Number::Int(0),
            JsonValue::String(s) => *s = JsonStr::EMPTY,
            JsonValue::Array(a) => a.clear(),
            JsonValue::Object(o) => o.clear(),
        }
    }

    /// True when any string, key or number text in this subtree still lives
    /// in an allocation the tree does not own outright.
    #[must_use]
    pub fn refers_to_external_memory(&self) -> bool {
        match self {
            JsonValue::Null | JsonValue::Bool(_) => false,
            JsonValue::Number(n) => n.refers_to_external_memory(),
            JsonValue::String(s) => s.refers_to_external_memory(),
            JsonValue::Array(a) => a.iter().any(JsonValue::refers_to_external_memory),
            JsonValue::Object(o) => o.refers_to_external_memory(),
        }
    }

    /// The inverse of [`refers_to_external_memory`](Self::refers_to_external_memory).
    #[must_use]
    pub fn is_full_owner(&self) -> bool {
        !self.refers_to_external_memory()
    }

    /// Recursively copies every borrowed or shared string, key and number
    /// text into owned storage, after which the tree no longer depends on
    /// any source buffer. Idempotent.
    pub fn take_ownership(&mut self) {
        match self {
            JsonValue::Null | JsonValue::Bool(_) => {}
            JsonValue::Number(n) => n.take_ownership(),
            JsonValue::String(s) => s.take_ownership(),
            JsonValue::Array(a) => {
                for element in a {
                    element.take_ownership();
                }
            }
            JsonValue::Object(o) => o.take_ownership(),
        }
    }

    /// Consumes the tree and returns one with no lifetime tie, copying
    /// borrowed text into owned storage along the way. The by-reference
    /// counterpart is [`take_ownership`](Self::take_ownership).
    #[must_use]
    pub fn into_owned(self) -> JsonValue<'static> {
        match self {
            JsonValue::Null => JsonValue::Null,
            JsonValue::Bool(b) => JsonValue::Bool(b),
            JsonValue::Number(n) => JsonValue::Number(n.into_owned()),
            JsonValue::String(s) => JsonValue::String(s.into_owned()),
            JsonValue::Array(a) => {
                JsonValue::Array(a.into_iter().map(JsonValue::into_owned).collect())
            }
            JsonValue::Object(o) => JsonValue::Object(o.into_owned()),
        }
    }

    /// Re-homes every slice borrowed from `buffer` onto shared ranges of
    /// it, leaving a tree with no remaining lifetime tie. Used after a
    /// retained-copy parse.
    pub(crate) fn anchored(self, buffer: &Arc<str>) -> JsonValue<'static> {
        match self {
            JsonValue::Null => JsonValue::Null,
            JsonValue::Bool(b) => JsonValue::Bool(b),
            JsonValue::Number(n) => JsonValue::Number(n.anchored(buffer)),
            JsonValue::String(s) => JsonValue::String(s.anchored(buffer)),
            JsonValue::Array(a) => {
                JsonValue::Array(a.into_iter().map(|v| v.anchored(buffer)).collect())
            }
            JsonValue::Object(o) => JsonValue::Object(o.anchored(buffer)),
        }
    }
}

/// Read indexing by key.
///
/// Total: a non-object target or a missing key reads as a shared `null`
/// placeholder. Use [`JsonValue::get`] when absence must be distinguished
/// from an explicit `null`.
impl<'a, 'k> ops::Index<&'k str> for JsonValue<'a> {
    type Output = JsonValue<'a>;

    fn index(&self, key: &'k str) -> &JsonValue<'a> {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Mutable indexing by key.
///
/// A `null` target becomes an empty object first, and a missing key is
/// created as `null` at the end of the insertion order; the key text is
/// copied into owned storage, so programmatic mutation never ties the tree
/// to the caller's buffer. Indexing into a value that is neither `null` nor
/// an object panics.
impl<'a, 'k> ops::IndexMut<&'k str> for JsonValue<'a> {
    fn index_mut(&mut self, key: &'k str) -> &mut JsonValue<'a> {
        if self.is_null() {
            *self = JsonValue::Object(Object::new());
        }
        match self {
            JsonValue::Object(o) => o.entry(JsonStr::owned(key)),
            other => panic!("cannot index a {:?} value with a key", other.kind()),
        }
    }
}

/// Read indexing by position.
///
/// Total: a non-array target or an out-of-range position reads as a shared
/// `null` placeholder.
impl<'a> ops::Index<usize> for JsonValue<'a> {
    type Output = JsonValue<'a>;

    fn index(&self, pos: usize) -> &JsonValue<'a> {
        self.get_index(pos).unwrap_or(&NULL)
    }
}

/// Mutable indexing by position. Unlike key indexing this never grows the
/// array; a non-array target or an out-of-range position panics.
impl<'a> ops::IndexMut<usize> for JsonValue<'a> {
    fn index_mut(&mut self, pos: usize) -> &mut JsonValue<'a> {
        match self {
            JsonValue::Array(a) => match a.get_mut(pos) {
                Some(element) => element,
                None => panic!("array index {pos} out of range"),
            },
            other => panic!("cannot index a {:?} value with a position", other.kind()),
        }
    }
}

/// Best-effort extraction used by [`JsonValue::get_as`]. Implementations
/// never fail; kinds that cannot be coerced produce the type's zero value.
pub trait FromJson: Sized {
    /// Extracts `Self` from any value.
    fn from_json(value: &JsonValue<'_>) -> Self;
}

impl FromJson for bool {
    /// Booleans read as themselves, numbers as "nonzero", the strings
    /// `"true"`/`"false"` as their spelling. Everything else is `false`.
    fn from_json(value: &JsonValue<'_>) -> Self {
        match value {
            JsonValue::Bool(b) => *b,
            JsonValue::Number(n) => n.as_f64() != 0.0,
            JsonValue::String(s) => s.as_str() == "true",
            _ => false,
        }
    }
}

impl FromJson for i64 {
    /// Numbers read as integers, booleans as 0/1, strings parse-or-zero.
    fn from_json(value: &JsonValue<'_>) -> Self {
        match value {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::Bool(b) => i64::from(*b),
            JsonValue::String(s) => s.as_str().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

impl FromJson for f64 {
    /// Numbers read as floats, booleans as 0.0/1.0, strings parse-or-zero.
    fn from_json(value: &JsonValue<'_>) -> Self {
        match value {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::Bool(b) => f64::from(u8::from(*b)),
            JsonValue::String(s) => s.as_str().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl FromJson for String {
    /// Strings read as their decoded content; everything else renders
    /// compactly.
    fn from_json(value: &JsonValue<'_>) -> Self {
        match value {
            JsonValue::String(s) => String::from(s.as_str()),
            other => other.dump(),
        }
    }
}

impl From<bool> for JsonValue<'_> {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(impl From<$ty> for JsonValue<'_> {
            fn from(value: $ty) -> Self {
                JsonValue::Number(Number::Int(i64::from(value)))
            }
        })*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for JsonValue<'_> {
    fn from(value: f32) -> Self {
        JsonValue::Number(Number::Float(f64::from(value)))
    }
}

impl From<f64> for JsonValue<'_> {
    fn from(value: f64) -> Self {
        JsonValue::Number(Number::Float(value))
    }
}

impl<'a> From<&'a str> for JsonValue<'a> {
    /// Borrows: the value references `text` without copying. Call
    /// [`take_ownership`](JsonValue::take_ownership) (or clone) to sever
    /// the tie.
    fn from(text: &'a str) -> Self {
        JsonValue::String(JsonStr::borrowed(text))
    }
}

impl From<String> for JsonValue<'static> {
    fn from(text: String) -> Self {
        JsonValue::String(JsonStr::owned(text))
    }
}

impl<'a> From<JsonStr<'a>> for JsonValue<'a> {
    fn from(text: JsonStr<'a>) -> Self {
        JsonValue::String(text)
    }
}

impl<'a> From<Number<'a>> for JsonValue<'a> {
    fn from(number: Number<'a>) -> Self {
        JsonValue::Number(number)
    }
}

impl<'a> From<Vec<JsonValue<'a>>> for JsonValue<'a> {
    fn from(elements: Vec<JsonValue<'a>>) -> Self {
        JsonValue::Array(elements)
    }
}

impl<'a> From<Object<'a>> for JsonValue<'a> {
    fn from(object: Object<'a>) -> Self {
        JsonValue::Object(object)
    }
}

impl<'a, T: Into<JsonValue<'a>>> FromIterator<T> for JsonValue<'a> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().map(Into::into).collect())
    }
}
