//! The dual-ownership string type backing string nodes and object keys.
//!
//! A [`JsonStr`] holds decoded text in one of three representations: a slice
//! borrowed from the caller's buffer, a slice of a document-retained shared
//! buffer, or an independent allocation. All observable behavior (equality,
//! hashing, ordering, display) goes through the text content, so the
//! representation is a storage concern only.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Range;

/// Decoded string text with three storage representations.
///
/// - *Borrowed*: a `&'a str` into a buffer the caller keeps alive. This is
///   what in-place parsing produces for strings without escapes.
/// - *Shared*: a range of a reference-counted buffer, used by
///   [`JsonDoc`](crate::JsonDoc) so the tree can outlive the caller's input
///   string. Constructing one bumps a refcount; no text is copied.
/// - *Owned*: an independent allocation.
///
/// `Clone` always produces an *Owned* copy. A clone never inherits a borrow,
/// so cloned subtrees are safe to keep after the source buffer is gone.
pub struct JsonStr<'a> {
    repr: Repr<'a>,
}

enum Repr<'a> {
    Borrowed(&'a str),
    Shared(Arc<str>, Range<usize>),
    Owned(Box<str>),
}

impl<'a> JsonStr<'a> {
    /// The empty string, borrowing nothing.
    pub const EMPTY: JsonStr<'static> = JsonStr {
        repr: Repr::Borrowed(""),
    };

    /// Wraps a slice without copying.
    #[must_use]
    pub const fn borrowed(text: &'a str) -> Self {
        JsonStr {
            repr: Repr::Borrowed(text),
        }
    }

    /// Takes ownership of an allocated string.
    #[must_use]
    pub fn owned(text: impl Into<Box<str>>) -> JsonStr<'static> {
        JsonStr {
            repr: Repr::Owned(text.into()),
        }
    }

    /// A range of a shared buffer. `range` must lie on character boundaries
    /// of `buffer`; the constructors in `doc` derive it from an existing
    /// subslice, which guarantees that.
    pub(crate) fn shared(buffer: Arc<str>, range: Range<usize>) -> JsonStr<'static> {
        debug_assert!(buffer.get(range.clone()).is_some());
        JsonStr {
            repr: Repr::Shared(buffer, range),
        }
    }

    /// The text, whatever the representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match &self.repr {
            Repr::Borrowed(s) => s,
            Repr::Shared(buffer, range) => &buffer[range.clone()],
            Repr::Owned(s) => s,
        }
    }

    /// Length of the text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// True when the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// True when the text lives in an allocation this value does not own
    /// outright: a borrow of the caller's buffer or a slice of a shared
    /// document buffer.
    #[must_use]
    pub fn refers_to_external_memory(&self) -> bool {
        !matches!(self.repr, Repr::Owned(_))
    }

    /// True when this value owns its allocation.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self.repr, Repr::Owned(_))
    }

    /// Converts the representation to *Owned* in place, copying the text if
    /// needed. Idempotent: already-owned values are untouched.
    pub fn take_ownership(&mut self) {
        if !self.is_owned() {
            self.repr = Repr::Owned(Box::from(self.as_str()));
        }
    }

    /// An *Owned* version of this text with no remaining lifetime tie.
    #[must_use]
    pub fn into_owned(self) -> JsonStr<'static> {
        match self.repr {
            Repr::Borrowed(s) => JsonStr::owned(s),
            Repr::Shared(buffer, range) => JsonStr {
                repr: Repr::Shared(buffer, range),
            },
            Repr::Owned(s) => JsonStr { repr: Repr::Owned(s) },
        }
    }

    /// Cheap representation-preserving copy: borrows stay borrows, shared
    /// slices bump the refcount. Only owned text allocates. Kept internal so
    /// the public `Clone` contract (always owned) stays simple.
    pub(crate) fn alias(&self) -> Self {
        match &self.repr {
            Repr::Borrowed(s) => JsonStr {
                repr: Repr::Borrowed(s),
            },
            Repr::Shared(buffer, range) => JsonStr {
                repr: Repr::Shared(Arc::clone(buffer), range.clone()),
            },
            Repr::Owned(s) => JsonStr {
                repr: Repr::Owned(s.clone()),
            },
        }
    }

    /// Re-homes a borrowed slice onto `buffer` when it points inside it,
    /// producing a value with no remaining lifetime tie. Borrows into other
    /// allocations are copied; shared and owned text passes through.
    pub(crate) fn anchored(self, buffer: &Arc<str>) -> JsonStr<'static> {
        match self.repr {
            Repr::Borrowed(s) => {
                let base = buffer.as_ptr() as usize;
                let start = s.as_ptr() as usize;
                if start >= base && start + s.len() <= base + buffer.len() {
                    let offset = start - base;
                    JsonStr::shared(Arc::clone(buffer), offset..offset + s.len())
                } else {
                    JsonStr::owned(s)
                }
            }
            Repr::Shared(buffer, range) => JsonStr {
                repr: Repr::Shared(buffer, range),
            },
            Repr::Owned(s) => JsonStr { repr: Repr::Owned(s) },
        }
    }
}

impl Clone for JsonStr<'_> {
    fn clone(&self) -> Self {
        JsonStr {
            repr: Repr::Owned(Box::from(self.as_str())),
        }
    }
}

impl Default for JsonStr<'_> {
    fn default() -> Self {
        JsonStr::EMPTY
    }
}

impl<'a> From<&'a str> for JsonStr<'a> {
    fn from(text: &'a str) -> Self {
        JsonStr::borrowed(text)
    }
}

impl From<String> for JsonStr<'static> {
    fn from(text: String) -> Self {
        JsonStr::owned(text)
    }
}

impl From<Box<str>> for JsonStr<'static> {
    fn from(text: Box<str>) -> Self {
        JsonStr::owned(text)
    }
}

impl Borrow<str> for JsonStr<'_> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for JsonStr<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for JsonStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for JsonStr<'_> {}

impl PartialEq<str> for JsonStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for JsonStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for JsonStr<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JsonStr<'_> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for JsonStr<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<JsonStr<'_>> for String {
    fn from(text: JsonStr<'_>) -> Self {
        match text.repr {
            Repr::Owned(s) => s.into(),
            other => JsonStr { repr: other }.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_does_not_own() {
        let s = JsonStr::borrowed("view");
        assert_eq!(s.as_str(), "view");
        assert!(s.refers_to_external_memory());
        assert!(!s.is_owned());
    }

    #[test]
    fn shared_points_into_buffer() {
        let buffer: Arc<str> = Arc::from("a longer backing buffer");
        let s = JsonStr::shared(Arc::clone(&buffer), 2..8);
        assert_eq!(s.as_str(), "longer");
        assert!(s.refers_to_external_memory());
    }

    #[test]
    fn clone_is_always_owned() {
        let backing = String::from("short lived");
        let borrowed = JsonStr::borrowed(&backing);
        let copy = borrowed.clone();
        assert!(copy.is_owned());
        // The clone copied the text, so erasing its lifetime is free and
        // the result survives the backing buffer.
        let copy = copy.into_owned();
        drop(backing);
        assert_eq!(copy.as_str(), "short lived");
    }

    #[test]
    fn take_ownership_is_idempotent() {
        let mut s = JsonStr::borrowed("text");
        s.take_ownership();
        assert!(s.is_owned());
        s.take_ownership();
        assert!(s.is_owned());
        assert_eq!(s.as_str(), "text");
    }

    #[test]
    fn alias_preserves_representation() {
        let buffer: Arc<str> = Arc::from("shared text");
        let shared = JsonStr::shared(Arc::clone(&buffer), 0..6);
        let alias = shared.alias();
        assert!(alias.refers_to_external_memory());
        assert_eq!(alias, shared);

        let borrowed = JsonStr::borrowed("b");
        assert!(!borrowed.alias().is_owned());
    }

    #[test]
    fn anchoring_rebases_borrows_into_the_buffer() {
        let buffer: Arc<str> = Arc::from("find the middle here");
        let inside = JsonStr::borrowed(&buffer[9..15]);
        let anchored = inside.anchored(&buffer);
        assert_eq!(anchored.as_str(), "middle");
        assert!(anchored.refers_to_external_memory());

        let outside = JsonStr::borrowed("elsewhere");
        let anchored = outside.anchored(&buffer);
        assert_eq!(anchored.as_str(), "elsewhere");
        assert!(anchored.is_owned());
    }

    #[test]
    fn equality_and_order_ignore_representation() {
        let buffer: Arc<str> = Arc::from("same");
        let borrowed = JsonStr::borrowed("same");
        let shared = JsonStr::shared(Arc::clone(&buffer), 0..4);
        let owned = JsonStr::owned("same");
        assert_eq!(borrowed, shared);
        assert_eq!(shared, owned);
        assert_eq!(borrowed, "same");
        assert!(JsonStr::borrowed("a") < JsonStr::borrowed("b"));
    }
}
