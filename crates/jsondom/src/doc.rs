//! A parsed document that retains its own copy of the source text.
//!
//! [`parse`](crate::parse) borrows the caller's buffer, which is the fast
//! path when the buffer outlives the tree. When it does not, a [`JsonDoc`]
//! copies the text into a shared buffer once, parses against the copy, and
//! re-homes every borrowed slice onto it. The resulting tree has no
//! lifetime tie at all and can even be extracted from the doc, since it
//! co-owns the buffer.

use alloc::sync::Arc;
use core::ops::{Deref, DerefMut};

use crate::parser::{parse_with_options, ParseError, ParseOptions};
use crate::value::JsonValue;

/// A JSON tree bundled with the buffer its strings point into.
///
/// Dereferences to the root [`JsonValue`], so the whole value API applies
/// directly to the doc.
#[derive(Debug, Default)]
pub struct JsonDoc {
    buffer: Option<Arc<str>>,
    root: JsonValue<'static>,
    error: Option<ParseError>,
    options: ParseOptions,
}

impl JsonDoc {
    /// An empty doc holding `null`.
    #[must_use]
    pub fn new() -> Self {
        JsonDoc::default()
    }

    /// Parses `text` into this doc, replacing whatever it held.
    ///
    /// The text is copied once into a shared buffer; strings in the tree
    /// reference that buffer, not `text`, so the caller may drop `text`
    /// immediately.
    ///
    /// # Errors
    ///
    /// On a parse error the doc holds `null`, the error is also stored for
    /// [`parse_error`](Self::parse_error), and no partial tree remains.
    pub fn parse(&mut self, text: &str) -> Result<(), ParseError> {
        let buffer: Arc<str> = Arc::from(text);
        // Anchoring while the parse result still borrows the buffer ends
        // that borrow, which lets the buffer move into the doc below.
        let result = parse_with_options(&buffer, self.options).map(|root| root.anchored(&buffer));
        match result {
            Ok(root) => {
                self.root = root;
                self.buffer = Some(buffer);
                self.error = None;
                Ok(())
            }
            Err(error) => {
                self.root = JsonValue::Null;
                self.buffer = None;
                self.error = Some(error);
                Err(error)
            }
        }
    }

    /// The error from the most recent [`parse`](Self::parse), if it failed.
    /// A successful parse clears it.
    #[must_use]
    pub fn parse_error(&self) -> Option<ParseError> {
        self.error
    }

    /// Caps container nesting for subsequent parses.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.options.max_depth = max_depth;
    }

    /// Extracts the root. The tree co-owns the retained buffer, so it
    /// outlives the doc.
    #[must_use]
    pub fn into_root(self) -> JsonValue<'static> {
        self.root
    }
}

impl Deref for JsonDoc {
    type Target = JsonValue<'static>;

    fn deref(&self) -> &JsonValue<'static> {
        &self.root
    }
}

impl DerefMut for JsonDoc {
    fn deref_mut(&mut self) -> &mut JsonValue<'static> {
        &mut self.root
    }
}
