//! Object storage: insertion-ordered members plus a key index.
//!
//! Members live in a `Vec` in insertion order, which is also dump order. A
//! side table maps decoded key text to the member's position so lookup stays
//! O(1) without disturbing the order. The two structures move together
//! through every mutation; an index entry always names a live member with
//! the same key.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use hashbrown::HashMap;

use crate::text::JsonStr;
use crate::value::JsonValue;

/// One key/value pair of an object, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Member<'a> {
    pub(crate) key: JsonStr<'a>,
    pub(crate) value: JsonValue<'a>,
}

/// An insertion-ordered JSON object.
///
/// Keys are unique: inserting under an existing key replaces that member's
/// value in place, keeping its original position. Keys are compared by
/// decoded text, so a key spelled `slash\/` in the source is found as
/// `slash/`.
#[derive(Debug, Clone, Default)]
pub struct Object<'a> {
    members: Vec<Member<'a>>,
    index: HashMap<JsonStr<'a>, usize>,
}

impl<'a> Object<'a> {
    /// An empty object.
    #[must_use]
    pub fn new() -> Self {
        Object {
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// An empty object with room for `capacity` members.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Object {
            members: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Reserves room for `additional` more members.
    pub fn reserve(&mut self, additional: usize) {
        self.members.reserve(additional);
        self.index.reserve(additional);
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when `key` names a member.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The value under `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue<'a>> {
        self.index.get(key).map(|&pos| &self.members[pos].value)
    }

    /// Mutable access to the value under `key`, if present.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue<'a>> {
        match self.index.get(key) {
            Some(&pos) => Some(&mut self.members[pos].value),
            None => None,
        }
    }

    /// The member slot for `key`, created as `Null` at the end of the order
    /// when absent. This is the create-on-miss primitive behind mutable
    /// indexing.
    pub fn entry(&mut self, key: JsonStr<'a>) -> &mut JsonValue<'a> {
        let pos = match self.index.get(key.as_str()) {
            Some(&pos) => pos,
            None => {
                let pos = self.members.len();
                self.index.insert(key.alias(), pos);
                self.members.push(Member {
                    key,
                    value: JsonValue::Null,
                });
                pos
            }
        };
        &mut self.members[pos].value
    }

    /// Inserts `value` under `key`. An existing member keeps its position
    /// and its old value is returned; a new member is appended.
    pub fn insert(
        &mut self,
        key: impl Into<JsonStr<'a>>,
        value: JsonValue<'a>,
    ) -> Option<JsonValue<'a>> {
        let key = key.into();
        match self.index.get(key.as_str()) {
            Some(&pos) => Some(mem::replace(&mut self.members[pos].value, value)),
            None => {
                let pos = self.members.len();
                self.index.insert(key.alias(), pos);
                self.members.push(Member { key, value });
                None
            }
        }
    }

    /// Removes the member under `key` and returns its value. Members after
    /// it shift down one position, and the index follows.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue<'a>> {
        let pos = self.index.remove(key)?;
        let member = self.members.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(member.value)
    }

    /// Drops every member.
    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&JsonStr<'a>, &JsonValue<'a>)> {
        self.members.iter().map(|m| (&m.key, &m.value))
    }

    /// Members in insertion order, values mutable.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&JsonStr<'a>, &mut JsonValue<'a>)> {
        self.members.iter_mut().map(|m| (&m.key, &mut m.value))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &JsonStr<'a>> {
        self.members.iter().map(|m| &m.key)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &JsonValue<'a>> {
        self.members.iter().map(|m| &m.value)
    }

    /// Values in insertion order, mutable.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut JsonValue<'a>> {
        self.members.iter_mut().map(|m| &mut m.value)
    }

    /// The key and value at `pos` in insertion order, if in bounds.
    #[must_use]
    pub fn get_index(&self, pos: usize) -> Option<(&JsonStr<'a>, &JsonValue<'a>)> {
        self.members.get(pos).map(|m| (&m.key, &m.value))
    }

    pub(crate) fn refers_to_external_memory(&self) -> bool {
        self.members
            .iter()
            .any(|m| m.key.refers_to_external_memory() || m.value.refers_to_external_memory())
    }

    /// Promotes every key and value to owned storage, then rebuilds the
    /// index over the new keys.
    pub(crate) fn take_ownership(&mut self) {
        self.index.clear();
        for (pos, member) in self.members.iter_mut().enumerate() {
            member.key.take_ownership();
            member.value.take_ownership();
            self.index.insert(member.key.alias(), pos);
        }
    }

    pub(crate) fn into_owned(self) -> Object<'static> {
        let mut out = Object::with_capacity(self.members.len());
        for member in self.members {
            let key = member.key.into_owned();
            let value = member.value.into_owned();
            let pos = out.members.len();
            out.index.insert(key.alias(), pos);
            out.members.push(Member { key, value });
        }
        out
    }

    pub(crate) fn anchored(self, buffer: &Arc<str>) -> Object<'static> {
        let mut out = Object::with_capacity(self.members.len());
        for member in self.members {
            let key = member.key.anchored(buffer);
            let value = member.value.anchored(buffer);
            let pos = out.members.len();
            out.index.insert(key.alias(), pos);
            out.members.push(Member { key, value });
        }
        out
    }
}

impl PartialEq for Object<'_> {
    /// Objects compare as ordered member sequences: same keys, same values,
    /// same insertion order.
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}
