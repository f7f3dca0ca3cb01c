//! Ordered key/value container.
//!
//! A [`Collection`] holds [`Pair`]s with unique keys and remembers the order in
//! which keys were inserted. Lookups are linear scans over a `Vec<Pair>`; the
//! container is meant for small, ad hoc structured data.
//!
//! # Ordering rules
//!
//! - [`set`](Collection::set) on an existing key replaces the value in place;
//!   the key keeps its position.
//! - [`add`](Collection::add) removes an existing key first and re-appends it,
//!   so the key always ends up last.
//! - Construction from an unordered source ([`from_map`](Collection::from_map),
//!   [`from_json_str`](Collection::from_json_str)) imposes ascending
//!   lexicographic key order, since the source has no order of its own.
//!
//! # Nested collections
//!
//! A [`Collection`] stored as a value is owned by its parent. To edit such a
//! child in place, go through the parent:
//!
//! ```
//! use standard_objects::Collection;
//!
//! let mut parent = Collection::new().with("child", Collection::new());
//! parent
//!     .get_mut("child")
//!     .and_then(|v| v.as_collection_mut())
//!     .unwrap()
//!     .set("test", "beta");
//! assert_eq!(parent.to_string(), r#"{"child":{"test":"beta"}}"#);
//! ```
//!
//! A [`SharedCollection`] is a reference to a collection. Every clone of the
//! handle sees the same pairs, so a child inserted through a handle can still
//! be mutated from the outside:
//!
//! ```
//! use standard_objects::{Collection, SharedCollection};
//!
//! let child = SharedCollection::new();
//! let mut parent = Collection::new();
//! parent.set("child", child.clone());
//! child.add("test", "beta");
//! assert_eq!(parent.to_string(), r#"{"child":{"test":"beta"}}"#);
//! ```
//!
//! Shared handles make cycles possible (a collection inserted into itself or
//! into one of its descendants). Display, serialization and
//! [`as_map`](crate::CollectionPresenter::as_map) recurse without cycle
//! detection, so collection graphs must stay acyclic.

use crate::error::{Result, StandardError};
use crate::presenter::CollectionPresenter;
use crate::value::{self, Value, ValueKind};
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A single key/value entry of a [`Collection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    key: String,
    value: Value,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// An insertion-ordered map from string keys to [`Value`]s.
///
/// Mutators take `&mut self` and return the same instance, so calls chain:
///
/// ```
/// use standard_objects::Collection;
///
/// let mut c = Collection::new();
/// c.set("a", 1).set("b", 2).add("a", 3);
/// assert_eq!(c.keys(), ["b", "a"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pairs: Vec<Pair>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a native (unordered) map.
    ///
    /// Keys are sorted lexicographically and appended in that order. Values
    /// that are unordered maps ([`Value::Object`]) are converted recursively
    /// into nested collections, so the result shares nothing with the source.
    /// Values inside arrays are stored as they are.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use standard_objects::Collection;
    ///
    /// let source = HashMap::from([("b", 1), ("a", 2)]);
    /// let c = Collection::from_map(source);
    /// assert_eq!(c.keys(), ["a", "b"]);
    /// ```
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entries: Vec<(String, Value)> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        log::debug!("building collection from map with {} keys", entries.len());

        let mut collection = Collection::new();
        for (key, value) in entries {
            let value = match value {
                Value::Object(nested) => {
                    log::trace!("converting nested map under key {key:?}");
                    Value::Collection(Collection::from_map(nested))
                }
                other => other,
            };
            collection.set(key, value);
        }
        collection
    }

    /// Build a collection from a dynamic value.
    ///
    /// Unordered maps go through [`from_map`](Collection::from_map); a
    /// collection is returned as is and a shared collection is copied out of
    /// its handle. Any other kind is a shape error.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Collection::from_map(object)),
            Value::Collection(collection) => Ok(collection),
            Value::Shared(shared) => Ok(shared.snapshot()),
            other => Err(StandardError::NonMap {
                found: other.kind(),
            }),
        }
    }

    /// Build a collection from a parsed JSON document, which must be an object.
    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        Collection::from_value(Value::from(json))
    }

    /// Parse a JSON object into a collection.
    ///
    /// Keys come out sorted lexicographically, not in document order.
    /// Malformed input, or a document that is not an
    /// object, fails with [`StandardError::Json`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        Ok(Collection::from_map(
            map.into_iter().map(|(key, json)| (key, Value::from(json))),
        ))
    }

    /// Builder form of [`set`](Collection::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or update. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|pair| pair.key == key) {
            Some(pair) => pair.value = value,
            None => self.pairs.push(Pair { key, value }),
        }
        self
    }

    /// Insert or replace. An existing key is removed first, so the key always
    /// ends up last.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        self.delete(&key);
        self.pairs.push(Pair {
            key,
            value: value.into(),
        });
        self
    }

    pub fn delete(&mut self, key: &str) -> &mut Self {
        if let Some(index) = self.index_of(key) {
            self.pairs.remove(index);
        }
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.pairs.clear();
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pair_of(key).map(Pair::value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.pairs
            .iter_mut()
            .find(|pair| pair.key == key)
            .map(|pair| &mut pair.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.pair_of(key).is_some()
    }

    /// `true` if every key is present (vacuously true for no keys).
    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.has(key))
    }

    /// `true` if at least one key is present.
    pub fn has_some(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has(key))
    }

    /// Position of `key` in insertion order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.pairs.iter().position(|pair| pair.key == key)
    }

    pub fn pair_of(&self, key: &str) -> Option<&Pair> {
        self.pairs.iter().find(|pair| pair.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(Pair::key).collect()
    }

    /// Values in insertion order, parallel to [`keys`](Collection::keys).
    pub fn values(&self) -> Vec<&Value> {
        self.pairs.iter().map(Pair::value).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn for_each<F: FnMut(&str, &Value)>(&self, mut function: F) {
        for pair in &self.pairs {
            function(&pair.key, &pair.value);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.get(key).map(Value::kind)
    }

    pub fn kinds(&self) -> HashMap<String, ValueKind> {
        self.pairs
            .iter()
            .map(|pair| (pair.key.clone(), pair.value.kind()))
            .collect()
    }

    pub fn present(&self) -> CollectionPresenter<'_> {
        CollectionPresenter::new(self)
    }

    /// Strict JSON encoding in insertion order.
    ///
    /// Unlike [`Display`](fmt::Display), this fails on values with no JSON
    /// form (non-finite floats, opaque values).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Collects in iteration order with [`set`](Collection::set) semantics.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Collection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Collection::new();
        collection.extend(iter);
        collection
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Collection {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = StandardError;

    fn try_from(value: Value) -> Result<Self> {
        Collection::from_value(value)
    }
}

/// `{"k1":v1,"k2":v2}` in insertion order. Not guaranteed to be valid JSON;
/// see the [`value`](crate::value) module docs.
impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, pair) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            value::write_quoted(&pair.key, f)?;
            f.write_str(":")?;
            value::write_literal(&pair.value, f)?;
        }
        f.write_str("}")
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for pair in &self.pairs {
            map.serialize_entry(&pair.key, &pair.value)?;
        }
        map.end()
    }
}

/// Deserializes like [`from_json_value`](Collection::from_json_value), so keys
/// come out in lexicographic order.
impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Collection::from_json_value(json).map_err(D::Error::custom)
    }
}

// ============================================================================
// SharedCollection
// ============================================================================

/// A reference-counted handle to a [`Collection`].
///
/// Cloning the handle does not copy the pairs: all clones refer to the same
/// collection, and a mutation through one is visible through the others,
/// including clones stored as values inside other containers. The handle is
/// single-threaded; borrows follow [`RefCell`] rules, so holding a
/// [`borrow_mut`](SharedCollection::borrow_mut) guard while reading the same
/// collection panics.
#[derive(Clone, Default)]
pub struct SharedCollection {
    inner: Rc<RefCell<Collection>>,
}

impl SharedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrow(&self) -> Ref<'_, Collection> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Collection> {
        self.inner.borrow_mut()
    }

    /// [`Collection::set`] through the handle.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.inner.borrow_mut().set(key, value);
        self
    }

    /// [`Collection::add`] through the handle.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.inner.borrow_mut().add(key, value);
        self
    }

    pub fn delete(&self, key: &str) -> &Self {
        self.inner.borrow_mut().delete(key);
        self
    }

    pub fn clear(&self) -> &Self {
        self.inner.borrow_mut().clear();
        self
    }

    /// A copy of the current pairs, detached from the handle.
    pub fn snapshot(&self) -> Collection {
        self.inner.borrow().clone()
    }

    /// Whether both handles refer to the same collection.
    pub fn ptr_eq(&self, other: &SharedCollection) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Collection> for SharedCollection {
    fn from(collection: Collection) -> Self {
        Self {
            inner: Rc::new(RefCell::new(collection)),
        }
    }
}

/// Handles are equal when they share a collection or hold equal pairs.
impl PartialEq for SharedCollection {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl fmt::Debug for SharedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(collection) => f.debug_tuple("SharedCollection").field(&*collection).finish(),
            Err(_) => f.write_str("SharedCollection(<mutably borrowed>)"),
        }
    }
}

impl fmt::Display for SharedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.borrow(), f)
    }
}

impl Serialize for SharedCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.borrow().serialize(serializer)
    }
}
