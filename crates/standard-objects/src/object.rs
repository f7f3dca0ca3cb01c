//! Unordered string-keyed map.
//!
//! An [`Object`] is a thin wrapper over a `HashMap`. It remembers no insertion
//! order, so every order-dependent operation (`keys`, `values`, `for_each`,
//! display, serialization) sorts keys lexicographically.

use crate::error::{Result, StandardError};
use crate::presenter::ObjectPresenter;
use crate::value::{self, Value, ValueKind};
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    entries: HashMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a native map. The map is stored as is.
    pub fn from_map(map: HashMap<String, Value>) -> Self {
        Self { entries: map }
    }

    /// Unwrap a dynamic value that must be map-shaped.
    ///
    /// A [`Collection`](crate::Collection) is accepted too; it is flattened
    /// into plain nested maps by its presenter.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(object),
            Value::Collection(collection) => Ok(Object::from_map(collection.present().as_map())),
            Value::Shared(shared) => Ok(Object::from_map(shared.borrow().present().as_map())),
            other => Err(StandardError::NonMap {
                found: other.kind(),
            }),
        }
    }

    /// Parse a JSON object. Nested JSON objects become nested `Object`s.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        Ok(map
            .into_iter()
            .map(|(key, json)| (key, Value::from(json)))
            .collect())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.entries.remove(key);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.has(key))
    }

    pub fn has_some(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has(key))
    }

    /// Keys, sorted lexicographically.
    pub fn keys(&self) -> Vec<&str> {
        self.sorted_entries().into_iter().map(|(key, _)| key).collect()
    }

    /// Values, ordered by their sorted keys.
    pub fn values(&self) -> Vec<&Value> {
        self.sorted_entries()
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Calls `function` for each entry in sorted key order.
    pub fn for_each<F: FnMut(&str, &Value)>(&self, mut function: F) {
        for (key, value) in self.sorted_entries() {
            function(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.get(key).map(Value::kind)
    }

    pub fn kinds(&self) -> HashMap<String, ValueKind> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.kind()))
            .collect()
    }

    pub fn present(&self) -> ObjectPresenter<'_> {
        ObjectPresenter::new(self)
    }

    /// Strict JSON encoding with sorted keys.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn sorted_entries(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<(&str, &Value)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

impl From<HashMap<String, Value>> for Object {
    fn from(map: HashMap<String, Value>) -> Self {
        Object::from_map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<Value> for Object {
    type Error = StandardError;

    fn try_from(value: Value) -> Result<Self> {
        Object::from_value(value)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.sorted_entries().into_iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            value::write_quoted(key, f)?;
            f.write_str(":")?;
            value::write_literal(value, f)?;
        }
        f.write_str("}")
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.sorted_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Object::from_value(Value::from(json)).map_err(D::Error::custom)
    }
}
