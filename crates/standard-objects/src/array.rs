//! Ordered heterogeneous sequence with JavaScript `Array`-style operations.
//!
//! Every operation that produces a sequence (`push`, `unshift`, `pop`,
//! `shift`, `concat`, `filter`, `map`, `reverse`) returns a freshly allocated
//! [`Array`] and leaves the receiver untouched; no storage is shared between
//! the two. [`sort`](Array::sort) is the one in-place operation.
//!
//! Callbacks receive the array being traversed, the element index and the
//! element, in that order.

use crate::error::{Result, StandardError};
use crate::presenter::ArrayPresenter;
use crate::value::{self, Value, ValueKind};
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

/// An ordered, index-addressed sequence of [`Value`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    elements: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values.into_iter().collect()
    }

    /// Copy a native slice into a new array.
    pub fn from_slice<T: Clone + Into<Value>>(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }

    /// Unwrap a dynamic value that must be an array.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(array) => Ok(array),
            other => Err(StandardError::NonSlice {
                found: other.kind(),
            }),
        }
    }

    /// Parse a JSON array. Nested JSON objects become [`Value::Object`]s.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Array::from_value(Value::from(json))
    }

    pub fn concat(&self, others: &[&Array]) -> Array {
        let mut elements = self.elements.clone();
        for other in others {
            elements.extend(other.elements.iter().cloned());
        }
        Array { elements }
    }

    pub fn filter<F>(&self, mut predicate: F) -> Array
    where
        F: FnMut(&Array, usize, &Value) -> bool,
    {
        let mut elements = Vec::new();
        for (index, element) in self.elements.iter().enumerate() {
            if predicate(self, index, element) {
                elements.push(element.clone());
            }
        }
        Array { elements }
    }

    /// First element satisfying `predicate`, scanning from the front.
    pub fn find<F>(&self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Array, usize, &Value) -> bool,
    {
        self.elements
            .iter()
            .enumerate()
            .find(|&(index, element)| predicate(self, index, element))
            .map(|(_, element)| element)
    }

    /// Index of the first element satisfying `predicate`.
    pub fn find_index<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&Array, usize, &Value) -> bool,
    {
        self.elements
            .iter()
            .enumerate()
            .position(|(index, element)| predicate(self, index, element))
    }

    pub fn for_each<F>(&self, mut function: F)
    where
        F: FnMut(&Array, usize, &Value),
    {
        for (index, element) in self.elements.iter().enumerate() {
            function(self, index, element);
        }
    }

    pub fn includes(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.elements.iter().position(|element| element == value)
    }

    /// Elements in display form, with `separator` between (not after) them.
    pub fn join(&self, separator: &str) -> String {
        self.elements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn keys(&self) -> Vec<usize> {
        (0..self.elements.len()).collect()
    }

    /// Last index of `value`, scanning backwards from `from_index`.
    ///
    /// A negative or out-of-range `from_index` starts the scan at the last
    /// element.
    pub fn last_index_of(&self, value: &Value, from_index: isize) -> Option<usize> {
        let last = self.elements.len().checked_sub(1)?;
        let start = usize::try_from(from_index)
            .ok()
            .filter(|&index| index <= last)
            .unwrap_or(last);
        (0..=start).rev().find(|&index| self.elements[index] == *value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn map<F, R>(&self, mut function: F) -> Array
    where
        F: FnMut(&Array, usize, &Value) -> R,
        R: Into<Value>,
    {
        let mut elements = Vec::with_capacity(self.elements.len());
        for (index, element) in self.elements.iter().enumerate() {
            elements.push(function(self, index, element).into());
        }
        Array { elements }
    }

    /// The array without its last element, and that element.
    pub fn pop(&self) -> (Array, Option<Value>) {
        match self.elements.split_last() {
            Some((last, rest)) => (
                Array {
                    elements: rest.to_vec(),
                },
                Some(last.clone()),
            ),
            None => (Array::new(), None),
        }
    }

    /// The array without its first element, and that element.
    pub fn shift(&self) -> (Array, Option<Value>) {
        match self.elements.split_first() {
            Some((first, rest)) => (
                Array {
                    elements: rest.to_vec(),
                },
                Some(first.clone()),
            ),
            None => (Array::new(), None),
        }
    }

    pub fn push<I, V>(&self, values: I) -> Array
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut elements = self.elements.clone();
        elements.extend(values.into_iter().map(Into::into));
        Array { elements }
    }

    /// Prepend `values`, keeping their given order.
    pub fn unshift<I, V>(&self, values: I) -> Array
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut elements: Vec<Value> = values.into_iter().map(Into::into).collect();
        elements.extend(self.elements.iter().cloned());
        Array { elements }
    }

    pub fn reverse(&self) -> Array {
        self.elements.iter().rev().cloned().collect()
    }

    /// Sort in place.
    ///
    /// Makes left-to-right passes swapping adjacent elements whenever
    /// `compare(a, b)` is [`Ordering::Greater`], until a pass makes no swap or
    /// `len` passes have run. Elements that compare equal keep their relative
    /// order. A comparator that answers `Greater` for ties still terminates,
    /// but equal elements may then change places.
    pub fn sort<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        for _ in 0..self.elements.len() {
            let mut swapped = false;
            for index in 1..self.elements.len() {
                if compare(&self.elements[index - 1], &self.elements[index]) == Ordering::Greater {
                    self.elements.swap(index - 1, index);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn kind_of(&self, index: usize) -> Option<ValueKind> {
        self.get(index).map(Value::kind)
    }

    pub fn kinds(&self) -> Vec<ValueKind> {
        self.elements.iter().map(Value::kind).collect()
    }

    pub fn present(&self) -> ArrayPresenter<'_> {
        ArrayPresenter::new(self)
    }

    /// Strict JSON encoding; fails on non-finite floats and opaque values.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Index<usize> for Array {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.elements[index]
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array {
            elements: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<Value>> From<Vec<V>> for Array {
    fn from(values: Vec<V>) -> Self {
        values.into_iter().collect()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl TryFrom<Value> for Array {
    type Error = StandardError;

    fn try_from(value: Value) -> Result<Self> {
        Array::from_value(value)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            value::write_literal(element, f)?;
        }
        f.write_str("]")
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.elements)
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Array::from_value(Value::from(json)).map_err(D::Error::custom)
    }
}
