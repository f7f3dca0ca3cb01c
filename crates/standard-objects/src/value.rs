//! The dynamic value stored by every container.
//!
//! `Value` is a closed tagged union over the supported kinds: JSON-style
//! primitives (with signed, unsigned and floating numbers kept apart), the
//! three containers, a shared collection handle, and an [`Opaque`] escape
//! hatch for arbitrary Rust values.
//! Conversions out of a `Value` are exhaustive `match`es, so every supported
//! kind is known up front.
//!
//! # Text forms
//!
//! - [`Display`](fmt::Display) on a `Value` prints strings bare and everything
//!   else in its *literal* form.
//! - The literal form (used for container elements) quotes and escapes strings
//!   like JSON, prints numbers and booleans bare, and renders nested containers
//!   inline. Floats use their shortest decimal form, switching to exponent
//!   form (`1e+21`, `1.5e-05`) outside `1e-4..1e21`.
//! - Non-finite floats (`NaN`, `inf`) and opaque values have no JSON
//!   spelling, so the literal form is a display format, not guaranteed JSON.
//!   Use the containers' `to_json` for strict encoding.

use crate::array::Array;
use crate::collection::{Collection, SharedCollection};
use crate::object::Object;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A dynamically typed value held by an [`Array`], [`Collection`] or [`Object`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Any signed integer width.
    Int(i64),
    /// Any unsigned integer width.
    Uint(u64),
    Float(f64),
    String(String),
    Array(Array),
    /// Nested ordered map. Owned by the enclosing container.
    Collection(Collection),
    /// Nested ordered map shared with every other clone of the handle.
    Shared(SharedCollection),
    Object(Object),
    Opaque(Opaque),
}

/// The kind of a [`Value`], without its payload.
///
/// Owned and shared collections are both [`ValueKind::Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Array,
    Collection,
    Object,
    Opaque,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Collection => "collection",
            ValueKind::Object => "object",
            ValueKind::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Collection(_) | Value::Shared(_) => ValueKind::Collection,
            Value::Object(_) => ValueKind::Object,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The payload of an `Int`. No cross-kind coercion; see
    /// [`ArrayPresenter`](crate::ArrayPresenter) for numeric conversions.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable access to a nested collection, for editing a child in place
    /// through its parent.
    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_shared(&self) -> Option<&SharedCollection> {
        match self {
            Value::Shared(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Opaque
// ---------------------------------------------------------------------------

/// An arbitrary Rust value stored inside a container.
///
/// Clones share the payload. Two opaque values are equal only when they share
/// the same payload, since nothing is known about the payload's own equality.
/// Opaque values render as `<opaque TYPE>` and have no JSON encoding.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Rc<dyn Any>,
}

impl Opaque {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Rc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_ref().downcast_ref::<T>()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Conversions into Value
// ---------------------------------------------------------------------------

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Uint(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Value::Collection(c)
    }
}

impl From<SharedCollection> for Value {
    fn from(s: SharedCollection) -> Self {
        Value::Shared(s)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

/// A native map becomes an unordered [`Object`].
impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::Object(map.into_iter().collect())
    }
}

/// JSON objects become [`Object`]s and JSON arrays become [`Array`]s.
/// Numbers become `Int` when they fit `i64`, `Uint` when they fit `u64`,
/// and `Float` otherwise.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, child)| (key, Value::from(child)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// serde
// ---------------------------------------------------------------------------

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Uint(n) => serializer.serialize_u64(*n),
            Value::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::Float(x) => Err(S::Error::custom(format!(
                "non-finite float {x} has no JSON representation"
            ))),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => a.serialize(serializer),
            Value::Collection(c) => c.serialize(serializer),
            Value::Shared(s) => s.serialize(serializer),
            Value::Object(o) => o.serialize(serializer),
            Value::Opaque(o) => Err(S::Error::custom(format!(
                "opaque value of type `{}` cannot be serialized",
                o.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            other => write_literal(other, f),
        }
    }
}

/// Write `value` in literal form: strings quoted, containers inline.
pub(crate) fn write_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(n) => write!(f, "{n}"),
        Value::Uint(n) => write!(f, "{n}"),
        Value::Float(x) => write_float(*x, f),
        Value::String(s) => write_quoted(s, f),
        Value::Array(a) => fmt::Display::fmt(a, f),
        Value::Collection(c) => fmt::Display::fmt(c, f),
        Value::Shared(s) => fmt::Display::fmt(s, f),
        Value::Object(o) => fmt::Display::fmt(o, f),
        Value::Opaque(o) => write!(f, "<opaque {}>", o.type_name()),
    }
}

/// Shortest round-trip decimal. Magnitudes below `1e-4` or from `1e21` up use
/// exponent form with a signed, two-digit minimum exponent (`1e+21`,
/// `1.5e-05`).
fn write_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let magnitude = x.abs();
    if !x.is_finite() || x == 0.0 || (1e-4..1e21).contains(&magnitude) {
        return write!(f, "{x}");
    }
    let text = format!("{x:e}");
    let (mantissa, exponent) = text.split_once('e').ok_or(fmt::Error)?;
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{mantissa}e{sign}{digits:0>2}")
}

/// Write `s` as a JSON string literal.
pub(crate) fn write_quoted(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}
