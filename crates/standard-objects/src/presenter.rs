//! Read-only adapters that convert a container into native typed forms.
//!
//! - [`ArrayPresenter`] — `Array` → `Vec<f64>` / `Vec<i64>` / `Vec<u64>` / `Vec<String>`
//! - [`CollectionPresenter`] — `Collection` → plain nested `HashMap`
//! - [`ObjectPresenter`] — `Object` → any `serde`-deserializable struct
//!
//! Presenters borrow their container and hold no state of their own. Obtain
//! one with the container's `present()` method.

use crate::array::Array;
use crate::collection::Collection;
use crate::error::{Result, StandardError};
use crate::object::Object;
use crate::value::Value;
use serde::de::{DeserializeOwned, Deserializer, Visitor};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Array
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ArrayPresenter<'a> {
    array: &'a Array,
}

impl<'a> ArrayPresenter<'a> {
    pub fn new(array: &'a Array) -> Self {
        Self { array }
    }

    /// Every element as `f64`. Accepts signed, unsigned and float elements.
    pub fn as_f64_vec(&self) -> Result<Vec<f64>> {
        self.array
            .iter()
            .enumerate()
            .map(|(index, element)| match element {
                Value::Int(n) => Ok(*n as f64),
                Value::Uint(n) => Ok(*n as f64),
                Value::Float(x) => Ok(*x),
                other => Err(StandardError::ElementNotF64 {
                    index,
                    found: other.kind(),
                }),
            })
            .collect()
    }

    /// Every element as `i64`. Accepts signed integers and unsigned integers
    /// up to `i64::MAX`; floats are rejected.
    pub fn as_i64_vec(&self) -> Result<Vec<i64>> {
        self.array
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let not_i64 = || StandardError::ElementNotI64 {
                    index,
                    found: element.kind(),
                };
                match element {
                    Value::Int(n) => Ok(*n),
                    Value::Uint(n) => i64::try_from(*n).map_err(|_| not_i64()),
                    _ => Err(not_i64()),
                }
            })
            .collect()
    }

    /// Every element as `u64`. Accepts unsigned integers and non-negative
    /// signed integers; floats are rejected.
    pub fn as_u64_vec(&self) -> Result<Vec<u64>> {
        self.array
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let not_u64 = || StandardError::ElementNotU64 {
                    index,
                    found: element.kind(),
                };
                match element {
                    Value::Uint(n) => Ok(*n),
                    Value::Int(n) => u64::try_from(*n).map_err(|_| not_u64()),
                    _ => Err(not_u64()),
                }
            })
            .collect()
    }

    /// Every element in display form. Strings are not quoted.
    pub fn as_string_vec(&self) -> Vec<String> {
        self.array.iter().map(ToString::to_string).collect()
    }
}

// ============================================================================
// Collection
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CollectionPresenter<'a> {
    collection: &'a Collection,
}

impl<'a> CollectionPresenter<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self { collection }
    }

    /// The collection as a plain map. Nested collections, owned or shared,
    /// become nested [`Value::Object`]s, depth first. Insertion order is lost.
    pub fn as_map(&self) -> HashMap<String, Value> {
        self.collection
            .iter()
            .map(|pair| (pair.key().to_owned(), into_plain(pair.value())))
            .collect()
    }
}

fn into_plain(value: &Value) -> Value {
    match value {
        Value::Collection(nested) => Value::Object(Object::from_map(nested.present().as_map())),
        Value::Shared(shared) => {
            Value::Object(Object::from_map(shared.borrow().present().as_map()))
        }
        other => other.clone(),
    }
}

// ============================================================================
// Object
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ObjectPresenter<'a> {
    object: &'a Object,
}

impl<'a> ObjectPresenter<'a> {
    pub fn new(object: &'a Object) -> Self {
        Self { object }
    }

    /// Decode the object into a struct through its JSON form.
    ///
    /// Field matching and numeric coercion follow `serde` (`#[serde(rename)]`,
    /// `#[serde(default)]`, ...). Fails with [`StandardError::NotRecord`] when
    /// `T` is not a struct, and with [`StandardError::Json`] when decoding
    /// fails. Structs using `#[serde(flatten)]` deserialize as maps and are
    /// rejected as non-records.
    ///
    /// ```
    /// use serde::Deserialize;
    /// use standard_objects::Object;
    ///
    /// #[derive(Deserialize)]
    /// struct Detail {
    ///     name: String,
    ///     year: u32,
    /// }
    ///
    /// let mut object = Object::new();
    /// object.set("name", "standard").set("year", 2020);
    /// let detail: Detail = object.present().as_struct().unwrap();
    /// assert_eq!(detail.name, "standard");
    /// assert_eq!(detail.year, 2020);
    /// ```
    pub fn as_struct<T: DeserializeOwned>(&self) -> Result<T> {
        let target = std::any::type_name::<T>();
        if !is_record::<T>() {
            return Err(StandardError::NotRecord { target });
        }
        log::debug!(
            "decoding object with {} keys into {target}",
            self.object.len()
        );
        let json = serde_json::to_value(self.object)?;
        Ok(serde_json::from_value(json)?)
    }
}

/// Whether `T` deserializes itself as a struct.
///
/// Runs `T`'s `Deserialize` impl against a deserializer that fails on the
/// first request and records which shape was asked for.
fn is_record<T: DeserializeOwned>() -> bool {
    matches!(T::deserialize(ShapeProbe), Err(Shape::Struct))
}

#[derive(Debug)]
enum Shape {
    Struct,
    Other,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct => f.write_str("struct requested"),
            Shape::Other => f.write_str("non-struct requested"),
        }
    }
}

impl std::error::Error for Shape {}

impl serde::de::Error for Shape {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Shape::Other
    }
}

struct ShapeProbe;

impl<'de> Deserializer<'de> for ShapeProbe {
    type Error = Shape;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> std::result::Result<V::Value, Shape> {
        Err(Shape::Other)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> std::result::Result<V::Value, Shape> {
        Err(Shape::Struct)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
