//! # standard-objects
//!
//! Dynamic-language style containers on top of a statically typed value model.
//!
//! - [`Array`] — ordered heterogeneous sequence with JavaScript `Array`-like
//!   operations (`map`, `filter`, `find`, `sort`, ...)
//! - [`Collection`] — ordered key/value store that remembers insertion order
//! - [`Object`] — unordered string-keyed map with alphabetical iteration
//!
//! Each container stores [`Value`]s and has a read-only presenter that converts
//! it into native typed forms.
//!
//! ## Quick start
//!
//! ```rust
//! use standard_objects::{Collection, Value};
//!
//! let mut collection = Collection::new();
//! collection
//!     .set("pkg", "standard")
//!     .set("detail", Collection::new().with("name", "X"))
//!     .set("isPublic", true);
//! assert_eq!(
//!     collection.to_string(),
//!     r#"{"pkg":"standard","detail":{"name":"X"},"isPublic":true}"#
//! );
//!
//! // JSON import: the JSON layer has no key order, so keys come out sorted.
//! let parsed = Collection::from_json_str(r#"{"b":1,"a":2}"#).unwrap();
//! assert_eq!(parsed.keys(), ["a", "b"]);
//! assert_eq!(parsed.get("a"), Some(&Value::Int(2)));
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` union, kinds, opaque payloads, text rendering
//! - [`collection`] — ordered `Collection`, its `Pair`s, and the `SharedCollection` handle
//! - [`array`] — `Array`
//! - [`object`] — `Object`
//! - [`presenter`] — typed conversions (`as_map`, `as_f64_vec`, `as_struct`, ...)
//! - [`error`] — error types for shape, element-type and JSON failures

pub mod array;
pub mod collection;
pub mod error;
pub mod object;
pub mod presenter;
pub mod value;

pub use array::Array;
pub use collection::{Collection, Pair, SharedCollection};
pub use error::{Result, StandardError};
pub use object::Object;
pub use presenter::{ArrayPresenter, CollectionPresenter, ObjectPresenter};
pub use value::{Opaque, Value, ValueKind};
