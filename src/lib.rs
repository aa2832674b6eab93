//! JSON text codec with pluggable mapping strategies.
//!
//! This crate converts JSON source text into in-memory values and converts
//! in-memory values back into JSON text. Its distinguishing trait is that
//! the decoder does not itself decide what kind of value to build: every
//! structural decision, what container a `{` or `[` materializes, how a
//! property attaches, how an element appends, is delegated to a
//! [`Mapper`]. One tokenizing and parsing core therefore populates either a
//! generic dynamic tree or a statically declared type, with permissive
//! coercion, without duplicating any parsing logic.
//!
//! # Decoding to the generic tree
//!
//! [`from_str`], [`from_slice`], and [`from_reader`] decode with the
//! [`DynamicMapper`]: objects become ordered [`Map`]s, arrays become
//! vectors, scalars become the matching [`Value`] variant.
//!
//! ```
//! let text = r#"
//!     {
//!         "name": "John Doe",
//!         "age": 43,
//!         "phones": ["+44 1234567", "+44 2345678"]
//!     }"#;
//!
//! let person = jsonbind::from_str(text)?;
//! let person = person.as_object().unwrap();
//! assert_eq!(person["name"], "John Doe");
//! assert_eq!(person["age"], 43);
//! assert_eq!(person["phones"].as_array().unwrap().len(), 2);
//! # Ok::<(), jsonbind::Error>(())
//! ```
//!
//! # Binding to declared types
//!
//! [`bind_str`], [`bind_slice`], and [`bind_reader`] decode with the
//! [`TypedMapper`], which materializes one declared root type and descends
//! into the declared types of its fields. The [`record!`] macro declares a
//! bindable struct; unknown properties are skipped and missing ones keep
//! their defaults.
//!
//! ```
//! use jsonbind::record;
//!
//! record! {
//!     #[derive(Debug)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: u32,
//!         pub phones: Vec<String>,
//!     }
//! }
//!
//! let person: Person = jsonbind::bind_str(r#"
//!     {
//!         "name": "John Doe",
//!         "age": 43,
//!         "phones": ["+44 1234567", "+44 2345678"]
//!     }"#)?;
//!
//! assert_eq!(person.name, "John Doe");
//! assert_eq!(person.age, 43);
//! assert_eq!(person.phones.len(), 2);
//! # Ok::<(), jsonbind::Error>(())
//! ```
//!
//! # Encoding
//!
//! Anything implementing [`Encode`] serializes through [`to_string`] or
//! [`to_writer`], always in minimal compact form. [`Value`], the primitive
//! types, strings, sequences, maps, and `record!` types all encode out of
//! the box.
//!
//! ```
//! use jsonbind::{Map, Value};
//!
//! let mut object = Map::new();
//! object.insert("code".to_owned(), Value::from(200));
//! object.insert("success".to_owned(), Value::from(true));
//!
//! assert_eq!(
//!     jsonbind::to_string(&Value::Object(object))?,
//!     r#"{"code":200,"success":true}"#,
//! );
//! # Ok::<(), jsonbind::Error>(())
//! ```
//!
//! # Custom strategies
//!
//! The building blocks are public: drive a [`Decoder`] with your own
//! [`Mapper`] implementation to materialize decoded structure into whatever
//! representation you need, or run the [`Tokenizer`] directly for the raw
//! token stream with character positions.

#![doc(html_root_url = "https://docs.rs/jsonbind/0.3.2")]
#![deny(missing_docs)]
#![allow(
    clippy::excessive_precision,
    clippy::float_cmp,
    clippy::manual_range_contains,
    clippy::match_like_matches_macro,
    clippy::return_self_not_must_use
)]

#[doc(inline)]
pub use crate::de::{from_reader, from_slice, from_str, Decoder};
#[doc(inline)]
pub use crate::error::{Category, Error, ErrorCode, Result};
#[doc(inline)]
pub use crate::ser::{to_string, to_writer, Encode, Encoder};
#[doc(inline)]
pub use crate::typed::{bind_reader, bind_slice, bind_str, Bind, Binding, Built, Slot, TypedMapper};
#[doc(inline)]
pub use crate::value::{Map, Number, Value};
pub use crate::convert::Coerce;
pub use crate::mapper::{DynamicMapper, Mapper, Scalar};
pub use crate::read::{IoRead, Read, StrRead};
pub use crate::tokenizer::{Token, TokenKind, Tokenizer};

mod macros;

pub mod de;
pub mod error;
pub mod map;
pub mod ser;
pub mod typed;
pub mod value;

mod convert;
mod mapper;
mod number;
mod read;
mod tokenizer;
