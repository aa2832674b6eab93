//! The mapping strategy interface: how decoded JSON materializes into values.

use crate::map::Map;
use crate::number::Number;
use crate::value::Value;

/// A decoded JSON primitive, handed from the decoder to the active mapping
/// strategy.
///
/// Strings arrive already unescaped and numbers already parsed; a mapping
/// strategy never sees source text.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// JSON `true` or `false`.
    Bool(bool),
    /// A JSON number.
    Number(Number),
    /// A JSON string.
    String(String),
}

/// The capability interface through which a [`Decoder`](crate::Decoder) builds
/// composite values.
///
/// The decoder walks JSON syntax and delegates every structural decision to
/// the active strategy: what container to allocate for `{` or `[`, how to
/// attach a decoded member to its object, and how to append a decoded element
/// to its array. The same parsing core therefore populates generic
/// [`Value`] trees ([`DynamicMapper`]), statically typed records
/// ([`TypedMapper`](crate::TypedMapper)), or anything else a caller plugs in.
///
/// `create_object` and `create_array` receive the *parent* container and the
/// property name under which the new container will eventually be attached:
/// `target` is `None` at the document root, and `property` is `None` when the
/// parent is an array. Implementations must be deterministic for the same
/// `(target, property)` pair and must not hold on to either reference; that
/// context belongs to the decoder's call stack.
///
/// `set_property` and `add_element` are only ever invoked with containers
/// previously returned by `create_object` and `create_array` respectively, and
/// implementations may rely on that.
pub trait Mapper {
    /// The representation this strategy materializes.
    type Value: From<Scalar>;

    /// Allocate a container for an object that is about to be decoded, before
    /// any of its keys have been read.
    fn create_object(
        &mut self,
        target: Option<&Self::Value>,
        property: Option<&str>,
    ) -> Self::Value;

    /// Attach a fully decoded value to an object under the given property
    /// name. Called once per `key: value` pair, in document order.
    fn set_property(&mut self, target: &mut Self::Value, property: String, value: Self::Value);

    /// Allocate a container for an array that is about to be decoded.
    fn create_array(
        &mut self,
        target: Option<&Self::Value>,
        property: Option<&str>,
    ) -> Self::Value;

    /// Append a fully decoded element to an array. Called once per element,
    /// in document order.
    fn add_element(&mut self, target: &mut Self::Value, element: Self::Value);
}

/// Mapping strategy that materializes generic [`Value`] trees.
///
/// Objects become fresh insertion-ordered [`Map`]s, arrays become fresh
/// vectors, and primitives pass through verbatim with no coercion. A repeated
/// object key overwrites the previous value and keeps its position.
#[derive(Clone, Copy, Debug, Default)]
pub struct DynamicMapper;

impl Mapper for DynamicMapper {
    type Value = Value;

    fn create_object(&mut self, _target: Option<&Value>, _property: Option<&str>) -> Value {
        Value::Object(Map::new())
    }

    fn set_property(&mut self, target: &mut Value, property: String, value: Value) {
        match target {
            Value::Object(map) => {
                map.insert(property, value);
            }
            _ => unreachable!("set_property target was created by create_object"),
        }
    }

    fn create_array(&mut self, _target: Option<&Value>, _property: Option<&str>) -> Value {
        Value::Array(Vec::new())
    }

    fn add_element(&mut self, target: &mut Value, element: Value) {
        match target {
            Value::Array(vec) => vec.push(element),
            _ => unreachable!("add_element target was created by create_array"),
        }
    }
}
