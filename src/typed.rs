//! Bind decoded JSON into statically declared types.
//!
//! The typed mapper is the second mapping strategy next to
//! [`DynamicMapper`](crate::DynamicMapper). Instead of a generic tree it
//! materializes a value of one declared root type, descending into the
//! declared types of fields and elements. What the original reached through
//! runtime reflection is carried here by [`Binding`] descriptors: plain
//! `Copy` tables of fn pointers that a type publishes through [`Bind`],
//! built by hand or by [`record!`](crate::record!).

use crate::convert::Coerce;
use crate::de::{slice_to_str, Decoder};
use crate::error::{Error, ErrorCode, Result};
use crate::map::Map;
use crate::mapper::{Mapper, Scalar};
use crate::read::{IoRead, StrRead};
use std::any::{self, Any};
use std::io;
use std::marker::PhantomData;

/// One decoded node in flight between the decoder and a typed target.
pub enum Slot {
    /// A scalar leaf, not yet coerced.
    Scalar(Scalar),
    /// A container materialized from a binding.
    Built(Built),
    /// A container no binding claimed. Everything attached to it vanishes,
    /// which is how unknown properties and mismatched shapes decode without
    /// error.
    Discard,
}

impl From<Scalar> for Slot {
    fn from(scalar: Scalar) -> Slot {
        Slot::Scalar(scalar)
    }
}

/// A container under construction, paired with the binding that made it.
pub struct Built {
    value: Box<dyn Any>,
    binding: Binding,
}

impl Built {
    /// Pair a freshly made container with its binding.
    pub fn new(value: Box<dyn Any>, binding: Binding) -> Built {
        Built { value, binding }
    }

    /// The binding this container was made from.
    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// Recover the concrete container, if `T` is what the binding built.
    pub fn downcast<T: Any>(self) -> Option<T> {
        self.value.downcast().ok().map(|value| *value)
    }
}

/// A `Copy` description of how JSON structure materializes one type.
///
/// Bindings carry no state, only fn pointers, so they can be handed around
/// by value while the containers they describe are being filled.
#[derive(Clone, Copy)]
pub struct Binding {
    /// Makes the container a `{` materializes, for types objects can bind.
    pub new_object: Option<fn() -> Box<dyn Any>>,
    /// Makes the container a `[` materializes, for types arrays can bind.
    pub new_array: Option<fn() -> Box<dyn Any>>,
    /// The declared binding of the child under a property name, or of the
    /// elements when the property is `None`.
    pub child: fn(Option<&str>) -> Option<Binding>,
    /// Attach a decoded node under a property name, or append it when the
    /// property is `None`. Nodes the container cannot hold are dropped.
    pub assign: fn(&mut dyn Any, Option<&str>, Slot),
}

impl Binding {
    /// The binding for scalar leaves: no container shape, no children.
    pub fn leaf() -> Binding {
        Binding {
            new_object: None,
            new_array: None,
            child: |_| None,
            assign: |_, _, _| {},
        }
    }
}

/// A type that JSON can bind to through the typed mapper.
///
/// [`binding`](Bind::binding) describes how containers of this type
/// materialize and how children attach to them; [`from_node`](Bind::from_node)
/// finishes a decoded node into the concrete type, declining with `None` when
/// the node has the wrong shape. A declined node is dropped by whoever holds
/// it, leaving the target field at its default.
///
/// Implementations exist for the coercible primitives, `String`, `Option<T>`,
/// `Vec<T>`, fixed-size arrays, and string-keyed [`Map`]s. Record types get
/// theirs from [`record!`](crate::record!).
pub trait Bind: Any + Default + Sized {
    /// The binding descriptor for this type.
    fn binding() -> Binding;

    /// Finish a decoded node into `Self`.
    fn from_node(node: Slot) -> Option<Self>;
}

macro_rules! impl_bind_scalar {
    ($($ty:ident)*) => {
        $(
            impl Bind for $ty {
                fn binding() -> Binding {
                    Binding::leaf()
                }

                fn from_node(node: Slot) -> Option<$ty> {
                    match node {
                        Slot::Scalar(scalar) => $ty::coerce(scalar),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_bind_scalar!(bool i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 String);

impl<T> Bind for Option<T>
where
    T: Bind,
{
    /// An `Option` binds whatever its payload binds; `null` turns into
    /// `None` at finish time.
    fn binding() -> Binding {
        T::binding()
    }

    fn from_node(node: Slot) -> Option<Self> {
        match node {
            Slot::Scalar(Scalar::Null) => Some(None),
            other => T::from_node(other).map(Some),
        }
    }
}

impl<T> Bind for Vec<T>
where
    T: Bind,
{
    fn binding() -> Binding {
        Binding {
            new_object: None,
            new_array: Some(|| Box::new(Vec::<T>::new())),
            child: |_| Some(T::binding()),
            assign: |target, _, node| {
                let vec = target.downcast_mut::<Vec<T>>();
                // Elements that fail to convert are skipped, not nulled.
                if let (Some(vec), Some(element)) = (vec, T::from_node(node)) {
                    vec.push(element);
                }
            },
        }
    }

    fn from_node(node: Slot) -> Option<Self> {
        match node {
            Slot::Built(built) => built.downcast(),
            _ => None,
        }
    }
}

/// Fixed-size arrays stage through a growable `Vec` and materialize on
/// finish; a document whose element count is not exactly `N` declines.
impl<T, const N: usize> Bind for [T; N]
where
    T: Bind,
    [T; N]: Default,
{
    fn binding() -> Binding {
        Binding {
            new_object: None,
            new_array: Some(|| Box::new(Vec::<T>::new())),
            child: |_| Some(T::binding()),
            assign: |target, _, node| {
                let vec = target.downcast_mut::<Vec<T>>();
                if let (Some(vec), Some(element)) = (vec, T::from_node(node)) {
                    vec.push(element);
                }
            },
        }
    }

    fn from_node(node: Slot) -> Option<Self> {
        match node {
            Slot::Built(built) => {
                let staged: Vec<T> = built.downcast()?;
                staged.try_into().ok()
            }
            _ => None,
        }
    }
}

impl<V> Bind for Map<String, V>
where
    V: Bind,
{
    /// String-keyed maps accept every property name, binding each value to
    /// the element type.
    fn binding() -> Binding {
        Binding {
            new_object: Some(|| Box::new(Map::<String, V>::new())),
            new_array: None,
            child: |_| Some(V::binding()),
            assign: |target, property, node| {
                let map = target.downcast_mut::<Map<String, V>>();
                if let (Some(map), Some(property), Some(value)) =
                    (map, property, V::from_node(node))
                {
                    map.insert(property.to_owned(), value);
                }
            },
        }
    }

    fn from_node(node: Slot) -> Option<Self> {
        match node {
            Slot::Built(built) => built.downcast(),
            _ => None,
        }
    }
}

/// A mapping strategy that materializes a statically described root type.
///
/// Containers are created from [`Binding`] descriptors, starting at the
/// document root with `T`'s own. Structure with no binding, an unknown
/// property or a shape the declared type cannot hold, decodes into
/// [`Slot::Discard`] and drops without error.
pub struct TypedMapper<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> TypedMapper<T> {
    /// Create a mapper that binds the root element to `T`.
    pub fn new() -> Self {
        TypedMapper {
            marker: PhantomData,
        }
    }
}

impl<T> Default for TypedMapper<T> {
    fn default() -> Self {
        TypedMapper::new()
    }
}

impl<T> TypedMapper<T>
where
    T: Bind,
{
    fn child_binding(&self, target: Option<&Slot>, property: Option<&str>) -> Option<Binding> {
        match target {
            // The document root binds the declared type itself.
            None => Some(T::binding()),
            Some(Slot::Built(built)) => (built.binding.child)(property),
            Some(_) => None,
        }
    }
}

impl<T> Mapper for TypedMapper<T>
where
    T: Bind,
{
    type Value = Slot;

    fn create_object(&mut self, target: Option<&Slot>, property: Option<&str>) -> Slot {
        match self.child_binding(target, property) {
            Some(binding) => match binding.new_object {
                Some(new) => Slot::Built(Built::new(new(), binding)),
                None => Slot::Discard,
            },
            None => Slot::Discard,
        }
    }

    fn set_property(&mut self, target: &mut Slot, property: String, value: Slot) {
        if let Slot::Built(built) = target {
            (built.binding.assign)(built.value.as_mut(), Some(&property), value);
        }
    }

    fn create_array(&mut self, target: Option<&Slot>, property: Option<&str>) -> Slot {
        match self.child_binding(target, property) {
            Some(binding) => match binding.new_array {
                Some(new) => Slot::Built(Built::new(new(), binding)),
                None => Slot::Discard,
            },
            None => Slot::Discard,
        }
    }

    fn add_element(&mut self, target: &mut Slot, element: Slot) {
        if let Slot::Built(built) = target {
            (built.binding.assign)(built.value.as_mut(), None, element);
        }
    }
}

/// Decode JSON text, binding the result to `T`.
///
/// Properties the target does not declare are skipped, and scalars convert
/// permissively into the declared field types. Declared fields the document
/// does not mention keep their default values.
///
/// ```
/// use jsonbind::record;
///
/// record! {
///     struct Server {
///         host: String,
///         port: u16,
///     }
/// }
///
/// let server: Server = jsonbind::bind_str(r#"{"host":"10.0.0.1","port":8080}"#)?;
/// assert_eq!(server.host, "10.0.0.1");
/// assert_eq!(server.port, 8080);
/// # Ok::<(), jsonbind::Error>(())
/// ```
///
/// # Errors
///
/// This conversion can fail on syntactically invalid JSON, or with a
/// type-mismatch error when the document's root cannot produce a `T` at
/// all.
pub fn bind_str<T>(s: &str) -> Result<T>
where
    T: Bind,
{
    let node = Decoder::new(StrRead::new(s), TypedMapper::<T>::new()).decode()?;
    finish(node)
}

/// Decode JSON text from bytes, binding the result to `T`.
///
/// # Errors
///
/// Same as [`bind_str`], plus invalid UTF-8.
pub fn bind_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: Bind,
{
    bind_str(slice_to_str(bytes)?)
}

/// Decode JSON text from an IO stream, binding the result to `T`.
///
/// # Errors
///
/// Same as [`bind_str`], plus IO failures from the underlying stream.
pub fn bind_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: Bind,
{
    let node = Decoder::new(IoRead::new(reader), TypedMapper::<T>::new()).decode()?;
    finish(node)
}

/// The one bind failure that is not a syntax error: the document decoded
/// fine but its root cannot become a `T`.
fn finish<T>(node: Slot) -> Result<T>
where
    T: Bind,
{
    match T::from_node(node) {
        Some(value) => Ok(value),
        None => Err(type_mismatch::<T>()),
    }
}

#[cold]
fn type_mismatch<T>() -> Error {
    Error::new(ErrorCode::TypeMismatch(any::type_name::<T>().into()))
}
