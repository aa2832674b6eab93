//! Encode values as JSON text.

use crate::error::{Error, Result};
use crate::map::Map;
use crate::value::Value;
use std::io;
use std::num::FpCategory;

/// A value that can write itself as JSON text.
///
/// Encoding dispatches statically on the value's one capability: a map
/// encodes as an object, a slice as an array, a string as quoted text, and
/// so on. [`Value`] is the exception and carries every capability, picking
/// the matching rule per variant. Types with named fields implement this
/// trait by hand or through [`record!`](crate::record!) and encode as an
/// object with one property per field, in declaration order.
///
/// ```
/// use jsonbind::{Encode, Encoder, Result};
/// use std::io;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Encode for Point {
///     fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
///     where
///         W: io::Write,
///     {
///         let mut object = encoder.object()?;
///         object.property("x", &self.x)?;
///         object.property("y", &self.y)?;
///         object.finish()
///     }
/// }
///
/// let text = jsonbind::to_string(&Point { x: 1, y: 2 })?;
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
/// # Ok::<(), jsonbind::Error>(())
/// ```
pub trait Encode {
    /// Write `self` to the encoder as one complete JSON element.
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write;
}

/// A structure for encoding JSON values into an [`io::Write`] sink.
///
/// Output is always the minimal compact form. Text is written incrementally;
/// nothing is buffered beyond what the sink itself buffers.
pub struct Encoder<W> {
    writer: W,
}

impl<W> Encoder<W>
where
    W: io::Write,
{
    /// Create an encoder that writes to `writer`.
    pub fn new(writer: W) -> Self {
        Encoder { writer }
    }

    /// Unwrap the writer from the encoder.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write the literal `null`.
    pub fn write_null(&mut self) -> Result<()> {
        self.writer.write_all(b"null").map_err(Error::io)
    }

    /// Write the literal `true` or `false`.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        let literal: &[u8] = if value { b"true" } else { b"false" };
        self.writer.write_all(literal).map_err(Error::io)
    }

    /// Write an integer in its decimal form.
    pub fn write_int<I>(&mut self, value: I) -> Result<()>
    where
        I: itoa::Integer,
    {
        let mut buffer = itoa::Buffer::new();
        self.writer
            .write_all(buffer.format(value).as_bytes())
            .map_err(Error::io)
    }

    /// Write a floating point number in its shortest round-trip form.
    /// Infinite and NaN values have no JSON representation and are written
    /// as `null`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        match value.classify() {
            FpCategory::Nan | FpCategory::Infinite => self.write_null(),
            _ => {
                let mut buffer = zmij::Buffer::new();
                self.writer
                    .write_all(buffer.format_finite(value).as_bytes())
                    .map_err(Error::io)
            }
        }
    }

    /// Write a 32-bit floating point number. Same contract as
    /// [`write_f64`](Encoder::write_f64).
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        match value.classify() {
            FpCategory::Nan | FpCategory::Infinite => self.write_null(),
            _ => {
                let mut buffer = zmij::Buffer::new();
                self.writer
                    .write_all(buffer.format_finite(value).as_bytes())
                    .map_err(Error::io)
            }
        }
    }

    /// Write a quoted, escaped string.
    ///
    /// The named escapes mirror the ones the tokenizer understands, and any
    /// character outside printable ASCII is written as `\u` plus four
    /// lowercase hex digits per UTF-16 unit, so the output itself is plain
    /// ASCII. `/` is not escaped.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.writer.write_all(b"\"").map_err(Error::io)?;

        let mut start = 0;
        for (i, ch) in value.char_indices() {
            if !needs_escape(ch) {
                continue;
            }
            if start < i {
                self.writer
                    .write_all(value[start..i].as_bytes())
                    .map_err(Error::io)?;
            }
            self.write_char_escape(ch)?;
            start = i + ch.len_utf8();
        }
        if start < value.len() {
            self.writer
                .write_all(value[start..].as_bytes())
                .map_err(Error::io)?;
        }

        self.writer.write_all(b"\"").map_err(Error::io)
    }

    /// Begin an array. The opening `[` is written immediately; elements and
    /// the closing `]` go through the returned builder.
    pub fn seq(&mut self) -> Result<Seq<'_, W>> {
        self.writer.write_all(b"[").map_err(Error::io)?;
        Ok(Seq {
            encoder: self,
            head: true,
        })
    }

    /// Begin an object. The opening `{` is written immediately; properties
    /// and the closing `}` go through the returned builder.
    pub fn object(&mut self) -> Result<Object<'_, W>> {
        self.writer.write_all(b"{").map_err(Error::io)?;
        Ok(Object {
            encoder: self,
            head: true,
        })
    }

    fn write_char_escape(&mut self, ch: char) -> Result<()> {
        let escape: &[u8; 2] = match ch {
            '"' => b"\\\"",
            '\\' => b"\\\\",
            '\u{8}' => b"\\b",
            '\u{c}' => b"\\f",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            _ => {
                static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
                let mut units = [0; 2];
                for &unit in ch.encode_utf16(&mut units).iter() {
                    let bytes = &[
                        b'\\',
                        b'u',
                        HEX_DIGITS[(unit >> 12) as usize & 0xF],
                        HEX_DIGITS[(unit >> 8) as usize & 0xF],
                        HEX_DIGITS[(unit >> 4) as usize & 0xF],
                        HEX_DIGITS[unit as usize & 0xF],
                    ];
                    self.writer.write_all(bytes).map_err(Error::io)?;
                }
                return Ok(());
            }
        };
        self.writer.write_all(escape).map_err(Error::io)
    }
}

/// True for the characters `write_str` cannot emit literally: the two
/// characters that open escape sequences and everything outside printable
/// ASCII `0x20`..=`0x7E`.
fn needs_escape(ch: char) -> bool {
    match ch {
        '"' | '\\' => true,
        '\u{20}'..='\u{7e}' => false,
        _ => true,
    }
}

/// A builder for the elements of one array, created by
/// [`Encoder::seq`].
pub struct Seq<'a, W> {
    encoder: &'a mut Encoder<W>,
    head: bool,
}

impl<'a, W> Seq<'a, W>
where
    W: io::Write,
{
    /// Encode one element, preceded by a separating comma when it is not
    /// the first.
    pub fn element<T>(&mut self, element: &T) -> Result<()>
    where
        T: ?Sized + Encode,
    {
        if self.head {
            self.head = false;
        } else {
            self.encoder.writer.write_all(b",").map_err(Error::io)?;
        }
        element.encode(self.encoder)
    }

    /// Close the array.
    pub fn finish(self) -> Result<()> {
        self.encoder.writer.write_all(b"]").map_err(Error::io)
    }
}

/// A builder for the properties of one object, created by
/// [`Encoder::object`].
pub struct Object<'a, W> {
    encoder: &'a mut Encoder<W>,
    head: bool,
}

impl<'a, W> Object<'a, W>
where
    W: io::Write,
{
    /// Encode one `"name":value` property, preceded by a separating comma
    /// when it is not the first.
    pub fn property<T>(&mut self, name: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Encode,
    {
        if self.head {
            self.head = false;
        } else {
            self.encoder.writer.write_all(b",").map_err(Error::io)?;
        }
        self.encoder.write_str(name)?;
        self.encoder.writer.write_all(b":").map_err(Error::io)?;
        value.encode(self.encoder)
    }

    /// Close the object.
    pub fn finish(self) -> Result<()> {
        self.encoder.writer.write_all(b"}").map_err(Error::io)
    }
}

impl Encode for Value {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        // Arms follow the dispatch order: null, mapping, sequence, text,
        // number, boolean.
        match self {
            Value::Null => encoder.write_null(),
            Value::Object(map) => map.encode(encoder),
            Value::Array(vec) => vec.encode(encoder),
            Value::String(s) => encoder.write_str(s),
            Value::Number(n) => n.encode(encoder),
            Value::Bool(b) => encoder.write_bool(*b),
        }
    }
}

impl<V> Encode for Map<String, V>
where
    V: Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        let mut object = encoder.object()?;
        for (key, value) in self {
            object.property(key, value)?;
        }
        object.finish()
    }
}

impl<T> Encode for [T]
where
    T: Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        let mut seq = encoder.seq()?;
        for element in self {
            seq.element(element)?;
        }
        seq.finish()
    }
}

impl<T> Encode for Vec<T>
where
    T: Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        self.as_slice().encode(encoder)
    }
}

impl<T, const N: usize> Encode for [T; N]
where
    T: Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        self.as_slice().encode(encoder)
    }
}

impl Encode for str {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        encoder.write_str(self)
    }
}

impl Encode for String {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        encoder.write_str(self)
    }
}

impl Encode for bool {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        encoder.write_bool(*self)
    }
}

impl Encode for f64 {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        encoder.write_f64(*self)
    }
}

impl Encode for f32 {
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        encoder.write_f32(*self)
    }
}

impl<T> Encode for Option<T>
where
    T: Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        match self {
            None => encoder.write_null(),
            Some(value) => value.encode(encoder),
        }
    }
}

impl<'a, T> Encode for &'a T
where
    T: ?Sized + Encode,
{
    fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
    where
        W: io::Write,
    {
        (**self).encode(encoder)
    }
}

macro_rules! impl_encode_int {
    ($($ty:ident)*) => {
        $(
            impl Encode for $ty {
                fn encode<W>(&self, encoder: &mut Encoder<W>) -> Result<()>
                where
                    W: io::Write,
                {
                    encoder.write_int(*self)
                }
            }
        )*
    };
}

impl_encode_int!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize);

/// Encode the given value as JSON text into the IO stream.
///
/// # Errors
///
/// Encoding can fail only when writing to the underlying stream fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Encode,
{
    let mut encoder = Encoder::new(writer);
    value.encode(&mut encoder)
}

/// Encode the given value as a `String` of JSON text.
///
/// ```
/// let value = jsonbind::from_str("[0,1,2,3]")?;
/// assert_eq!(jsonbind::to_string(&value)?, "[0,1,2,3]");
/// # Ok::<(), jsonbind::Error>(())
/// ```
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Encode,
{
    let mut writer = Vec::with_capacity(128);
    to_writer(&mut writer, value)?;
    // Safety: the encoder only emits valid UTF-8.
    let string = unsafe { String::from_utf8_unchecked(writer) };
    Ok(string)
}
