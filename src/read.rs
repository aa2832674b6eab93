//! Character sources feeding the tokenizer.

use crate::error::{Error, ErrorCode, Result};
use std::io;
use std::str::Chars;

/// Trait used by the tokenizer for iterating over input one character at a
/// time with a single character of look-ahead.
///
/// This trait is sealed and cannot be implemented for types outside of
/// `jsonbind`.
pub trait Read: private::Sealed {
    /// Consume and return the next character, or `None` at end of input.
    fn next(&mut self) -> Result<Option<char>>;

    /// Return the next character without consuming it, or `None` at end of
    /// input.
    fn peek(&mut self) -> Result<Option<char>>;
}

/// Character source reading from a string already in memory.
pub struct StrRead<'a> {
    chars: Chars<'a>,
}

/// Character source reading from a `std::io::Read` stream, decoding UTF-8
/// incrementally.
pub struct IoRead<R>
where
    R: io::Read,
{
    bytes: io::Bytes<R>,
    peeked: Option<char>,
}

impl<'a> StrRead<'a> {
    /// Create a character source from a string slice.
    pub fn new(s: &'a str) -> Self {
        StrRead { chars: s.chars() }
    }
}

impl<'a> Read for StrRead<'a> {
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }

    #[inline]
    fn peek(&mut self) -> Result<Option<char>> {
        // Chars is a cursor into the original slice; cloning it is cheap and
        // leaves this reader in place.
        Ok(self.chars.clone().next())
    }
}

impl<R> IoRead<R>
where
    R: io::Read,
{
    /// Create a character source from an IO stream. The stream must contain
    /// UTF-8 encoded text.
    ///
    /// When reading from a source against which short reads are expensive,
    /// such as a [`File`](std::fs::File), you will want to apply your own
    /// buffering, for example `std::io::BufReader`.
    pub fn new(reader: R) -> Self {
        IoRead {
            bytes: reader.bytes(),
            peeked: None,
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        match self.bytes.next() {
            Some(Ok(byte)) => Ok(Some(byte)),
            Some(Err(err)) => Err(Error::io(err)),
            None => Ok(None),
        }
    }

    /// Decode one UTF-8 encoded scalar value from the byte stream. Truncated,
    /// overlong, and surrogate forms are all rejected; the tokenizer stamps
    /// the character position onto the error on its way out.
    fn decode_char(&mut self) -> Result<Option<char>> {
        let first = match self.next_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        if first < 0x80 {
            return Ok(Some(first as char));
        }
        let (len, init) = match first {
            0xC0..=0xDF => (2, u32::from(first & 0x1F)),
            0xE0..=0xEF => (3, u32::from(first & 0x0F)),
            0xF0..=0xF4 => (4, u32::from(first & 0x07)),
            _ => return Err(Error::new(ErrorCode::InvalidUnicodeCodePoint)),
        };
        let mut code = init;
        for _ in 1..len {
            let byte = match self.next_byte()? {
                Some(byte) => byte,
                None => return Err(Error::new(ErrorCode::InvalidUnicodeCodePoint)),
            };
            if byte & 0xC0 != 0x80 {
                return Err(Error::new(ErrorCode::InvalidUnicodeCodePoint));
            }
            code = code << 6 | u32::from(byte & 0x3F);
        }
        let in_range = match len {
            2 => code >= 0x80,
            3 => code >= 0x800,
            _ => code >= 0x10000,
        };
        if !in_range {
            return Err(Error::new(ErrorCode::InvalidUnicodeCodePoint));
        }
        match char::from_u32(code) {
            Some(ch) => Ok(Some(ch)),
            None => Err(Error::new(ErrorCode::InvalidUnicodeCodePoint)),
        }
    }
}

impl<R> Read for IoRead<R>
where
    R: io::Read,
{
    fn next(&mut self) -> Result<Option<char>> {
        match self.peeked.take() {
            Some(ch) => Ok(Some(ch)),
            None => self.decode_char(),
        }
    }

    fn peek(&mut self) -> Result<Option<char>> {
        if self.peeked.is_none() {
            self.peeked = self.decode_char()?;
        }
        Ok(self.peeked)
    }
}

mod private {
    pub trait Sealed {}
}

impl<'a> private::Sealed for StrRead<'a> {}

impl<R> private::Sealed for IoRead<R> where R: io::Read {}
