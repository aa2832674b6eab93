//! Decode JSON text into values through a pluggable mapping strategy.

use crate::error::{Error, ErrorCode, Result};
use crate::mapper::{DynamicMapper, Mapper, Scalar};
use crate::read::{IoRead, Read, StrRead};
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::value::Value;
use std::io;
use std::str;

/// How many nested containers may be open at once before a decode fails
/// with [`ErrorCode::RecursionLimitExceeded`].
///
/// The decoder recurses once per `{` or `[`, so unguarded input could
/// exhaust the call stack. The guard turns that into an ordinary error
/// while leaving room for any nesting depth a real document reaches; it
/// has to stay low enough to fire before the stack itself runs out.
const RECURSION_LIMIT: u16 = 1024;

/// A structure that decodes one JSON document from a character source,
/// materializing values through a [`Mapper`].
///
/// The decoder owns the syntax: it drives the tokenizer with one token of
/// look-ahead and interprets the object and array productions. Every
/// structural decision is delegated to the mapper, addressed by the pair of
/// the container being populated and the property name about to be attached.
///
/// A decoder is single use. [`decode`](Decoder::decode) consumes it, so one
/// instance cannot be reused across documents.
pub struct Decoder<R, M> {
    tokenizer: Tokenizer<R>,
    mapper: M,
    remaining_depth: u16,
}

impl<R, M> Decoder<R, M>
where
    R: Read,
    M: Mapper,
{
    /// Create a decoder that reads from `read` and builds values with
    /// `mapper`.
    pub fn new(read: R, mapper: M) -> Self {
        Decoder {
            tokenizer: Tokenizer::new(read),
            mapper,
            remaining_depth: RECURSION_LIMIT,
        }
    }

    /// Decode one complete document.
    ///
    /// Exactly one top-level element is accepted. Anything other than end of
    /// input after that element fails with
    /// [`ErrorCode::TrailingCharacters`].
    pub fn decode(mut self) -> Result<M::Value> {
        let token = self.tokenizer.next_token()?;
        let value = self.element(token, None, None)?;
        let end = self.tokenizer.next_token()?;
        match end.kind {
            TokenKind::End => Ok(value),
            _ => Err(Error::syntax(ErrorCode::TrailingCharacters, end.position)),
        }
    }

    /// The element production. Scalars come straight off the token; `{` and
    /// `[` enter the container productions with `(target, property)` naming
    /// the spot the new container will occupy.
    fn element(
        &mut self,
        token: Token,
        target: Option<&M::Value>,
        property: Option<&str>,
    ) -> Result<M::Value> {
        match token.kind {
            TokenKind::Null => Ok(M::Value::from(Scalar::Null)),
            TokenKind::Bool(b) => Ok(M::Value::from(Scalar::Bool(b))),
            TokenKind::Number(n) => Ok(M::Value::from(Scalar::Number(n))),
            TokenKind::String(s) => Ok(M::Value::from(Scalar::String(s))),
            TokenKind::LeftBrace => self.object(target, property),
            TokenKind::LeftBracket => self.array(target, property),
            TokenKind::End => Err(Error::syntax(
                ErrorCode::UnexpectedEndOfInput,
                token.position,
            )),
            _ => Err(Error::syntax(ErrorCode::UnexpectedToken, token.position)),
        }
    }

    /// The object production. The opening `{` has already been consumed.
    fn object(&mut self, target: Option<&M::Value>, property: Option<&str>) -> Result<M::Value> {
        self.remaining_depth -= 1;
        if self.remaining_depth == 0 {
            return Err(self.limit_error());
        }

        let mut container = self.mapper.create_object(target, property);
        loop {
            // A `}` here closes the object, covering both `{}` and a
            // trailing comma before the brace.
            let token = self.tokenizer.next_token()?;
            let key = match token.kind {
                TokenKind::RightBrace => break,
                TokenKind::String(key) => key,
                _ => return Err(Error::syntax(ErrorCode::KeyMustBeString, token.position)),
            };

            let colon = self.tokenizer.next_token()?;
            match colon.kind {
                TokenKind::Colon => {}
                _ => return Err(Error::syntax(ErrorCode::ExpectedColon, colon.position)),
            }

            let token = self.tokenizer.next_token()?;
            let value = self.element(token, Some(&container), Some(&key))?;
            self.mapper.set_property(&mut container, key, value);

            let separator = self.tokenizer.next_token()?;
            match separator.kind {
                TokenKind::RightBrace => break,
                TokenKind::Comma => {}
                _ => {
                    return Err(Error::syntax(
                        ErrorCode::ExpectedCommaOrBraceEnd,
                        separator.position,
                    ));
                }
            }
        }

        self.remaining_depth += 1;
        Ok(container)
    }

    /// The array production. The opening `[` has already been consumed.
    /// Elements are addressed by their parent alone, never by index, so the
    /// property slot is forced to none for everything inside.
    fn array(&mut self, target: Option<&M::Value>, property: Option<&str>) -> Result<M::Value> {
        self.remaining_depth -= 1;
        if self.remaining_depth == 0 {
            return Err(self.limit_error());
        }

        let mut container = self.mapper.create_array(target, property);
        loop {
            let token = self.tokenizer.next_token()?;
            if let TokenKind::RightBracket = token.kind {
                break;
            }
            let element = self.element(token, Some(&container), None)?;
            self.mapper.add_element(&mut container, element);

            let separator = self.tokenizer.next_token()?;
            match separator.kind {
                TokenKind::RightBracket => break,
                TokenKind::Comma => {}
                _ => {
                    return Err(Error::syntax(
                        ErrorCode::ExpectedCommaOrBracketEnd,
                        separator.position,
                    ));
                }
            }
        }

        self.remaining_depth += 1;
        Ok(container)
    }

    #[cold]
    fn limit_error(&self) -> Error {
        Error::syntax(ErrorCode::RecursionLimitExceeded, self.tokenizer.position())
    }
}

/// Decode a tree of [`Value`]s from a string of JSON text.
///
/// Objects become ordered maps that preserve the order keys appear in the
/// source, arrays become vectors, and scalars become the matching [`Value`]
/// variant.
///
/// ```
/// let value = jsonbind::from_str(r#"{"name":"apollo","year":1969}"#)?;
/// let object = value.as_object().unwrap();
/// assert_eq!(object["name"], "apollo");
/// assert_eq!(object["year"], 1969);
/// # Ok::<(), jsonbind::Error>(())
/// ```
///
/// # Errors
///
/// This conversion can fail if the input is not syntactically valid JSON.
pub fn from_str(s: &str) -> Result<Value> {
    Decoder::new(StrRead::new(s), DynamicMapper).decode()
}

/// Decode a tree of [`Value`]s from bytes of JSON text.
///
/// The bytes are validated as UTF-8 up front; the decode proper then runs
/// over characters exactly as [`from_str`] does.
///
/// # Errors
///
/// This conversion can fail if the input is not valid UTF-8 or is not
/// syntactically valid JSON.
pub fn from_slice(bytes: &[u8]) -> Result<Value> {
    from_str(slice_to_str(bytes)?)
}

pub(crate) fn slice_to_str(bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes).map_err(|error| {
        // Positions count characters, so measure the decodable prefix.
        let valid = &bytes[..error.valid_up_to()];
        let position = str::from_utf8(valid).map_or(0, |s| s.chars().count());
        Error::syntax(ErrorCode::InvalidUnicodeCodePoint, position)
    })
}

/// Decode a tree of [`Value`]s from an IO stream of JSON text.
///
/// The content of the stream is decoded directly, without being buffered in
/// memory first. The stream is read to the end of the document; one decode
/// call consumes exactly one top-level element plus any trailing whitespace.
///
/// ```
/// let data = br#"["pick","pack"]"# as &[u8];
/// let value = jsonbind::from_reader(data)?;
/// assert_eq!(value.as_array().unwrap().len(), 2);
/// # Ok::<(), jsonbind::Error>(())
/// ```
///
/// # Errors
///
/// This conversion can fail if the stream fails to read, holds invalid
/// UTF-8, or is not syntactically valid JSON.
pub fn from_reader<R>(reader: R) -> Result<Value>
where
    R: io::Read,
{
    Decoder::new(IoRead::new(reader), DynamicMapper).decode()
}
