//! When decoding or encoding JSON goes wrong.

use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

/// This type represents all possible errors that can occur when decoding or
/// encoding JSON data.
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible. A
    /// larger `Error` type was substantially slower due to all the functions
    /// that pass around `Result<T, Error>`.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `jsonbind::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// Zero-based character offset at which the error was detected, if the
    /// error is tied to a location in the input.
    ///
    /// The offset counts characters, not bytes, and matches the position
    /// reported by [`Tokenizer::position`](crate::Tokenizer::position). I/O
    /// errors and data errors raised after decoding carry no position.
    pub fn position(&self) -> Option<usize> {
        self.err.position
    }

    /// Specifies the cause of this error.
    ///
    /// Useful when precise error handling is required or translation of
    /// error messages is required.
    pub fn code(&self) -> &ErrorCode {
        &self.err.code
    }

    /// Categorizes the cause of this error.
    ///
    /// - `Category::Io` - failure to read or write bytes on an IO stream
    /// - `Category::Syntax` - input that is not syntactically valid JSON
    /// - `Category::Data` - input data that is semantically incorrect
    /// - `Category::Eof` - unexpected end of the input data
    pub fn classify(&self) -> Category {
        match self.err.code {
            ErrorCode::Io(_) => Category::Io,
            ErrorCode::UnexpectedEndOfInput => Category::Eof,
            ErrorCode::TypeMismatch(_) => Category::Data,
            ErrorCode::UnexpectedCharacter(_)
            | ErrorCode::UnclosedString
            | ErrorCode::InvalidEscape(_)
            | ErrorCode::InvalidUnicodeEscape
            | ErrorCode::LoneSurrogateInUnicodeEscape
            | ErrorCode::InvalidUnicodeCodePoint
            | ErrorCode::InvalidNumber(_)
            | ErrorCode::InvalidKeyword(_)
            | ErrorCode::ExpectedColon
            | ErrorCode::ExpectedCommaOrBraceEnd
            | ErrorCode::ExpectedCommaOrBracketEnd
            | ErrorCode::KeyMustBeString
            | ErrorCode::UnexpectedToken
            | ErrorCode::TrailingCharacters
            | ErrorCode::RecursionLimitExceeded => Category::Syntax,
        }
    }

    /// Returns true if this error was caused by a failure to read or write
    /// bytes on an IO stream.
    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }

    /// Returns true if this error was caused by input that was not
    /// syntactically valid JSON.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    /// Returns true if this error was caused by input data that was
    /// semantically incorrect.
    ///
    /// For example, JSON containing a string is semantically incorrect when
    /// the value being bound holds a nested record.
    pub fn is_data(&self) -> bool {
        self.classify() == Category::Data
    }

    /// Returns true if this error was caused by prematurely reaching the end of
    /// the input data.
    ///
    /// Callers that process streaming input may be interested in retrying the
    /// decode once more data is available.
    pub fn is_eof(&self) -> bool {
        self.classify() == Category::Eof
    }
}

/// Categorizes the cause of a `jsonbind::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// The error was caused by a failure to read or write bytes on an IO
    /// stream.
    Io,

    /// The error was caused by input that was not syntactically valid JSON.
    Syntax,

    /// The error was caused by input data that was semantically incorrect.
    ///
    /// For example, JSON containing a string is semantically incorrect when
    /// the value being bound holds a nested record.
    Data,

    /// The error was caused by prematurely reaching the end of the input data.
    ///
    /// Callers that process streaming input may be interested in retrying the
    /// decode once more data is available.
    Eof,
}

#[allow(clippy::fallible_impl_from)]
impl From<Error> for io::Error {
    /// Convert a `jsonbind::Error` into an `io::Error`.
    ///
    /// JSON syntax and data errors are turned into `InvalidData` IO errors.
    /// EOF errors are turned into `UnexpectedEof` IO errors.
    fn from(j: Error) -> Self {
        if let ErrorCode::Io(err) = j.err.code {
            err
        } else {
            match j.classify() {
                Category::Io => unreachable!(),
                Category::Syntax | Category::Data => io::Error::new(io::ErrorKind::InvalidData, j),
                Category::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, j),
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err)
    }
}

struct ErrorImpl {
    code: ErrorCode,
    position: Option<usize>,
}

/// This type describes all possible errors that can occur when decoding or
/// encoding JSON data.
pub enum ErrorCode {
    /// Some IO error occurred while decoding or encoding.
    Io(io::Error),

    /// A character that cannot start any token.
    UnexpectedCharacter(char),

    /// A string literal ran into a raw newline or the end of input before its
    /// closing quote.
    UnclosedString,

    /// A `\` escape introduced a character with no defined meaning.
    InvalidEscape(char),

    /// A `\u` escape was not followed by four hex digits.
    InvalidUnicodeEscape,

    /// A `\u` escape encoded a UTF-16 surrogate with no valid partner.
    LoneSurrogateInUnicodeEscape,

    /// The input contained a byte sequence that is not a Unicode scalar value.
    InvalidUnicodeCodePoint,

    /// A numeric literal that parses as neither integer nor float. Carries the
    /// offending run of characters.
    InvalidNumber(Box<str>),

    /// A keyword other than `true`, `false`, or `null`. Carries the offending
    /// substring.
    InvalidKeyword(Box<str>),

    /// Expected a `:` between an object key and its value.
    ExpectedColon,

    /// Expected either a `,` or a `}` after an object member.
    ExpectedCommaOrBraceEnd,

    /// Expected either a `,` or a `]` after an array element.
    ExpectedCommaOrBracketEnd,

    /// Object key is not a string.
    KeyMustBeString,

    /// A structural token appeared where a value was expected.
    UnexpectedToken,

    /// The input ended where a value was expected.
    UnexpectedEndOfInput,

    /// JSON has non-whitespace trailing characters after the value.
    TrailingCharacters,

    /// Encountered nesting of JSON objects and arrays more than 1024 layers
    /// deep.
    RecursionLimitExceeded,

    /// The decoded document cannot be bound to the requested type. Carries the
    /// name of that type.
    TypeMismatch(Box<str>),
}

impl Error {
    #[cold]
    pub(crate) fn syntax(code: ErrorCode, position: usize) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                position: Some(position),
            }),
        }
    }

    #[cold]
    pub(crate) fn io(error: io::Error) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code: ErrorCode::Io(error),
                position: None,
            }),
        }
    }

    #[cold]
    pub(crate) fn new(code: ErrorCode) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                position: None,
            }),
        }
    }

    // Errors surfaced by a character source know no token position; the
    // tokenizer stamps its counter on them as they pass through. IO errors
    // describe the stream, not a place in the input, and stay unstamped.
    #[cold]
    pub(crate) fn fix_position(mut self, position: usize) -> Self {
        if self.err.position.is_none() && !matches!(self.err.code, ErrorCode::Io(_)) {
            self.err.position = Some(position);
        }
        self
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorCode::Io(err) => Display::fmt(err, f),
            ErrorCode::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character `{}`", ch.escape_debug())
            }
            ErrorCode::UnclosedString => f.write_str("unclosed string"),
            ErrorCode::InvalidEscape(ch) => {
                write!(f, "invalid escape `\\{}`", ch.escape_debug())
            }
            ErrorCode::InvalidUnicodeEscape => f.write_str("invalid unicode escape"),
            ErrorCode::LoneSurrogateInUnicodeEscape => {
                f.write_str("lone surrogate in unicode escape")
            }
            ErrorCode::InvalidUnicodeCodePoint => f.write_str("invalid unicode code point"),
            ErrorCode::InvalidNumber(run) => write!(f, "invalid number `{}`", run),
            ErrorCode::InvalidKeyword(word) => write!(f, "invalid keyword `{}`", word),
            ErrorCode::ExpectedColon => f.write_str("expected `:`"),
            ErrorCode::ExpectedCommaOrBraceEnd => f.write_str("expected `,` or `}`"),
            ErrorCode::ExpectedCommaOrBracketEnd => f.write_str("expected `,` or `]`"),
            ErrorCode::KeyMustBeString => f.write_str("object key must be a string"),
            ErrorCode::UnexpectedToken => f.write_str("unexpected token"),
            ErrorCode::UnexpectedEndOfInput => f.write_str("unexpected end of input"),
            ErrorCode::TrailingCharacters => f.write_str("trailing characters"),
            ErrorCode::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
            ErrorCode::TypeMismatch(ty) => write!(f, "value cannot be bound to `{}`", ty),
        }
    }
}

impl Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorCode::Io(_) => f.debug_tuple("Io").finish(),
            ErrorCode::UnexpectedCharacter(ch) => {
                f.debug_tuple("UnexpectedCharacter").field(ch).finish()
            }
            ErrorCode::UnclosedString => f.write_str("UnclosedString"),
            ErrorCode::InvalidEscape(ch) => f.debug_tuple("InvalidEscape").field(ch).finish(),
            ErrorCode::InvalidUnicodeEscape => f.write_str("InvalidUnicodeEscape"),
            ErrorCode::LoneSurrogateInUnicodeEscape => {
                f.write_str("LoneSurrogateInUnicodeEscape")
            }
            ErrorCode::InvalidUnicodeCodePoint => f.write_str("InvalidUnicodeCodePoint"),
            ErrorCode::InvalidNumber(run) => f.debug_tuple("InvalidNumber").field(run).finish(),
            ErrorCode::InvalidKeyword(word) => {
                f.debug_tuple("InvalidKeyword").field(word).finish()
            }
            ErrorCode::ExpectedColon => f.write_str("ExpectedColon"),
            ErrorCode::ExpectedCommaOrBraceEnd => f.write_str("ExpectedCommaOrBraceEnd"),
            ErrorCode::ExpectedCommaOrBracketEnd => f.write_str("ExpectedCommaOrBracketEnd"),
            ErrorCode::KeyMustBeString => f.write_str("KeyMustBeString"),
            ErrorCode::UnexpectedToken => f.write_str("UnexpectedToken"),
            ErrorCode::UnexpectedEndOfInput => f.write_str("UnexpectedEndOfInput"),
            ErrorCode::TrailingCharacters => f.write_str("TrailingCharacters"),
            ErrorCode::RecursionLimitExceeded => f.write_str("RecursionLimitExceeded"),
            ErrorCode::TypeMismatch(ty) => f.debug_tuple("TypeMismatch").field(ty).finish(),
        }
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCode::Io(_), ErrorCode::Io(_)) => true,
            (ErrorCode::UnexpectedCharacter(l), ErrorCode::UnexpectedCharacter(r)) => l == r,
            (ErrorCode::InvalidEscape(l), ErrorCode::InvalidEscape(r)) => l == r,
            (ErrorCode::InvalidNumber(l), ErrorCode::InvalidNumber(r)) => l == r,
            (ErrorCode::InvalidKeyword(l), ErrorCode::InvalidKeyword(r)) => l == r,
            (ErrorCode::TypeMismatch(l), ErrorCode::TypeMismatch(r)) => l == r,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.err.code {
            ErrorCode::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            None => Display::fmt(&self.code, f),
            Some(position) => write!(f, "{} at position {}", self.code, position),
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.err.position {
            None => write!(f, "Error({:?})", self.err.code.to_string()),
            Some(position) => write!(
                f,
                "Error({:?}, position: {})",
                self.err.code.to_string(),
                position
            ),
        }
    }
}
