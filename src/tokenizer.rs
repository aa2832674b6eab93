//! JSON lexical analysis: a character stream in, typed tokens out.

use crate::error::{Error, ErrorCode, Result};
use crate::number::Number;
use crate::read::Read;

/// The kind of a lexical token. Literal kinds carry their decoded payload:
/// strings are already unescaped and numbers already parsed, so nothing
/// downstream ever re-reads token text.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// A numeric literal.
    Number(Number),
    /// A string literal, unescaped.
    String(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// End of input.
    End,
}

/// One lexical token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Zero-based character offset just past the last character of the token.
    ///
    /// Every token records the position at which it was completed, not where
    /// it began; a caller that wants start positions can read the previous
    /// token's end.
    pub position: usize,
}

/// Streaming JSON tokenizer with a single character of look-ahead.
///
/// The tokenizer never buffers more than the one peeked character, so it can
/// run over any [`Read`] source. Once the input is exhausted, every further
/// call to [`next_token`](Tokenizer::next_token) returns an
/// [`End`](TokenKind::End) token.
pub struct Tokenizer<R> {
    read: R,
    position: usize,
}

impl<R> Tokenizer<R>
where
    R: Read,
{
    /// Create a tokenizer over a character source.
    pub fn new(read: R) -> Self {
        Tokenizer { read, position: 0 }
    }

    /// Zero-based character offset of the next unread character.
    ///
    /// Counts characters, not bytes. Every consumed character advances the
    /// counter, including characters inside escape sequences and keywords.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Lex one token.
    ///
    /// A maximal run of whitespace (space, tab, carriage return, newline) is
    /// skipped first. Errors carry the character position at which the
    /// problem was detected.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace()?;
        let ch = match self.peek()? {
            Some(ch) => ch,
            None => return Ok(self.token(TokenKind::End)),
        };
        match ch {
            '"' => {
                self.bump()?;
                self.string_token()
            }
            '+' | '-' | '0'..='9' => self.number_token(),
            '{' => self.structural(TokenKind::LeftBrace),
            '}' => self.structural(TokenKind::RightBrace),
            '[' => self.structural(TokenKind::LeftBracket),
            ']' => self.structural(TokenKind::RightBracket),
            ',' => self.structural(TokenKind::Comma),
            ':' => self.structural(TokenKind::Colon),
            't' => self.keyword_token("true", TokenKind::Bool(true)),
            'f' => self.keyword_token("false", TokenKind::Bool(false)),
            'n' => self.keyword_token("null", TokenKind::Null),
            _ => {
                self.bump()?;
                Err(self.error(ErrorCode::UnexpectedCharacter(ch)))
            }
        }
    }

    fn bump(&mut self) -> Result<Option<char>> {
        let position = self.position;
        let ch = self.read.next().map_err(|err| err.fix_position(position))?;
        if ch.is_some() {
            self.position += 1;
        }
        Ok(ch)
    }

    fn peek(&mut self) -> Result<Option<char>> {
        let position = self.position;
        self.read.peek().map_err(|err| err.fix_position(position))
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            position: self.position,
        }
    }

    #[cold]
    fn error(&self, code: ErrorCode) -> Error {
        Error::syntax(code, self.position)
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(ch) = self.peek()? {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn structural(&mut self, kind: TokenKind) -> Result<Token> {
        self.bump()?;
        Ok(self.token(kind))
    }

    /// Greedily consume the maximal run of number-ish characters, then parse
    /// the run as a whole. `12.12.12` is therefore one malformed number, not
    /// two numbers back to back.
    fn number_token(&mut self) -> Result<Token> {
        let mut run = String::new();
        while let Some(ch) = self.peek()? {
            match ch {
                '+' | '-' | '.' | 'e' | 'E' | '0'..='9' => {
                    self.bump()?;
                    run.push(ch);
                }
                _ => break,
            }
        }
        // i64 first so plain integers stay integral, u64 for the upper half
        // of the unsigned range, f64 for everything else. Runs like `1e999`
        // overflow to a non-finite float and are rejected as malformed.
        let number = if let Ok(n) = run.parse::<i64>() {
            Number::from(n)
        } else if let Ok(n) = run.parse::<u64>() {
            Number::from(n)
        } else if let Some(number) = run.parse::<f64>().ok().and_then(Number::from_f64) {
            number
        } else {
            return Err(self.error(ErrorCode::InvalidNumber(run.into_boxed_str())));
        };
        Ok(self.token(TokenKind::Number(number)))
    }

    /// Scan a string literal. The opening quote has already been consumed.
    fn string_token(&mut self) -> Result<Token> {
        let mut s = String::new();
        loop {
            let ch = match self.bump()? {
                Some(ch) => ch,
                None => return Err(self.error(ErrorCode::UnclosedString)),
            };
            match ch {
                '"' => return Ok(self.token(TokenKind::String(s))),
                '\r' | '\n' => return Err(self.error(ErrorCode::UnclosedString)),
                '\\' => s.push(self.escape()?),
                _ => s.push(ch),
            }
        }
    }

    /// Decode one escape sequence. The backslash has already been consumed.
    fn escape(&mut self) -> Result<char> {
        let ch = match self.bump()? {
            Some(ch) => ch,
            None => return Err(self.error(ErrorCode::UnclosedString)),
        };
        match ch {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.unicode_escape(),
            _ => Err(self.error(ErrorCode::InvalidEscape(ch))),
        }
    }

    /// Decode a `\u` escape. UTF-16 surrogates must form a complete pair; a
    /// lone or mismatched surrogate cannot become a Rust character.
    fn unicode_escape(&mut self) -> Result<char> {
        let code = self.hex_code()?;
        match code {
            0xDC00..=0xDFFF => Err(self.error(ErrorCode::LoneSurrogateInUnicodeEscape)),
            0xD800..=0xDBFF => {
                let high = code;
                if self.bump()? != Some('\\') {
                    return Err(self.error(ErrorCode::LoneSurrogateInUnicodeEscape));
                }
                if self.bump()? != Some('u') {
                    return Err(self.error(ErrorCode::LoneSurrogateInUnicodeEscape));
                }
                let low = self.hex_code()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error(ErrorCode::LoneSurrogateInUnicodeEscape));
                }
                let scalar =
                    0x10000 + (u32::from(high - 0xD800) << 10) + u32::from(low - 0xDC00);
                match char::from_u32(scalar) {
                    Some(ch) => Ok(ch),
                    None => Err(self.error(ErrorCode::InvalidUnicodeCodePoint)),
                }
            }
            _ => match char::from_u32(u32::from(code)) {
                Some(ch) => Ok(ch),
                None => Err(self.error(ErrorCode::InvalidUnicodeCodePoint)),
            },
        }
    }

    /// Read exactly four hex digits into a UTF-16 code unit.
    fn hex_code(&mut self) -> Result<u16> {
        let mut code: u16 = 0;
        for _ in 0..4 {
            let ch = match self.bump()? {
                Some(ch) => ch,
                None => return Err(self.error(ErrorCode::InvalidUnicodeEscape)),
            };
            let digit = match ch.to_digit(16) {
                Some(digit) => digit as u16,
                None => return Err(self.error(ErrorCode::InvalidUnicodeEscape)),
            };
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Match a literal keyword starting at the current character. Reads as
    /// many characters as the keyword is long (fewer at end of input) and
    /// reports the actual characters on a mismatch.
    fn keyword_token(&mut self, keyword: &'static str, kind: TokenKind) -> Result<Token> {
        let mut actual = String::new();
        for _ in 0..keyword.len() {
            match self.bump()? {
                Some(ch) => actual.push(ch),
                None => break,
            }
        }
        if actual == keyword {
            Ok(self.token(kind))
        } else {
            Err(self.error(ErrorCode::InvalidKeyword(actual.into_boxed_str())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::StrRead;

    fn tokenize(input: &str) -> Vec<TokenKind> {
        let mut tokenizer = Tokenizer::new(StrRead::new(input));
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            if token.kind == TokenKind::End {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    fn tokenize_err(input: &str) -> Error {
        let mut tokenizer = Tokenizer::new(StrRead::new(input));
        loop {
            match tokenizer.next_token() {
                Ok(token) => {
                    assert!(
                        token.kind != TokenKind::End,
                        "tokenized {:?} without an error",
                        input
                    );
                }
                Err(err) => return err,
            }
        }
    }

    fn float(f: f64) -> TokenKind {
        TokenKind::Number(Number::from_f64(f).unwrap())
    }

    fn int(i: i64) -> TokenKind {
        TokenKind::Number(Number::from(i))
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("0.1234 1234 0.12e-5"),
            [float(0.1234), int(1234), float(0.12e-5)],
        );
        assert_eq!(tokenize("-42"), [int(-42)]);
        assert_eq!(tokenize("+42"), [int(42)]);
        assert_eq!(tokenize("18446744073709551615"), [TokenKind::Number(Number::from(u64::MAX))]);
    }

    #[test]
    fn integers_stay_integral() {
        match &tokenize("1234")[0] {
            TokenKind::Number(n) => {
                assert!(n.is_i64());
                assert!(!n.is_f64());
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn malformed_numbers() {
        let err = tokenize_err("12.12.12");
        assert!(err.is_syntax());
        assert_eq!(err.position(), Some(8));
        assert_eq!(
            *err.code(),
            ErrorCode::InvalidNumber("12.12.12".into())
        );

        assert!(tokenize_err(".").is_syntax());
        assert!(tokenize_err("-").is_syntax());
        assert!(tokenize_err("1e999").is_syntax());
    }

    #[test]
    fn strings() {
        assert_eq!(
            tokenize("\"abc\\n\\u3042\""),
            [TokenKind::String("abc\n\u{3042}".to_owned())],
        );
        assert_eq!(
            tokenize(r#""\" \\ \/ \b \f \n \r \t""#),
            [TokenKind::String("\" \\ / \u{8} \u{c} \n \r \t".to_owned())],
        );
        // Characters with no escape of their own pass through untouched.
        assert_eq!(tokenize("\"a\tb\""), [TokenKind::String("a\tb".to_owned())]);
    }

    #[test]
    fn unclosed_strings() {
        assert_eq!(*tokenize_err("\"unclosed string").code(), ErrorCode::UnclosedString);
        assert_eq!(*tokenize_err("\"raw\nnewline\"").code(), ErrorCode::UnclosedString);
        assert_eq!(*tokenize_err("\"raw\rreturn\"").code(), ErrorCode::UnclosedString);
        assert_eq!(*tokenize_err("\"ends in backslash\\").code(), ErrorCode::UnclosedString);
        // Four valid hex digits, two literal characters, then end of input.
        assert_eq!(*tokenize_err("\"\\uBADBAD").code(), ErrorCode::UnclosedString);
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(
            tokenize("\"\\ud834\\udd1e\""),
            [TokenKind::String("\u{1d11e}".to_owned())],
        );
        assert_eq!(*tokenize_err("\"\\uZZZZ\"").code(), ErrorCode::InvalidUnicodeEscape);
        assert_eq!(*tokenize_err("\"\\uBA").code(), ErrorCode::InvalidUnicodeEscape);
        assert_eq!(
            *tokenize_err("\"\\ud834x\"").code(),
            ErrorCode::LoneSurrogateInUnicodeEscape,
        );
        assert_eq!(
            *tokenize_err("\"\\ud834\\u0020\"").code(),
            ErrorCode::LoneSurrogateInUnicodeEscape,
        );
        assert_eq!(
            *tokenize_err("\"\\udc00\"").code(),
            ErrorCode::LoneSurrogateInUnicodeEscape,
        );
    }

    #[test]
    fn bad_escape() {
        let err = tokenize_err("\"\\x\"");
        assert_eq!(*err.code(), ErrorCode::InvalidEscape('x'));
    }

    #[test]
    fn keywords() {
        assert_eq!(
            tokenize("[true,false,null,{}]"),
            [
                TokenKind::LeftBracket,
                TokenKind::Bool(true),
                TokenKind::Comma,
                TokenKind::Bool(false),
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::Comma,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::RightBracket,
            ],
        );
    }

    #[test]
    fn malformed_keywords() {
        assert_eq!(*tokenize_err("tru").code(), ErrorCode::InvalidKeyword("tru".into()));
        assert_eq!(*tokenize_err("nuLL").code(), ErrorCode::InvalidKeyword("nuLL".into()));
        assert_eq!(*tokenize_err("fals!").code(), ErrorCode::InvalidKeyword("fals!".into()));
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize_err("@");
        assert_eq!(*err.code(), ErrorCode::UnexpectedCharacter('@'));
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn positions_record_token_completion() {
        let mut tokenizer = Tokenizer::new(StrRead::new("{\"a\": 1}"));
        let positions: Vec<usize> = std::iter::from_fn(|| {
            let token = tokenizer.next_token().unwrap();
            (token.kind != TokenKind::End).then(|| token.position)
        })
        .collect();
        assert_eq!(positions, [1, 4, 5, 7, 8]);
    }

    #[test]
    fn end_is_sticky() {
        let mut tokenizer = Tokenizer::new(StrRead::new("  "));
        for _ in 0..3 {
            let token = tokenizer.next_token().unwrap();
            assert_eq!(token.kind, TokenKind::End);
            assert_eq!(token.position, 2);
        }
    }
}
