use std::result;
use std::fmt::{self, Display};

use thiserror::Error as ThisError;

use crate::token::{Token, TokenKind};

pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("Expected next token to be {expected}. Got {found} instead.")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    #[error("no prefix parse function for {0} found.")]
    NoPrefixParser(TokenKind),
    #[error("Could not parse {0} as integer.")]
    InvalidInteger(String),
}

/// A syntax error, located at the token that triggered it.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    token: Token,
}

impl Error {
    pub fn unexpected_token(expected: TokenKind, found: Token) -> Error {
        let kind = ErrorKind::UnexpectedToken { expected, found: found.kind };
        Error { kind, token: found }
    }

    pub fn no_prefix_parser(token: Token) -> Error {
        Error { kind: ErrorKind::NoPrefixParser(token.kind), token }
    }

    pub fn invalid_integer(token: Token) -> Error {
        Error { kind: ErrorKind::InvalidInteger(token.lexeme.clone()), token }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The bare diagnostic, without location.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    fn loc(&self) -> String {
        if self.token.kind == TokenKind::EndOfFile {
            " at end".to_string()
        } else {
            format!(" at '{}'", self.token.lexeme)
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.token.line, self.loc(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_has_no_location() {
        let e = Error::unexpected_token(TokenKind::Identifier, Token::new(TokenKind::Assign, "=", 3));
        assert_eq!("Expected next token to be IDENTIFIER. Got ASSIGNMENT instead.", e.message());
    }

    #[test]
    fn display_includes_line_and_lexeme() {
        let e = Error::invalid_integer(Token::new(TokenKind::Integer, "99999999999999999999", 2));
        assert_eq!(
            "[line 2] Error at '99999999999999999999': Could not parse 99999999999999999999 as integer.",
            e.to_string()
        );
    }

    #[test]
    fn display_at_end_of_input() {
        let e = Error::no_prefix_parser(Token::end_of_file(7));
        assert_eq!("[line 7] Error at end: no prefix parse function for EOF found.", e.to_string());
    }
}
