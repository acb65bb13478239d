use std::fmt::{self, Display};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, lexeme: S, line: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), line }
    }

    pub fn end_of_file(line: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", line)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    Illegal, EndOfFile,

    Identifier, Integer, String,

    Assign, Plus, Minus, Bang, Asterisk, Slash,
    Less, Greater, Equal, NotEqual,

    Comma, Semicolon, Colon,

    LeftParen, RightParen, LeftBrace, RightBrace, LeftBracket, RightBracket,

    Function, Let, True, False, If, Else, Return,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let name = match self {
            Illegal => "ILLEGAL",
            EndOfFile => "EOF",
            Identifier => "IDENTIFIER",
            Integer => "INTEGER",
            String => "STRING",
            Assign => "ASSIGNMENT",
            Plus => "PLUS",
            Minus => "MINUS",
            Bang => "BANG",
            Asterisk => "ASTERISK",
            Slash => "SLASH",
            Less => "LESS_THAN",
            Greater => "GREATER_THAN",
            Equal => "EQUAL",
            NotEqual => "NOT_EQUAL",
            Comma => "COMMA",
            Semicolon => "SEMICOLON",
            Colon => "COLON",
            LeftParen => "LEFT_PARENTHESIS",
            RightParen => "RIGHT_PARENTHESIS",
            LeftBrace => "LEFT_BRACE",
            RightBrace => "RIGHT_BRACE",
            LeftBracket => "LEFT_BRACKET",
            RightBracket => "RIGHT_BRACKET",
            Function => "FUNCTION",
            Let => "LET",
            True => "TRUE",
            False => "FALSE",
            If => "IF",
            Else => "ELSE",
            Return => "RETURN",
        };
        write!(f, "{}", name)
    }
}
