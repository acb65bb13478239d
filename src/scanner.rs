use crate::token::{Token, TokenKind};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "fn" => TokenKind::Function,
    "if" => TokenKind::If,
    "let" => TokenKind::Let,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
};

/// Produces tokens lazily in source order. The last token is always a
/// single `EndOfFile`; malformed input becomes `Illegal` tokens instead of
/// failing the scan.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
    finished: bool,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished { return None }

        loop {
            if self.src.peek().is_none() {
                self.finished = true;
                return Some(Token::end_of_file(self.line))
            }

            if let Some(kind) = self.next_token_kind() {
                let lexeme = self.lexeme_buffer.clone();
                self.lexeme_buffer.clear();
                return Some(Token::new(kind, lexeme, self.line))
            }
        }
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
            finished: false,
        }
    }

    pub fn scan_tokens(self) -> Vec<Token> {
        self.collect()
    }

    fn next_token_kind(&mut self) -> Option<TokenKind> {
        let next_char = self.src.next()?;
        self.lexeme_buffer.push(next_char);

        use TokenKind::*;
        match next_char {
            '(' => Some(LeftParen),
            ')' => Some(RightParen),
            '{' => Some(LeftBrace),
            '}' => Some(RightBrace),
            '[' => Some(LeftBracket),
            ']' => Some(RightBracket),
            ',' => Some(Comma),
            ';' => Some(Semicolon),
            ':' => Some(Colon),
            '-' => Some(Minus),
            '+' => Some(Plus),
            '*' => Some(Asterisk),
            '/' => Some(Slash),
            '<' => Some(Less),
            '>' => Some(Greater),
            '!' => Some(if self.does_next_match('=') { NotEqual } else { Bang }),
            '=' => Some(if self.does_next_match('=') { Equal } else { Assign }),
            ' ' | '\r' | '\t' => {
                self.lexeme_buffer.clear();
                None
            },
            '\n' => {
                self.lexeme_buffer.clear();
                self.line += 1;
                None
            },
            '"' => Some(self.extract_string()),
            c if c.is_ascii_digit() => Some(self.extract_integer()),
            c if can_start_identifier(&c) => Some(self.extract_identifier()),
            _ => Some(Illegal),
        }
    }

    fn does_next_match(&mut self, c: char) -> bool {
        match self.src.peek() {
            Some(next) if c == *next => {
                self.lexeme_buffer.push(c);
                self.src.next();
                true
            }
            _ => false,
        }
    }

    fn extract_string(&mut self) -> TokenKind {
        self.lexeme_buffer.clear();
        let mut newline_count = 0;
        self.advance_until_for_each(|n| n == &'"', |c| if c == '\n' { newline_count += 1 });
        self.line += newline_count;
        match self.src.next() {
            // The opening quote is kept so an unterminated literal is visible in diagnostics.
            None => {
                self.lexeme_buffer.insert(0, '"');
                TokenKind::Illegal
            },
            Some(_) => TokenKind::String,
        }
    }

    fn extract_integer(&mut self) -> TokenKind {
        self.advance_until(|n| !n.is_ascii_digit());
        TokenKind::Integer
    }

    fn extract_identifier(&mut self) -> TokenKind {
        self.advance_until(|n| !can_start_identifier(n));

        match KEYWORDS.get(self.lexeme_buffer.as_str()) {
            Some(kind) => *kind,
            None => TokenKind::Identifier,
        }
    }

    fn advance_until(&mut self, should_stop: impl Fn(&char) -> bool) {
        self.advance_until_for_each(should_stop, |_| {})
    }

    fn advance_until_for_each(
        &mut self,
        should_stop: impl Fn(&char) -> bool,
        mut f: impl FnMut(char),
    ) {
        while let Some(next) = self.src.peek() {
            if should_stop(next) { break }
            let next = *next;
            self.src.next();
            self.lexeme_buffer.push(next);
            f(next);
        }
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}
