use std::{mem, rc::Rc};

use crate::{
    error::{Error, Result},
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
    token::*,
};

/// Binding strength of infix operators, weakest first.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,
    LessOrGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        use TokenKind::*;
        match kind {
            Equal | NotEqual => Precedence::Equals,
            Less | Greater => Precedence::LessOrGreater,
            Plus | Minus => Precedence::Sum,
            Asterisk | Slash => Precedence::Product,
            LeftParen => Precedence::Call,
            LeftBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParser<T> = fn(&mut Parser<T>) -> Result<Expr>;
type InfixParser<T> = fn(&mut Parser<T>, Expr) -> Result<Expr>;

/// Parses `tokens` into a program and the messages of every syntax error
/// met along the way.
pub fn parse<I: IntoIterator<Item = Token>>(tokens: I) -> (Program, Vec<String>) {
    let mut parser = Parser::new(tokens.into_iter());
    let program = parser.parse_program();
    let errors = parser.errors().iter().map(Error::message).collect();
    (program, errors)
}

pub struct Parser<T> {
    tokens: T,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
}

impl <T: Iterator<Item = Token>> Parser<T> {
    pub fn new(mut tokens: T) -> Self {
        let current = tokens.next().unwrap_or_else(|| Token::end_of_file(1));
        let peek = tokens.next().unwrap_or_else(|| Token::end_of_file(current.line));
        Parser { tokens, current, peek, errors: Vec::new() }
    }

    /// Parses statements until the end of input. Statements that fail to
    /// parse are dropped and their errors recorded; parsing carries on.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.current.is(TokenKind::EndOfFile) {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
            self.advance();
        }
        Program { statements }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    fn advance(&mut self) {
        let line = self.peek.line;
        let next = self.tokens.next().unwrap_or_else(|| Token::end_of_file(line));
        self.current = mem::replace(&mut self.peek, next);
    }

    fn declaration(&mut self) -> Option<Stmt> {
        match self.statement() {
            Ok(statement) => Some(statement),
            Err(error) => {
                // A `}` at the top level closes nothing; skip past it.
                if self.recover(error) {
                    self.skip_semicolon();
                }
                None
            },
        }
    }

    /// Records `error` and skips the rest of the broken statement. Returns
    /// true if the statement broke on the `}` that closes its block, which
    /// is then left as `current`.
    fn recover(&mut self, error: Error) -> bool {
        tracing::debug!(%error, "dropping statement");
        self.errors.push(error);
        self.synchronise()
    }

    fn statement(&mut self) -> Result<Stmt> {
        match self.current.kind {
            TokenKind::Let => self.let_statement(),
            TokenKind::Return => self.return_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::Identifier)?;
        let name = self.current_identifier();
        self.expect_peek(TokenKind::Assign)?;
        self.advance();

        let value = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::new_let(token, name, value))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();
        self.advance();

        let value = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::new_return(token, value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();
        let expression = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::new_expression(token, expression))
    }

    /// Parses a brace-delimited block; `current` must be the opening brace.
    fn block(&mut self) -> Result<stmt::Block> {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.advance();

        while !self.current.is(TokenKind::RightBrace) {
            if self.current.is(TokenKind::EndOfFile) {
                return Err(Error::unexpected_token(TokenKind::RightBrace, self.current.clone()))
            }
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => if self.recover(error) { continue },
            }
            self.advance();
        }

        Ok(stmt::Block { token, statements })
    }

    fn expression(&mut self, precedence: Precedence) -> Result<Expr> {
        let prefix = Self::prefix_parser(self.current.kind)
            .ok_or_else(|| Error::no_prefix_parser(self.current.clone()))?;
        let mut left = prefix(self)?;

        while !self.peek.is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind) {
            let infix = match Self::infix_parser(self.peek.kind) {
                Some(infix) => infix,
                None => return Ok(left),
            };
            self.advance();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn prefix_parser(kind: TokenKind) -> Option<PrefixParser<T>> {
        use TokenKind::*;
        match kind {
            Identifier => Some(Self::identifier),
            Integer => Some(Self::integer_literal),
            String => Some(Self::string_literal),
            True | False => Some(Self::boolean_literal),
            Bang | Minus => Some(Self::prefix),
            LeftParen => Some(Self::grouping),
            LeftBracket => Some(Self::array_literal),
            LeftBrace => Some(Self::hash_literal),
            If => Some(Self::if_expression),
            Function => Some(Self::function_literal),
            _ => None,
        }
    }

    fn infix_parser(kind: TokenKind) -> Option<InfixParser<T>> {
        use TokenKind::*;
        match kind {
            Plus | Minus | Asterisk | Slash
            | Equal | NotEqual | Less | Greater => Some(Self::infix),
            LeftParen => Some(Self::call),
            LeftBracket => Some(Self::index),
            _ => None,
        }
    }

    fn identifier(&mut self) -> Result<Expr> {
        Ok(Expr::Identifier(self.current_identifier()))
    }

    fn integer_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        match token.lexeme.parse() {
            Ok(value) => Ok(Expr::new_integer_literal(token, value)),
            Err(_) => Err(Error::invalid_integer(token)),
        }
    }

    fn string_literal(&mut self) -> Result<Expr> {
        let value = self.current.lexeme.clone();
        Ok(Expr::new_string_literal(self.current.clone(), value))
    }

    fn boolean_literal(&mut self) -> Result<Expr> {
        let value = self.current.is(TokenKind::True);
        Ok(Expr::new_boolean_literal(self.current.clone(), value))
    }

    fn prefix(&mut self) -> Result<Expr> {
        let op = self.current.clone();
        self.advance();
        let right = Box::new(self.expression(Precedence::Prefix)?);
        Ok(Expr::new_prefix(op, right))
    }

    fn infix(&mut self, left: Expr) -> Result<Expr> {
        let op = self.current.clone();
        let precedence = Precedence::of(op.kind);
        self.advance();
        let right = Box::new(self.expression(precedence)?);
        Ok(Expr::new_infix(Box::new(left), op, right))
    }

    fn grouping(&mut self) -> Result<Expr> {
        self.advance();
        let expression = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;
        Ok(expression)
    }

    fn if_expression(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LeftParen)?;
        self.advance();
        let condition = Box::new(self.expression(Precedence::Lowest)?);
        self.expect_peek(TokenKind::RightParen)?;
        self.expect_peek(TokenKind::LeftBrace)?;
        let consequence = self.block()?;

        let alternative = if self.peek.is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::LeftBrace)?;
            Some(self.block()?)
        } else { None };

        Ok(Expr::new_if(token, condition, consequence, alternative))
    }

    fn function_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LeftParen)?;
        let parameters = self.function_parameters()?;
        self.expect_peek(TokenKind::LeftBrace)?;
        let body = Rc::new(self.block()?);
        Ok(Expr::new_function_literal(token, parameters, body))
    }

    fn function_parameters(&mut self) -> Result<Vec<expr::Identifier>> {
        let mut params = Vec::new();
        if self.peek.is(TokenKind::RightParen) {
            self.advance();
            return Ok(params)
        }

        loop {
            self.expect_peek(TokenKind::Identifier)?;
            params.push(self.current_identifier());
            if !self.peek.is(TokenKind::Comma) { break }
            self.advance();
        }

        self.expect_peek(TokenKind::RightParen)?;
        Ok(params)
    }

    fn array_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        let elements = self.expression_list(TokenKind::RightBracket)?;
        Ok(Expr::new_array_literal(token, elements))
    }

    fn hash_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while !self.peek.is(TokenKind::RightBrace) {
            self.advance();
            let key = self.expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            let value = self.expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek.is(TokenKind::RightBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }

        self.expect_peek(TokenKind::RightBrace)?;
        Ok(Expr::new_hash_literal(token, pairs))
    }

    fn call(&mut self, callee: Expr) -> Result<Expr> {
        let paren = self.current.clone();
        let arguments = self.expression_list(TokenKind::RightParen)?;
        Ok(Expr::new_call(Box::new(callee), paren, arguments))
    }

    fn index(&mut self, left: Expr) -> Result<Expr> {
        let bracket = self.current.clone();
        self.advance();
        let index = Box::new(self.expression(Precedence::Lowest)?);
        self.expect_peek(TokenKind::RightBracket)?;
        Ok(Expr::new_index(Box::new(left), bracket, index))
    }

    /// Comma-separated expressions up to and including `end`.
    fn expression_list(&mut self, end: TokenKind) -> Result<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek.is(end) {
            self.advance();
            return Ok(list)
        }

        self.advance();
        list.push(self.expression(Precedence::Lowest)?);
        while self.peek.is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }

    fn current_identifier(&self) -> expr::Identifier {
        expr::Identifier {
            token: self.current.clone(),
            name: self.current.lexeme.clone(),
        }
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Result<()> {
        if self.peek.is(kind) {
            self.advance();
            Ok(())
        } else {
            Err(Error::unexpected_token(kind, self.peek.clone()))
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek.is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Skips the rest of a broken statement, stepping over whole nested
    /// blocks. Stops on its closing `;`, or just before the next `let`,
    /// `return`, enclosing `}` or the end of input. Returns true without
    /// moving if the statement broke on an enclosing `}`.
    fn synchronise(&mut self) -> bool {
        let mut depth = 0usize;
        loop {
            use TokenKind::*;
            match self.current.kind {
                EndOfFile => return false,
                RightBrace if depth == 0 => return true,
                LeftBrace => depth += 1,
                RightBrace => depth -= 1,
                Semicolon if depth == 0 => return false,
                _ => {},
            }

            if depth == 0 {
                match self.peek.kind {
                    Let | Return | RightBrace | EndOfFile => return false,
                    _ => {},
                }
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use pretty_assertions::assert_eq;

    fn parse_source(src: &str) -> (Program, Vec<String>) {
        parse(Scanner::new(src))
    }

    fn parse_ok(src: &str) -> Program {
        let (program, errors) = parse_source(src);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        program
    }

    fn single_expression(src: &str) -> Expr {
        let mut program = parse_ok(src);
        assert_eq!(1, program.statements.len());
        match program.statements.remove(0) {
            Stmt::Expression(s) => s.expression,
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    fn assert_tokens_parse_to_expr(tokens: Vec<Token>, expr: Expr) {
        let (mut program, errors) = parse(tokens);
        assert!(errors.is_empty());
        match program.statements.remove(0) {
            Stmt::Expression(s) => assert_eq!(expr, s.expression),
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    impl Token {
        fn make(kind: TokenKind, lexeme: &str) -> Token {
            Token { kind, lexeme: lexeme.into(), line: 0 }
        }
    }

    #[test]
    fn string_literal_token() {
        let token = Token::make(TokenKind::String, "abc");
        assert_tokens_parse_to_expr(
            vec![token.clone()],
            Expr::new_string_literal(token, "abc".into())
        )
    }

    #[test]
    fn integer_literal_token() {
        let token = Token::make(TokenKind::Integer, "51");
        assert_tokens_parse_to_expr(
            vec![token.clone()],
            Expr::new_integer_literal(token, 51)
        )
    }

    #[test]
    fn bool_literal_tokens() {
        for (kind, lexeme, expected) in [(TokenKind::True, "true", true), (TokenKind::False, "false", false)].iter() {
            let token = Token::make(*kind, lexeme);
            assert_tokens_parse_to_expr(
                vec![token.clone()],
                Expr::new_boolean_literal(token, *expected)
            );
        }
    }

    #[test]
    fn prefix_op_tokens() {
        let not = Token::make(TokenKind::Bang, "!");
        let t = Token::make(TokenKind::True, "true");
        assert_tokens_parse_to_expr(
            vec![not.clone(), t.clone()],
            Expr::new_prefix(not, Box::new(Expr::new_boolean_literal(t, true)))
        )
    }

    #[test]
    fn missing_end_of_file_token_is_implied() {
        let x = Token::make(TokenKind::Identifier, "x");
        let (program, errors) = parse(vec![x]);
        assert!(errors.is_empty());
        assert_eq!(1, program.statements.len());
    }

    #[test]
    fn let_statements() {
        let program = parse_ok("let x = 5;\nlet y = true;\nlet foobar = y;");
        let names: Vec<&str> = program.statements.iter()
            .map(|s| match s {
                Stmt::Let(l) => l.name.name.as_str(),
                other => panic!("expected let, got {:?}", other),
            })
            .collect();
        assert_eq!(vec!["x", "y", "foobar"], names);
        assert_eq!("let", program.token_literal());
    }

    #[test]
    fn return_statements() {
        let program = parse_ok("return 5; return 10\nreturn add(15);");
        assert_eq!(3, program.statements.len());
        for s in program.statements.iter() {
            assert!(matches!(s, Stmt::Return(_)));
            assert_eq!("return", s.token_literal());
        }
    }

    #[test]
    fn identifier_expression() {
        match single_expression("foobar;") {
            Expr::Identifier(i) => {
                assert_eq!("foobar", i.name);
                assert_eq!("foobar", i.token.lexeme);
            },
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn infix_expressions_keep_their_operator_token() {
        let cases = [
            ("5 + 5", TokenKind::Plus),
            ("5 - 5", TokenKind::Minus),
            ("5 * 5", TokenKind::Asterisk),
            ("5 / 5", TokenKind::Slash),
            ("5 > 5", TokenKind::Greater),
            ("5 < 5", TokenKind::Less),
            ("5 == 5", TokenKind::Equal),
            ("5 != 5", TokenKind::NotEqual),
        ];
        for (src, kind) in cases.iter() {
            match single_expression(src) {
                Expr::Infix(i) => assert_eq!(*kind, i.op.kind),
                other => panic!("expected infix for {}, got {:?}", src, other),
            }
        }
    }

    #[test]
    fn if_else_expression() {
        match single_expression("if (x < y) { x } else { y; z }") {
            Expr::If(i) => {
                assert_eq!(1, i.consequence.statements.len());
                assert_eq!(2, i.alternative.map(|a| a.statements.len()).unwrap_or(0));
            },
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn function_literal_parameters() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];
        for (src, expected) in cases.iter() {
            match single_expression(src) {
                Expr::FunctionLiteral(f) => {
                    let names: Vec<&str> = f.parameters.iter().map(|p| p.name.as_str()).collect();
                    assert_eq!(expected.to_vec(), names);
                },
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn call_expression_arguments() {
        match single_expression("add(1, 2 * 3, 4 + 5);") {
            Expr::Call(c) => {
                assert_eq!("add", c.callee.token_literal());
                assert_eq!(3, c.arguments.len());
            },
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn empty_array_and_hash_literals() {
        assert!(matches!(single_expression("[]"), Expr::ArrayLiteral(a) if a.elements.is_empty()));
        assert!(matches!(single_expression("{}"), Expr::HashLiteral(h) if h.pairs.is_empty()));
    }

    #[test]
    fn hash_literal_keeps_pair_order() {
        match single_expression("{\"one\": 1, \"two\": 2, 3: 1 + 2}") {
            Expr::HashLiteral(h) => {
                let keys: Vec<&str> = h.pairs.iter().map(|(k, _)| k.token_literal()).collect();
                assert_eq!(vec!["one", "two", "3"], keys);
            },
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn let_errors_name_the_expected_token() {
        let (program, errors) = parse_source("let x = 5; let = 10; let 838383;");
        assert_eq!(
            vec![
                "Expected next token to be IDENTIFIER. Got ASSIGNMENT instead.".to_string(),
                "Expected next token to be IDENTIFIER. Got INTEGER instead.".to_string(),
            ],
            errors
        );
        assert_eq!(1, program.statements.len());
    }

    #[test]
    fn parsing_continues_after_a_bad_statement() {
        let (program, errors) = parse_source("let = fn(x) { let y = 1; y }; let z = 2; z");
        assert_eq!(1, errors.len());
        assert_eq!(2, program.statements.len());
    }

    #[test]
    fn bad_statement_in_block_drops_only_that_statement() {
        let (program, errors) = parse_source("fn() { let 1; 2 }");
        assert_eq!(vec!["Expected next token to be IDENTIFIER. Got INTEGER instead.".to_string()], errors);
        match &program.statements[0] {
            Stmt::Expression(s) => match &s.expression {
                Expr::FunctionLiteral(f) => assert_eq!(1, f.body.statements.len()),
                other => panic!("expected function literal, got {:?}", other),
            },
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn statement_broken_by_closing_brace_keeps_the_block() {
        let (program, errors) = parse_source("let f = fn() { 1 + }; let y = 2; y");
        assert_eq!(vec!["no prefix parse function for RIGHT_BRACE found.".to_string()], errors);
        assert_eq!(3, program.statements.len());
        assert_eq!("let y = 2", program.statements[1].to_string());
        assert_eq!("y", program.statements[2].to_string());
    }

    #[test]
    fn empty_return_and_let_at_block_end() {
        for src in ["fn() { return }; 1", "if (x) { let x = }; 1", "fn() { x + }; 1"].iter() {
            let (program, errors) = parse_source(src);
            assert_eq!(1, errors.len(), "source: {}", src);
            assert_eq!(2, program.statements.len(), "source: {}", src);
        }
    }

    #[test]
    fn stray_closing_brace_at_top_level_is_skipped() {
        let (program, errors) = parse_source("}; let a = 1; a");
        assert_eq!(vec!["no prefix parse function for RIGHT_BRACE found.".to_string()], errors);
        assert_eq!(2, program.statements.len());
    }

    #[test]
    fn integer_overflow_is_reported() {
        let (_, errors) = parse_source("92233720368547758070");
        assert_eq!(vec!["Could not parse 92233720368547758070 as integer.".to_string()], errors);
    }

    #[test]
    fn missing_prefix_parser_is_reported() {
        let (_, errors) = parse_source("let x = *5;");
        assert_eq!(vec!["no prefix parse function for ASTERISK found.".to_string()], errors);
    }

    #[test]
    fn illegal_tokens_surface_as_parse_errors() {
        let (_, errors) = parse_source("let s = \"unterminated");
        assert_eq!(vec!["no prefix parse function for ILLEGAL found.".to_string()], errors);
    }

    #[test]
    fn unterminated_block_is_reported() {
        let (_, errors) = parse_source("if (x) { x");
        assert_eq!(vec!["Expected next token to be RIGHT_BRACE. Got EOF instead.".to_string()], errors);
    }

    #[test]
    fn typed_errors_carry_their_location() {
        let mut parser = Parser::new(Scanner::new("let x = 1;\nlet 5"));
        parser.parse_program();
        let errors = parser.into_errors();
        assert_eq!(1, errors.len());
        assert_eq!(2, errors[0].token().line);
        assert_eq!(
            "[line 2] Error at '5': Expected next token to be IDENTIFIER. Got INTEGER instead.",
            errors[0].to_string()
        );
    }
}
