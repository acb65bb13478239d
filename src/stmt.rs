use astgen::generate_ast;
use crate::expr::{Expr, Identifier};
use crate::token::Token;

generate_ast!(
    Stmt,
    [
        Let        => { token: Token, name: Identifier, value: Expr };
        Return     => { token: Token, value: Expr };
        Expression => { token: Token, expression: Expr };
        Block      => { token: Token, statements: Vec<Stmt> };
    ]
);

impl Stmt {
    pub fn token_literal(&self) -> &str {
        let token = match self {
            Stmt::Let(s) => &s.token,
            Stmt::Return(s) => &s.token,
            Stmt::Expression(s) => &s.token,
            Stmt::Block(s) => &s.token,
        };
        token.lexeme.as_str()
    }
}

/// The root of a parsed source unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements.first()
            .map(Stmt::token_literal)
            .unwrap_or("")
    }
}
