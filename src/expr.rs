use std::rc::Rc;

use crate::stmt::Block;
use crate::token::Token;
use astgen::generate_ast;

generate_ast!(
    Expr,
    [
        Identifier      => { token: Token, name: String };
        IntegerLiteral  => { token: Token, value: i64 };
        BooleanLiteral  => { token: Token, value: bool };
        StringLiteral   => { token: Token, value: String };
        ArrayLiteral    => { token: Token, elements: Vec<Expr> };
        HashLiteral     => { token: Token, pairs: Vec<(Expr, Expr)> };
        Prefix          => { op: Token, right: Box<Expr> };
        Infix           => { left: Box<Expr>, op: Token, right: Box<Expr> };
        If              => { token: Token, condition: Box<Expr>, consequence: Block, alternative: Option<Block> };
        FunctionLiteral => { token: Token, parameters: Vec<Identifier>, body: Rc<Block> };
        Call            => { callee: Box<Expr>, paren: Token, arguments: Vec<Expr> };
        Index           => { left: Box<Expr>, bracket: Token, index: Box<Expr> };
    ]
);

impl Expr {
    /// The token that introduced this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(e) => &e.token,
            Expr::IntegerLiteral(e) => &e.token,
            Expr::BooleanLiteral(e) => &e.token,
            Expr::StringLiteral(e) => &e.token,
            Expr::ArrayLiteral(e) => &e.token,
            Expr::HashLiteral(e) => &e.token,
            Expr::Prefix(e) => &e.op,
            Expr::Infix(e) => &e.op,
            Expr::If(e) => &e.token,
            Expr::FunctionLiteral(e) => &e.token,
            Expr::Call(e) => &e.paren,
            Expr::Index(e) => &e.bracket,
        }
    }

    pub fn token_literal(&self) -> &str {
        self.token().lexeme.as_str()
    }
}
