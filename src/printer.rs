use std::fmt::{self, Display};

use crate::{
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
};

/// Renders an expression with every operator application parenthesized.
pub fn print(e: &Expr) -> String {
    let mut printer = AstPrinter {};
    e.accept(&mut printer)
}

pub fn print_statement(s: &Stmt) -> String {
    let mut printer = AstPrinter {};
    s.accept(&mut printer)
}

/// Renders a program as source text which parses back to the same program.
pub fn print_program(p: &Program) -> String {
    let mut printer = AstPrinter {};
    printer.statements(&p.statements)
}

pub fn print_block(b: &stmt::Block) -> String {
    let mut printer = AstPrinter {};
    printer.block(b)
}

struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&mut self, parts: &[&str]) -> String {
        let mut s = String::new();
        s.push('(');
        s.push_str(parts.concat().as_str());
        s.push(')');
        s
    }

    fn list(&mut self, exprs: &[Expr]) -> String {
        exprs.iter()
            .map(|e| e.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn block(&mut self, b: &stmt::Block) -> String {
        if b.statements.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", self.statements(&b.statements))
        }
    }

    fn statements(&mut self, statements: &[Stmt]) -> String {
        statements.iter()
            .map(|s| s.accept(self))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl stmt::Visitor<String> for AstPrinter {
    fn visit_let_stmt(&mut self, s: &stmt::Let) -> String {
        format!("let {} = {}", s.name.name, s.value.accept(self))
    }

    fn visit_return_stmt(&mut self, s: &stmt::Return) -> String {
        format!("return {}", s.value.accept(self))
    }

    fn visit_expression_stmt(&mut self, s: &stmt::Expression) -> String {
        s.expression.accept(self)
    }

    fn visit_block_stmt(&mut self, s: &stmt::Block) -> String {
        self.block(s)
    }
}

impl expr::Visitor<String> for AstPrinter {
    fn visit_identifier_expr(&mut self, e: &expr::Identifier) -> String {
        e.name.clone()
    }

    fn visit_integer_literal_expr(&mut self, e: &expr::IntegerLiteral) -> String {
        e.value.to_string()
    }

    fn visit_boolean_literal_expr(&mut self, e: &expr::BooleanLiteral) -> String {
        e.value.to_string()
    }

    fn visit_string_literal_expr(&mut self, e: &expr::StringLiteral) -> String {
        format!("\"{}\"", e.value)
    }

    fn visit_array_literal_expr(&mut self, e: &expr::ArrayLiteral) -> String {
        format!("[{}]", self.list(&e.elements))
    }

    fn visit_hash_literal_expr(&mut self, e: &expr::HashLiteral) -> String {
        let pairs = e.pairs.iter()
            .map(|(k, v)| format!("{}: {}", k.accept(self), v.accept(self)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", pairs)
    }

    fn visit_prefix_expr(&mut self, e: &expr::Prefix) -> String {
        let right = e.right.accept(self);
        self.parenthesize(&[e.op.lexeme.as_str(), right.as_str()])
    }

    fn visit_infix_expr(&mut self, e: &expr::Infix) -> String {
        let left = e.left.accept(self);
        let right = e.right.accept(self);
        self.parenthesize(&[left.as_str(), " ", e.op.lexeme.as_str(), " ", right.as_str()])
    }

    fn visit_if_expr(&mut self, e: &expr::If) -> String {
        let condition = e.condition.accept(self);
        // Operator applications already carry their own parentheses.
        let condition = match e.condition.as_ref() {
            Expr::Infix(_) | Expr::Prefix(_) | Expr::Index(_) => condition,
            _ => self.parenthesize(&[condition.as_str()]),
        };

        let mut s = format!("if {} {}", condition, self.block(&e.consequence));
        if let Some(alternative) = &e.alternative {
            s.push_str(" else ");
            s.push_str(self.block(alternative).as_str());
        }
        s
    }

    fn visit_function_literal_expr(&mut self, e: &expr::FunctionLiteral) -> String {
        let params = e.parameters.iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("fn({}) {}", params, self.block(&e.body))
    }

    fn visit_call_expr(&mut self, e: &expr::Call) -> String {
        format!("{}({})", e.callee.accept(self), self.list(&e.arguments))
    }

    fn visit_index_expr(&mut self, e: &expr::Index) -> String {
        let left = e.left.accept(self);
        let index = e.index.accept(self);
        self.parenthesize(&[left.as_str(), "[", index.as_str(), "]"])
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print(self))
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print_statement(self))
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print_program(self))
    }
}
