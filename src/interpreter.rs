use std::{collections::BTreeMap, convert::TryFrom, mem, rc::Rc};

use crate::{
    builtins::Builtin,
    environment::{Env, Environment},
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
    token::{Token, TokenKind},
    value::{Function, Value, NULL},
};

/// Returns early from the enclosing visitor with any `Error` or `Return`
/// signal; otherwise yields the plain value.
macro_rules! propagate {
    ($value:expr) => {
        match $value {
            signal if signal.is_signal() => return signal,
            value => value,
        }
    };
}

/// Anything the interpreter can evaluate directly.
pub trait Evaluate {
    fn evaluate_with(&self, interpreter: &mut Interpreter) -> Value;
}

impl Evaluate for Program {
    fn evaluate_with(&self, interpreter: &mut Interpreter) -> Value {
        interpreter.interpret(self)
    }
}

impl Evaluate for Stmt {
    fn evaluate_with(&self, interpreter: &mut Interpreter) -> Value {
        interpreter.execute(self)
    }
}

impl Evaluate for Expr {
    fn evaluate_with(&self, interpreter: &mut Interpreter) -> Value {
        interpreter.evaluate(self)
    }
}

/// Evaluates `node` with `env` as the current scope. Bindings made by
/// top-level `let`s stay in `env` afterwards.
pub fn evaluate<N: Evaluate + ?Sized>(node: &N, env: &Env) -> Value {
    let mut interpreter = Interpreter::new(Rc::clone(env));
    node.evaluate_with(&mut interpreter)
}

pub struct Interpreter {
    environment: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(Environment::new().into_shared())
    }
}

impl Interpreter {
    pub fn new(environment: Env) -> Self {
        Interpreter { environment }
    }

    /// Runs every statement in order, stopping at the first error or
    /// `return`. A top-level `return` yields its value.
    pub fn interpret(&mut self, program: &Program) -> Value {
        let mut result = NULL;
        for s in program.statements.iter() {
            result = self.execute(s);
            match result {
                Value::Return(value) => return *value,
                Value::Error(_) => return result,
                _ => {},
            }
        }
        result
    }

    fn execute(&mut self, s: &Stmt) -> Value {
        s.accept(self)
    }

    fn evaluate(&mut self, e: &Expr) -> Value {
        e.accept(self)
    }

    /// Blocks share the scope they appear in. Signals are passed up
    /// unopened so that a `return` leaves every enclosing block.
    fn execute_block(&mut self, block: &stmt::Block) -> Value {
        let mut result = NULL;
        for s in block.statements.iter() {
            result = propagate!(self.execute(s));
        }
        result
    }

    pub(crate) fn execute_block_in(&mut self, block: &stmt::Block, environment: Env) -> Value {
        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_block(block);
        self.environment = previous;
        result
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(exprs.len());
        for e in exprs {
            let value = self.evaluate(e);
            if value.is_signal() {
                return Err(value)
            }
            values.push(value);
        }
        Ok(values)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(callee = %callee.value_type(), args = args.len()))]
    fn apply(&mut self, callee: Value, args: Vec<Value>) -> Value {
        let callable = match callee.callable() {
            Some(c) => c,
            None => return Value::error(format!("not a function {}", callee.value_type())),
        };

        if args.len() != callable.arity() {
            return Value::error(format!(
                "wrong number of arguments. got={}, want={}", args.len(), callable.arity()
            ))
        }

        callable.call(self, args)
    }
}

impl stmt::Visitor<Value> for Interpreter {
    fn visit_let_stmt(&mut self, s: &stmt::Let) -> Value {
        let value = propagate!(self.evaluate(&s.value));
        self.environment.borrow_mut().set(s.name.name.as_str(), value.clone());
        value
    }

    fn visit_return_stmt(&mut self, s: &stmt::Return) -> Value {
        let value = propagate!(self.evaluate(&s.value));
        Value::Return(Box::new(value))
    }

    fn visit_expression_stmt(&mut self, s: &stmt::Expression) -> Value {
        self.evaluate(&s.expression)
    }

    fn visit_block_stmt(&mut self, s: &stmt::Block) -> Value {
        self.execute_block(s)
    }
}

impl expr::Visitor<Value> for Interpreter {
    fn visit_identifier_expr(&mut self, e: &expr::Identifier) -> Value {
        let bound = self.environment.borrow().get(&e.name);
        bound
            .or_else(|| Builtin::lookup(&e.name).map(Value::Builtin))
            .unwrap_or_else(|| Value::error(format!("identifier not found: {}", e.name)))
    }

    fn visit_integer_literal_expr(&mut self, e: &expr::IntegerLiteral) -> Value {
        Value::Integer(e.value)
    }

    fn visit_boolean_literal_expr(&mut self, e: &expr::BooleanLiteral) -> Value {
        Value::from(e.value)
    }

    fn visit_string_literal_expr(&mut self, e: &expr::StringLiteral) -> Value {
        Value::String(e.value.clone())
    }

    fn visit_array_literal_expr(&mut self, e: &expr::ArrayLiteral) -> Value {
        match self.evaluate_all(&e.elements) {
            Ok(elements) => Value::from(elements),
            Err(signal) => signal,
        }
    }

    fn visit_hash_literal_expr(&mut self, e: &expr::HashLiteral) -> Value {
        let mut pairs = BTreeMap::new();
        for (key, value) in e.pairs.iter() {
            let key = propagate!(self.evaluate(key));
            let hash_key = match key.hash_key() {
                Some(k) => k,
                None => return unusable_as_hash_key(&key),
            };
            let value = propagate!(self.evaluate(value));
            pairs.insert(hash_key, value);
        }
        Value::Hash(Rc::new(pairs))
    }

    fn visit_prefix_expr(&mut self, e: &expr::Prefix) -> Value {
        let right = propagate!(self.evaluate(&e.right));

        match (e.op.kind, right) {
            (TokenKind::Bang, right) => Value::from(!right.is_truthy()),
            (TokenKind::Minus, Value::Integer(i)) => Value::Integer(i.wrapping_neg()),
            (_, right) => Value::error(format!("unknown operator: {}{}", e.op.lexeme, right.value_type())),
        }
    }

    fn visit_infix_expr(&mut self, e: &expr::Infix) -> Value {
        let left = propagate!(self.evaluate(&e.left));
        let right = propagate!(self.evaluate(&e.right));

        match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => compute_integers(&e.op, l, r),
            (Value::String(l), Value::String(r)) => match e.op.kind {
                TokenKind::Plus => Value::String(l + r.as_str()),
                _ => unknown_infix_operator(&e.op, "STRING", "STRING"),
            },
            (left, right) => match e.op.kind {
                TokenKind::Equal => Value::from(left.is_identical(&right)),
                TokenKind::NotEqual => Value::from(!left.is_identical(&right)),
                _ if left.value_type() != right.value_type() => Value::error(format!(
                    "type mismatch: {} {} {}", left.value_type(), e.op.lexeme, right.value_type()
                )),
                _ => {
                    let operand = left.value_type().to_string();
                    unknown_infix_operator(&e.op, &operand, &operand)
                },
            },
        }
    }

    fn visit_if_expr(&mut self, e: &expr::If) -> Value {
        let condition = propagate!(self.evaluate(&e.condition));

        if condition.is_truthy() {
            self.execute_block(&e.consequence)
        } else if let Some(alternative) = &e.alternative {
            self.execute_block(alternative)
        } else {
            NULL
        }
    }

    fn visit_function_literal_expr(&mut self, e: &expr::FunctionLiteral) -> Value {
        Value::Function(Rc::new(Function {
            parameters: e.parameters.clone(),
            body: Rc::clone(&e.body),
            env: Rc::clone(&self.environment),
        }))
    }

    fn visit_call_expr(&mut self, e: &expr::Call) -> Value {
        let callee = propagate!(self.evaluate(&e.callee));
        let args = match self.evaluate_all(&e.arguments) {
            Ok(args) => args,
            Err(signal) => return signal,
        };
        self.apply(callee, args)
    }

    fn visit_index_expr(&mut self, e: &expr::Index) -> Value {
        let left = propagate!(self.evaluate(&e.left));
        let index = propagate!(self.evaluate(&e.index));

        match (left, index) {
            (Value::Array(elements), Value::Integer(i)) => usize::try_from(i).ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .unwrap_or(NULL),
            (Value::Hash(pairs), key) => match key.hash_key() {
                Some(k) => pairs.get(&k).cloned().unwrap_or(NULL),
                None => unusable_as_hash_key(&key),
            },
            (left, _) => Value::error(format!("index operator not supported: {}", left.value_type())),
        }
    }
}

fn compute_integers(op: &Token, l: i64, r: i64) -> Value {
    match op.kind {
        TokenKind::Plus => Value::Integer(l.wrapping_add(r)),
        TokenKind::Minus => Value::Integer(l.wrapping_sub(r)),
        TokenKind::Asterisk => Value::Integer(l.wrapping_mul(r)),
        TokenKind::Slash if r == 0 => Value::error(format!("division by zero: {} / 0", l)),
        TokenKind::Slash => Value::Integer(l.wrapping_div(r)),
        TokenKind::Less => Value::from(l < r),
        TokenKind::Greater => Value::from(l > r),
        TokenKind::Equal => Value::from(l == r),
        TokenKind::NotEqual => Value::from(l != r),
        _ => unknown_infix_operator(op, "INTEGER", "INTEGER"),
    }
}

fn unknown_infix_operator(op: &Token, left: &str, right: &str) -> Value {
    Value::error(format!("unknown operator: {} {} {}", left, op.lexeme, right))
}

fn unusable_as_hash_key(key: &Value) -> Value {
    Value::error(format!("unusable as hash key: {}", key.value_type()))
}
