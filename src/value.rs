use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Display},
    rc::Rc,
};

use crate::{
    builtins::Builtin,
    environment::Env,
    expr,
    printer,
    stmt,
};

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

/// Everything an expression can evaluate to. `Return` and `Error` are
/// control signals: they stop evaluation of whatever encloses them until a
/// call boundary or the program unwraps them.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Rc<Vec<Value>>),
    Hash(Rc<BTreeMap<HashKey, Value>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Error(String),
    Return(Box<Value>),
    Null,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueType {
    Integer,
    Boolean,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    Error,
    Return,
    Null,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Integer => "INTEGER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::String => "STRING",
            ValueType::Array => "ARRAY",
            ValueType::Hash => "HASH",
            ValueType::Function => "FUNCTION",
            ValueType::Builtin => "BUILTIN",
            ValueType::Error => "ERROR",
            ValueType::Return => "RETURN_VALUE",
            ValueType::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    pub fn error<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        tracing::debug!(%message, "runtime error");
        Value::Error(message)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Boolean(_) => ValueType::Boolean,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Hash(_) => ValueType::Hash,
            Value::Function(_) => ValueType::Function,
            Value::Builtin(_) => ValueType::Builtin,
            Value::Error(_) => ValueType::Error,
            Value::Return(_) => ValueType::Return,
            Value::Null => ValueType::Null,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(false) | Value::Null => false,
            _ => true,
        }
    }

    /// True for the values that must be forwarded instead of consumed.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Return(_))
    }

    /// Equality as seen by `==` for operands other than two integers or two
    /// strings: booleans and null compare by value, compound values by
    /// identity, and differently typed values are never equal.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(s), Value::Boolean(o)) => s == o,
            (Value::Null, Value::Null) => true,
            (Value::Integer(s), Value::Integer(o)) => s == o,
            (Value::String(s), Value::String(o)) => s == o,
            (Value::Array(s), Value::Array(o)) => Rc::ptr_eq(s, o),
            (Value::Hash(s), Value::Hash(o)) => Rc::ptr_eq(s, o),
            (Value::Function(s), Value::Function(o)) => Rc::ptr_eq(s, o),
            (Value::Builtin(s), Value::Builtin(o)) => s == o,
            _ => false,
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey::Integer(*i)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }
}

/// Structural equality, for tests and host code. Functions compare by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(s), Value::Array(o)) => s == o,
            (Value::Hash(s), Value::Hash(o)) => s == o,
            (Value::Error(s), Value::Error(o)) => s == o,
            (Value::Return(s), Value::Return(o)) => s == o,
            _ => self.is_identical(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b { TRUE } else { FALSE }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(elements))
    }
}

/// The inspect rendering shown to users.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(elements) => {
                let elements = elements.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>();
                write!(f, "[{}]", elements.join(", "))
            },
            Value::Hash(pairs) => {
                let pairs = pairs.iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            },
            Value::Function(fnc) => write!(f, "{}", fnc),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Error(message) => write!(f, "ERROR: {}", message),
            Value::Return(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
        }
    }
}

/// The subset of values usable as hash keys. Ordered so that hashes
/// render deterministically.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(i) => write!(f, "{}", i),
            HashKey::Boolean(b) => write!(f, "{}", b),
            HashKey::String(s) => write!(f, "{}", s),
        }
    }
}

/// A closure: parameters and body shared with the AST, plus the scope that
/// was current when the literal was evaluated.
pub struct Function {
    pub parameters: Vec<expr::Identifier>,
    pub body: Rc<stmt::Block>,
    pub env: Env,
}

impl Function {
    fn parameter_list(&self) -> String {
        self.parameters.iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// The captured environment may contain this function, so it is left out.
impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn({})>", self.parameter_list())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", self.parameter_list(), printer::print_block(&self.body))
    }
}
