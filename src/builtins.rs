use phf::phf_map;
use std::rc::Rc;

use crate::value::{Value, NULL};

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "len" => Builtin::Len,
    "first" => Builtin::First,
    "last" => Builtin::Last,
    "rest" => Builtin::Rest,
    "push" => Builtin::Push,
};

/// Host functions reachable from every scope unless shadowed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        BUILTINS.get(name).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Push => 2,
            _ => 1,
        }
    }

    /// Applies the builtin. Misuse produces an `Error` value, never a panic.
    pub fn apply(&self, args: &[Value]) -> Value {
        tracing::trace!(builtin = self.name(), args = args.len(), "applying builtin");
        match (self, args) {
            (Builtin::Len, [Value::String(s)]) => Value::Integer(s.chars().count() as i64),
            (Builtin::Len, [Value::Array(elements)]) => Value::Integer(elements.len() as i64),
            (Builtin::Len, [other]) => Value::error(format!(
                "argument to 'len' not supported, got {}", other.value_type()
            )),

            (Builtin::First, [Value::Array(elements)]) => elements.first().cloned().unwrap_or(NULL),
            (Builtin::Last, [Value::Array(elements)]) => elements.last().cloned().unwrap_or(NULL),
            (Builtin::Rest, [Value::Array(elements)]) => match elements.split_first() {
                Some((_, rest)) => Value::Array(Rc::new(rest.to_vec())),
                None => NULL,
            },
            (Builtin::Push, [Value::Array(elements), value]) => {
                let mut pushed = Vec::with_capacity(elements.len() + 1);
                pushed.extend(elements.iter().cloned());
                pushed.push(value.clone());
                Value::Array(Rc::new(pushed))
            },
            (_, args) if args.len() == self.arity() => Value::error(format!(
                "argument to '{}' must be ARRAY, got {}", self.name(), args[0].value_type()
            )),

            (_, args) => Value::error(format!(
                "wrong number of arguments. got={}, want={}", args.len(), self.arity()
            )),
        }
    }
}
