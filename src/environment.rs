use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};
use crate::value::Value;

/// A scope shared between the evaluator and the closures that capture it.
pub type Env = Rc<RefCell<Environment>>;

/// A mapping from names to values with an optional enclosing scope.
/// Lookups walk outward; writes always land in the innermost scope.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Env>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self { enclosing: None, values: HashMap::new() }
    }

    pub fn enclosed(outer: &Env) -> Self {
        Self { enclosing: Some(Rc::clone(outer)), values: HashMap::new() }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name)
            .cloned()
            .or_else(|| {
                self.enclosing.as_ref()
                    .and_then(|e| e.borrow().get(name))
            })
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set<S: Into<String>>(&mut self, name: S, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }
}
