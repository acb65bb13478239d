use crate::{
    builtins::Builtin,
    environment::Environment,
    interpreter::Interpreter,
    value::{Function, Value},
};

pub(crate) trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Value;
}

impl Value {
    pub(crate) fn callable(&self) -> Option<&dyn Callable> {
        match self {
            Value::Function(f) => Some(f.as_ref()),
            Value::Builtin(b) => Some(b),
            _ => None,
        }
    }
}

impl Callable for Builtin {
    fn arity(&self) -> usize {
        Builtin::arity(self)
    }

    fn call(&self, _interpreter: &mut Interpreter, args: Vec<Value>) -> Value {
        self.apply(&args)
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.parameters.len()
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Value {
        let mut environment = Environment::enclosed(&self.env);
        for (param, arg) in self.parameters.iter().zip(args) {
            environment.set(param.name.as_str(), arg);
        }

        match interpreter.execute_block_in(&self.body, environment.into_shared()) {
            Value::Return(value) => *value,
            value => value,
        }
    }
}
