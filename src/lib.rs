pub mod builtins;
mod callable;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::interpreter::{evaluate, Interpreter};
pub use crate::parser::{parse, Parser};
