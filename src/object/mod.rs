//! Runtime values shared by the evaluator and the virtual machine

mod builtins;
mod environment;

pub use builtins::{lookup_builtin, Builtin, BuiltinFunction, BUILTINS};
pub use environment::{enclosed_env, EnvRef, Environment};

use crate::ast::{BlockStatement, Identifier};
use crate::code::Instructions;
use std::fmt;
use std::rc::Rc;

/// A runtime value
///
/// Cloning is cheap: compound values sit behind `Rc`, so value semantics at
/// the language level are sharing at the host level. `ReturnValue` only ever
/// exists inside the evaluator, where it carries a `return` through enclosing
/// blocks; `Error` likewise propagates through evaluation rather than through
/// a host error type.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(Rc<String>),
    Array(Rc<Vec<Object>>),
    ReturnValue(Box<Object>),
    Error(String),
    Function(Rc<Function>),
    CompiledFunction(Rc<CompiledFunction>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
}

impl Object {
    /// Type tag used in error messages
    pub fn type_tag(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Str(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
            Object::Function(_) => "FUNCTION",
            Object::CompiledFunction(_) => "COMPILED_FUNCTION",
            Object::Closure(_) => "CLOSURE",
            Object::Builtin(_) => "BUILTIN",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Object::Str(Rc::new(text.into()))
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Object::Error(message.into())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Str(a), Object::Str(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::CompiledFunction(a), Object::CompiledFunction(b)) => a == b,
            (Object::Closure(a), Object::Closure(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    /// The `inspect` form printed by the REPL
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{value}"),
            Object::Boolean(value) => write!(f, "{value}"),
            Object::Str(value) => write!(f, "{value}"),
            Object::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Object::ReturnValue(value) => write!(f, "{value}"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
            Object::Function(function) => {
                let params: Vec<&str> = function
                    .parameters
                    .iter()
                    .map(|p| p.value.as_str())
                    .collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), function.body)
            }
            Object::CompiledFunction(function) => {
                write!(f, "CompiledFunction<{:p}>", Rc::as_ptr(function))
            }
            Object::Closure(closure) => write!(f, "Closure<{:p}>", Rc::as_ptr(closure)),
            Object::Builtin(_) => write!(f, "builtin function"),
        }
    }
}

/// A function value produced by the evaluator, closing over its definition
/// environment
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: EnvRef,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The environment may reference this function again; keep Debug flat.
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &format_args!("{}", self.body))
            .finish_non_exhaustive()
    }
}

/// A function compiled to bytecode
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    pub num_locals: usize,
    pub num_parameters: usize,
}

/// A compiled function bundled with the free values it captured
#[derive(Debug, Clone)]
pub struct Closure {
    pub func: Rc<CompiledFunction>,
    pub free: Vec<Object>,
}
