//! Builtin functions
//!
//! The list is indexed: the compiler refers to builtins by position (the
//! operand of `OpGetBuiltin`) while the evaluator looks them up by name, so
//! the order here is part of the bytecode contract.

use super::Object;
use std::fmt;

/// Host signature of a builtin
///
/// Returning `None` means the call produced no value (for example `first`
/// of an empty array); error conditions come back as `Object::Error`.
pub type BuiltinFunction = fn(Vec<Object>) -> Option<Object>;

/// A named builtin function value
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// All builtins, in `OpGetBuiltin` operand order
pub const BUILTINS: [Builtin; 5] = [
    Builtin {
        name: "len",
        func: len,
    },
    Builtin {
        name: "first",
        func: first,
    },
    Builtin {
        name: "last",
        func: last,
    },
    Builtin {
        name: "rest",
        func: rest,
    },
    Builtin {
        name: "push",
        func: push,
    },
];

/// Find a builtin by name
pub fn lookup_builtin(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

fn wrong_arguments(got: usize, want: usize) -> Option<Object> {
    Some(Object::error(format!(
        "wrong number of arguments. got={got}, want={want}"
    )))
}

fn len(args: Vec<Object>) -> Option<Object> {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }
    match &args[0] {
        Object::Str(value) => Some(Object::Integer(value.len() as i64)),
        Object::Array(elements) => Some(Object::Integer(elements.len() as i64)),
        other => Some(Object::error(format!(
            "argument to `len` not supported, got {}",
            other.type_tag()
        ))),
    }
}

fn first(args: Vec<Object>) -> Option<Object> {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned(),
        other => Some(Object::error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_tag()
        ))),
    }
}

fn last(args: Vec<Object>) -> Option<Object> {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned(),
        other => Some(Object::error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_tag()
        ))),
    }
}

fn rest(args: Vec<Object>) -> Option<Object> {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                None
            } else {
                Some(Object::array(elements[1..].to_vec()))
            }
        }
        other => Some(Object::error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_tag()
        ))),
    }
}

fn push(args: Vec<Object>) -> Option<Object> {
    if args.len() != 2 {
        return wrong_arguments(args.len(), 2);
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut extended = elements.as_ref().clone();
            extended.push(args[1].clone());
            Some(Object::array(extended))
        }
        other => Some(Object::error(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_tag()
        ))),
    }
}
