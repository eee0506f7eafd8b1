//! Error types for the compiler and virtual machine
//!
//! Parser errors are accumulated as plain strings on the parser itself so a
//! single REPL line can report several of them at once; interpreter runtime
//! errors travel as `Object::Error` values through evaluation. The types here
//! cover the two places where a failure is fatal to the current line: symbol
//! resolution during compilation and faults inside the VM dispatch loop.

use thiserror::Error;

/// Result type for compilation
pub type CompileResult<T> = std::result::Result<T, CompileError>;

/// Result type for VM execution
pub type VmResult<T> = std::result::Result<T, VmError>;

/// Compile-time error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An identifier that no enclosing scope (nor the builtin table) defines
    #[error("undefined variable {0}")]
    UndefinedVariable(String),

    /// An infix/prefix operator with no opcode mapping
    #[error("unknown operator {0}")]
    UnknownOperator(String),
}

/// Fatal fault raised by the VM dispatch loop
///
/// Any of these terminates the current run; the REPL reports the message and
/// keeps its shared state (globals, constants, symbol table) for the next
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("frame overflow")]
    FrameOverflow,

    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("unimplemented opcode: {0}")]
    UnimplementedOpcode(&'static str),

    #[error("unsupported types for binary operation: {left} {right}")]
    UnsupportedBinaryTypes {
        left: &'static str,
        right: &'static str,
    },

    #[error("unknown operator for integers: {0}")]
    UnknownIntegerOperator(String),

    #[error("unknown operator for strings: {0}")]
    UnknownStringOperator(String),

    #[error("unknown operator for booleans: {0}")]
    UnknownBooleanOperator(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported type for negation: {0}")]
    UnsupportedNegation(&'static str),

    #[error("index operator not supported: {left} {index}")]
    IndexNotSupported {
        left: &'static str,
        index: &'static str,
    },

    #[error("index out of bounds: {index} {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("calling non-function and non-builtin")]
    CallingNonFunction,

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongNumberOfArguments { want: usize, got: usize },
}
