//! Expression variants and their source rendering

use super::{BlockStatement, Identifier};
use std::fmt;

/// Expression variants
///
/// Each node exclusively owns its children; the tree is immutable once the
/// parser hands it over. The `Display` impl re-renders the tree with every
/// operator application fully parenthesized, which is what the precedence
/// tests compare against.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expression>),
    /// `<left>[<index>]`
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    /// `<operator><right>`, operators `!` and `-`
    Prefix {
        operator: String,
        right: Box<Expression>,
    },
    /// `<left> <operator> <right>`
    Infix {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `if (<condition>) { <consequence> } else { <alternative> }`
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    /// `fn(<parameters>) { <body> }`
    FunctionLiteral {
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    /// `<function>(<arguments>)`
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{identifier}"),
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::BooleanLiteral(value) => write!(f, "{value}"),
            Expression::StringLiteral(value) => write!(f, "{value}"),
            Expression::ArrayLiteral(elements) => write!(f, "[{}]", join(elements, ", ")),
            Expression::Index { left, index } => write!(f, "({left}[{index}])"),
            Expression::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, "else {alternative}")?;
                }
                Ok(())
            }
            Expression::FunctionLiteral { parameters, body } => {
                write!(f, "fn({}) {body}", join(parameters, ", "))
            }
            Expression::Call {
                function,
                arguments,
            } => write!(f, "{function}({})", join(arguments, ", ")),
        }
    }
}
