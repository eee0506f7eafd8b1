//! Tree-walking evaluator
//!
//! The reference backend: it walks the AST directly, threading an
//! environment chain for bindings. Runtime failures are ordinary
//! `Object::Error` values that short-circuit evaluation on their way out;
//! `return` travels as an `Object::ReturnValue` wrapper that blocks pass
//! through untouched and the enclosing function call unwraps.

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::object::{enclosed_env, lookup_builtin, EnvRef, Function, Object};
use std::rc::Rc;

/// Evaluate a program in the given environment
pub fn eval(program: &Program, env: &EnvRef) -> Option<Object> {
    let mut result = None;
    for statement in &program.statements {
        match eval_statement(statement, env) {
            Some(Object::ReturnValue(value)) => return Some(*value),
            Some(Object::Error(message)) => return Some(Object::Error(message)),
            other => result = other,
        }
    }
    result
}

fn eval_block(block: &BlockStatement, env: &EnvRef) -> Option<Object> {
    let mut result = None;
    for statement in &block.statements {
        match eval_statement(statement, env) {
            // Return values and errors bubble through enclosing blocks
            // unchanged; only the function call boundary unwraps them.
            Some(value @ Object::ReturnValue(_)) | Some(value @ Object::Error(_)) => {
                return Some(value)
            }
            other => result = other,
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: &EnvRef) -> Option<Object> {
    match statement {
        Statement::Expression { expression } => eval_expression(expression, env),
        Statement::Let { name, value } => {
            let value = eval_expression(value, env)?;
            if value.is_error() {
                return Some(value);
            }
            env.borrow_mut().set(name.value.clone(), value);
            None
        }
        Statement::Return { value } => {
            let value = eval_expression(value, env)?;
            if value.is_error() {
                return Some(value);
            }
            Some(Object::ReturnValue(Box::new(value)))
        }
    }
}

fn eval_expression(expression: &Expression, env: &EnvRef) -> Option<Object> {
    match expression {
        Expression::IntegerLiteral(value) => Some(Object::Integer(*value)),
        Expression::BooleanLiteral(value) => Some(Object::Boolean(*value)),
        Expression::StringLiteral(value) => Some(Object::string(value.clone())),
        Expression::Identifier(identifier) => Some(eval_identifier(&identifier.value, env)),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env)?;
            if right.is_error() {
                return Some(right);
            }
            Some(eval_prefix_expression(operator, right))
        }
        Expression::Infix {
            operator,
            left,
            right,
        } => {
            let left = eval_expression(left, env)?;
            if left.is_error() {
                return Some(left);
            }
            let right = eval_expression(right, env)?;
            if right.is_error() {
                return Some(right);
            }
            Some(eval_infix_expression(operator, left, right))
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, env)?;
            if condition.is_error() {
                return Some(condition);
            }
            if is_truthy(&condition) {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                None
            }
        }
        Expression::FunctionLiteral { parameters, body } => {
            Some(Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            })))
        }
        Expression::Call {
            function,
            arguments,
        } => {
            let function = eval_expression(function, env)?;
            if function.is_error() {
                return Some(function);
            }
            let arguments = match eval_expressions(arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return Some(error),
            };
            apply_function(function, arguments)
        }
        Expression::ArrayLiteral(elements) => {
            let elements = match eval_expressions(elements, env) {
                Ok(elements) => elements,
                Err(error) => return Some(error),
            };
            Some(Object::array(elements))
        }
        Expression::Index { left, index } => {
            let left = eval_expression(left, env)?;
            if left.is_error() {
                return Some(left);
            }
            let index = eval_expression(index, env)?;
            if index.is_error() {
                return Some(index);
            }
            eval_index_expression(left, index)
        }
    }
}

fn eval_identifier(name: &str, env: &EnvRef) -> Object {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = lookup_builtin(name) {
        return Object::Builtin(builtin);
    }
    Object::error(format!("identifier not found: {name}"))
}

/// Evaluate expressions left to right, stopping at the first error
fn eval_expressions(
    expressions: &[Expression],
    env: &EnvRef,
) -> Result<Vec<Object>, Object> {
    let mut results = Vec::with_capacity(expressions.len());
    for expression in expressions {
        match eval_expression(expression, env) {
            Some(value) if value.is_error() => return Err(value),
            Some(value) => results.push(value),
            None => {}
        }
    }
    Ok(results)
}

/// `false` and `0` are the only values an `if` condition rejects
fn is_truthy(value: &Object) -> bool {
    !matches!(value, Object::Boolean(false) | Object::Integer(0))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => Object::Boolean(!is_truthy(&right)),
        "-" => match right {
            Object::Integer(value) => Object::Integer(-value),
            other => Object::error(format!("unknown operator: -{}", other.type_tag())),
        },
        _ => Object::error(format!(
            "unknown operator: {}{}",
            operator,
            right.type_tag()
        )),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix(operator, *left, *right)
        }
        (Object::Boolean(left), Object::Boolean(right)) => match operator {
            "==" => Object::Boolean(left == right),
            "!=" => Object::Boolean(left != right),
            _ => Object::error(format!("unknown operator: BOOLEAN {operator} BOOLEAN")),
        },
        (Object::Str(left), Object::Str(right)) => match operator {
            "+" => Object::string(format!("{left}{right}")),
            _ => Object::error(format!("unknown operator: STRING {operator} STRING")),
        },
        (left, right) if left.type_tag() != right.type_tag() => Object::error(format!(
            "type mismatch: {} {operator} {}",
            left.type_tag(),
            right.type_tag()
        )),
        (left, right) => Object::error(format!(
            "unknown operator: {} {operator} {}",
            left.type_tag(),
            right.type_tag()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => {
            if right == 0 {
                Object::error("division by zero")
            } else {
                Object::Integer(left / right)
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => Object::error(format!("unknown operator: INTEGER {operator} INTEGER")),
    }
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Option<Object> {
    match function {
        Object::Builtin(builtin) => (builtin.func)(arguments),
        Object::Function(function) => {
            let env = enclosed_env(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                env.borrow_mut().set(parameter.value.clone(), argument);
            }
            let result = eval_block(&function.body, &env)?;
            Some(unwrap_return_value(result))
        }
        other => Some(Object::error(format!(
            "not a function: {}",
            other.type_tag()
        ))),
    }
}

fn unwrap_return_value(value: Object) -> Object {
    match value {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

fn eval_index_expression(left: Object, index: Object) -> Option<Object> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => {
            if *i < 0 {
                return None;
            }
            elements.get(*i as usize).cloned()
        }
        _ => Some(Object::error(format!(
            "index operator not supported: {}",
            left.type_tag()
        ))),
    }
}
