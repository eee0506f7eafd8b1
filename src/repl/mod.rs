//! REPL (Read-Eval-Print Loop)
//!
//! One line-oriented loop per backend. The interpreter keeps a single
//! environment alive for the whole session; the compiler keeps its constant
//! pool, symbol table and globals store, building a fresh compiler and VM
//! for every line so a failed line cannot corrupt the machine state.

use crate::compiler::{Compiler, SymbolTable, SymbolTableRef};
use crate::evaluator;
use crate::object::{Environment, Object, BUILTINS};
use crate::parser::Parser;
use crate::vm::{self, Vm};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::rc::Rc;

const PROMPT: &str = ">> ";

/// Parse one input line, reporting errors tab-indented
///
/// Returns `None` when the line has parse errors; downstream stages must not
/// run on a partial program.
fn parse_line(line: &str) -> Option<crate::ast::Program> {
    let (program, errors) = Parser::parse(line);
    if !errors.is_empty() {
        for error in &errors {
            println!("\t{error}");
        }
        return None;
    }
    Some(program)
}

/// Run the tree-walking interpreter loop
pub fn start_interpreter() -> RlResult<()> {
    let mut editor = DefaultEditor::new()?;
    let env = Environment::new().into_ref();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let Some(program) = parse_line(&line) else {
                    continue;
                };
                if let Some(result) = evaluator::eval(&program, &env) {
                    println!("{result}");
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {error}");
                break;
            }
        }
    }
    Ok(())
}

/// Run the compiler + VM loop
pub fn start_compiler() -> RlResult<()> {
    let mut editor = DefaultEditor::new()?;

    let mut constants: Vec<Object> = Vec::new();
    let globals = vm::new_globals();
    let symbol_table: SymbolTableRef = SymbolTable::new().into_ref();
    for (index, builtin) in BUILTINS.iter().enumerate() {
        symbol_table.borrow_mut().define_builtin(index, builtin.name);
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let Some(program) = parse_line(&line) else {
                    continue;
                };

                let mut compiler =
                    Compiler::new_with_state(Rc::clone(&symbol_table), constants.clone());
                if let Err(error) = compiler.compile(&program) {
                    println!("Compilation failed: {error}");
                    continue;
                }
                let bytecode = compiler.bytecode();
                constants = bytecode.constants.clone();

                let mut vm = Vm::with_global_store(bytecode, Rc::clone(&globals));
                if let Err(error) = vm.run() {
                    println!("Executing bytecode failed: {error}");
                    continue;
                }
                if let Some(result) = vm.last_popped_stack_elem() {
                    println!("{result}");
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {error}");
                break;
            }
        }
    }
    Ok(())
}
