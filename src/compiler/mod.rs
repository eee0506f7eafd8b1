//! Bytecode compiler
//!
//! A single pass over the AST that appends encoded instructions to the
//! current compilation scope and collects literals into a constant pool.
//! Jumps are emitted with a placeholder target and back-patched once the
//! length of the intervening code is known. Each function literal compiles
//! inside its own scope and symbol table; the finished instruction stream
//! becomes a `CompiledFunction` constant wrapped by an `OpClosure`.

mod symbol_table;


pub use symbol_table::{Symbol, SymbolScope, SymbolTable, SymbolTableRef};

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::code::{self, Instructions, Opcode};
use crate::error::{CompileError, CompileResult};
use crate::object::{CompiledFunction, Object, BUILTINS};
use std::rc::Rc;

/// The compiler's output: top-level instructions plus the constant pool
#[derive(Debug, Clone)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Object>,
}

#[derive(Debug, Clone, Copy)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

/// Instruction sink for one function body (or the top level)
#[derive(Debug, Default)]
struct CompilationScope {
    instructions: Instructions,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

/// The compiler
pub struct Compiler {
    constants: Vec<Object>,
    symbol_table: SymbolTableRef,
    scopes: Vec<CompilationScope>,
}

impl Compiler {
    pub fn new() -> Self {
        let symbol_table = SymbolTable::new().into_ref();
        for (index, builtin) in BUILTINS.iter().enumerate() {
            symbol_table.borrow_mut().define_builtin(index, builtin.name);
        }
        Compiler {
            constants: Vec::new(),
            symbol_table,
            scopes: vec![CompilationScope::default()],
        }
    }

    /// Continue with the symbol table and constants of a previous run
    ///
    /// The REPL uses this to keep globals addressable across lines.
    pub fn new_with_state(symbol_table: SymbolTableRef, constants: Vec<Object>) -> Self {
        Compiler {
            constants,
            symbol_table,
            scopes: vec![CompilationScope::default()],
        }
    }

    pub fn compile(&mut self, program: &Program) -> CompileResult<()> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    pub fn bytecode(&self) -> Bytecode {
        Bytecode {
            instructions: self.current_scope().instructions.clone(),
            constants: self.constants.clone(),
        }
    }

    fn compile_statement(&mut self, statement: &Statement) -> CompileResult<()> {
        match statement {
            Statement::Expression { expression } => {
                self.compile_expression(expression)?;
                self.emit(Opcode::Pop, &[]);
                Ok(())
            }
            Statement::Let { name, value } => {
                self.compile_expression(value)?;
                let symbol = self.symbol_table.borrow_mut().define(&name.value);
                match symbol.scope {
                    SymbolScope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
                    _ => self.emit(Opcode::SetLocal, &[symbol.index]),
                };
                Ok(())
            }
            Statement::Return { value } => {
                self.compile_expression(value)?;
                self.emit(Opcode::ReturnValue, &[]);
                Ok(())
            }
        }
    }

    fn compile_block(&mut self, block: &BlockStatement) -> CompileResult<()> {
        for statement in &block.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_expression(&mut self, expression: &Expression) -> CompileResult<()> {
        match expression {
            Expression::IntegerLiteral(value) => {
                let index = self.add_constant(Object::Integer(*value));
                self.emit(Opcode::Constant, &[index]);
                Ok(())
            }
            Expression::StringLiteral(value) => {
                let index = self.add_constant(Object::string(value.clone()));
                self.emit(Opcode::Constant, &[index]);
                Ok(())
            }
            Expression::BooleanLiteral(value) => {
                if *value {
                    self.emit(Opcode::True, &[]);
                } else {
                    self.emit(Opcode::False, &[]);
                }
                Ok(())
            }
            Expression::Identifier(identifier) => {
                let symbol = self.symbol_table.borrow_mut().resolve(&identifier.value);
                match symbol {
                    Some(symbol) => {
                        self.load_symbol(&symbol);
                        Ok(())
                    }
                    None => Err(CompileError::UndefinedVariable(identifier.value.clone())),
                }
            }
            Expression::Prefix { operator, right } => {
                self.compile_expression(right)?;
                match operator.as_str() {
                    "!" => self.emit(Opcode::Bang, &[]),
                    "-" => self.emit(Opcode::Minus, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
                Ok(())
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                // `a < b` compiles as `b > a`: there is no OpLessThan.
                if operator == "<" {
                    self.compile_expression(right)?;
                    self.compile_expression(left)?;
                    self.emit(Opcode::GreaterThan, &[]);
                    return Ok(());
                }

                self.compile_expression(left)?;
                self.compile_expression(right)?;
                match operator.as_str() {
                    "+" => self.emit(Opcode::Add, &[]),
                    "-" => self.emit(Opcode::Sub, &[]),
                    "*" => self.emit(Opcode::Mul, &[]),
                    "/" => self.emit(Opcode::Div, &[]),
                    ">" => self.emit(Opcode::GreaterThan, &[]),
                    "==" => self.emit(Opcode::Equal, &[]),
                    "!=" => self.emit(Opcode::NotEqual, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
                Ok(())
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => self.compile_if(condition, consequence, alternative.as_ref()),
            Expression::ArrayLiteral(elements) => {
                for element in elements {
                    self.compile_expression(element)?;
                }
                self.emit(Opcode::Array, &[elements.len()]);
                Ok(())
            }
            Expression::Index { left, index } => {
                self.compile_expression(left)?;
                self.compile_expression(index)?;
                self.emit(Opcode::Index, &[]);
                Ok(())
            }
            Expression::FunctionLiteral { parameters, body } => {
                self.compile_function_literal(parameters, body)
            }
            Expression::Call {
                function,
                arguments,
            } => {
                self.compile_expression(function)?;
                for argument in arguments {
                    self.compile_expression(argument)?;
                }
                self.emit(Opcode::Call, &[arguments.len()]);
                Ok(())
            }
        }
    }

    fn compile_if(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> CompileResult<()> {
        self.compile_expression(condition)?;

        // Placeholder target, patched once the consequence length is known.
        let jump_not_truthy_pos = self.emit(Opcode::JumpNotTruthy, &[9999]);

        self.compile_block(consequence)?;
        if self.last_instruction_is(Opcode::Pop) {
            self.remove_last_pop();
        }

        match alternative {
            None => {
                // Jump one byte past the end: over the OpPop that the
                // enclosing expression statement emits for the if-value.
                let after_consequence = self.current_scope().instructions.len();
                self.change_operand(jump_not_truthy_pos, after_consequence + 1);
            }
            Some(alternative) => {
                let jump_pos = self.emit(Opcode::Jump, &[9999]);

                let after_consequence = self.current_scope().instructions.len();
                self.change_operand(jump_not_truthy_pos, after_consequence);

                self.compile_block(alternative)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }

                let after_alternative = self.current_scope().instructions.len();
                self.change_operand(jump_pos, after_alternative);
            }
        }
        Ok(())
    }

    fn compile_function_literal(
        &mut self,
        parameters: &[crate::ast::Identifier],
        body: &BlockStatement,
    ) -> CompileResult<()> {
        self.enter_scope();

        // Parameters are the first locals, so they line up with the argument
        // slots already on the stack at call time.
        for parameter in parameters {
            self.symbol_table.borrow_mut().define(&parameter.value);
        }

        self.compile_block(body)?;

        if self.last_instruction_is(Opcode::Pop) {
            self.replace_last_pop_with_return();
        }
        if !self.last_instruction_is(Opcode::ReturnValue) {
            self.emit(Opcode::ReturnValue, &[]);
        }

        let (free_symbols, num_locals) = {
            let table = self.symbol_table.borrow();
            (table.free_symbols().to_vec(), table.num_definitions())
        };
        let instructions = self.leave_scope();

        // Push each captured value in the enclosing scope, then bundle them.
        for symbol in &free_symbols {
            self.load_symbol(symbol);
        }

        let function = CompiledFunction {
            instructions,
            num_locals,
            num_parameters: parameters.len(),
        };
        let index = self.add_constant(Object::CompiledFunction(Rc::new(function)));
        self.emit(Opcode::Closure, &[index, free_symbols.len()]);
        Ok(())
    }

    fn load_symbol(&mut self, symbol: &Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
            SymbolScope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
            SymbolScope::Builtin => self.emit(Opcode::GetBuiltin, &[symbol.index]),
            SymbolScope::Free => self.emit(Opcode::GetFree, &[symbol.index]),
        };
    }

    fn add_constant(&mut self, object: Object) -> usize {
        self.constants.push(object);
        self.constants.len() - 1
    }

    /// Assemble and append an instruction; returns its starting position
    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = code::make(op, operands);
        let position = self.add_instruction(&instruction);
        self.set_last_instruction(op, position);
        position
    }

    fn add_instruction(&mut self, instruction: &[u8]) -> usize {
        let scope = self.current_scope_mut();
        let position = scope.instructions.len();
        scope.instructions.extend_from_slice(instruction);
        position
    }

    fn set_last_instruction(&mut self, opcode: Opcode, position: usize) {
        let scope = self.current_scope_mut();
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction { opcode, position });
    }

    fn last_instruction_is(&self, op: Opcode) -> bool {
        matches!(
            self.current_scope().last_instruction,
            Some(EmittedInstruction { opcode, .. }) if opcode == op
        )
    }

    fn remove_last_pop(&mut self) {
        let scope = self.current_scope_mut();
        if let Some(last) = scope.last_instruction {
            scope.instructions.truncate(last.position);
            scope.last_instruction = scope.previous_instruction;
        }
    }

    fn replace_instruction(&mut self, position: usize, new_instruction: &[u8]) {
        let instructions = &mut self.current_scope_mut().instructions;
        instructions[position..position + new_instruction.len()]
            .copy_from_slice(new_instruction);
    }

    /// Re-assemble the instruction at `position` with a new operand
    ///
    /// Valid only for same-width operands, which holds for every
    /// back-patched jump.
    fn change_operand(&mut self, position: usize, operand: usize) {
        let op = Opcode::from_byte(self.current_scope().instructions[position])
            .expect("patched position holds a valid opcode");
        let new_instruction = code::make(op, &[operand]);
        self.replace_instruction(position, &new_instruction);
    }

    fn replace_last_pop_with_return(&mut self) {
        if let Some(last) = self.current_scope().last_instruction {
            let new_instruction = code::make(Opcode::ReturnValue, &[]);
            self.replace_instruction(last.position, &new_instruction);
            self.current_scope_mut().last_instruction = Some(EmittedInstruction {
                opcode: Opcode::ReturnValue,
                position: last.position,
            });
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::default());
        let enclosed = SymbolTable::new_enclosed(Rc::clone(&self.symbol_table));
        self.symbol_table = enclosed.into_ref();
    }

    fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().unwrap_or_default();
        let outer = self.symbol_table.borrow().outer();
        if let Some(outer) = outer {
            self.symbol_table = outer;
        }
        scope.instructions
    }

    fn current_scope(&self) -> &CompilationScope {
        self.scopes.last().expect("compiler always has a scope")
    }

    fn current_scope_mut(&mut self) -> &mut CompilationScope {
        self.scopes.last_mut().expect("compiler always has a scope")
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
