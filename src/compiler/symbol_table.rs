//! Compile-time scopes and identifier resolution
//!
//! The symbol table exists only during compilation; at run time its
//! resolutions have been flattened into `OpGet*`/`OpSet*` operands. Tables
//! nest per function body. Resolving a name that lives in an enclosing
//! function's locals promotes it to a free symbol here, which is how nested
//! closures reach variables any number of scopes up.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Where a symbol's storage lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
    Free,
}

impl fmt::Display for SymbolScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolScope::Global => "GLOBAL",
            SymbolScope::Local => "LOCAL",
            SymbolScope::Builtin => "BUILTIN",
            SymbolScope::Free => "FREE",
        };
        write!(f, "{name}")
    }
}

/// A resolved name: its scope plus a dense index within that scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

/// Shared reference to a symbol table
pub type SymbolTableRef = Rc<RefCell<SymbolTable>>;

/// One lexical scope's worth of definitions
#[derive(Debug, Default)]
pub struct SymbolTable {
    outer: Option<SymbolTableRef>,
    store: HashMap<String, Symbol>,
    num_definitions: usize,
    free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn new_enclosed(outer: SymbolTableRef) -> Self {
        SymbolTable {
            outer: Some(outer),
            ..SymbolTable::default()
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> SymbolTableRef {
        Rc::new(RefCell::new(self))
    }

    pub fn outer(&self) -> Option<SymbolTableRef> {
        self.outer.clone()
    }

    /// Number of names defined directly in this scope
    pub fn num_definitions(&self) -> usize {
        self.num_definitions
    }

    /// Symbols this scope pulled in from enclosing local scopes, in
    /// promotion order
    pub fn free_symbols(&self) -> &[Symbol] {
        &self.free_symbols
    }

    /// Define a name in this scope
    ///
    /// Top-level tables hand out global indices, nested ones local indices;
    /// both are dense in definition order.
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.outer.is_none() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index: self.num_definitions,
        };
        self.num_definitions += 1;
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Register a builtin under a caller-supplied index
    ///
    /// Does not count towards `num_definitions`.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Promote a symbol from an enclosing scope to a free symbol here
    pub fn define_free(&mut self, original: Symbol) -> Symbol {
        let name = original.name.clone();
        self.free_symbols.push(original);
        let symbol = Symbol {
            name: name.clone(),
            scope: SymbolScope::Free,
            index: self.free_symbols.len() - 1,
        };
        self.store.insert(name, symbol.clone());
        symbol
    }

    /// Resolve a name, walking outward
    ///
    /// Globals and builtins resolve as themselves from any depth. A hit in
    /// an enclosing function's locals (or in its free symbols) is captured:
    /// it becomes a free symbol of this table.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }
        let outer = self.outer.clone()?;
        let symbol = outer.borrow_mut().resolve(name)?;
        match symbol.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(symbol),
            SymbolScope::Local | SymbolScope::Free => Some(self.define_free(symbol)),
        }
    }
}
