//! Environment for variable bindings

use super::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// Run-time binding store with an optional enclosing environment
///
/// Each function call gets a fresh environment enclosing the function's
/// definition-time one; identifier resolution walks outward. Because the
/// chain is shared, a closure observes rebindings its defining scope makes
/// after the closure was created.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn new_enclosed(outer: EnvRef) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Look up a name in the scope chain
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.get(name) {
            Some(value.clone())
        } else if let Some(outer) = &self.outer {
            outer.borrow().get(name)
        } else {
            None
        }
    }

    /// Bind a name in the current scope
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

/// Create a child environment enclosing `outer`
pub fn enclosed_env(outer: &EnvRef) -> EnvRef {
    Environment::new_enclosed(Rc::clone(outer)).into_ref()
}
