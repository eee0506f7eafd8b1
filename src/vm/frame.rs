//! Call frames

use crate::code::Instructions;
use crate::object::Closure;
use std::rc::Rc;

/// Activation record for one function call
///
/// `ip` starts at -1 and is incremented before each fetch. `base_pointer` is
/// the stack slot where the frame's locals begin; the arguments already sit
/// in the first `num_parameters` of those slots when the frame is pushed.
#[derive(Debug)]
pub struct Frame {
    pub closure: Rc<Closure>,
    pub ip: i64,
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(closure: Rc<Closure>, base_pointer: usize) -> Self {
        Frame {
            closure,
            ip: -1,
            base_pointer,
        }
    }

    pub fn instructions(&self) -> &Instructions {
        &self.closure.func.instructions
    }
}
