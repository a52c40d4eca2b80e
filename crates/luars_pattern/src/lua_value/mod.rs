// Host values consumed and produced by the string library
mod lua_table;
#[allow(clippy::module_inception)]
mod lua_value;

use std::cell::RefCell;

use crate::lua_vm::{LuaResult, LuaState};

pub use lua_table::LuaTable;
pub use lua_value::{LuaValue, number_to_string};

/// A native function: reads its arguments from the state, pushes its
/// results and returns how many it pushed.
pub type CFunction = fn(&mut LuaState) -> LuaResult<usize>;

/// Native function plus upvalues (e.g. the gmatch cursor).
#[derive(Debug)]
pub struct CClosure {
    func: CFunction,
    upvalues: RefCell<Vec<LuaValue>>,
}

impl CClosure {
    pub fn new(func: CFunction, upvalues: Vec<LuaValue>) -> Self {
        Self {
            func,
            upvalues: RefCell::new(upvalues),
        }
    }

    #[inline]
    pub fn func(&self) -> CFunction {
        self.func
    }

    pub fn upvalue(&self, index: usize) -> LuaValue {
        self.upvalues
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_upvalue(&self, index: usize, value: LuaValue) {
        if let Some(slot) = self.upvalues.borrow_mut().get_mut(index) {
            *slot = value;
        }
    }
}
