// Minimal execution state for native functions: a value stack, call frames
// and the error channel. Arguments of the running function sit at
// `stack[base..top]`; results are pushed above them.

use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaError, LuaResult, SafeOption};

/// A call frame of a native function
#[derive(Debug, Clone)]
pub struct CallInfo {
    /// The function being called
    pub func: LuaValue,
    /// Stack index of the first argument
    pub base: usize,
    /// One past the last argument
    pub top: usize,
}

pub struct LuaState {
    stack: Vec<LuaValue>,
    call_stack: Vec<CallInfo>,
    error_msg: String,
    safe_option: SafeOption,
}

impl Default for LuaState {
    fn default() -> Self {
        Self::new(SafeOption::default())
    }
}

impl LuaState {
    pub fn new(safe_option: SafeOption) -> Self {
        Self {
            stack: Vec::new(),
            call_stack: Vec::new(),
            error_msg: String::new(),
            safe_option,
        }
    }

    #[inline(always)]
    pub fn safe_option(&self) -> &SafeOption {
        &self.safe_option
    }

    /// Get current call frame
    #[inline(always)]
    pub fn current_frame(&self) -> Option<&CallInfo> {
        self.call_stack.last()
    }

    /// Get argument `index` (1-based) of the running function
    pub fn get_arg(&self, index: usize) -> Option<LuaValue> {
        let frame = self.current_frame()?;
        if index == 0 {
            return None;
        }
        let stack_index = frame.base + index - 1;
        if stack_index < frame.top {
            self.stack.get(stack_index).cloned()
        } else {
            None
        }
    }

    pub fn push_value(&mut self, value: LuaValue) -> LuaResult<()> {
        if self.stack.len() >= self.safe_option.max_stack_size {
            self.error_msg = format!(
                "stack overflow: attempted to push value exceeding maximum {}",
                self.safe_option.max_stack_size
            );
            return Err(LuaError::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    /// Make sure `n` more values can be pushed (luaL_checkstack).
    pub fn check_stack(&mut self, n: usize, msg: &str) -> LuaResult<()> {
        if self.stack.len() + n > self.safe_option.max_stack_size {
            return Err(self.error(format!("stack overflow ({msg})")));
        }
        self.stack.reserve(n);
        Ok(())
    }

    /// Record an error message and return the error to propagate
    pub fn error(&mut self, msg: String) -> LuaError {
        self.error_msg = msg;
        LuaError::RuntimeError
    }

    /// Message of the last error raised through this state
    pub fn error_msg(&self) -> &str {
        &self.error_msg
    }

    /// Call a native function with `args`, returning every value it pushed.
    pub fn call(&mut self, func: &LuaValue, args: Vec<LuaValue>) -> LuaResult<Vec<LuaValue>> {
        let Some(closure) = func.as_cclosure() else {
            return Err(self.error(format!("attempt to call a {} value", func.type_name())));
        };
        if self.call_stack.len() >= self.safe_option.max_call_depth {
            self.error_msg = "stack overflow".to_string();
            return Err(LuaError::StackOverflow);
        }

        let base = self.stack.len();
        for arg in args {
            if let Err(e) = self.push_value(arg) {
                self.stack.truncate(base);
                return Err(e);
            }
        }
        let top = self.stack.len();
        self.call_stack.push(CallInfo {
            func: func.clone(),
            base,
            top,
        });

        let result = (closure.func())(self);

        self.call_stack.pop();
        let results = match result {
            Ok(n) => {
                let first = self.stack.len().saturating_sub(n).max(top);
                self.stack.split_off(first)
            }
            Err(e) => {
                self.stack.truncate(base);
                return Err(e);
            }
        };
        self.stack.truncate(base);
        Ok(results)
    }
}
