use crate::lua_vm::lua_limits::{LUAI_MAXSTACK, MAX_CALL_DEPTH, MAXCCALLS_PATTERN};

#[derive(Debug, Clone)]
pub struct SafeOption {
    pub max_stack_size: usize,
    pub max_call_depth: usize,
    /// Recursion budget handed to every pattern match attempt.
    pub max_match_depth: usize,
}

impl Default for SafeOption {
    fn default() -> Self {
        Self {
            max_stack_size: LUAI_MAXSTACK,
            max_call_depth: MAX_CALL_DEPTH,
            max_match_depth: MAXCCALLS_PATTERN,
        }
    }
}
