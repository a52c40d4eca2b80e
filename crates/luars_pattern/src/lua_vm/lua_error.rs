/// Lightweight error enum - only 1 byte!
/// The message is stored in `LuaState::error_msg` to keep `LuaResult` small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuaError {
    /// Runtime error - message stored in the state's error_msg
    RuntimeError,
    /// Stack overflow (value stack or C call depth)
    StackOverflow,
}

impl std::fmt::Display for LuaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LuaError::RuntimeError => write!(f, "Runtime Error"),
            LuaError::StackOverflow => write!(f, "Stack Overflow"),
        }
    }
}

impl std::error::Error for LuaError {}
