// Host runtime: the small slice of a Lua VM that native library functions need
mod lua_error;
pub mod lua_limits;
mod lua_state;
mod safe_option;

pub use lua_error::LuaError;
pub use lua_state::{CallInfo, LuaState};
pub use safe_option::SafeOption;

pub type LuaResult<T> = Result<T, LuaError>;
