// Lua pattern matching
// A byte-oriented backtracking matcher for Lua's pattern language, and the
// string.find / match / gmatch / gsub functions built on it

#[cfg(test)]
mod test;

pub mod lib_registry;
pub mod lua_value;
pub mod lua_vm;
pub mod pattern;
pub mod stdlib;

pub use lib_registry::LibraryModule;
pub use lua_value::{CClosure, CFunction, LuaTable, LuaValue};
pub use lua_vm::{LuaError, LuaResult, LuaState, SafeOption};
pub use pattern::{
    CaptureResults, CaptureValue, GMatch, MatchInfo, Pattern, PatternError, PatternResult,
};
pub use stdlib::create_string_lib;
