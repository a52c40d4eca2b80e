//! Centralized limits and configuration constants.
//!
//! Mirrors Lua 5.5's `luaconf.h` / `llimits.h` design for the pieces the
//! pattern library needs. All magic numbers that control matching and the
//! host stack are collected here for easy tuning.

// ===== Stack =====

/// Default maximum stack size (number of slots).
/// Matches Lua 5.5's LUAI_MAXSTACK.
pub const LUAI_MAXSTACK: usize = 1_000_000;

/// Default maximum nesting of C function calls made through `LuaState::call`.
pub const MAX_CALL_DEPTH: usize = 256;

// ===== Pattern Matching =====

/// Maximum number of captures in `string.find` / `string.gmatch` patterns.
/// Matches Lua 5.5's LUA_MAXCAPTURES.
pub const LUA_MAXCAPTURES: usize = 32;

/// Maximum match recursion depth for pattern matching.
pub const MAXCCALLS_PATTERN: usize = 200;

/// Escape character used by patterns and replacement strings.
pub const L_ESC: u8 = b'%';

/// Characters that make a pattern "special" (not searchable as plain text).
pub const SPECIALS: &[u8] = b"^$*+?.([%-";
