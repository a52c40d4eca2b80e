// Lua pattern matching: byte-oriented, zero-AST design
//
// Modeled after C Lua's lstrlib.c. Operates on `&[u8]` (raw bytes).
// In Lua, all string operations are byte-oriented; each byte is a "character".
//
// 1. NO AST / parse phase; the pattern string is interpreted directly during matching
// 2. Fixed-size capture array (32 slots), no heap allocation during matching
// 3. MatchState carries captures and the recursion budget explicitly
// 4. Recursion-limited to prevent stack overflow on pathological patterns

mod capture;
mod class;
mod engine;
mod error;
mod search;

pub use capture::{CaptureResults, CaptureValue, MatchInfo};
pub use error::{PatternError, PatternResult};
pub use search::{
    GMatch, Pattern, expand_template, find, find_plain, gmatch, gsub, is_plain_pattern,
};
