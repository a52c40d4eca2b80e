// String library: the pattern-matching half
// Implements: find, gmatch, gsub, match

use std::rc::Rc;

use crate::lib_registry::LibraryModule;
use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaError, LuaResult, LuaState};
use crate::pattern::{
    self, CaptureValue, MatchInfo, Pattern, PatternError, expand_template, is_plain_pattern,
};

pub fn create_string_lib() -> LibraryModule {
    crate::lib_module!("string", {
        "find" => string_find,
        "gmatch" => string_gmatch,
        "gsub" => string_gsub,
        "match" => string_match,
    })
}

/// Mirrors luaL_checklstring: strings pass through, numbers are converted.
fn check_bytes(l: &mut LuaState, n: usize, fname: &str) -> LuaResult<Rc<[u8]>> {
    let value = l.get_arg(n).unwrap_or_default();
    match value.to_str_bytes() {
        Some(bytes) => Ok(bytes),
        None => Err(l.error(format!(
            "bad argument #{n} to '{fname}' (string expected, got {})",
            arg_type_name(&value)
        ))),
    }
}

/// Mirrors luaL_optinteger.
fn opt_integer(l: &mut LuaState, n: usize, fname: &str, default: i64) -> LuaResult<i64> {
    let value = l.get_arg(n).unwrap_or_default();
    if value.is_nil() {
        return Ok(default);
    }
    match value_to_integer(&value) {
        Ok(i) => Ok(i),
        Err(msg) => Err(l.error(format!("bad argument #{n} to '{fname}' ({msg})"))),
    }
}

/// Mirrors luaL_checkinteger: convert a LuaValue to integer, producing
/// appropriate error messages like C Lua.
fn value_to_integer(v: &LuaValue) -> Result<i64, String> {
    if let Some(i) = v.as_integer() {
        return Ok(i);
    }
    if v.as_number().is_some() {
        return Err("number has no integer representation".to_string());
    }
    if let Some(s) = v.as_str() {
        let s = s.trim();
        if let Some(i) = parse_lua_integer(s) {
            return Ok(i);
        }
        let decimal = s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if let Some(f) = s.parse::<f64>().ok().filter(|_| decimal) {
            return LuaValue::number(f)
                .as_integer()
                .ok_or_else(|| "number has no integer representation".to_string());
        }
    }
    Err(format!("number expected, got {}", arg_type_name(v)))
}

/// Parse a Lua integer literal (decimal or hex, with wrapping for hex)
fn parse_lua_integer(s: &str) -> Option<i64> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    else {
        return s.parse::<i64>().ok();
    };
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    // Parse as u64 to allow wrapping (e.g. 0xffffffffffffffff -> -1)
    let n = u64::from_str_radix(hex, 16).ok()? as i64;
    Some(if negative { n.wrapping_neg() } else { n })
}

fn arg_type_name(v: &LuaValue) -> &'static str {
    if v.is_nil() { "no value" } else { v.type_name() }
}

/// Translate a relative initial position (negative means back from end)
/// into a 1-based position clipped to [1, inf).
fn posrelat(pos: i64, len: usize) -> usize {
    if pos > 0 {
        pos as usize
    } else if pos == 0 || pos < -(len as i64) {
        1
    } else {
        (len as i64 + pos + 1) as usize
    }
}

fn raise_pattern_error(l: &mut LuaState, e: PatternError) -> LuaError {
    tracing::debug!(error = %e, "pattern error");
    l.error(e.to_string())
}

fn capture_to_value(src: &[u8], cap: &CaptureValue) -> LuaValue {
    match *cap {
        CaptureValue::Substring(start, end) => LuaValue::string(&src[start..end]),
        CaptureValue::Position(pos) => LuaValue::integer(pos as i64),
    }
}

/// Push the captures of `m`; with `whole_if_none`, a capture-less pattern
/// pushes the whole match instead.
fn push_captures(
    l: &mut LuaState,
    src: &[u8],
    m: &MatchInfo,
    whole_if_none: bool,
) -> LuaResult<usize> {
    let values = if whole_if_none {
        m.values()
    } else {
        m.captures()
    };
    let values = match values {
        Ok(values) => values,
        Err(e) => return Err(raise_pattern_error(l, e)),
    };
    l.check_stack(values.len(), "too many captures")?;
    for cap in &values {
        l.push_value(capture_to_value(src, cap))?;
    }
    Ok(values.len())
}

fn str_find_aux(l: &mut LuaState, find: bool) -> LuaResult<usize> {
    let fname = if find { "find" } else { "match" };
    let s = check_bytes(l, 1, fname)?;
    let p = check_bytes(l, 2, fname)?;
    let init = posrelat(opt_integer(l, 3, fname, 1)?, s.len());
    if init > s.len() + 1 {
        // start after string's end: cannot find anything
        l.push_value(LuaValue::nil())?;
        return Ok(1);
    }
    let init = init - 1;

    let plain = l.get_arg(4).is_some_and(|v| v.is_truthy());
    if find && (plain || is_plain_pattern(&p)) {
        if let Some((start, end)) = pattern::find_plain(&s, &p, init) {
            l.push_value(LuaValue::integer(start as i64 + 1))?;
            l.push_value(LuaValue::integer(end as i64))?;
            return Ok(2);
        }
    } else {
        let pat = Pattern::new(&p).with_match_depth(l.safe_option().max_match_depth);
        match pat.find(&s, init) {
            Ok(Some(m)) if find => {
                l.push_value(LuaValue::integer(m.start as i64 + 1))?;
                l.push_value(LuaValue::integer(m.end as i64))?;
                return Ok(push_captures(l, &s, &m, false)? + 2);
            }
            Ok(Some(m)) => return push_captures(l, &s, &m, true),
            Ok(None) => {}
            Err(e) => return Err(raise_pattern_error(l, e)),
        }
    }
    l.push_value(LuaValue::nil())?;
    Ok(1)
}

/// string.find(s, pattern [, init [, plain]]) - Find pattern
fn string_find(l: &mut LuaState) -> LuaResult<usize> {
    str_find_aux(l, true)
}

/// string.match(s, pattern [, init]) - Match pattern
fn string_match(l: &mut LuaState) -> LuaResult<usize> {
    str_find_aux(l, false)
}

/// string.gmatch(s, pattern [, init]) - Returns an iterator function
/// Upvalues: subject, pattern, cursor (0-based).
fn string_gmatch(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_bytes(l, 1, "gmatch")?;
    let p = check_bytes(l, 2, "gmatch")?;
    let init = posrelat(opt_integer(l, 3, "gmatch", 1)?, s.len()) - 1;
    let init = init.min(s.len() + 1);
    let iter = LuaValue::c_closure(
        gmatch_aux,
        vec![
            LuaValue::String(s),
            LuaValue::String(p),
            LuaValue::integer(init as i64),
        ],
    );
    l.push_value(iter)?;
    Ok(1)
}

fn gmatch_aux(l: &mut LuaState) -> LuaResult<usize> {
    let closure = l
        .current_frame()
        .and_then(|frame| frame.func.as_cclosure().cloned());
    let Some(closure) = closure else {
        return Err(l.error("gmatch iterator: no active closure".to_string()));
    };
    let (Some(s), Some(p), Some(pos)) = (
        closure.upvalue(0).to_str_bytes(),
        closure.upvalue(1).to_str_bytes(),
        closure.upvalue(2).as_integer(),
    ) else {
        return Err(l.error("gmatch iterator: corrupted state".to_string()));
    };

    let pat = Pattern::new(&p).with_match_depth(l.safe_option().max_match_depth);
    let mut it = pat.gmatch(&s, pos.max(0) as usize);
    let found = it.next_match();
    closure.set_upvalue(2, LuaValue::integer(it.position() as i64));
    match found {
        Ok(Some(m)) => push_captures(l, &s, &m, true),
        Ok(None) => Ok(0),
        Err(e) => Err(raise_pattern_error(l, e)),
    }
}

/// Failure inside a gsub replacement: either from the matcher or from the
/// host (a replacement function that errored, a bad replacement value).
enum ReplError {
    Pattern(PatternError),
    Lua(LuaError),
}

impl From<PatternError> for ReplError {
    fn from(e: PatternError) -> Self {
        ReplError::Pattern(e)
    }
}

/// Append the value produced by a function or table replacement.
/// `nil`/`false` keeps the original match.
fn add_value(
    l: &mut LuaState,
    value: LuaValue,
    src: &[u8],
    m: &MatchInfo,
    out: &mut Vec<u8>,
) -> Result<(), ReplError> {
    if !value.is_truthy() {
        out.extend_from_slice(&src[m.start..m.end]);
        return Ok(());
    }
    match value.to_str_bytes() {
        Some(bytes) => {
            out.extend_from_slice(&bytes);
            Ok(())
        }
        None => Err(ReplError::Lua(l.error(format!(
            "invalid replacement value (a {})",
            value.type_name()
        )))),
    }
}

/// string.gsub(s, pattern, repl [, n]) - Global substitution
/// `repl` may be a string (template), a function or a table.
fn string_gsub(l: &mut LuaState) -> LuaResult<usize> {
    let src = check_bytes(l, 1, "gsub")?;
    let p = check_bytes(l, 2, "gsub")?;
    let repl = l.get_arg(3).unwrap_or_default();
    let max = opt_integer(l, 4, "gsub", src.len() as i64 + 1)?;
    let max = usize::try_from(max).unwrap_or(0);

    let template = match &repl {
        LuaValue::String(_) | LuaValue::Integer(_) | LuaValue::Number(_) => repl.to_str_bytes(),
        LuaValue::Function(_) | LuaValue::Table(_) => None,
        other => {
            return Err(l.error(format!(
                "bad argument #3 to 'gsub' (string/function/table expected, got {})",
                arg_type_name(other)
            )));
        }
    };

    let pat = Pattern::new(&p).with_match_depth(l.safe_option().max_match_depth);
    let result = pat.gsub(&src, Some(max), |m, out| -> Result<(), ReplError> {
        if let Some(template) = &template {
            return Ok(expand_template(template, &src, m, out)?);
        }
        match &repl {
            LuaValue::Table(table) => {
                let key = capture_to_value(&src, &m.capture(0)?);
                let value = table.borrow().raw_get(&key).unwrap_or_default();
                add_value(l, value, &src, m, out)
            }
            _ => {
                let args = m
                    .values()?
                    .iter()
                    .map(|cap| capture_to_value(&src, cap))
                    .collect();
                let results = l.call(&repl, args).map_err(ReplError::Lua)?;
                let value = results.into_iter().next().unwrap_or_default();
                add_value(l, value, &src, m, out)
            }
        }
    });

    match result {
        Ok((out, count)) => {
            l.push_value(LuaValue::string(out))?;
            l.push_value(LuaValue::integer(count as i64))?;
            Ok(2)
        }
        Err(ReplError::Pattern(e)) => Err(raise_pattern_error(l, e)),
        Err(ReplError::Lua(e)) => Err(e),
    }
}
