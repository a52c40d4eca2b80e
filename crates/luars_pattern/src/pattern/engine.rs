// Core pattern matching engine: direct interpretation, no AST
//
// Follows C Lua's lstrlib.c design:
// - MatchState holds text, pattern, captures and the recursion budget
// - match_impl recursively walks the pattern with backtracking
// - Fixed capture slots (no heap alloc during matching)
//
// Only steps with an alternative to fall back on (captures, `?`, `*`, `+`, `-`)
// recurse. Everything else re-dispatches inside match_inner's loop.

use super::capture::{CaptureLen, CaptureStack};
use super::class::{class_end, match_bracket_class, single_match};
use super::error::{PatternError, PatternResult};
use crate::lua_vm::lua_limits::L_ESC;

/// Match state for one attempt; reset between start offsets.
pub struct MatchState<'a> {
    pub text: &'a [u8],
    pub pat: &'a [u8],
    pub captures: CaptureStack,
    /// Remaining recursion budget
    pub match_depth: usize,
    max_depth: usize,
}

impl<'a> MatchState<'a> {
    pub fn new(text: &'a [u8], pat: &'a [u8], max_depth: usize) -> Self {
        Self {
            text,
            pat,
            captures: CaptureStack::new(),
            match_depth: max_depth,
            max_depth,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.captures.clear();
        self.match_depth = self.max_depth;
    }
}

/// Try to match `pat[p..]` against text starting at `text[s]`.
/// Returns `Some(end)` on success (offset past the match), `None` on failure.
pub fn match_impl(ms: &mut MatchState, s: usize, p: usize) -> PatternResult<Option<usize>> {
    if ms.match_depth == 0 {
        return Err(PatternError::PatternTooComplex);
    }
    ms.match_depth -= 1;
    let result = match_inner(ms, s, p);
    ms.match_depth += 1;
    result
}

fn match_inner(ms: &mut MatchState, mut s: usize, mut p: usize) -> PatternResult<Option<usize>> {
    let text = ms.text;
    let pat = ms.pat;
    loop {
        if p == pat.len() {
            return Ok(Some(s));
        }

        match pat[p] {
            b'(' => {
                return if pat.get(p + 1) == Some(&b')') {
                    start_capture(ms, s, p + 2, CaptureLen::Position)
                } else {
                    start_capture(ms, s, p + 1, CaptureLen::Unfinished)
                };
            }
            b')' => return end_capture(ms, s, p + 1),
            b'$' if p + 1 == pat.len() => {
                return Ok((s == text.len()).then_some(s));
            }
            L_ESC => match pat.get(p + 1).copied() {
                Some(b'b') => match match_balance(text, s, pat, p + 2)? {
                    Some(e) => {
                        s = e;
                        p += 4;
                        continue;
                    }
                    None => return Ok(None),
                },
                Some(b'f') => {
                    p += 2;
                    if pat.get(p) != Some(&b'[') {
                        return Err(PatternError::MissingFrontierSet);
                    }
                    let ep = class_end(pat, p)?;
                    let previous = if s == 0 { 0 } else { text[s - 1] };
                    let current = text.get(s).copied().unwrap_or(0);
                    if !match_bracket_class(previous, pat, p, ep - 1)
                        && match_bracket_class(current, pat, p, ep - 1)
                    {
                        p = ep;
                        continue;
                    }
                    return Ok(None);
                }
                Some(d) if d.is_ascii_digit() => match match_capture(ms, s, d)? {
                    Some(e) => {
                        s = e;
                        p += 2;
                        continue;
                    }
                    None => return Ok(None),
                },
                _ => {} // class escape, handled below
            },
            _ => {}
        }

        // Single item (literal, `.`, `%class`, `[set]`) plus optional suffix
        let ep = class_end(pat, p)?;
        let suffix = pat.get(ep).copied();
        if !single_match(text, s, pat, p, ep) {
            if matches!(suffix, Some(b'*' | b'?' | b'-')) {
                // accept empty
                p = ep + 1;
                continue;
            }
            return Ok(None);
        }
        match suffix {
            Some(b'?') => {
                if let Some(res) = match_impl(ms, s + 1, ep + 1)? {
                    return Ok(Some(res));
                }
                p = ep + 1;
            }
            Some(b'+') => return max_expand(ms, s + 1, p, ep),
            Some(b'*') => return max_expand(ms, s, p, ep),
            Some(b'-') => return min_expand(ms, s, p, ep),
            _ => {
                s += 1;
                p = ep;
            }
        }
    }
}

/// Greedy repetition: try the longest run first, then give back one at a time.
fn max_expand(ms: &mut MatchState, s: usize, p: usize, ep: usize) -> PatternResult<Option<usize>> {
    let mut i = 0;
    while single_match(ms.text, s + i, ms.pat, p, ep) {
        i += 1;
    }
    loop {
        if let Some(res) = match_impl(ms, s + i, ep + 1)? {
            return Ok(Some(res));
        }
        if i == 0 {
            return Ok(None);
        }
        i -= 1;
    }
}

/// Lazy repetition: try the rest of the pattern first, then consume one more.
fn min_expand(
    ms: &mut MatchState,
    mut s: usize,
    p: usize,
    ep: usize,
) -> PatternResult<Option<usize>> {
    loop {
        if let Some(res) = match_impl(ms, s, ep + 1)? {
            return Ok(Some(res));
        }
        if single_match(ms.text, s, ms.pat, p, ep) {
            s += 1;
        } else {
            return Ok(None);
        }
    }
}

fn start_capture(
    ms: &mut MatchState,
    s: usize,
    p: usize,
    what: CaptureLen,
) -> PatternResult<Option<usize>> {
    ms.captures.open(s, what)?;
    let res = match_impl(ms, s, p)?;
    if res.is_none() {
        ms.captures.pop();
    }
    Ok(res)
}

fn end_capture(ms: &mut MatchState, s: usize, p: usize) -> PatternResult<Option<usize>> {
    let l = ms.captures.capture_to_close()?;
    ms.captures.close(l, s);
    let res = match_impl(ms, s, p)?;
    if res.is_none() {
        ms.captures.reopen(l);
    }
    Ok(res)
}

/// `%bxy`; `p` points at `x`.
fn match_balance(text: &[u8], s: usize, pat: &[u8], p: usize) -> PatternResult<Option<usize>> {
    if p + 1 >= pat.len() {
        return Err(PatternError::MalformedPattern("missing arguments to '%b'"));
    }
    let (open, close) = (pat[p], pat[p + 1]);
    if text.get(s) != Some(&open) {
        return Ok(None);
    }
    let mut cont = 1;
    for (i, &c) in text.iter().enumerate().skip(s + 1) {
        if c == close {
            cont -= 1;
            if cont == 0 {
                return Ok(Some(i + 1));
            }
        } else if c == open {
            cont += 1;
        }
    }
    Ok(None)
}

/// Back reference `%1`..`%9`: the exact text of a closed capture.
fn match_capture(ms: &MatchState, s: usize, digit: u8) -> PatternResult<Option<usize>> {
    let cap = ms.captures.check_capture(digit)?;
    let CaptureLen::Len(len) = cap.len else {
        return Ok(None);
    };
    let captured = &ms.text[cap.start..cap.start + len];
    Ok(ms.text[s..].starts_with(captured).then_some(s + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_vm::lua_limits::MAXCCALLS_PATTERN;

    fn run(text: &str, pat: &str) -> PatternResult<Option<usize>> {
        let mut ms = MatchState::new(text.as_bytes(), pat.as_bytes(), MAXCCALLS_PATTERN);
        match_impl(&mut ms, 0, 0)
    }

    #[test]
    fn test_literal_run() {
        assert_eq!(run("hello", "hell"), Ok(Some(4)));
        assert_eq!(run("hello", "help"), Ok(None));
    }

    #[test]
    fn test_greedy_and_lazy() {
        assert_eq!(run("aaa", "a*"), Ok(Some(3)));
        assert_eq!(run("aaa", "a-"), Ok(Some(0)));
        assert_eq!(run("aaab", "a-b"), Ok(Some(4)));
        assert_eq!(run("aaa", "a+"), Ok(Some(3)));
        assert_eq!(run("baa", "a+"), Ok(None));
        assert_eq!(run("aab", "a*ab"), Ok(Some(3)));
    }

    #[test]
    fn test_optional() {
        assert_eq!(run("ab", "a?b"), Ok(Some(2)));
        assert_eq!(run("b", "a?b"), Ok(Some(1)));
        assert_eq!(run("aa", "a?a"), Ok(Some(2)));
        assert_eq!(run("a", "a?a"), Ok(Some(1)));
    }

    #[test]
    fn test_end_anchor() {
        assert_eq!(run("ab", "ab$"), Ok(Some(2)));
        assert_eq!(run("abc", "ab$"), Ok(None));
        assert_eq!(run("a$b", "a$b"), Ok(Some(3)));
    }

    #[test]
    fn test_depth_restored_after_attempt() {
        let mut ms = MatchState::new(b"aaaa", b"a*a*a*b", MAXCCALLS_PATTERN);
        assert_eq!(match_impl(&mut ms, 0, 0), Ok(None));
        assert_eq!(ms.match_depth, MAXCCALLS_PATTERN);
        assert_eq!(ms.captures.level(), 0);
    }

    #[test]
    fn test_failed_branch_rolls_back_captures() {
        let mut ms = MatchState::new(b"abc", b"(a)(x)?", MAXCCALLS_PATTERN);
        // `(x)` is a capture, not an item, so the `?` is a literal; no match.
        assert_eq!(match_impl(&mut ms, 0, 0), Ok(None));
        assert_eq!(ms.captures.level(), 0);

        let mut ms = MatchState::new(b"aab", b"(a*(.))b", MAXCCALLS_PATTERN);
        assert_eq!(match_impl(&mut ms, 0, 0), Ok(Some(3)));
        let caps = ms.captures.extract().unwrap();
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn test_small_budget() {
        let mut ms = MatchState::new(b"aaa", b"a?a?a?", 2);
        assert_eq!(
            match_impl(&mut ms, 0, 0),
            Err(PatternError::PatternTooComplex)
        );
        let mut ms = MatchState::new(b"aaa", b"aaa", 1);
        assert_eq!(match_impl(&mut ms, 0, 0), Ok(Some(3)));
    }

    #[test]
    fn test_balance_and_frontier() {
        assert_eq!(run("(a(b)c)d", "%b()"), Ok(Some(7)));
        assert_eq!(run("(a(b c", "%b()"), Ok(None));
        assert_eq!(run("\"x\"", "%b\"\""), Ok(Some(3)));
        assert_eq!(
            run("(", "%b("),
            Err(PatternError::MalformedPattern("missing arguments to '%b'"))
        );
        assert_eq!(run("THE", "%f[%a]%a+"), Ok(Some(3)));
        assert_eq!(run("x", "%fx"), Err(PatternError::MissingFrontierSet));
    }

    #[test]
    fn test_backreference() {
        assert_eq!(run("abab", "(ab)%1"), Ok(Some(4)));
        assert_eq!(run("abac", "(ab)%1"), Ok(None));
        assert_eq!(run("aa", "(a%1)"), Err(PatternError::InvalidCaptureIndex(1)));
        assert_eq!(run("a", "%1"), Err(PatternError::InvalidCaptureIndex(1)));
    }
}
