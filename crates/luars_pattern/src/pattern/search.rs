// Public matching operations: find/match, global iteration and substitution.
// All offsets here are 0-based byte offsets; the string library converts to
// Lua's 1-based positions.

use std::iter::FusedIterator;

use super::capture::{CaptureValue, MatchInfo};
use super::engine::{MatchState, match_impl};
use super::error::{PatternError, PatternResult};
use crate::lua_vm::lua_limits::{L_ESC, MAXCCALLS_PATTERN, SPECIALS};

/// Check if pattern has no special characters (can be matched as plain text).
/// Mirrors C Lua's `nospecials()` in lstrlib.c.
#[inline]
pub fn is_plain_pattern(pat: &[u8]) -> bool {
    !pat.iter().any(|c| SPECIALS.contains(c))
}

/// Plain substring search from `init`. Returns `(start, end)`, end exclusive.
pub fn find_plain(text: &[u8], needle: &[u8], init: usize) -> Option<(usize, usize)> {
    let haystack = text.get(init..)?;
    let pos = if needle.is_empty() {
        0
    } else {
        haystack.windows(needle.len()).position(|w| w == needle)?
    };
    Some((init + pos, init + pos + needle.len()))
}

/// A pattern plus the recursion budget used for every match attempt.
#[derive(Debug, Clone, Copy)]
pub struct Pattern<'p> {
    source: &'p [u8],
    match_depth: usize,
}

impl<'p> Pattern<'p> {
    pub fn new(source: &'p [u8]) -> Self {
        Self {
            source,
            match_depth: MAXCCALLS_PATTERN,
        }
    }

    pub fn with_match_depth(mut self, match_depth: usize) -> Self {
        self.match_depth = match_depth;
        self
    }

    /// Pattern body with a leading `^` removed, and whether it was there.
    fn strip_anchor(&self) -> (&'p [u8], bool) {
        match self.source.split_first() {
            Some((b'^', rest)) => (rest, true),
            _ => (self.source, false),
        }
    }

    /// First match at or after `init`. An anchored pattern only tries `init`.
    pub fn find(&self, text: &[u8], init: usize) -> PatternResult<Option<MatchInfo>> {
        if init > text.len() {
            return Ok(None);
        }
        let (pat, anchor) = self.strip_anchor();
        let mut ms = MatchState::new(text, pat, self.match_depth);
        let mut s1 = init;
        loop {
            ms.reset();
            if let Some(end) = match_impl(&mut ms, s1, 0)? {
                tracing::trace!(start = s1, end, "pattern matched");
                return Ok(Some(MatchInfo::new(s1, end, ms.captures.clone())));
            }
            if anchor || s1 >= text.len() {
                return Ok(None);
            }
            s1 += 1;
        }
    }

    /// Iterate over successive matches starting at `init`.
    pub fn gmatch<'t>(&self, text: &'t [u8], init: usize) -> GMatch<'p, 't> {
        GMatch {
            pattern: *self,
            text,
            src: init,
            done: false,
        }
    }

    /// Replace up to `max` matches (default: unbounded). `repl` appends the
    /// replacement for one match to the output buffer.
    pub fn gsub<E, F>(
        &self,
        text: &[u8],
        max: Option<usize>,
        mut repl: F,
    ) -> Result<(Vec<u8>, usize), E>
    where
        E: From<PatternError>,
        F: FnMut(&MatchInfo, &mut Vec<u8>) -> Result<(), E>,
    {
        let (pat, anchor) = self.strip_anchor();
        let max = max.unwrap_or(text.len() + 1);
        let mut ms = MatchState::new(text, pat, self.match_depth);
        let mut out = Vec::with_capacity(text.len());
        let mut src = 0;
        let mut count = 0;
        while count < max {
            ms.reset();
            let end = match_impl(&mut ms, src, 0)?;
            if let Some(end) = end {
                count += 1;
                let m = MatchInfo::new(src, end, ms.captures.clone());
                repl(&m, &mut out)?;
            }
            match end {
                Some(end) if end > src => src = end,
                _ if src < text.len() => {
                    out.push(text[src]);
                    src += 1;
                }
                _ => break,
            }
            if anchor {
                break;
            }
        }
        out.extend_from_slice(&text[src..]);
        tracing::trace!(count, "gsub finished");
        Ok((out, count))
    }
}

/// Global match iterator. The cursor only moves forward; an empty match
/// moves it one past the match so iteration always terminates.
#[derive(Debug, Clone)]
pub struct GMatch<'p, 't> {
    pattern: Pattern<'p>,
    text: &'t [u8],
    src: usize,
    done: bool,
}

impl GMatch<'_, '_> {
    /// Cursor to resume from; `text.len() + 1` once exhausted.
    pub fn position(&self) -> usize {
        self.src
    }

    pub fn next_match(&mut self) -> PatternResult<Option<MatchInfo>> {
        let mut ms = MatchState::new(self.text, self.pattern.source, self.pattern.match_depth);
        while self.src <= self.text.len() {
            ms.reset();
            let start = self.src;
            if let Some(end) = match_impl(&mut ms, start, 0)? {
                self.src = if end == start { end + 1 } else { end };
                return Ok(Some(MatchInfo::new(start, end, ms.captures.clone())));
            }
            self.src += 1;
        }
        Ok(None)
    }
}

impl Iterator for GMatch<'_, '_> {
    type Item = PatternResult<MatchInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_match() {
            Ok(Some(m)) => Some(Ok(m)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for GMatch<'_, '_> {}

/// Expand a replacement template for one match: `%0` whole match,
/// `%1`-`%9` captures, `%%` a literal percent.
pub fn expand_template(
    template: &[u8],
    text: &[u8],
    m: &MatchInfo,
    out: &mut Vec<u8>,
) -> PatternResult<()> {
    let mut i = 0;
    while i < template.len() {
        let c = template[i];
        i += 1;
        if c != L_ESC {
            out.push(c);
            continue;
        }
        match template.get(i).copied() {
            Some(L_ESC) => out.push(L_ESC),
            Some(b'0') => out.extend_from_slice(&text[m.start..m.end]),
            Some(d) if d.is_ascii_digit() => {
                match m.capture((d - b'1') as usize)? {
                    CaptureValue::Substring(start, end) => out.extend_from_slice(&text[start..end]),
                    CaptureValue::Position(pos) => {
                        out.extend_from_slice(itoa::Buffer::new().format(pos).as_bytes())
                    }
                }
            }
            _ => return Err(PatternError::InvalidReplacement),
        }
        i += 1;
    }
    Ok(())
}

/// Find pattern in text. `init` is a 0-based byte offset.
pub fn find(text: &[u8], pat: &[u8], init: usize) -> PatternResult<Option<MatchInfo>> {
    Pattern::new(pat).find(text, init)
}

/// Iterate over all matches of `pat` in `text`.
pub fn gmatch<'p, 't>(text: &'t [u8], pat: &'p [u8]) -> GMatch<'p, 't> {
    Pattern::new(pat).gmatch(text, 0)
}

/// Global substitution with a template string.
/// Returns (result_bytes, substitution_count).
pub fn gsub(
    text: &[u8],
    pat: &[u8],
    template: &[u8],
    max: Option<usize>,
) -> PatternResult<(Vec<u8>, usize)> {
    Pattern::new(pat).gsub(text, max, |m, out| expand_template(template, text, m, out))
}
