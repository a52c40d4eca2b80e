// Capture stack for a single match attempt, and the values projected out of it.
//
// Slots are numbered in the order their `(` appears in the pattern. A `)`
// closes the innermost slot that is still unfinished, so unfinished slots
// always form a stack even when closing order differs from opening order.

use super::error::{PatternError, PatternResult};
use crate::lua_vm::lua_limits::LUA_MAXCAPTURES;

/// Capture length: a byte count or a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureLen {
    Len(usize),
    Position, // () position capture
    Unfinished,
}

/// A single capture slot
#[derive(Debug, Clone, Copy)]
pub struct Capture {
    pub start: usize, // start offset in text
    pub len: CaptureLen,
}

impl Capture {
    /// Value of a closed slot; reading an unfinished one is an error.
    #[inline]
    pub fn value(&self) -> PatternResult<CaptureValue> {
        match self.len {
            CaptureLen::Len(len) => Ok(CaptureValue::Substring(self.start, self.start + len)),
            CaptureLen::Position => Ok(CaptureValue::Position(self.start + 1)),
            CaptureLen::Unfinished => Err(PatternError::UnfinishedCapture),
        }
    }
}

/// Fixed-capacity capture slots; `level` counts opened slots, closed or not.
#[derive(Debug, Clone)]
pub struct CaptureStack {
    slots: [Capture; LUA_MAXCAPTURES],
    level: usize,
}

impl Default for CaptureStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStack {
    pub fn new() -> Self {
        Self {
            slots: [Capture {
                start: 0,
                len: CaptureLen::Unfinished,
            }; LUA_MAXCAPTURES],
            level: 0,
        }
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn clear(&mut self) {
        self.level = 0;
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Capture> {
        self.slots[..self.level].get(index)
    }

    /// Open a new slot (`len` is `Unfinished` or `Position`).
    pub fn open(&mut self, start: usize, len: CaptureLen) -> PatternResult<()> {
        if self.level >= LUA_MAXCAPTURES {
            return Err(PatternError::TooManyCaptures);
        }
        self.slots[self.level] = Capture { start, len };
        self.level += 1;
        Ok(())
    }

    /// Undo the most recent `open`.
    #[inline]
    pub fn pop(&mut self) {
        self.level -= 1;
    }

    /// Index of the innermost unfinished capture.
    pub fn capture_to_close(&self) -> PatternResult<usize> {
        self.slots[..self.level]
            .iter()
            .rposition(|cap| cap.len == CaptureLen::Unfinished)
            .ok_or(PatternError::InvalidPatternCapture)
    }

    #[inline]
    pub fn close(&mut self, index: usize, end: usize) {
        let cap = &mut self.slots[index];
        cap.len = CaptureLen::Len(end - cap.start);
    }

    /// Undo a `close`.
    #[inline]
    pub fn reopen(&mut self, index: usize) {
        self.slots[index].len = CaptureLen::Unfinished;
    }

    /// Resolve a back reference digit (`%1`..`%9`) to a closed slot.
    pub fn check_capture(&self, digit: u8) -> PatternResult<&Capture> {
        let n = (digit - b'0') as usize;
        match n.checked_sub(1).and_then(|i| self.get(i)) {
            Some(cap) if cap.len != CaptureLen::Unfinished => Ok(cap),
            _ => Err(PatternError::InvalidCaptureIndex(n)),
        }
    }

    /// Copy the finished slots out. Fails if any slot is still unfinished.
    pub fn extract(&self) -> PatternResult<CaptureResults> {
        let mut result = CaptureResults::new();
        for cap in &self.slots[..self.level] {
            result.push(cap.value()?);
        }
        Ok(result)
    }
}

/// A capture value returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CaptureValue {
    Substring(usize, usize), // start, end (exclusive) in the subject
    Position(usize),         // 1-based position
}

/// Fixed-size capture results, no Vec allocation per match
#[derive(Debug, Clone, Copy)]
pub struct CaptureResults {
    data: [CaptureValue; LUA_MAXCAPTURES],
    count: usize,
}

impl Default for CaptureResults {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureResults {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            data: [CaptureValue::Substring(0, 0); LUA_MAXCAPTURES],
            count: 0,
        }
    }

    #[inline(always)]
    fn push(&mut self, value: CaptureValue) {
        self.data[self.count] = value;
        self.count += 1;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, CaptureValue> {
        self.data[..self.count].iter()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&CaptureValue> {
        self.data[..self.count].get(index)
    }
}

impl<'a> IntoIterator for &'a CaptureResults {
    type Item = &'a CaptureValue;
    type IntoIter = std::slice::Iter<'a, CaptureValue>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.data[..self.count].iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CaptureResults {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Information about a single match.
///
/// The capture slots are kept as the matcher left them; a slot that was
/// never closed only fails when its value is read.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    pub start: usize, // byte offset
    pub end: usize,   // byte offset, exclusive
    slots: CaptureStack,
}

impl MatchInfo {
    pub(super) fn new(start: usize, end: usize, slots: CaptureStack) -> Self {
        Self { start, end, slots }
    }

    /// Number of captures the pattern opened.
    #[inline]
    pub fn capture_count(&self) -> usize {
        self.slots.level()
    }

    /// Every explicit capture, in pattern order.
    pub fn captures(&self) -> PatternResult<CaptureResults> {
        self.slots.extract()
    }

    /// The explicit captures, or the whole match when the pattern has none.
    pub fn values(&self) -> PatternResult<CaptureResults> {
        if self.capture_count() == 0 {
            let mut whole = CaptureResults::new();
            whole.push(CaptureValue::Substring(self.start, self.end));
            Ok(whole)
        } else {
            self.captures()
        }
    }

    /// Capture `index` (0-based). Index 0 falls back to the whole match when
    /// the pattern declared no captures.
    pub fn capture(&self, index: usize) -> PatternResult<CaptureValue> {
        match self.slots.get(index) {
            Some(cap) => cap.value(),
            None if index == 0 && self.capture_count() == 0 => {
                Ok(CaptureValue::Substring(self.start, self.end))
            }
            None => Err(PatternError::InvalidCaptureIndex(index + 1)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MatchInfo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{Error, SerializeStruct};

        let captures = self.captures().map_err(S::Error::custom)?;
        let mut state = serializer.serialize_struct("MatchInfo", 3)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end)?;
        state.serialize_field("captures", &captures)?;
        state.end()
    }
}
