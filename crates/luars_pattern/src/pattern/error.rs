// Errors raised while matching. None of them are retried: the current call
// fails with the message below. "No match" is never an error.

pub type PatternResult<T> = Result<T, PatternError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern text is malformed; carries the reason, e.g. "ends with '%'".
    MalformedPattern(&'static str),
    /// `%f` not followed by a bracket set
    MissingFrontierSet,
    /// More than LUA_MAXCAPTURES captures opened
    TooManyCaptures,
    /// `)` with no open capture
    InvalidPatternCapture,
    /// A capture was still open when its value was requested
    UnfinishedCapture,
    /// Capture index (1-based, as written) out of range
    InvalidCaptureIndex(usize),
    /// Recursion budget exhausted
    PatternTooComplex,
    /// `%` followed by something other than a digit or `%` in a replacement
    InvalidReplacement,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::MalformedPattern(reason) => write!(f, "malformed pattern ({reason})"),
            PatternError::MissingFrontierSet => write!(f, "missing '[' after '%f' in pattern"),
            PatternError::TooManyCaptures => write!(f, "too many captures"),
            PatternError::InvalidPatternCapture => write!(f, "invalid pattern capture"),
            PatternError::UnfinishedCapture => write!(f, "unfinished capture"),
            PatternError::InvalidCaptureIndex(n) => write!(f, "invalid capture index %{n}"),
            PatternError::PatternTooComplex => write!(f, "pattern too complex"),
            PatternError::InvalidReplacement => {
                write!(f, "invalid use of '%' in replacement string")
            }
        }
    }
}

impl std::error::Error for PatternError {}
