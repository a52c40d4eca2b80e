// Tests for the matcher through the Rust API: find, anchors, captures, limits
use crate::pattern::{self, CaptureValue, Pattern, PatternError};
use proptest::prelude::*;

fn span(text: &str, pat: &str) -> Option<(usize, usize)> {
    pattern::find(text.as_bytes(), pat.as_bytes(), 0)
        .unwrap()
        .map(|m| (m.start, m.end))
}

fn find_err(text: &str, pat: &str) -> PatternError {
    pattern::find(text.as_bytes(), pat.as_bytes(), 0).unwrap_err()
}

#[test]
fn test_greedy_and_lazy() {
    assert_eq!(span("aaa", "a*"), Some((0, 3)));
    assert_eq!(span("aaa", "a-"), Some((0, 0)));
    assert_eq!(span("aaab", "a-b"), Some((0, 4)));
    assert_eq!(span("baaa", "a+"), Some((1, 4)));
    assert_eq!(span("color colour", "colou?r"), Some((0, 5)));
    assert_eq!(span("<a><b>", "<.->"), Some((0, 3)));
    assert_eq!(span("<a><b>", "<.*>"), Some((0, 6)));
}

#[test]
fn test_anchors() {
    assert_eq!(span("xabc", "^abc"), None);
    assert_eq!(span("abc", "^abc"), Some((0, 3)));
    assert_eq!(span("abcabc", "abc$"), Some((3, 6)));
    assert_eq!(span("a$b", "a$b"), Some((0, 3)));
    assert_eq!(span("", "^$"), Some((0, 0)));
}

#[test]
fn test_anchor_only_tries_init() {
    let pat = Pattern::new(b"^b");
    assert!(pat.find(b"abc", 0).unwrap().is_none());
    let m = pat.find(b"abc", 1).unwrap().unwrap();
    assert_eq!((m.start, m.end), (1, 2));
}

#[test]
fn test_init_past_end() {
    assert!(pattern::find(b"abc", b"", 4).unwrap().is_none());
    let m = pattern::find(b"abc", b"", 3).unwrap().unwrap();
    assert_eq!((m.start, m.end), (3, 3));
}

#[test]
fn test_position_capture() {
    let m = pattern::find(b"hello", b"()ll()", 0).unwrap().unwrap();
    let caps: Vec<_> = m.captures().unwrap().iter().copied().collect();
    assert_eq!(
        caps,
        vec![CaptureValue::Position(3), CaptureValue::Position(5)]
    );
}

#[test]
fn test_nested_captures() {
    let m = pattern::find(b"key=value", b"((%w+)=(%w+))", 0)
        .unwrap()
        .unwrap();
    let caps: Vec<_> = m.captures().unwrap().iter().copied().collect();
    assert_eq!(
        caps,
        vec![
            CaptureValue::Substring(0, 9),
            CaptureValue::Substring(0, 3),
            CaptureValue::Substring(4, 9),
        ]
    );
}

#[test]
fn test_capture_rollback() {
    // The first attempt opens a capture at 'a' and fails on 'x'; only the
    // capture from the successful attempt may survive.
    let m = pattern::find(b"axab", b"(a)b", 0).unwrap().unwrap();
    assert_eq!((m.start, m.end), (2, 4));
    assert_eq!(m.capture_count(), 1);
    assert_eq!(m.capture(0), Ok(CaptureValue::Substring(2, 3)));
}

#[test]
fn test_balance_and_frontier() {
    assert_eq!(span("f(a(b)c) d", "%b()"), Some((1, 8)));
    assert_eq!(span("f(a(b c", "%b()"), None);
    assert_eq!(span("THE (quick) fox", "%f[%a]%a+"), Some((0, 3)));
    let m = pattern::find(b"hello world", b"%f[%w]%w+", 1)
        .unwrap()
        .unwrap();
    assert_eq!((m.start, m.end), (6, 11));
    // end of subject behaves as '\0'
    assert_eq!(span("abc", "%f[%z]"), Some((3, 3)));
}

#[test]
fn test_backreference() {
    let m = pattern::find(br#"say "hi" now"#, br#"(["'])(.-)%1"#, 0)
        .unwrap()
        .unwrap();
    assert_eq!((m.start, m.end), (4, 8));
    assert_eq!(m.capture(1), Ok(CaptureValue::Substring(5, 7)));
    assert_eq!(span("abab", "(ab)%1"), Some((0, 4)));
}

#[test]
fn test_pattern_errors() {
    assert_eq!(find_err("abc", "%"), PatternError::MalformedPattern("ends with '%'"));
    assert_eq!(find_err("abc", "[a"), PatternError::MalformedPattern("missing ']'"));
    assert_eq!(
        find_err("abc", "%b"),
        PatternError::MalformedPattern("missing arguments to '%b'")
    );
    assert_eq!(find_err("abc", "%fa"), PatternError::MissingFrontierSet);
    assert_eq!(find_err("abc", "a)"), PatternError::InvalidPatternCapture);
    assert_eq!(find_err("abc", "%1"), PatternError::InvalidCaptureIndex(1));
    assert_eq!(find_err("abc", "(a%1)"), PatternError::InvalidCaptureIndex(1));
}

#[test]
fn test_unfinished_capture_fails_when_read() {
    let m = pattern::find(b"abc", b"(a)(b", 0).unwrap().unwrap();
    assert_eq!((m.start, m.end), (0, 2));
    assert_eq!(m.capture_count(), 2);
    assert_eq!(m.capture(0), Ok(CaptureValue::Substring(0, 1)));
    assert_eq!(m.capture(1), Err(PatternError::UnfinishedCapture));
    assert_eq!(m.captures().unwrap_err(), PatternError::UnfinishedCapture);
    assert_eq!(m.values().unwrap_err(), PatternError::UnfinishedCapture);
}

#[test]
fn test_too_many_captures() {
    let pat = "()".repeat(33);
    assert_eq!(find_err("abc", &pat), PatternError::TooManyCaptures);
    let pat = "()".repeat(32);
    assert!(span("abc", &pat).is_some());
}

#[test]
fn test_pattern_too_complex() {
    let text = "a".repeat(250);
    let pat = "a?".repeat(250);
    assert_eq!(find_err(&text, &pat), PatternError::PatternTooComplex);
}

#[test]
fn test_match_depth_is_configurable() {
    let text = b"aaaaaaaaaa";
    let pat = "a?".repeat(10);
    assert!(Pattern::new(pat.as_bytes()).find(text, 0).unwrap().is_some());
    assert_eq!(
        Pattern::new(pat.as_bytes())
            .with_match_depth(5)
            .find(text, 0)
            .unwrap_err(),
        PatternError::PatternTooComplex
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        PatternError::MalformedPattern("ends with '%'").to_string(),
        "malformed pattern (ends with '%')"
    );
    assert_eq!(
        PatternError::InvalidCaptureIndex(3).to_string(),
        "invalid capture index %3"
    );
    assert_eq!(
        PatternError::MissingFrontierSet.to_string(),
        "missing '[' after '%f' in pattern"
    );
}

#[test]
fn test_is_plain_pattern() {
    assert!(pattern::is_plain_pattern(b"hello world"));
    assert!(pattern::is_plain_pattern(b""));
    assert!(!pattern::is_plain_pattern(b"a.b"));
    assert!(!pattern::is_plain_pattern(b"100%"));
    assert!(!pattern::is_plain_pattern(b"(x)"));
}

#[cfg(feature = "serde")]
#[test]
fn test_match_info_serializes() {
    let m = pattern::find(b"hello", b"()(ll)", 0).unwrap().unwrap();
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "start": 2,
            "end": 4,
            "captures": [{"Position": 3}, {"Substring": [2, 4]}],
        })
    );
}

proptest! {
    #[test]
    fn prop_plain_find_is_substring_search(
        text in "[abc]{0,24}",
        needle in "[abc]{0,4}",
        init in 0usize..26,
    ) {
        let expected = text
            .get(init..)
            .and_then(|rest| rest.find(needle.as_str()))
            .map(|pos| (init + pos, init + pos + needle.len()));
        prop_assert_eq!(
            pattern::find_plain(text.as_bytes(), needle.as_bytes(), init),
            expected
        );
        // A needle without specials matches the same span through the engine.
        let m = pattern::find(text.as_bytes(), needle.as_bytes(), init).unwrap();
        prop_assert_eq!(m.map(|m| (m.start, m.end)), expected);
    }

    #[test]
    fn prop_match_without_captures_is_whole_match(
        text in "[a-z ]{0,24}",
        pat in prop::sample::select(vec!["%a+", "a*", "[aeiou].", "%s", "b-c", "x?y?"]),
    ) {
        if let Some(m) = pattern::find(text.as_bytes(), pat.as_bytes(), 0).unwrap() {
            prop_assert_eq!(m.capture_count(), 0);
            let values = m.values().unwrap();
            prop_assert_eq!(values.len(), 1);
            prop_assert_eq!(values.get(0), Some(&CaptureValue::Substring(m.start, m.end)));
        }
    }
}
