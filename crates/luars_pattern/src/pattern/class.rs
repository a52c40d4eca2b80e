// Character class matching for Lua patterns
// Handles %a, %c, %d, %g, %l, %p, %s, %u, %w, %x, %z and their uppercase inverses
// Also handles [set] matching
//
// Classification is the C locale's: bytes >= 0x80 belong to no class.

use super::error::{PatternError, PatternResult};
use crate::lua_vm::lua_limits::L_ESC;

/// Check if byte `c` matches the class letter `cl`.
/// A lowercase letter selects the class, the uppercase letter its complement;
/// any other `cl` matches itself literally.
#[inline(always)]
pub fn match_class(c: u8, cl: u8) -> bool {
    let res = match cl.to_ascii_lowercase() {
        b'a' => c.is_ascii_alphabetic(),
        b'c' => c.is_ascii_control(),
        b'd' => c.is_ascii_digit(),
        b'g' => c.is_ascii_graphic(),
        b'l' => c.is_ascii_lowercase(),
        b'p' => c.is_ascii_punctuation(),
        // isspace: includes vertical tab, which is_ascii_whitespace does not
        b's' => matches!(c, b' ' | b'\t'..=b'\r'),
        b'u' => c.is_ascii_uppercase(),
        b'w' => c.is_ascii_alphanumeric(),
        b'x' => c.is_ascii_hexdigit(),
        b'z' => c == 0,
        _ => return c == cl, // not a class letter, match literally
    };
    if cl.is_ascii_uppercase() { !res } else { res }
}

/// Return the pattern index after the single item starting at `pat[p]`
/// (past `[set]`, `%x`, `.`, or a literal). Repetition suffixes are not consumed.
pub fn class_end(pat: &[u8], mut p: usize) -> PatternResult<usize> {
    let c = pat[p];
    p += 1;
    match c {
        L_ESC => {
            if p >= pat.len() {
                return Err(PatternError::MalformedPattern("ends with '%'"));
            }
            Ok(p + 1)
        }
        b'[' => {
            if p < pat.len() && pat[p] == b'^' {
                p += 1;
            }
            // The first member is always taken literally, so `[]]` and `[^]]` work.
            loop {
                if p >= pat.len() {
                    return Err(PatternError::MalformedPattern("missing ']'"));
                }
                let c = pat[p];
                p += 1;
                if c == L_ESC && p < pat.len() {
                    p += 1; // skip escapes (e.g. `%]`)
                }
                if p < pat.len() && pat[p] == b']' {
                    break;
                }
            }
            Ok(p + 1)
        }
        _ => Ok(p),
    }
}

/// Match `c` against the set `pat[p..=ec]`, where `pat[p]` is `[` and `pat[ec]` its `]`.
pub fn match_bracket_class(c: u8, pat: &[u8], mut p: usize, ec: usize) -> bool {
    let mut sig = true;
    if pat[p + 1] == b'^' {
        sig = false;
        p += 1; // skip the `^`
    }
    p += 1;
    while p < ec {
        if pat[p] == L_ESC {
            p += 1;
            if match_class(c, pat[p]) {
                return sig;
            }
        } else if pat[p + 1] == b'-' && p + 2 < ec {
            // Range: a-z. A `-` next to either bracket is a literal.
            if pat[p] <= c && c <= pat[p + 2] {
                return sig;
            }
            p += 2;
        } else if pat[p] == c {
            return sig;
        }
        p += 1;
    }
    !sig
}

/// Does `text[s]` satisfy the item `pat[p..ep]`? Out of range `s` never matches.
#[inline]
pub fn single_match(text: &[u8], s: usize, pat: &[u8], p: usize, ep: usize) -> bool {
    let Some(&c) = text.get(s) else {
        return false;
    };
    match pat[p] {
        b'.' => true, // matches any char
        L_ESC => match_class(c, pat[p + 1]),
        b'[' => match_bracket_class(c, pat, p, ep - 1),
        lit => lit == c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_matches(c: u8, item: &[u8]) -> bool {
        let ep = class_end(item, 0).unwrap();
        assert_eq!(ep, item.len());
        single_match(&[c], 0, item, 0, ep)
    }

    #[test]
    fn test_match_class() {
        assert!(match_class(b'a', b'a'));
        assert!(match_class(b'Z', b'a'));
        assert!(!match_class(b'1', b'a'));
        assert!(match_class(b'5', b'd'));
        assert!(!match_class(b'x', b'd'));
        assert!(match_class(b' ', b's'));
        assert!(match_class(b'\t', b's'));
        assert!(match_class(0x0b, b's'));
        assert!(!match_class(b'a', b's'));
        assert!(match_class(0, b'z'));
        assert!(match_class(b'F', b'x'));
        assert!(!match_class(b'g', b'x'));
    }

    #[test]
    fn test_complement_classes() {
        assert!(!match_class(b'5', b'D'));
        assert!(match_class(b'a', b'D'));
        assert!(match_class(b'A', b'L'));
        assert!(!match_class(b' ', b'S'));
        assert!(match_class(0xe9, b'A'));
    }

    #[test]
    fn test_non_letter_escape_is_literal() {
        assert!(match_class(b'.', b'.'));
        assert!(!match_class(b'x', b'.'));
        assert!(item_matches(b'%', b"%%"));
        assert!(item_matches(b'[', b"%["));
    }

    #[test]
    fn test_singlematch_dot() {
        assert!(item_matches(b'x', b"."));
        assert!(item_matches(b' ', b"."));
        assert!(item_matches(0xff, b"."));
    }

    #[test]
    fn test_singlematch_past_end() {
        assert!(!single_match(b"ab", 2, b".", 0, 1));
        assert!(!single_match(b"", 0, b"%a", 0, 2));
    }

    #[test]
    fn test_singlematch_set() {
        assert!(item_matches(b'a', b"[abc]"));
        assert!(item_matches(b'c', b"[abc]"));
        assert!(!item_matches(b'd', b"[abc]"));
    }

    #[test]
    fn test_singlematch_negated_set() {
        assert!(!item_matches(b'a', b"[^abc]"));
        assert!(item_matches(b'd', b"[^abc]"));
    }

    #[test]
    fn test_singlematch_range() {
        assert!(item_matches(b'm', b"[a-z]"));
        assert!(!item_matches(b'M', b"[a-z]"));
        assert!(item_matches(b'7', b"[0-9a-f]"));
    }

    #[test]
    fn test_dash_next_to_bracket_is_literal() {
        assert!(item_matches(b'-', b"[a-]"));
        assert!(item_matches(b'a', b"[a-]"));
        assert!(!item_matches(b'b', b"[a-]"));
        assert!(item_matches(b'-', b"[-a]"));
    }

    #[test]
    fn test_singlematch_set_with_class() {
        assert!(item_matches(b'5', b"[%d_]"));
        assert!(item_matches(b'_', b"[%d_]"));
        assert!(!item_matches(b'a', b"[%d_]"));
        assert!(item_matches(b']', b"[%]]"));
    }

    #[test]
    fn test_class_end() {
        assert_eq!(class_end(b"a", 0), Ok(1));
        assert_eq!(class_end(b"%d", 0), Ok(2));
        assert_eq!(class_end(b"[abc]", 0), Ok(5));
        assert_eq!(class_end(b"[^a-z%d]*", 0), Ok(8));
        assert_eq!(class_end(b"[%]]", 0), Ok(4));
    }

    #[test]
    fn test_set_bracket_first() {
        assert!(item_matches(b']', b"[]abc]"));
        assert!(item_matches(b'a', b"[]abc]"));
        assert!(!item_matches(b'x', b"[]abc]"));
        assert!(!item_matches(b']', b"[^]]"));
    }

    #[test]
    fn test_malformed_items() {
        assert_eq!(
            class_end(b"%", 0),
            Err(PatternError::MalformedPattern("ends with '%'"))
        );
        assert_eq!(
            class_end(b"[abc", 0),
            Err(PatternError::MalformedPattern("missing ']'"))
        );
        assert_eq!(
            class_end(b"[", 0),
            Err(PatternError::MalformedPattern("missing ']'"))
        );
        assert_eq!(
            class_end(b"[%", 0),
            Err(PatternError::MalformedPattern("missing ']'"))
        );
    }
}
