use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::{CClosure, CFunction, LuaTable};

/// A host value. Strings are byte strings, as in Lua.
#[derive(Debug, Clone, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(Rc<[u8]>),
    Table(Rc<RefCell<LuaTable>>),
    Function(Rc<CClosure>),
}

impl LuaValue {
    #[inline(always)]
    pub fn nil() -> Self {
        LuaValue::Nil
    }

    #[inline(always)]
    pub fn boolean(b: bool) -> Self {
        LuaValue::Boolean(b)
    }

    #[inline(always)]
    pub fn integer(i: i64) -> Self {
        LuaValue::Integer(i)
    }

    #[inline(always)]
    pub fn number(n: f64) -> Self {
        LuaValue::Number(n)
    }

    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        LuaValue::String(Rc::from(bytes.as_ref()))
    }

    pub fn table(table: LuaTable) -> Self {
        LuaValue::Table(Rc::new(RefCell::new(table)))
    }

    pub fn c_function(func: CFunction) -> Self {
        Self::c_closure(func, Vec::new())
    }

    pub fn c_closure(func: CFunction, upvalues: Vec<LuaValue>) -> Self {
        LuaValue::Function(Rc::new(CClosure::new(func, upvalues)))
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Everything except `nil` and `false` is true.
    #[inline(always)]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    #[inline(always)]
    pub fn is_function(&self) -> bool {
        matches!(self, LuaValue::Function(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            LuaValue::Integer(i) => Some(i),
            LuaValue::Number(n)
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
            {
                Some(n as i64)
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            LuaValue::Integer(i) => Some(i as f64),
            LuaValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_cclosure(&self) -> Option<&Rc<CClosure>> {
        match self {
            LuaValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// String form used where Lua coerces numbers to strings.
    /// `None` for anything that is neither a string nor a number.
    pub fn to_str_bytes(&self) -> Option<Rc<[u8]>> {
        match self {
            LuaValue::String(s) => Some(s.clone()),
            LuaValue::Integer(i) => Some(Rc::from(itoa::Buffer::new().format(*i).as_bytes())),
            LuaValue::Number(n) => Some(Rc::from(number_to_string(*n).as_bytes())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LuaValue::Nil => "nil",
            LuaValue::Boolean(_) => "boolean",
            LuaValue::Integer(_) | LuaValue::Number(_) => "number",
            LuaValue::String(_) => "string",
            LuaValue::Table(_) => "table",
            LuaValue::Function(_) => "function",
        }
    }
}

/// Format a float like Lua's `%.14g`, keeping a `.0` on integral values.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sci = format!("{:.13e}", n);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mut s = if !(-4..14).contains(&exp) {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (13 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    };
    if !s.contains(['.', 'e']) {
        s.push_str(".0");
    }
    s
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Integer(a), LuaValue::Integer(b)) => a == b,
            (LuaValue::Number(a), LuaValue::Number(b)) => a.to_bits() == b.to_bits(),
            (LuaValue::String(a), LuaValue::String(b)) => a == b,
            (LuaValue::Table(a), LuaValue::Table(b)) => Rc::ptr_eq(a, b),
            (LuaValue::Function(a), LuaValue::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for LuaValue {}

impl Hash for LuaValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LuaValue::Nil => {}
            LuaValue::Boolean(b) => b.hash(state),
            LuaValue::Integer(i) => i.hash(state),
            LuaValue::Number(n) => n.to_bits().hash(state),
            LuaValue::String(s) => s.hash(state),
            LuaValue::Table(t) => std::ptr::hash(Rc::as_ptr(t), state),
            LuaValue::Function(f) => std::ptr::hash(Rc::as_ptr(f), state),
        }
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::string(s)
    }
}

impl From<i64> for LuaValue {
    fn from(i: i64) -> Self {
        LuaValue::Integer(i)
    }
}

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1.0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(-2.25), "-2.25");
        assert_eq!(number_to_string(0.1 + 0.2), "0.3");
        assert_eq!(number_to_string(1e100), "1e+100");
        assert_eq!(number_to_string(f64::INFINITY), "inf");
    }

    #[test]
    fn test_coercions() {
        assert_eq!(LuaValue::integer(42).to_str_bytes().as_deref(), Some(&b"42"[..]));
        assert_eq!(LuaValue::number(3.0).as_integer(), Some(3));
        assert_eq!(LuaValue::number(3.5).as_integer(), None);
        assert!(LuaValue::boolean(true).to_str_bytes().is_none());
        assert!(!LuaValue::nil().is_truthy());
        assert!(LuaValue::integer(0).is_truthy());
    }
}
