use ahash::AHashMap;

use super::LuaValue;

/// Hash-only Lua table; enough for gsub's table replacement.
#[derive(Debug, Default)]
pub struct LuaTable {
    hash: AHashMap<LuaValue, LuaValue>,
}

impl LuaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Floats with an exact integer value are stored under the integer key.
    fn normalize_key(key: &LuaValue) -> LuaValue {
        match *key {
            LuaValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                LuaValue::Integer(n as i64)
            }
            _ => key.clone(),
        }
    }

    pub fn raw_get(&self, key: &LuaValue) -> Option<LuaValue> {
        self.hash.get(&Self::normalize_key(key)).cloned()
    }

    /// Setting `nil` removes the key. `nil` itself is not a valid key and is ignored.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) {
        if key.is_nil() {
            return;
        }
        let key = Self::normalize_key(&key);
        if value.is_nil() {
            self.hash.remove(&key);
        } else {
            self.hash.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }
}
