// Test modules for the pattern engine and the string library bindings
mod test_find;

use crate::*;

/// Call `string.<name>` with `args` on a fresh frame of `l`.
pub(crate) fn call_string(
    l: &mut LuaState,
    name: &str,
    args: Vec<LuaValue>,
) -> LuaResult<Vec<LuaValue>> {
    let func = create_string_lib()
        .function(name)
        .unwrap_or_else(|| panic!("string.{name} is not registered"));
    l.call(&func, args)
}

/// Call `string.<name>` and return the error message it raised.
pub(crate) fn string_error(name: &str, args: Vec<LuaValue>) -> String {
    let mut l = LuaState::default();
    let err = call_string(&mut l, name, args).unwrap_err();
    assert_eq!(err, LuaError::RuntimeError);
    l.error_msg().to_string()
}

pub(crate) fn s(text: &str) -> LuaValue {
    LuaValue::from(text)
}

pub(crate) fn i(n: i64) -> LuaValue {
    LuaValue::integer(n)
}
