// Library registration system
// Provides a clean way to expose Rust functions as a named Lua library

use crate::lua_value::{CFunction, LuaValue};

/// A library module containing named native functions
pub struct LibraryModule {
    pub name: &'static str,
    pub entries: Vec<(&'static str, CFunction)>,
}

impl LibraryModule {
    /// Create a new library module
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<CFunction> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, func)| *func)
    }

    /// Look up a function by name, wrapped as a callable value
    pub fn function(&self, name: &str) -> Option<LuaValue> {
        self.get(name).map(LuaValue::c_function)
    }
}

/// Builder for creating library modules with functions
#[macro_export]
macro_rules! lib_module {
    ($name:expr, {
        $($item_name:expr => $item:expr),* $(,)?
    }) => {{
        let mut module = $crate::lib_registry::LibraryModule::new($name);
        $(
            module.entries.push(($item_name, $item as $crate::lua_value::CFunction));
        )*
        module
    }};
}
