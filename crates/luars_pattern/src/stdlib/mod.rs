// Standard library modules exposed to the host
pub mod string;

pub use string::create_string_lib;
