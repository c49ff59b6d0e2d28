pub mod dictionary;
pub mod noop;
