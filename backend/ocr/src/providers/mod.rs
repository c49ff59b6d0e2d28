pub mod noop;
pub mod vision;
