//! Structured logging for pinyinlens.
//!
//! Console output (pretty or JSON), optional daily-rolling NDJSON files, and
//! redaction of credentials that can leak through provider error strings.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogFormat};
pub use redact::redact_sensitive_data;
