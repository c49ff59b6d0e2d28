//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Provider
//! errors echo request URLs and headers, so their detail passes through here.

use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static QUERY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&](?:key|api_key|token)=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    QUERY_KEY_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .into_owned()
}
