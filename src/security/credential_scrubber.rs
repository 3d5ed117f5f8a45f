//! Free-text scrubbing for log lines and error messages.
//!
//! This module detects and replaces sensitive information in arbitrary
//! text: credentials embedded in URLs, bearer tokens, credential-like
//! key/value pairs, email addresses, UUIDs, and IP addresses. Text that
//! matches none of these patterns is preserved verbatim.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::net::Ipv6Addr;

use crate::constants::{EMAIL_PLACEHOLDER, TOKEN_PLACEHOLDER, UUID_PLACEHOLDER};
use crate::security::ip_anonymizer::{anonymize_ip, classify_ip, IpClass};

lazy_static! {
    /// URL with optional userinfo; captures scheme, host, port, remainder.
    /// A password may contain `@` or `/`, so userinfo runs to the last `@`.
    static ref URL_PATTERN: Regex = Regex::new(
        r#"(?i)\b([a-z][a-z0-9+.\-]*)://(?:[^\s/?#@:\[\]"'<>]*:[^\s?#"'<>]*@|[^\s/?#@:\[\]"'<>]+@)?(\[[0-9a-f:.]+\]|[^\s/:?#@\[\]()<>"']+)(:\d+)?([^\s)\]>"']*)"#
    ).unwrap();

    /// Userinfo directly after a scheme separator, up to its last `@`
    static ref URL_USERINFO: Regex = Regex::new(
        r#"(?i)\b([a-z][a-z0-9+.\-]*://)(?:[^\s/?#@:\[\]"'<>]*:[^\s?#"'<>]*@|[^\s/?#@:\[\]"'<>]+@)"#
    ).unwrap();

    static ref BEARER_TOKEN: Regex = Regex::new(
        r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*"
    ).unwrap();

    /// Credential-like key/value pairs (`db_password=...`, `"token": "..."`).
    /// Captures key quote, key, value; a quoted value runs to its closing quote.
    static ref CREDENTIAL_PAIR: Regex = Regex::new(
        r#"(?i)(["']?)([a-z0-9_.\-]*(?:api[_-]?key|access[_-]?token|auth[_-]?token|refresh[_-]?token|client[_-]?secret|secret|token|password|passwd|pwd))["']?\s*[:=]\s*("[^"]*"|'[^']*'|[^\s,;&"'}]+)"#
    ).unwrap();

    static ref EMAIL: Regex = Regex::new(
        r"(?i)\b[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}\b"
    ).unwrap();

    static ref UUID: Regex = Regex::new(
        r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b"
    ).unwrap();

    static ref IPV4_CANDIDATE: Regex = Regex::new(
        r"\b\d{1,3}(?:\.\d{1,3}){3}\b"
    ).unwrap();

    /// Loose IPv6 shape; candidates are confirmed by parsing
    static ref IPV6_CANDIDATE: Regex = Regex::new(
        r"(?i)[0-9a-f]{0,4}(?::[0-9a-f]{0,4}){2,7}"
    ).unwrap();
}

/// Scrub a free-text message.
///
/// # Example
///
/// ```
/// use support_bundle::security::credential_scrubber::scrub_message;
///
/// let scrubbed = scrub_message("User john.doe@example.com sent api_key=abc123");
/// assert_eq!(scrubbed, "User [EMAIL] sent api_key: [TOKEN]");
/// ```
pub fn scrub_message(input: &str) -> String {
    let text = scrub_urls(input);
    let text = BEARER_TOKEN
        .replace_all(&text, format!("Bearer {}", TOKEN_PLACEHOLDER).as_str())
        .into_owned();
    let text = scrub_credential_pairs(&text);
    let text = EMAIL.replace_all(&text, EMAIL_PLACEHOLDER).into_owned();
    let text = UUID.replace_all(&text, UUID_PLACEHOLDER).into_owned();
    let text = IPV4_CANDIDATE
        .replace_all(&text, |caps: &Captures| anonymize_ip(&caps[0]))
        .into_owned();
    scrub_ipv6(&text)
}

/// Remove `user:pass@` userinfo from every URL in `input`.
///
/// Host, port and path are kept intact; strings without credentials are
/// returned unchanged.
pub fn strip_url_credentials(input: &str) -> String {
    URL_USERINFO.replace_all(input, "$1").into_owned()
}

/// Create a safe error message that scrubs sensitive data.
pub fn safe_error_message(context: &str, error: &impl std::fmt::Display) -> String {
    scrub_message(&format!("{}: {}", context, error))
}

/// URLs lose their userinfo; URLs pointing at an IP literal are reduced to
/// scheme plus anonymized host, since port and path describe topology.
fn scrub_urls(input: &str) -> String {
    URL_PATTERN
        .replace_all(input, |caps: &Captures| {
            let scheme = &caps[1];
            let host = &caps[2];
            if classify_ip(host) != IpClass::Invalid {
                let bare = host.trim_start_matches('[').trim_end_matches(']');
                format!("{}://{}", scheme, anonymize_ip(bare))
            } else {
                let port = caps.get(3).map_or("", |m| m.as_str());
                let rest = caps.get(4).map_or("", |m| m.as_str());
                format!("{}://{}{}{}", scheme, host, port, rest)
            }
        })
        .into_owned()
}

fn scrub_credential_pairs(input: &str) -> String {
    CREDENTIAL_PAIR
        .replace_all(input, |caps: &Captures| {
            let raw_value = &caps[3];
            let quote = raw_value
                .chars()
                .next()
                .filter(|c| *c == '"' || *c == '\'')
                .map(String::from)
                .unwrap_or_default();
            let value = raw_value.trim_matches(|c: char| c == '"' || c == '\'');
            // already-redacted values and `token: Bearer ...` prefixes stay
            if value.is_empty() || value.starts_with('[') || value.eq_ignore_ascii_case("bearer") {
                caps[0].to_string()
            } else {
                format!(
                    "{q}{}{q}: {v}{}{v}",
                    &caps[2],
                    TOKEN_PLACEHOLDER,
                    q = &caps[1],
                    v = quote
                )
            }
        })
        .into_owned()
}

fn scrub_ipv6(input: &str) -> String {
    IPV6_CANDIDATE
        .replace_all(input, |caps: &Captures| {
            let m = caps.get(0).map(|m| (m.start(), m.end(), m.as_str()));
            match m {
                Some((start, end, candidate))
                    if candidate.chars().any(|c| c.is_ascii_hexdigit())
                        && is_standalone(input, start, end)
                        && candidate.parse::<Ipv6Addr>().is_ok() =>
                {
                    anonymize_ip(candidate)
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// The match is not glued to a surrounding identifier (e.g. `Foo::bar`).
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let before = text[..start].chars().next_back().map_or(false, is_word);
    let after = text[end..].chars().next().map_or(false, is_word);
    !before && !after
}
