//! IP address classification and anonymization.
//!
//! Addresses are replaced by `<bucket>-<digest>` where the bucket tells
//! support staff what kind of address it was (loopback, private, public)
//! and the digest lets them group lines mentioning the same address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::constants::ANONYMIZED_HASH_LEN;
use crate::utils::hash::short_digest;

/// Classification bucket of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpClass {
    Loopback,
    Private,
    Public,
    Invalid,
}

impl IpClass {
    pub fn prefix(&self) -> &'static str {
        match self {
            IpClass::Loopback => "localhost",
            IpClass::Private => "private-ip",
            IpClass::Public => "public-ip",
            IpClass::Invalid => "invalid-ip",
        }
    }
}

/// Classify a textual address. Accepts bracketed IPv6 (`[::1]`).
pub fn classify_ip(input: &str) -> IpClass {
    let trimmed = input.trim().trim_start_matches('[').trim_end_matches(']');
    match trimmed.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => classify_v4(&v4),
        Ok(IpAddr::V6(v6)) => match v6.to_ipv4_mapped() {
            Some(v4) => classify_v4(&v4),
            None => classify_v6(&v6),
        },
        Err(_) => IpClass::Invalid,
    }
}

fn classify_v4(addr: &Ipv4Addr) -> IpClass {
    if addr.is_loopback() {
        IpClass::Loopback
    } else if addr.is_private() || addr.is_link_local() {
        IpClass::Private
    } else {
        IpClass::Public
    }
}

fn classify_v6(addr: &Ipv6Addr) -> IpClass {
    let first = addr.segments()[0];
    if addr.is_loopback() {
        IpClass::Loopback
    } else if first & 0xfe00 == 0xfc00 || first & 0xffc0 == 0xfe80 {
        // unique local fc00::/7, link-local fe80::/10
        IpClass::Private
    } else {
        IpClass::Public
    }
}

/// Anonymize an address into `<bucket>-<digest>`.
///
/// The digest is taken over the raw input string, including for
/// unparseable input, so the output is stable for a given input.
pub fn anonymize_ip(input: &str) -> String {
    format!(
        "{}-{}",
        classify_ip(input).prefix(),
        short_digest(input, ANONYMIZED_HASH_LEN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_prefixes() {
        let cases = [
            ("127.0.0.1", "localhost-"),
            ("::1", "localhost-"),
            ("10.0.1.100", "private-ip-"),
            ("192.168.1.1", "private-ip-"),
            ("172.16.0.1", "private-ip-"),
            ("169.254.1.1", "private-ip-"),
            ("fe80::1", "private-ip-"),
            ("fd12:3456::1", "private-ip-"),
            ("::ffff:192.168.0.1", "private-ip-"),
            ("8.8.8.8", "public-ip-"),
            ("203.0.113.42", "public-ip-"),
            ("2001:4860:4860::8888", "public-ip-"),
            ("not.an.ip", "invalid-ip-"),
            ("999.1.1.1", "invalid-ip-"),
            ("", "invalid-ip-"),
        ];
        for (input, prefix) in cases {
            let result = anonymize_ip(input);
            assert!(
                result.starts_with(prefix),
                "expected {prefix} prefix for {input:?}, got {result}"
            );
        }
    }

    #[test]
    fn test_suffix_is_stable() {
        for input in ["10.0.1.100", "8.8.8.8", "not.an.ip", "::1"] {
            assert_eq!(anonymize_ip(input), anonymize_ip(input));
        }
        assert_ne!(anonymize_ip("10.0.0.1"), anonymize_ip("10.0.0.2"));
    }

    #[test]
    fn test_suffix_length() {
        let result = anonymize_ip("192.168.1.1");
        let suffix = result.trim_start_matches("private-ip-");
        assert_eq!(suffix.len(), ANONYMIZED_HASH_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_bracketed_ipv6() {
        assert_eq!(classify_ip("[::1]"), IpClass::Loopback);
    }
}
