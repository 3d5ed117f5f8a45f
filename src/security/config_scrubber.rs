//! Structured configuration scrubbing.
//!
//! Walks configuration of unknown shape and redacts every value stored
//! under a sensitive key. Values are viewed through [`Node`], a closed set
//! of variants (scalar, sequence, map), and scrubbed by dispatching on it.

use serde_json::{Map, Value};

use crate::constants::REDACTED;
use crate::security::credential_scrubber::strip_url_credentials;

/// Key substrings treated as sensitive when no list is configured.
pub fn default_sensitive_keys() -> Vec<String> {
    [
        "password",
        "passwd",
        "secret",
        "token",
        "api_key",
        "apikey",
        "access_key",
        "private_key",
        "credential",
        "auth_key",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

/// Structural view of a configuration value.
enum Node<'a> {
    Scalar(&'a Value),
    Sequence(&'a [Value]),
    Map(&'a Map<String, Value>),
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Node::Sequence(items),
            Value::Object(map) => Node::Map(map),
            scalar => Node::Scalar(scalar),
        }
    }
}

/// Redacts sensitive keys in nested configuration.
#[derive(Debug, Clone)]
pub struct ConfigScrubber {
    sensitive_keys: Vec<String>,
}

impl Default for ConfigScrubber {
    fn default() -> Self {
        Self::new(default_sensitive_keys())
    }
}

impl ConfigScrubber {
    pub fn new<I, S>(sensitive_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensitive_keys: sensitive_keys
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against the sensitive key list.
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_keys.iter().any(|s| key.contains(s.as_str()))
    }

    /// Return a scrubbed copy of `value`.
    pub fn scrub(&self, value: &Value) -> Value {
        match Node::from(value) {
            Node::Map(map) => Value::Object(self.scrub_map(map)),
            Node::Sequence(items) => Value::Array(self.scrub_sequence(items)),
            Node::Scalar(scalar) => self.scrub_scalar(scalar),
        }
    }

    fn scrub_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let scrubbed = if self.is_sensitive_key(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    self.scrub(value)
                };
                (key.clone(), scrubbed)
            })
            .collect()
    }

    fn scrub_sequence(&self, items: &[Value]) -> Vec<Value> {
        items.iter().map(|item| self.scrub(item)).collect()
    }

    /// Strings lose embedded URL credentials; other scalars pass through.
    fn scrub_scalar(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(strip_url_credentials(s)),
            other => other.clone(),
        }
    }
}
