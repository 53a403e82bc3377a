//! Server environment snapshot.
//!
//! The gateway (CGI, FastCGI, an embedding server) hands over request
//! metadata as flat string variables. [`ServerEnvironment`] holds one
//! such snapshot; it is always passed explicitly and never read from the
//! process environment behind the caller's back.

use std::collections::BTreeMap;

/// Flat, string-keyed snapshot of gateway variables.
///
/// A key may be present with a null value (a variable the gateway
/// declared but did not fill). Null entries read as absent through
/// [`ServerEnvironment::get`] and still count for
/// [`ServerEnvironment::contains_key`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerEnvironment {
    vars: BTreeMap<String, Option<String>>,
}

impl ServerEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from an explicit list of variables, for example
    /// `std::env::vars()` collected by the caller.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        vars.into_iter().collect()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.vars.insert(key.into(), Some(value.into()));
    }

    /// Declares `key` without a value.
    pub fn insert_null<K: Into<String>>(&mut self, key: K) {
        self.vars.insert(key.into(), None);
    }

    /// Returns the value of `key` when it is present and not null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(Option::as_deref)
    }

    /// True when `key` exists, null or not.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Iterates every entry in key order, null values included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ServerEnvironment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut env = ServerEnvironment::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

/// Gateway truthiness: an empty string and `"0"` both read as false.
#[must_use]
pub fn is_falsy(value: &str) -> bool {
    value.is_empty() || value == "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_entries_exist_but_have_no_value() {
        let mut env = ServerEnvironment::from_vars([("REQUEST_METHOD", "POST")]);
        env.insert_null("HTTP_INVALID");

        assert_eq!(env.len(), 2);
        assert!(env.contains_key("HTTP_INVALID"));
        assert_eq!(env.get("HTTP_INVALID"), None);
        assert_eq!(env.get("REQUEST_METHOD"), Some("POST"));
        assert_eq!(env.get("MISSING"), None);
        assert!(!env.contains_key("MISSING"));
    }

    #[test]
    fn test_iter_includes_nulls_in_key_order() {
        let mut env = ServerEnvironment::new();
        env.insert("B", "2");
        env.insert_null("A");

        let entries: Vec<_> = env.iter().collect();
        assert_eq!(entries, vec![("A", None), ("B", Some("2"))]);
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(""));
        assert!(is_falsy("0"));
        assert!(!is_falsy("00"));
        assert!(!is_falsy("false"));
    }
}
