//! Ordered, case-insensitive header mapping.

use std::fmt;

/// Header name to values mapping.
///
/// Lookups ignore ASCII case, the casing first seen for a name is the one
/// kept for display, and entries iterate in insertion order. Appending to
/// an existing name adds a value instead of replacing it.
///
/// ```
/// use foundation_http::headers::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Content-Type", "text/plain");
/// headers.append("x-forwarded-for", "10.0.0.1");
/// headers.append("X-Forwarded-For", "10.0.0.2");
///
/// assert_eq!(headers.get_line("content-type").as_deref(), Some("text/plain"));
/// assert_eq!(headers.get("X-FORWARDED-FOR").unwrap().len(), 2);
/// assert_eq!(headers.names().collect::<Vec<_>>(), vec!["Content-Type", "x-forwarded-for"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Adds a value under `name`, after any values already present.
    pub fn append<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name, vec![value.into()])),
        }
    }

    /// Replaces every value under `name`. An existing entry keeps its
    /// position and original casing.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = vec![value.into()],
            None => self.entries.push((name, vec![value.into()])),
        }
    }

    /// Removes `name` and returns its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|index| self.entries.remove(index).1)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .map(|index| self.entries[index].1.as_slice())
    }

    /// Returns all values under `name` joined by `", "`.
    #[must_use]
    pub fn get_line(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(", "))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Header names in insertion order, with their first-seen casing.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// Renders one `Name: value` line per value.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.entries {
            for value in values {
                writeln!(f, "{name}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_first_casing() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.names().next(), Some("Set-Cookie"));
        assert_eq!(headers.get("SET-COOKIE").unwrap(), ["a=1", "b=2"]);
        assert_eq!(headers.get_line("set-cookie").as_deref(), Some("a=1, b=2"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers: Headers = [("host", "a.tld"), ("accept", "*/*")].into_iter().collect();
        headers.set("HOST", "b.tld");

        assert_eq!(headers.names().collect::<Vec<_>>(), ["host", "accept"]);
        assert_eq!(headers.get_line("Host").as_deref(), Some("b.tld"));
    }

    #[test]
    fn test_remove_and_missing() {
        let mut headers: Headers = [("content-length", "128")].into_iter().collect();
        assert!(headers.contains("Content-Length"));
        assert_eq!(headers.remove("CONTENT-LENGTH"), Some(vec!["128".to_string()]));
        assert!(headers.is_empty());
        assert_eq!(headers.get("content-length"), None);
        assert_eq!(headers.remove("content-length"), None);
    }

    #[test]
    fn test_display_lines() {
        let headers: Headers = [("a", "1"), ("b", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(headers.to_string(), "a: 1\na: 3\nb: 2\n");
    }
}
