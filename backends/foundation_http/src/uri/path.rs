//! URI path, query and fragment components.

use super::encoding::{encode_component, PATH_EXTRA, QUERY_EXTRA};
use super::error::InvalidUriParts;
use std::fmt;

/// Path and query of a URI, the request target sent on the request line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathAndQuery {
    /// Never empty, at least `/`
    path: String,
    /// Query without the leading `?`
    query: Option<String>,
}

impl PathAndQuery {
    pub(crate) fn new(path: &str, query: Option<&str>) -> Self {
        let path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        Self {
            path,
            query: query.map(ToString::to_string),
        }
    }

    /// Returns the path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query component if present.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Display for PathAndQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Validates and percent-encodes a path.
///
/// A literal `?` or `#` would change the shape of the URI and is rejected.
pub(crate) fn filter_path(path: &str) -> Result<String, InvalidUriParts> {
    if let Some(c) = path.chars().find(|c| matches!(c, '?' | '#')) {
        return Err(InvalidUriParts::new(format!(
            "path must not contain {c:?}: {path}"
        )));
    }
    encode_component(path, PATH_EXTRA)
}

/// Validates and percent-encodes a query. An empty query maps to `None`.
pub(crate) fn filter_query(query: &str) -> Result<Option<String>, InvalidUriParts> {
    if query.contains('#') {
        return Err(InvalidUriParts::new(format!(
            "query must not contain '#': {query}"
        )));
    }
    let encoded = encode_component(query, QUERY_EXTRA)?;
    Ok(Some(encoded).filter(|q| !q.is_empty()))
}

/// Percent-encodes a fragment. An empty fragment maps to `None`.
pub(crate) fn filter_fragment(fragment: &str) -> Result<Option<String>, InvalidUriParts> {
    let encoded = encode_component(fragment, QUERY_EXTRA)?;
    Ok(Some(encoded).filter(|f| !f.is_empty()))
}
