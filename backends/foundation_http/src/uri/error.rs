//! URI error types.

use std::fmt;

/// Error returned when a URI string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUri {
    message: String,
}

impl InvalidUri {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the reason the URI was rejected.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvalidUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid URI: {}", self.message)
    }
}

impl std::error::Error for InvalidUri {}

/// Error returned when a single URI component handed to one of the
/// `Uri::with_*` mutators is out of its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUriParts {
    message: String,
}

impl InvalidUriParts {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the reason the component was rejected.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvalidUriParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid URI parts: {}", self.message)
    }
}

impl std::error::Error for InvalidUriParts {}

impl From<InvalidUriParts> for InvalidUri {
    fn from(value: InvalidUriParts) -> Self {
        Self::new(value.message)
    }
}
