//! The `scheme:` prefix of a URI.

use super::error::InvalidUriParts;
use std::fmt;

/// A scheme name.
///
/// Schemes are case-insensitive and always stored lowercase. Only `http`
/// and `https` carry a default port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scheme {
    inner: SchemeInner,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum SchemeInner {
    Http,
    Https,
    Custom(String),
}

impl Scheme {
    pub const HTTP: Scheme = Scheme {
        inner: SchemeInner::Http,
    };

    pub const HTTPS: Scheme = Scheme {
        inner: SchemeInner::Https,
    };

    /// Parses a bare scheme name such as `"HTTPS"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUriParts` if the name is empty or breaks the
    /// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` grammar.
    pub fn parse(name: &str) -> Result<Self, InvalidUriParts> {
        if !Self::is_valid_scheme(name) {
            return Err(InvalidUriParts::new(format!(
                "invalid scheme characters: {name:?}"
            )));
        }
        Ok(Self::from_valid(name))
    }

    /// Splits a leading `scheme:` off a URI reference.
    ///
    /// Returns `None` when the input is a relative reference, that is when
    /// no `:` appears before the first `/`, `?` or `#`, or when the text in
    /// front of the colon is not a valid scheme name.
    pub(crate) fn split_from_uri(uri: &str) -> Option<(Self, &str)> {
        let (name, rest) = uri.split_once(':')?;
        Self::is_valid_scheme(name).then(|| (Self::from_valid(name), rest))
    }

    fn from_valid(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "http" => Self::HTTP,
            "https" => Self::HTTPS,
            _ => Scheme {
                inner: SchemeInner::Custom(lower),
            },
        }
    }

    fn is_valid_scheme(s: &str) -> bool {
        let mut chars = s.chars();

        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match &self.inner {
            SchemeInner::Http => "http",
            SchemeInner::Https => "https",
            SchemeInner::Custom(s) => s,
        }
    }

    /// Port implied when a URI with this scheme names none.
    ///
    /// ```
    /// use foundation_http::uri::Scheme;
    ///
    /// assert_eq!(Scheme::HTTP.default_port(), Some(80));
    /// assert_eq!(Scheme::HTTPS.default_port(), Some(443));
    /// assert_eq!(Scheme::parse("ftp").unwrap().default_port(), None);
    /// ```
    #[must_use]
    pub fn default_port(&self) -> Option<u16> {
        match &self.inner {
            SchemeInner::Http => Some(80),
            SchemeInner::Https => Some(443),
            SchemeInner::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn is_http(&self) -> bool {
        matches!(self.inner, SchemeInner::Http)
    }

    #[must_use]
    pub fn is_https(&self) -> bool {
        matches!(self.inner, SchemeInner::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
