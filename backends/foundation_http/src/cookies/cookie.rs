//! Request-side `Cookie` header.

use super::errors::{CookieError, CookieResult};
use crate::headers::Headers;

use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

pub const COOKIE_HEADER: &str = "Cookie";

static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*").expect("cookie delimiter pattern compiles"));

/// Splits a cookie header value into its non-empty segments.
pub(crate) fn split_on_delimiter(value: &str) -> Vec<&str> {
    DELIMITER
        .split(value)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Splits `name[=value]` at the first `=`, percent-decoding both halves.
pub(crate) fn split_pair(segment: &str) -> (String, Option<String>) {
    match segment.split_once('=') {
        Some((name, value)) => (decode(name), Some(decode(value))),
        None => (decode(segment), None),
    }
}

/// Form decoding: `+` reads as a space, invalid UTF-8 is replaced.
fn decode(value: &str) -> String {
    let spaced: Cow<'_, str> = if value.contains('+') {
        Cow::Owned(value.replace('+', " "))
    } else {
        Cow::Borrowed(value)
    };
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Form encoding, the inverse of `decode`: a space becomes `+`.
pub(crate) fn encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// One `name=value` pair sent by a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: Option<String>,
}

impl Cookie {
    #[must_use]
    pub fn new<N: Into<String>>(name: N, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Parses a single `name[=value]` segment.
    #[must_use]
    pub fn from_pair(segment: &str) -> Self {
        let (name, value) = split_pair(segment);
        Self { name, value }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn with_value(&self, value: Option<&str>) -> Self {
        Self {
            value: value.map(ToString::to_string),
            ..self.clone()
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            encode(&self.name),
            encode(self.value.as_deref().unwrap_or_default())
        )
    }
}

/// Parses a `Cookie` header value into its pairs, in order.
///
/// A segment without `=` yields a cookie without a value.
///
/// ```
/// use foundation_http::cookies::parse_cookie_header;
///
/// let cookies = parse_cookie_header("theme=light; sessionToken=abc%20123; flag").unwrap();
/// assert_eq!(cookies.len(), 3);
/// assert_eq!(cookies[1].value(), Some("abc 123"));
/// assert_eq!(cookies[2].name(), "flag");
/// assert_eq!(cookies[2].value(), None);
/// ```
///
/// # Errors
///
/// Returns `EmptyHeader` when the value holds no segment at all.
pub fn parse_cookie_header(value: &str) -> CookieResult<Vec<Cookie>> {
    let cookies: Vec<Cookie> = split_on_delimiter(value)
        .into_iter()
        .map(Cookie::from_pair)
        .collect();

    if cookies.is_empty() {
        return Err(CookieError::EmptyHeader(value.to_string()));
    }

    Ok(cookies)
}

/// The cookies of one request, in the order the client sent them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cookies {
    cookies: Vec<Cookie>,
}

impl Cookies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one `Cookie` header value.
    ///
    /// # Errors
    ///
    /// See [`parse_cookie_header`].
    pub fn from_header(value: &str) -> CookieResult<Self> {
        Ok(Self {
            cookies: parse_cookie_header(value)?,
        })
    }

    /// Collects the cookies of every `Cookie` header in `headers`; no such
    /// header yields an empty collection.
    ///
    /// # Errors
    ///
    /// See [`parse_cookie_header`].
    pub fn from_headers(headers: &Headers) -> CookieResult<Self> {
        let mut cookies = Vec::new();
        for value in headers.get(COOKIE_HEADER).unwrap_or_default() {
            cookies.extend(parse_cookie_header(value)?);
        }
        Ok(Self { cookies })
    }

    /// Returns the first cookie called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|cookie| cookie.name == name)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns a copy holding `cookie`, replacing a cookie of the same
    /// name in place or appending it.
    #[must_use]
    pub fn with_cookie(&self, cookie: Cookie) -> Self {
        let mut cookies = self.cookies.clone();
        match cookies.iter().position(|existing| existing.name == cookie.name) {
            Some(index) => cookies[index] = cookie,
            None => cookies.push(cookie),
        }
        Self { cookies }
    }

    #[must_use]
    pub fn without_cookie(&self, name: &str) -> Self {
        Self {
            cookies: self
                .cookies
                .iter()
                .filter(|cookie| cookie.name != name)
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Replaces the `Cookie` header of `headers` with these cookies, or
    /// removes it when there are none.
    pub fn render_into(&self, headers: &mut Headers) {
        if self.cookies.is_empty() {
            headers.remove(COOKIE_HEADER);
        } else {
            headers.set(COOKIE_HEADER, self.to_string());
        }
    }
}

impl fmt::Display for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cookie) in self.cookies.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{cookie}")?;
        }
        Ok(())
    }
}

impl FromIterator<Cookie> for Cookies {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}
