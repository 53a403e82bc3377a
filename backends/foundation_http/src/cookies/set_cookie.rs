//! Response-side `Set-Cookie` header.

use super::cookie::{encode, split_on_delimiter, split_pair};
use super::errors::{CookieError, CookieResult};
use super::expires::{format_expires, Expires};
use crate::headers::Headers;

use chrono::{DateTime, Months, Utc};
use std::fmt;
use std::str::FromStr;

pub const SET_COOKIE_HEADER: &str = "Set-Cookie";

const FIVE_YEARS: Months = Months::new(60);

/// Attributes understood after the leading `name=value` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attribute {
    Expires,
    MaxAge,
    Domain,
    Path,
    Secure,
    HttpOnly,
}

impl Attribute {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "expires" => Some(Self::Expires),
            "max-age" => Some(Self::MaxAge),
            "domain" => Some(Self::Domain),
            "path" => Some(Self::Path),
            "secure" => Some(Self::Secure),
            "httponly" => Some(Self::HttpOnly),
            _ => None,
        }
    }

    fn apply(self, cookie: SetCookie, value: Option<&str>) -> CookieResult<SetCookie> {
        Ok(match self {
            Self::Expires => match value {
                Some(value) => cookie.with_expires(value)?,
                None => cookie.without_expires(),
            },
            Self::MaxAge => cookie.with_max_age(Some(parse_max_age(value))),
            Self::Domain => cookie.with_domain(value),
            Self::Path => cookie.with_path(value),
            Self::Secure => cookie.with_secure(true),
            Self::HttpOnly => cookie.with_http_only(true),
        })
    }
}

fn parse_max_age(value: Option<&str>) -> i64 {
    match value.map(|value| value.trim().parse::<i64>()) {
        Some(Ok(max_age)) => max_age,
        _ => {
            warn!("treating unparseable Max-Age {:?} as unset", value);
            0
        }
    }
}

/// A cookie as sent by a server.
///
/// `expires` is a Unix timestamp and `max_age` a number of seconds; `0`
/// means unset for both, and unset values are never rendered. Every
/// `with_*` method returns a new cookie.
///
/// ```
/// use foundation_http::cookies::SetCookie;
///
/// let cookie = SetCookie::create("lu", Some("Rg3vHJZnehYLjVg7qi3bZjzg"))
///     .unwrap()
///     .with_domain(Some(".example.com"))
///     .with_path(Some("/"))
///     .with_max_age(Some(500))
///     .with_http_only(true);
///
/// assert_eq!(
///     cookie.to_string(),
///     "lu=Rg3vHJZnehYLjVg7qi3bZjzg; Domain=.example.com; Path=/; Max-Age=500; HttpOnly"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: Option<String>,
    expires: i64,
    max_age: i64,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl SetCookie {
    /// Creates a cookie with no attributes.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for an empty `name`.
    pub fn create<N: Into<String>>(name: N, value: Option<&str>) -> CookieResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CookieError::EmptyName(name));
        }

        Ok(Self {
            name,
            value: value.map(ToString::to_string),
            expires: 0,
            max_age: 0,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
        })
    }

    /// Creates a cookie expiring five years from now.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for an empty `name`.
    pub fn create_remembered_forever<N: Into<String>>(
        name: N,
        value: Option<&str>,
    ) -> CookieResult<Self> {
        Ok(Self::create(name, value)?.remember_forever())
    }

    /// Creates a valueless cookie that expired five years ago, telling the
    /// client to drop it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for an empty `name`.
    pub fn create_expired<N: Into<String>>(name: N) -> CookieResult<Self> {
        Ok(Self::create(name, None)?.expire())
    }

    /// Parses a `Set-Cookie` header value.
    ///
    /// The first segment is the `name[=value]` pair; later segments are
    /// attributes matched without regard to case, and unknown ones are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHeader` when there is no segment, `EmptyName` when the
    /// pair has no name and `InvalidExpires` for an unreadable `Expires`.
    pub fn parse(value: &str) -> CookieResult<Self> {
        let mut segments = split_on_delimiter(value).into_iter();

        let Some(pair) = segments.next() else {
            return Err(CookieError::EmptyHeader(value.to_string()));
        };

        let (name, cookie_value) = split_pair(pair);
        if name.is_empty() {
            return Err(CookieError::EmptyName(value.to_string()));
        }

        let mut cookie = Self::create(name, cookie_value.as_deref())?;

        for segment in segments {
            let (key, attribute_value) = match segment.split_once('=') {
                Some((key, attribute_value)) => (key, Some(attribute_value)),
                None => (segment, None),
            };

            match Attribute::from_key(key) {
                Some(attribute) => cookie = attribute.apply(cookie, attribute_value)?,
                None => debug!("ignoring unknown cookie attribute {}", key),
            }
        }

        Ok(cookie)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Unix timestamp of the expiry, `0` when unset.
    #[must_use]
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// The expiry as a date, when set and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires == 0 {
            return None;
        }
        DateTime::from_timestamp(self.expires, 0)
    }

    #[must_use]
    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    #[must_use]
    pub fn with_value(&self, value: Option<&str>) -> Self {
        Self {
            value: value.map(ToString::to_string),
            ..self.clone()
        }
    }

    /// Sets the expiry from a date, a timestamp or header text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpires` when text cannot be read as a date or the
    /// timestamp falls outside the range a date can render.
    pub fn with_expires<E: Into<Expires>>(&self, expires: E) -> CookieResult<Self> {
        let expires = expires.into().resolve()?;
        Ok(Self {
            expires,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn without_expires(&self) -> Self {
        Self {
            expires: 0,
            ..self.clone()
        }
    }

    /// Expires five years from now.
    #[must_use]
    pub fn remember_forever(&self) -> Self {
        let now = Utc::now();
        let at = now.checked_add_months(FIVE_YEARS).unwrap_or(now);
        Self {
            expires: at.timestamp(),
            ..self.clone()
        }
    }

    /// Expired five years ago.
    #[must_use]
    pub fn expire(&self) -> Self {
        let now = Utc::now();
        let at = now.checked_sub_months(FIVE_YEARS).unwrap_or(now);
        Self {
            expires: at.timestamp(),
            ..self.clone()
        }
    }

    /// `None` unsets the max age.
    #[must_use]
    pub fn with_max_age(&self, max_age: Option<i64>) -> Self {
        Self {
            max_age: max_age.unwrap_or_default(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_path(&self, path: Option<&str>) -> Self {
        Self {
            path: path.map(ToString::to_string),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_domain(&self, domain: Option<&str>) -> Self {
        Self {
            domain: domain.map(ToString::to_string),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_secure(&self, secure: bool) -> Self {
        Self {
            secure,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_http_only(&self, http_only: bool) -> Self {
        Self {
            http_only,
            ..self.clone()
        }
    }
}

/// Renders `name=value; Domain; Path; Expires; Max-Age; Secure; HttpOnly`,
/// leaving out unset and empty attributes.
impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            encode(&self.name),
            encode(self.value.as_deref().unwrap_or_default())
        )?;

        if let Some(domain) = self.domain.as_deref().filter(|domain| !domain.is_empty()) {
            write!(f, "; Domain={domain}")?;
        }

        if let Some(path) = self.path.as_deref().filter(|path| !path.is_empty()) {
            write!(f, "; Path={path}")?;
        }

        if self.expires != 0 {
            if let Some(expires) = format_expires(self.expires) {
                write!(f, "; Expires={expires}")?;
            }
        }

        if self.max_age != 0 {
            write!(f, "; Max-Age={}", self.max_age)?;
        }

        if self.secure {
            f.write_str("; Secure")?;
        }

        if self.http_only {
            f.write_str("; HttpOnly")?;
        }

        Ok(())
    }
}

impl FromStr for SetCookie {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses a `Set-Cookie` header value.
///
/// # Errors
///
/// See [`SetCookie::parse`].
pub fn parse_set_cookie(value: &str) -> CookieResult<SetCookie> {
    SetCookie::parse(value)
}

/// The `Set-Cookie` headers of one response, keyed by cookie name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetCookies {
    set_cookies: Vec<SetCookie>,
}

impl SetCookies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every `Set-Cookie` header of `headers`.
    ///
    /// # Errors
    ///
    /// Fails on the first value [`SetCookie::parse`] rejects.
    pub fn from_headers(headers: &Headers) -> CookieResult<Self> {
        headers
            .get(SET_COOKIE_HEADER)
            .unwrap_or_default()
            .iter()
            .map(|value| SetCookie::parse(value))
            .collect::<CookieResult<Vec<_>>>()
            .map(|set_cookies| set_cookies.into_iter().collect())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SetCookie> {
        self.set_cookies.iter().find(|cookie| cookie.name == name)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns a copy holding `set_cookie`, replacing the cookie of the
    /// same name in place or appending it.
    #[must_use]
    pub fn with(&self, set_cookie: SetCookie) -> Self {
        let mut set_cookies = self.set_cookies.clone();
        match set_cookies
            .iter()
            .position(|existing| existing.name == set_cookie.name)
        {
            Some(index) => set_cookies[index] = set_cookie,
            None => set_cookies.push(set_cookie),
        }
        Self { set_cookies }
    }

    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        Self {
            set_cookies: self
                .set_cookies
                .iter()
                .filter(|cookie| cookie.name != name)
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SetCookie> {
        self.set_cookies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set_cookies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set_cookies.is_empty()
    }

    /// Replaces all `Set-Cookie` headers of `headers`, one header per cookie.
    pub fn render_into(&self, headers: &mut Headers) {
        headers.remove(SET_COOKIE_HEADER);
        for set_cookie in &self.set_cookies {
            headers.append(SET_COOKIE_HEADER, set_cookie.to_string());
        }
    }
}

/// Later cookies replace earlier ones of the same name.
impl FromIterator<SetCookie> for SetCookies {
    fn from_iter<T: IntoIterator<Item = SetCookie>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set_cookies, set_cookie| set_cookies.with(set_cookie))
    }
}
