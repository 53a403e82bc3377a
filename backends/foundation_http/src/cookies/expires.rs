//! Cookie expiry values.

use super::errors::{CookieError, CookieResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format of the `Expires` attribute on output, e.g.
/// `Tue, 15 Jan 2013 21:47:38 GMT`.
pub const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Date-time layouts accepted besides RFC 2822 and RFC 3339.
const DATE_TIME_FORMATS: [&str; 4] = [
    // RFC 850
    "%A, %d-%b-%y %H:%M:%S GMT",
    // Netscape
    "%a, %d-%b-%Y %H:%M:%S GMT",
    // asctime
    "%a %b %e %H:%M:%S %Y",
    "%Y-%m-%d %H:%M:%S",
];

/// Anything a cookie's expiry can be set from.
///
/// Every variant resolves to a Unix timestamp, where `0` means the cookie
/// carries no expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expires {
    At(DateTime<Utc>),
    Timestamp(i64),
    /// An epoch number or a date string, as found in a `Set-Cookie` header.
    Text(String),
}

impl Expires {
    /// Resolves the value to a Unix timestamp.
    ///
    /// ```
    /// use foundation_http::cookies::Expires;
    ///
    /// let expires = Expires::from("Tue, 15 Jan 2013 21:47:38 GMT");
    /// assert_eq!(expires.resolve().unwrap(), 1_358_286_458);
    /// assert_eq!(Expires::from("1358286458").resolve().unwrap(), 1_358_286_458);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpires` for text that is neither numeric nor a
    /// recognised date, and for epochs outside the range a date can render.
    pub fn resolve(&self) -> CookieResult<i64> {
        match self {
            Expires::At(at) => Ok(at.timestamp()),
            Expires::Timestamp(timestamp) => representable(*timestamp, || timestamp.to_string()),
            Expires::Text(text) => {
                parse_expires(text).and_then(|timestamp| representable(timestamp, || text.clone()))
            }
        }
    }
}

fn representable(timestamp: i64, source: impl FnOnce() -> String) -> CookieResult<i64> {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(_) => Ok(timestamp),
        None => Err(CookieError::InvalidExpires(source())),
    }
}

impl From<DateTime<Utc>> for Expires {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value)
    }
}

impl From<i64> for Expires {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for Expires {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Expires {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn parse_expires(text: &str) -> CookieResult<i64> {
    let trimmed = text.trim();

    if let Ok(timestamp) = trimmed.parse::<i64>() {
        return Ok(timestamp);
    }

    if let Ok(timestamp) = trimmed.parse::<f64>() {
        if timestamp.is_finite() {
            #[allow(clippy::cast_possible_truncation)]
            return Ok(timestamp.trunc() as i64);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(parsed.timestamp());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.timestamp());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc().timestamp());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc().timestamp());
    }

    Err(CookieError::InvalidExpires(text.to_string()))
}

/// Renders a timestamp in [`EXPIRES_FORMAT`], or `None` when chrono cannot
/// represent it.
#[must_use]
pub fn format_expires(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|at| at.format(EXPIRES_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_numeric_expires() {
        assert_eq!(Expires::from(" 42 ").resolve().unwrap(), 42);
        assert_eq!(Expires::from("42.9").resolve().unwrap(), 42);
        assert_eq!(Expires::from(-5_i64).resolve().unwrap(), -5);
    }

    #[test]
    fn test_date_formats() {
        let expected = Utc
            .with_ymd_and_hms(1994, 11, 6, 8, 49, 37)
            .unwrap()
            .timestamp();

        for text in [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "1994-11-06T08:49:37Z",
            "1994-11-06 08:49:37",
        ] {
            assert_eq!(Expires::from(text).resolve().unwrap(), expected, "{text}");
        }

        let midnight = Utc.with_ymd_and_hms(1994, 11, 6, 0, 0, 0).unwrap();
        assert_eq!(
            Expires::from("1994-11-06").resolve().unwrap(),
            midnight.timestamp()
        );
        assert_eq!(Expires::from(midnight).resolve().unwrap(), midnight.timestamp());
    }

    #[test]
    fn test_invalid_expires() {
        assert_eq!(
            Expires::from("someday").resolve(),
            Err(CookieError::InvalidExpires("someday".into()))
        );
        assert!(Expires::from("inf").resolve().is_err());
    }

    #[test]
    fn test_unrenderable_epochs_are_rejected() {
        assert_eq!(
            Expires::from("99999999999999999").resolve(),
            Err(CookieError::InvalidExpires("99999999999999999".into()))
        );
        assert!(Expires::from("1e300").resolve().is_err());
        assert_eq!(
            Expires::from(i64::MIN).resolve(),
            Err(CookieError::InvalidExpires(i64::MIN.to_string()))
        );
    }

    #[test]
    fn test_format_expires() {
        assert_eq!(
            format_expires(1_358_286_458).as_deref(),
            Some("Tue, 15 Jan 2013 21:47:38 GMT")
        );
        assert_eq!(format_expires(i64::MAX), None);
    }
}
