use derive_more::From;

pub type CookieResult<T> = std::result::Result<T, CookieError>;

/// Failures while parsing cookie headers.
///
/// Each variant carries the offending input.
#[derive(From, Debug, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// The header held no `name[=value]` segment at all.
    #[from(ignore)]
    EmptyHeader(String),

    #[from(ignore)]
    EmptyName(String),

    /// An `Expires` value that is neither an epoch nor a known date format.
    #[from(ignore)]
    InvalidExpires(String),
}

impl std::error::Error for CookieError {}

impl core::fmt::Display for CookieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
