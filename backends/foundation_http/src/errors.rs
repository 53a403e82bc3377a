use crate::uri::{InvalidUri, InvalidUriParts};
use derive_more::From;

pub type ServerRequestResult<T> = std::result::Result<T, ServerRequestError>;

/// Failures while turning a server environment into a request.
#[derive(From, Debug)]
pub enum ServerRequestError {
    /// `REQUEST_METHOD` was absent; choosing a default is up to the caller.
    MissingMethod,

    InvalidUri(InvalidUri),

    InvalidUriParts(InvalidUriParts),

    #[from(ignore)]
    InvalidPort(String),

    BodyReadFailed(std::io::Error),

    /// The body was larger than the configured limit.
    #[from(ignore)]
    BodyTooLarge(usize),
}

impl std::error::Error for ServerRequestError {}

impl core::fmt::Display for ServerRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
