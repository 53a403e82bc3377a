//! HTTP message value types.
//!
//! - [`uri`]: a URI value that parses, validates and re-serialises
//!   absolute and relative references without loss.
//! - [`server_request`]: rebuilds a request (method, protocol, URI,
//!   headers, body) from a CGI-style [`environment::ServerEnvironment`].
//! - [`cookies`]: `Cookie` and `Set-Cookie` header codecs.

#[macro_use]
mod macros;

mod errors;

pub mod body;
pub mod config;
pub mod cookies;
pub mod environment;
pub mod headers;
pub mod server_request;
pub mod uri;

pub use errors::*;
