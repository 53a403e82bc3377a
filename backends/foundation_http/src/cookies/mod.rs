//! `Cookie` and `Set-Cookie` header codecs.
//!
//! Both grammars share the same segment splitting: `;` followed by
//! optional whitespace, with empty segments dropped. Names and values are
//! percent-decoded on the way in and percent-encoded on the way out;
//! attribute values are kept verbatim.

mod cookie;
mod errors;
mod expires;
mod set_cookie;

pub use cookie::*;
pub use errors::*;
pub use expires::*;
pub use set_cookie::*;
