//! Percent-encoding filter shared by the URI components.
//!
//! Every component allows `unreserved / sub-delims` plus its own extra
//! characters. Existing `%XX` escapes pass through untouched, so filtering
//! an already filtered value is a no-op.

use super::error::InvalidUriParts;
use std::fmt::Write;

pub(crate) const PATH_EXTRA: &[char] = &[':', '@', '/'];
pub(crate) const QUERY_EXTRA: &[char] = &[':', '@', '/', '?'];
pub(crate) const USER_INFO_EXTRA: &[char] = &[':'];

fn is_unreserved_or_sub_delim(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
        )
}

/// Percent-encodes every character of `value` that is not allowed in the
/// component, keeping valid `%XX` escapes.
///
/// # Errors
///
/// ASCII control characters are rejected outright.
pub(crate) fn encode_component(value: &str, extra: &[char]) -> Result<String, InvalidUriParts> {
    let bytes = value.as_bytes();
    let mut encoded = String::with_capacity(value.len());

    for (index, c) in value.char_indices() {
        if c.is_ascii_control() {
            return Err(InvalidUriParts::new(format!(
                "control character {c:?} at offset {index}"
            )));
        }

        if is_unreserved_or_sub_delim(c) || extra.contains(&c) {
            encoded.push(c);
            continue;
        }

        if c == '%'
            && bytes.get(index + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(index + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            encoded.push(c);
            continue;
        }

        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            // writing into a String cannot fail
            let _ = write!(encoded, "%{byte:02X}");
        }
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_characters_pass_through() {
        assert_eq!(
            encode_component("/subdir/a:b@c;d=e", PATH_EXTRA).unwrap(),
            "/subdir/a:b@c;d=e"
        );
        assert_eq!(
            encode_component("test=true&x=/a?b", QUERY_EXTRA).unwrap(),
            "test=true&x=/a?b"
        );
    }

    #[test]
    fn test_disallowed_characters_are_escaped() {
        assert_eq!(encode_component("/a b", PATH_EXTRA).unwrap(), "/a%20b");
        assert_eq!(encode_component("/caf\u{e9}", PATH_EXTRA).unwrap(), "/caf%C3%A9");
        assert_eq!(encode_component("user@mail", USER_INFO_EXTRA).unwrap(), "user%40mail");
        assert_eq!(encode_component("100%", PATH_EXTRA).unwrap(), "100%25");
    }

    #[test]
    fn test_existing_escapes_are_kept() {
        let once = encode_component("/a%20b%2f", PATH_EXTRA).unwrap();
        assert_eq!(once, "/a%20b%2f");
        assert_eq!(encode_component(&once, PATH_EXTRA).unwrap(), once);
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert!(encode_component("/a\nb", PATH_EXTRA).is_err());
        assert!(encode_component("a\u{7f}", QUERY_EXTRA).is_err());
    }
}
