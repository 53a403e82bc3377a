//! `[userinfo@]host[:port]`.

use super::encoding::{encode_component, USER_INFO_EXTRA};
use super::error::{InvalidUri, InvalidUriParts};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// The authority of a URI.
///
/// A `Uri` hands these out with the
/// port already cleared when it equals the scheme default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authority {
    userinfo: Option<String>,
    host: Host,
    port: Option<u16>,
}

/// A host: an IP literal or a registered name, the latter kept lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Host {
    Ipv4(Ipv4Addr),
    /// Written in brackets inside a URI.
    Ipv6(Ipv6Addr),
    RegName(String),
}

impl Authority {
    pub(crate) fn new(userinfo: Option<String>, host: Host, port: Option<u16>) -> Self {
        Self {
            userinfo,
            host,
            port,
        }
    }

    /// Parses the text found between `//` and the start of the path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUri` if the host is empty or malformed, or the port
    /// is not a number in `1..=65535`.
    pub(crate) fn parse(s: &str) -> Result<Self, InvalidUri> {
        let (userinfo, rest) = match s.rsplit_once('@') {
            Some(("", rest)) => (None, rest),
            Some((userinfo, rest)) => (
                Some(encode_component(userinfo, USER_INFO_EXTRA).map_err(InvalidUri::from)?),
                rest,
            ),
            None => (None, s),
        };

        let (host, port) = Self::parse_host_port(rest)?;

        Ok(Authority {
            userinfo,
            host,
            port,
        })
    }

    fn parse_host_port(s: &str) -> Result<(Host, Option<u16>), InvalidUri> {
        if s.starts_with('[') {
            let literal_end = s
                .find(']')
                .ok_or_else(|| InvalidUri::new(format!("unterminated IP literal: {s}")))?;

            let host = Host::parse(&s[..=literal_end])?;

            let port = match &s[literal_end + 1..] {
                "" => None,
                rest => match rest.strip_prefix(':') {
                    Some(port) => Some(parse_port(port)?),
                    None => return Err(InvalidUri::new(format!("junk after IP literal: {rest}"))),
                },
            };

            return Ok((host, port));
        }

        let (host_part, port) = match s.rfind(':') {
            Some(colon_pos) => (&s[..colon_pos], Some(parse_port(&s[colon_pos + 1..])?)),
            None => (s, None),
        };

        if host_part.is_empty() {
            return Err(InvalidUri::new("empty host"));
        }

        Ok((Host::parse(host_part)?, port))
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Percent-encoded `user[:password]`.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Host, Option<u16>) {
        (self.userinfo, self.host, self.port)
    }
}

/// Parses a port, rejecting anything outside `1..=65535`.
pub(crate) fn parse_port(s: &str) -> Result<u16, InvalidUri> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidUri::new(format!("invalid port: {s:?}")));
    }

    match s.parse::<u16>() {
        Ok(0) | Err(_) => Err(InvalidUri::new(format!("port out of range: {s}"))),
        Ok(port) => Ok(port),
    }
}

impl Host {
    /// Parses a host: a dotted IPv4 address, a bracketed (or bare) IPv6
    /// address, or a registered name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUriParts` for an empty host, a malformed IPv6
    /// literal, or a registered name containing characters outside
    /// `unreserved / pct-encoded / sub-delims`.
    pub fn parse(s: &str) -> Result<Self, InvalidUriParts> {
        if s.is_empty() {
            return Err(InvalidUriParts::new("empty host"));
        }

        if let Some(inner) = s.strip_prefix('[') {
            let ipv6_str = inner
                .strip_suffix(']')
                .ok_or_else(|| InvalidUriParts::new("unclosed IPv6 bracket"))?;
            return ipv6_str
                .parse::<Ipv6Addr>()
                .map(Host::Ipv6)
                .map_err(|_| InvalidUriParts::new(format!("invalid IPv6 address: {ipv6_str}")));
        }

        if let Ok(ipv4) = s.parse::<Ipv4Addr>() {
            return Ok(Host::Ipv4(ipv4));
        }

        if s.contains(':') {
            return s
                .parse::<Ipv6Addr>()
                .map(Host::Ipv6)
                .map_err(|_| InvalidUriParts::new(format!("invalid host: {s}")));
        }

        Self::validate_reg_name(s)?;
        Ok(Host::RegName(s.to_ascii_lowercase()))
    }

    /// Allows: unreserved / pct-encoded / sub-delims
    fn validate_reg_name(s: &str) -> Result<(), InvalidUriParts> {
        for c in s.chars() {
            if !(c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '-' | '.'
                        | '_'
                        | '~'
                        | '!'
                        | '$'
                        | '&'
                        | '\''
                        | '('
                        | ')'
                        | '*'
                        | '+'
                        | ','
                        | ';'
                        | '='
                        | '%'
                ))
            {
                return Err(InvalidUriParts::new(format!(
                    "invalid host character: {c:?}"
                )));
            }
        }
        Ok(())
    }

    /// Returns the registered name, or `None` for IP addresses.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Host::Ipv4(_) | Host::Ipv6(_) => None,
            Host::RegName(name) => Some(name),
        }
    }

    #[must_use]
    pub fn is_ip_addr(&self) -> bool {
        matches!(self, Host::Ipv4(_) | Host::Ipv6(_))
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(userinfo) = &self.userinfo {
            write!(f, "{userinfo}@")?;
        }

        write!(f, "{}", self.host)?;

        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }

        Ok(())
    }
}

/// IPv6 addresses render bracketed, as they appear inside a URI.
impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ipv4(addr) => write!(f, "{addr}"),
            Host::Ipv6(addr) => write!(f, "[{addr}]"),
            Host::RegName(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_authorities() {
        let cases: [(&str, &str, Option<u16>, Option<&str>); 5] = [
            ("Domain.TLD", "domain.tld", None, None),
            ("domain.tld:9090", "domain.tld", Some(9090), None),
            ("10.0.0.7:81", "10.0.0.7", Some(81), None),
            ("[2001:db8::1]:8443", "[2001:db8::1]", Some(8443), None),
            ("someone:secret@domain.tld:9090", "domain.tld", Some(9090), Some("someone:secret")),
        ];

        for (raw, host, port, userinfo) in cases {
            let parsed = Authority::parse(raw).unwrap();
            assert_eq!(parsed.host().to_string(), host, "{raw}");
            assert_eq!(parsed.port(), port, "{raw}");
            assert_eq!(parsed.userinfo(), userinfo, "{raw}");
        }

        let ipv6 = Authority::parse("[2001:db8::1]:8443").unwrap();
        assert!(ipv6.host().is_ip_addr());
        assert_eq!(ipv6.to_string(), "[2001:db8::1]:8443");
    }

    #[test]
    fn test_userinfo_is_encoded() {
        let parsed = Authority::parse("some one@domain.tld").unwrap();
        assert_eq!(parsed.userinfo(), Some("some%20one"));
    }

    #[test]
    fn test_rejected_authorities() {
        for raw in [
            "",
            ":9090",
            "someone@",
            "domain.tld:",
            "domain.tld:0",
            "domain.tld:65536",
            "domain.tld:http",
            "[::1",
            "[::1]x",
        ] {
            assert!(Authority::parse(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_host_kinds() {
        assert_eq!(Host::parse("127.0.0.1").unwrap(), Host::Ipv4(Ipv4Addr::LOCALHOST));
        assert_eq!(Host::parse("::1").unwrap(), Host::Ipv6(Ipv6Addr::LOCALHOST));
        assert_eq!(Host::parse("[::1]").unwrap().to_string(), "[::1]");
        assert_eq!(Host::parse("DOMAIN.tld").unwrap().as_str(), Some("domain.tld"));
        assert!(Host::parse("[zzz::1]").is_err());
        assert!(Host::parse("bad host").is_err());
    }
}
