//! Rebuilds a request from a server environment snapshot.
//!
//! Gateways describe a request through loosely specified variables, and
//! several of them can claim to know the request path. The functions here
//! settle those conflicts in a fixed order:
//!
//! - scheme from `HTTPS`, host and port from `HTTP_HOST` or
//!   `SERVER_NAME`/`SERVER_PORT`
//! - path from `REQUEST_URI`, overridden by `HTTP_X_REWRITE_URL`, overridden
//!   by `HTTP_X_ORIGINAL_URL`, with `ORIG_PATH_INFO` as the fallback
//! - query only from `QUERY_STRING`
//! - headers from every `HTTP_*` and `CONTENT_*` variable

use crate::body::BufferedBody;
use crate::config::{ConfigResult, ServerRequestConfig};
use crate::cookies::{CookieResult, Cookies};
use crate::environment::{is_falsy, ServerEnvironment};
use crate::errors::{ServerRequestError, ServerRequestResult};
use crate::headers::Headers;
use crate::uri::Uri;

use regex::Regex;
use std::io::Read;
use std::sync::LazyLock;

/// `host:port`, split at the last colon followed only by digits.
static HOST_WITH_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<host>.+):(?P<port>\d+)$").expect("host:port pattern compiles")
});

/// `scheme://authority/path`, capturing everything from the path on.
static ABSOLUTE_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^/:]+://[^/]+(?P<path>.*)$").expect("absolute URI pattern compiles")
});

/// Path sources, later entries override earlier ones.
const PATH_SOURCES: [&str; 3] = ["REQUEST_URI", "HTTP_X_REWRITE_URL", "HTTP_X_ORIGINAL_URL"];

const REDIRECT_PREFIX: &str = "REDIRECT_";

/// Everything a request needs, derived from one environment snapshot.
#[derive(Debug)]
pub struct ServerRequestDescriptor {
    pub method: String,
    pub protocol_version: String,
    pub uri: Uri,
    pub headers: Headers,
    pub body: BufferedBody,
    /// The snapshot the request was derived from.
    pub server_params: ServerEnvironment,
}

impl ServerRequestDescriptor {
    #[must_use]
    pub fn header_line(&self, name: &str) -> Option<String> {
        self.headers.get_line(name)
    }

    /// Parses the request's `Cookie` headers.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::EmptyHeader` for a `Cookie` header without any pair.
    pub fn cookies(&self) -> CookieResult<Cookies> {
        Cookies::from_headers(&self.headers)
    }
}

/// Builds [`ServerRequestDescriptor`]s according to a [`ServerRequestConfig`].
#[derive(Clone, Debug, Default)]
pub struct ServerRequestFactory {
    config: ServerRequestConfig,
}

impl ServerRequestFactory {
    #[must_use]
    pub fn new(config: ServerRequestConfig) -> Self {
        Self { config }
    }

    /// Creates a factory from a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_config_path<V: Into<std::path::PathBuf>>(target: V) -> ConfigResult<Self> {
        ServerRequestConfig::from_path(target).map(Self::new)
    }

    #[must_use]
    pub fn config(&self) -> &ServerRequestConfig {
        &self.config
    }

    /// Creates a request from a method and a URI string, with no headers
    /// and an empty body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUri` if `uri` does not parse.
    pub fn create_server_request(
        &self,
        method: &str,
        uri: &str,
    ) -> ServerRequestResult<ServerRequestDescriptor> {
        Ok(ServerRequestDescriptor {
            method: method.to_string(),
            protocol_version: self.config.default_protocol_version.clone(),
            uri: Uri::parse(uri)?,
            headers: Headers::new(),
            body: BufferedBody::empty(),
            server_params: ServerEnvironment::new(),
        })
    }

    /// Derives a request from an environment snapshot, draining `input`
    /// into the body.
    ///
    /// The environment is fully validated before `input` is touched, and
    /// `input` is read to its end before this returns.
    ///
    /// # Errors
    ///
    /// Returns `MissingMethod` without `REQUEST_METHOD`, URI errors for a
    /// malformed host, port or path, and body errors from draining `input`.
    pub fn create_from_environment<R: Read>(
        &self,
        env: &ServerEnvironment,
        input: R,
    ) -> ServerRequestResult<ServerRequestDescriptor> {
        let method = derive_method(env)?;
        let protocol_version = derive_protocol_version(env, &self.config.default_protocol_version);
        let uri = derive_uri(env)?;
        let headers = derive_headers(env);
        let body = BufferedBody::drain(input, self.config.max_body_size)?;

        info!("derived {} {} HTTP/{}", method, uri, protocol_version);

        Ok(ServerRequestDescriptor {
            method,
            protocol_version,
            uri,
            headers,
            body,
            server_params: env.clone(),
        })
    }
}

/// Derives a request with the default settings.
///
/// # Errors
///
/// See [`ServerRequestFactory::create_from_environment`].
pub fn derive_request<R: Read>(
    env: &ServerEnvironment,
    input: R,
) -> ServerRequestResult<ServerRequestDescriptor> {
    ServerRequestFactory::default().create_from_environment(env, input)
}

/// Returns `REQUEST_METHOD` verbatim.
///
/// # Errors
///
/// Returns `MissingMethod` when the variable is absent.
pub fn derive_method(env: &ServerEnvironment) -> ServerRequestResult<String> {
    env.get("REQUEST_METHOD")
        .map(ToString::to_string)
        .ok_or(ServerRequestError::MissingMethod)
}

/// Returns `SERVER_PROTOCOL` without its `HTTP/` prefix, or `default`.
#[must_use]
pub fn derive_protocol_version(env: &ServerEnvironment, default: &str) -> String {
    match env.get("SERVER_PROTOCOL") {
        Some(protocol) => protocol
            .strip_prefix("HTTP/")
            .unwrap_or(protocol)
            .to_string(),
        None => default.to_string(),
    }
}

/// Reconstructs the request URI.
///
/// ```
/// use foundation_http::environment::ServerEnvironment;
/// use foundation_http::server_request::derive_uri;
///
/// let env = ServerEnvironment::from_vars([
///     ("HTTPS", "on"),
///     ("HTTP_HOST", "domain.tld:8443"),
///     ("REQUEST_URI", "/a?ignored=1#top"),
///     ("QUERY_STRING", "kept=1"),
/// ]);
/// let uri = derive_uri(&env).unwrap();
/// assert_eq!(uri.to_string(), "https://domain.tld:8443/a?kept=1#top");
/// ```
///
/// # Errors
///
/// Returns URI errors when the host, port or path cannot be represented.
pub fn derive_uri(env: &ServerEnvironment) -> ServerRequestResult<Uri> {
    let scheme = if env.get("HTTPS") == Some("on") {
        "https"
    } else {
        "http"
    };
    let mut uri = Uri::new().with_scheme(scheme)?;

    if env.contains_key("HTTP_HOST") {
        let http_host = env.get("HTTP_HOST").unwrap_or_default();
        uri = match HOST_WITH_PORT.captures(http_host) {
            Some(captures) => uri
                .with_host(&captures["host"])?
                .with_port(Some(parse_port(&captures["port"])?))?,
            None => uri.with_host(http_host)?,
        };
    } else if let Some(server_name) = env.get("SERVER_NAME") {
        uri = uri.with_host(server_name)?;
        if let Some(server_port) = env.get("SERVER_PORT") {
            uri = uri.with_port(Some(parse_port(server_port)?))?;
        }
    }

    let path = derive_raw_path(env);
    let mut path = if is_falsy(&path) { "/" } else { path.as_str() };

    if let Some((before_fragment, fragment)) = path.split_once('#') {
        uri = uri.with_fragment(fragment)?;
        path = before_fragment;
    }

    if let Some(query_start) = path.find('?') {
        path = &path[..query_start];
    }

    if let Some(query) = env.get("QUERY_STRING") {
        uri = uri.with_query(query.trim_start_matches('?'))?;
    }

    Ok(uri.with_path(path)?)
}

/// Picks the path source and strips a `scheme://authority` prefix from it.
fn derive_raw_path(env: &ServerEnvironment) -> String {
    let chosen = PATH_SOURCES
        .iter()
        .rev()
        .find_map(|key| env.get(key).map(|value| (*key, value)));

    match chosen {
        Some((key, path)) => {
            debug!("request path taken from {}", key);
            match ABSOLUTE_URI.captures(path) {
                Some(captures) => captures["path"].to_string(),
                None => path.to_string(),
            }
        }
        None => env.get("ORIG_PATH_INFO").unwrap_or_default().to_string(),
    }
}

/// Digits only; range checks are left to `Uri::with_port`.
fn parse_port(value: &str) -> ServerRequestResult<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServerRequestError::InvalidPort(value.to_string()));
    }
    value
        .parse::<u32>()
        .map_err(|_| ServerRequestError::InvalidPort(value.to_string()))
}

/// Extracts request headers from `HTTP_*` and `CONTENT_*` variables.
///
/// Falsy values (`""`, `"0"`, null) are skipped. A `REDIRECT_` prefix is
/// dropped, unless the unprefixed variable exists too, in which case the
/// redirected copy is ignored. `HTTP_` is removed from the name, and the
/// rest is lowercased with `_` turned into `-`.
///
/// ```
/// use foundation_http::environment::ServerEnvironment;
/// use foundation_http::server_request::derive_headers;
///
/// let env = ServerEnvironment::from_vars([
///     ("CONTENT_TYPE", "text/plain"),
///     ("HTTP_X_REWRITE_URL", "/some-fancy-url"),
///     ("SERVER_NAME", "domain.tld"),
/// ]);
/// let headers = derive_headers(&env);
/// assert_eq!(headers.get_line("content-type").as_deref(), Some("text/plain"));
/// assert_eq!(headers.get_line("x-rewrite-url").as_deref(), Some("/some-fancy-url"));
/// assert_eq!(headers.len(), 2);
/// ```
#[must_use]
pub fn derive_headers(env: &ServerEnvironment) -> Headers {
    let mut headers = Headers::new();

    for (key, value) in env.iter() {
        let Some(value) = value.filter(|value| !is_falsy(value)) else {
            debug!("skipping falsy environment entry {}", key);
            continue;
        };

        let key = match key.strip_prefix(REDIRECT_PREFIX) {
            Some(original) if env.contains_key(original) => {
                debug!("skipping redirected duplicate {}", key);
                continue;
            }
            Some(original) => original,
            None => key,
        };

        let name = if let Some(name) = key.strip_prefix("HTTP_") {
            name
        } else if key.starts_with("CONTENT_") {
            key
        } else {
            continue;
        };

        if name.is_empty() {
            continue;
        }

        headers.append(name.replace('_', "-").to_ascii_lowercase(), value);
    }

    headers
}
