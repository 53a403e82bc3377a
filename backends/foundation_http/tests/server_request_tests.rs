use foundation_http::config::ServerRequestConfig;
use foundation_http::environment::ServerEnvironment;
use foundation_http::server_request::{derive_headers, derive_request, derive_uri, ServerRequestFactory};
use foundation_http::ServerRequestError;
use std::io::{Read, Seek, SeekFrom};

fn gateway_environment() -> ServerEnvironment {
    let mut env = ServerEnvironment::from_vars([
        ("CONTENT_LENGTH", "128"),
        ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
        ("HTTP_HOST", "domain.tld:9090"),
        ("HTTP_X_REWRITE_URL", "/some-fancy-url"),
        ("HTTP_X_ORIGINAL_URL", "/subdir?test=true#phpunit"),
        ("QUERY_STRING", "test=true"),
        ("REQUEST_METHOD", "POST"),
        ("REQUEST_URI", "http://domain.tld:9090/subdir#phpunit"),
        ("SERVER_PORT", "9090"),
        ("SERVER_PROTOCOL", "HTTP/1.0"),
    ]);
    env.insert_null("HTTP_INVALID");
    env
}

#[test]
fn test_derive_request_from_gateway_environment() {
    let env = gateway_environment();
    let input: &[u8] = b"test=true&name=value";
    let mut request = derive_request(&env, input).unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.protocol_version, "1.0");
    assert_eq!(
        request.uri.to_string(),
        "http://domain.tld:9090/subdir?test=true#phpunit"
    );
    assert_eq!(request.uri.request_target(), "/subdir?test=true");
    assert_eq!(request.header_line("content-length").unwrap(), "128");
    assert_eq!(
        request.header_line("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );
    assert_eq!(request.header_line("host").unwrap(), "domain.tld:9090");
    assert!(request.header_line("invalid").is_none());

    let mut body = String::new();
    request.body.read_to_string(&mut body).unwrap();
    assert_eq!(body, "test=true&name=value");

    request.body.seek(SeekFrom::Start(0)).unwrap();
    let mut again = String::new();
    request.body.read_to_string(&mut again).unwrap();
    assert_eq!(again, body);
}

#[test]
fn test_uri_and_headers_are_independent_of_method() {
    let env = ServerEnvironment::from_vars([
        ("HTTP_HOST", "domain.tld"),
        ("REQUEST_URI", "/a"),
        ("HTTP_X_REWRITE_URL", "/b"),
    ]);

    assert_eq!(derive_uri(&env).unwrap().to_string(), "http://domain.tld/b");
    let headers = derive_headers(&env);
    assert_eq!(headers.get_line("x-rewrite-url").unwrap(), "/b");
    assert!(matches!(
        derive_request(&env, std::io::empty()),
        Err(ServerRequestError::MissingMethod)
    ));
}

#[test]
fn test_failed_environment_leaves_input_unread() {
    let env = ServerEnvironment::from_vars([
        ("REQUEST_METHOD", "GET"),
        ("HTTP_HOST", "bad host"),
    ]);
    let mut input: &[u8] = b"untouched";

    assert!(derive_request(&env, &mut input).is_err());
    assert_eq!(input, b"untouched");
}

#[test]
fn test_factory_from_config_file() {
    let path = std::env::temp_dir().join(format!(
        "foundation_http_factory_{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "default_protocol_version = \"2\"\nmax_body_size = 8\n").unwrap();

    let factory = ServerRequestFactory::from_config_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        factory.config(),
        &ServerRequestConfig {
            default_protocol_version: "2".into(),
            max_body_size: Some(8),
        }
    );

    let env = ServerEnvironment::from_vars([("REQUEST_METHOD", "GET")]);
    let request = factory.create_from_environment(&env, &b"12345678"[..]).unwrap();
    assert_eq!(request.protocol_version, "2");
    assert_eq!(request.body.len(), 8);

    let too_big = factory.create_from_environment(&env, &b"123456789"[..]);
    assert!(matches!(too_big, Err(ServerRequestError::BodyTooLarge(8))));
}

#[test]
fn test_create_server_request_parses_uri() {
    let factory = ServerRequestFactory::default();
    let request = factory
        .create_server_request("DELETE", "https://domain.tld/items/7")
        .unwrap();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.uri.port_or_default(), Some(443));
    assert!(request.server_params.is_empty());

    assert!(matches!(
        factory.create_server_request("GET", "http:///domain.tld/"),
        Err(ServerRequestError::InvalidUri(_))
    ));
}
