use pingback::http::parser::{ParseError, parse_http_request};
use pingback::http::request::{Method, Target};
use pingback::http::version::Version;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target.path(), "/");
    assert_eq!(parsed.version, Version::HTTP_11);
    assert_eq!(parsed.header("Host").unwrap(), ["example.com"]);
    assert!(parsed.body.is_empty());
}

#[test]
fn test_parse_path_query_and_list_header() {
    let req = b"GET /path?q=1 HTTP/1.1\r\nAccept: text/html, application/xml\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.method.as_str(), "GET");
    assert_eq!(parsed.target.path(), "/path");
    assert_eq!(parsed.target.query(), Some("q=1"));
    assert_eq!(parsed.version.major, 1);
    assert_eq!(parsed.version.minor, 1);
    assert_eq!(
        parsed.header("Accept").unwrap(),
        ["text/html", "application/xml"]
    );
}

#[test]
fn test_parse_header_names_match_input() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    let names: Vec<&str> = parsed.headers.names().collect();
    assert_eq!(names, ["Host", "User-Agent", "Accept"]);
    assert_eq!(parsed.header("User-Agent").unwrap(), ["test-client"]);
    assert_eq!(parsed.header("Accept").unwrap(), ["*/*"]);
}

#[test]
fn test_parse_header_values_for_growing_sections() {
    for n in 0..20 {
        let mut req = String::from("GET / HTTP/1.1\r\n");
        for i in 0..n {
            req.push_str(&format!("X-H{i}:  a{i} ,b{i},c{i}  \r\n"));
        }
        req.push_str("\r\n");

        let parsed = parse_http_request(req.as_bytes()).unwrap();

        assert_eq!(parsed.headers.len(), n);
        for i in 0..n {
            let expected = [format!("a{i}"), format!("b{i}"), format!("c{i}")];
            assert_eq!(parsed.header(&format!("X-H{i}")).unwrap(), expected);
        }
    }
}

#[test]
fn test_parse_duplicate_headers_accumulate() {
    let req = b"GET / HTTP/1.1\r\nCache-Control: no-cache\r\nX-Other: 1\r\nCache-Control: no-store, private\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 2);
    assert_eq!(
        parsed.header("Cache-Control").unwrap(),
        ["no-cache", "no-store", "private"]
    );
}

#[test]
fn test_parse_header_case_preservation() {
    let req = b"GET / HTTP/1.1\r\nContent-Type: application/json\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert!(parsed.headers.contains("Content-Type"));
    assert!(!parsed.headers.contains("content-type"));
}

#[test]
fn test_parse_body_is_captured_verbatim() {
    let req = b"POST /upload HTTP/1.1\r\nContent-Length: 99\r\n\r\n\x00\x01\r\n\x02";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(&parsed.body[..], b"\x00\x01\r\n\x02");
}

#[test]
fn test_parse_extension_method() {
    let parsed = parse_http_request(b"PURGE /cache HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, Method::Extension("PURGE".to_string()));
    assert_eq!(parsed.method.as_str(), "PURGE");
}

#[test]
fn test_parse_absolute_form_target() {
    let parsed = parse_http_request(b"GET http://example.com:8080/a?b=c HTTP/1.1\r\n\r\n").unwrap();

    assert!(matches!(parsed.target, Target::Absolute(_)));
    assert_eq!(parsed.target.host(), Some("example.com"));
    assert_eq!(parsed.target.port(), Some(8080));
    assert_eq!(parsed.target.path(), "/a");
    assert_eq!(parsed.target.query(), Some("b=c"));
}

#[test]
fn test_parse_asterisk_form_target() {
    let parsed = parse_http_request(b"OPTIONS * HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.target, Target::Asterisk);
}

#[test]
fn test_parse_other_versions() {
    let parsed = parse_http_request(b"GET / HTTP/1.0\r\n\r\n").unwrap();
    assert_eq!(parsed.version, Version::HTTP_10);

    let parsed = parse_http_request(b"GET / HTTP/2.0\r\n\r\n").unwrap();
    assert_eq!(parsed.version, Version { major: 2, minor: 0 });
}

#[test]
fn test_parse_request_line_with_too_few_fields() {
    let result = parse_http_request(b"GET /\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
}

#[test]
fn test_parse_request_line_with_too_many_fields() {
    let result = parse_http_request(b"GET / HTTP/1.1 extra\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
}

#[test]
fn test_parse_request_line_with_double_space() {
    let result = parse_http_request(b"GET  / HTTP/1.1\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
}

#[test]
fn test_parse_empty_buffer() {
    let result = parse_http_request(b"");
    assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
}

#[test]
fn test_parse_non_utf8_request_line() {
    let result = parse_http_request(b"G\xffT / HTTP/1.1\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
}

#[test]
fn test_parse_invalid_target() {
    let result = parse_http_request(b"GET http://[::1/ HTTP/1.1\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::InvalidTarget);

    let result = parse_http_request(b"GET index.html HTTP/1.1\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::InvalidTarget);

    let result = parse_http_request(b"GET /%zz HTTP/1.1\r\n\r\n");
    assert_eq!(result.unwrap_err(), ParseError::InvalidTarget);
}

#[test]
fn test_parse_origin_target_is_not_normalized() {
    let parsed = parse_http_request(b"GET /a/../b?x=%41 HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.target.path(), "/a/../b");
    assert_eq!(parsed.target.query(), Some("x=%41"));

    let parsed = parse_http_request(b"GET /\\evil.com/x HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(
        parsed.target,
        Target::Origin {
            path: "/\\evil.com/x".to_string(),
            query: None,
        }
    );
    assert_eq!(parsed.target.host(), None);
}

#[test]
fn test_parse_unsupported_version() {
    for version in ["HTTP/1", "http/1.1", "HTTP/1.10", "HTTP/a.b", "HTTX/1.1"] {
        let req = format!("GET / {version}\r\n\r\n");
        let result = parse_http_request(req.as_bytes());
        assert_eq!(result.unwrap_err(), ParseError::UnsupportedVersion, "{version}");
    }
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert_eq!(result.unwrap_err(), ParseError::MissingHeaderTerminator);
}

#[test]
fn test_parse_truncated_mid_header() {
    let full = b"GET / HTTP/1.1\r\nHost: example.com\r\nAccept: text/html\r\n\r\n";

    // Every cut that still has a valid request line but loses the blank line
    for cut in 16..full.len() - 1 {
        let result = parse_http_request(&full[..cut]);
        assert!(result.is_err(), "cut at {cut} parsed");
    }
}

#[test]
fn test_parse_malformed_header() {
    let req = b"GET / HTTP/1.1\r\nX-Bad-Header\r\n\r\n";
    let result = parse_http_request(req);

    assert_eq!(result.unwrap_err(), ParseError::MalformedHeaderLine);
}

#[test]
fn test_parse_error_ordering() {
    // Request line problems are reported before missing terminator
    let result = parse_http_request(b"GET / HTTP/9");
    assert_eq!(result.unwrap_err(), ParseError::UnsupportedVersion);

    // Missing terminator is reported before header problems
    let result = parse_http_request(b"GET / HTTP/1.1\r\nX-Bad-Header\r\n");
    assert_eq!(result.unwrap_err(), ParseError::MissingHeaderTerminator);
}

#[test]
fn test_parse_error_messages() {
    assert_eq!(ParseError::MalformedRequestLine.to_string(), "malformed request line");
    assert_eq!(ParseError::MalformedHeaderLine.to_string(), "malformed header line");
}
