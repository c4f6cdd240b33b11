use crate::http::parser::ParseError;

/// Body sent back for every request that parsed successfully.
pub const PONG: &[u8] = b"Pong\r\n";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): request parsed
/// - `BadRequest` (400): structurally invalid request
/// - `RequestTimeout` (408): request did not arrive before the read deadline
/// - `RequestHeaderFieldsTooLarge` (431): header section exceeds the size limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 408 Request Timeout
    RequestTimeout,
    /// 431 Request Header Fields Too Large
    RequestHeaderFieldsTooLarge,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use pingback::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::RequestTimeout => 408,
            StatusCode::RequestHeaderFieldsTooLarge => 431,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    /// Header lines in the order they will be written
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"Pong\r\n".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header. Names compare case-insensitively.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some((_, v)) => *v = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size and `Connection: close`
    /// unless they were set explicitly.
    pub fn build(mut self) -> Response {
        if !self.has_header("Content-Length") {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }
        if !self.has_header("Connection") {
            self.headers
                .push(("Connection".to_string(), "close".to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }

    fn has_header(&self, key: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

impl Response {
    /// 200 OK with the canned `Pong` body.
    pub fn pong() -> Self {
        Self::text(StatusCode::Ok, PONG.to_vec())
    }

    /// 400 Bad Request naming the parse step that failed.
    pub fn bad_request(err: &ParseError) -> Self {
        Self::text(StatusCode::BadRequest, format!("400 Bad Request: {err}\r\n").into_bytes())
    }

    pub fn request_timeout() -> Self {
        Self::text(StatusCode::RequestTimeout, b"408 Request Timeout\r\n".to_vec())
    }

    pub fn headers_too_large() -> Self {
        Self::text(
            StatusCode::RequestHeaderFieldsTooLarge,
            b"431 Request Header Fields Too Large\r\n".to_vec(),
        )
    }

    /// Looks up a header by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn text(status: StatusCode, body: Vec<u8>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/plain")
            .body(body)
            .build()
    }
}
