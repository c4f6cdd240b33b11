use std::fmt;

use bytes::Bytes;
use url::Url;

use crate::http::headers::Headers;
use crate::http::version::Version;

/// HTTP request methods.
///
/// The well-known methods get their own variant. Any other token is kept
/// verbatim in [`Method::Extension`], so [`Method::as_str`] always returns
/// exactly what the client sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
    /// A method token outside the registered set (case-sensitive, so `get` lands here)
    Extension(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token.as_str(),
        }
    }
}

impl From<&str> for Method {
    /// # Example
    ///
    /// ```
    /// # use pingback::http::request::Method;
    /// assert_eq!(Method::from("GET"), Method::GET);
    /// assert_eq!(Method::from("PURGE").as_str(), "PURGE");
    /// ```
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "CONNECT" => Method::CONNECT,
            "OPTIONS" => Method::OPTIONS,
            "TRACE" => Method::TRACE,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request-target was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// `%` not followed by two hex digits
    InvalidPercentEncoding,
    /// ASCII control character or space
    InvalidCharacter,
    /// Neither origin-form nor asterisk-form, and not an absolute URI either
    Url(url::ParseError),
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetError::InvalidPercentEncoding => f.write_str("invalid percent-encoding"),
            TargetError::InvalidCharacter => f.write_str("invalid character"),
            TargetError::Url(e) => write!(f, "invalid absolute URI: {e}"),
        }
    }
}

impl std::error::Error for TargetError {}

/// The request-target from the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `/path?query`, kept exactly as sent
    Origin { path: String, query: Option<String> },
    /// `scheme://authority/path?query`
    Absolute(Url),
    /// `*`
    Asterisk,
}

impl Target {
    /// Parses a request-target.
    ///
    /// A target starting with a single `/` is origin-form, `*` is
    /// asterisk-form, and anything else must be an absolute URI. Origin-form
    /// is split on the first `?` without resolving dot segments or
    /// decoding escapes.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        validate_chars(raw)?;

        if raw == "*" {
            return Ok(Target::Asterisk);
        }

        if raw.starts_with('/') && !raw.starts_with("//") {
            let (path, query) = match raw.split_once('?') {
                Some((path, query)) => (path, Some(query.to_string())),
                None => (raw, None),
            };
            return Ok(Target::Origin {
                path: path.to_string(),
                query,
            });
        }

        Url::parse(raw).map(Target::Absolute).map_err(TargetError::Url)
    }

    pub fn path(&self) -> &str {
        match self {
            Target::Origin { path, .. } => path,
            Target::Absolute(url) => url.path(),
            Target::Asterisk => "*",
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Target::Origin { query, .. } => query.as_deref(),
            Target::Absolute(url) => url.query(),
            Target::Asterisk => None,
        }
    }

    /// Only absolute-form targets carry a scheme.
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Target::Absolute(url) => Some(url.scheme()),
            _ => None,
        }
    }

    pub fn host(&self) -> Option<&str> {
        match self {
            Target::Absolute(url) => url.host_str(),
            _ => None,
        }
    }

    pub fn port(&self) -> Option<u16> {
        match self {
            Target::Absolute(url) => url.port_or_known_default(),
            _ => None,
        }
    }
}

// `url` repairs bad escapes and strips controls instead of failing, so the
// raw target is checked first.
fn validate_chars(raw: &str) -> Result<(), TargetError> {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3).ok_or(TargetError::InvalidPercentEncoding)?;
                if !escape.iter().all(u8::is_ascii_hexdigit) {
                    return Err(TargetError::InvalidPercentEncoding);
                }
                i += 3;
            }
            b if b.is_ascii_control() || b == b' ' => return Err(TargetError::InvalidCharacter),
            _ => i += 1,
        }
    }

    Ok(())
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Absolute(url) => f.write_str(url.as_str()),
            Target::Origin { path, query } => {
                f.write_str(path)?;
                if let Some(q) = query {
                    write!(f, "?{q}")?;
                }
                Ok(())
            }
            Target::Asterisk => f.write_str("*"),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Only produced by a parse that succeeded end to end; see
/// [`parse_http_request`](crate::http::parser::parse_http_request).
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub target: Target,
    pub version: Version,
    pub headers: Headers,
    /// Bytes after the blank line, exactly as received
    pub body: Bytes,
}

impl Request {
    /// All value fragments of a header, by exact name.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name)
    }
}
