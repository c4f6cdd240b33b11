use std::fmt;

use bytes::Bytes;

use crate::http::headers::parse_header_section;
use crate::http::request::{Method, Request, Target};
use crate::http::version::{Version, parse_version};

const CRLF: &[u8] = b"\r\n";

/// Structural failures of a request message.
///
/// Each variant names the parsing step that rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not `method SP target SP version`
    MalformedRequestLine,
    InvalidTarget,
    UnsupportedVersion,
    /// No blank line closes the header section
    MissingHeaderTerminator,
    MalformedHeaderLine,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::MalformedRequestLine => "malformed request line",
            ParseError::InvalidTarget => "invalid request target",
            ParseError::UnsupportedVersion => "unsupported HTTP version",
            ParseError::MissingHeaderTerminator => "header section is not terminated",
            ParseError::MalformedHeaderLine => "malformed header line",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses one HTTP/1.x request out of `buf`.
///
/// The buffer is expected to hold the whole message up to and including the
/// blank line that ends the header section. Whatever follows is returned as
/// the body without looking at `Content-Length`.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let (request_line, rest) = match find_crlf(buf) {
        Some(pos) => (&buf[..pos], &buf[pos + CRLF.len()..]),
        None => (buf, &buf[buf.len()..]),
    };

    let (method, target, version) = parse_request_line(request_line)?;

    let (header_lines, body) =
        split_header_section(rest).ok_or(ParseError::MissingHeaderTerminator)?;

    let headers = parse_header_section(&header_lines)?;

    Ok(Request {
        method,
        target,
        version,
        headers,
        body: Bytes::copy_from_slice(body),
    })
}

fn parse_request_line(line: &[u8]) -> Result<(Method, Target, Version), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    let target = Target::parse(target).map_err(|_| ParseError::InvalidTarget)?;
    let version = parse_version(version).ok_or(ParseError::UnsupportedVersion)?;

    Ok((Method::from(method), target, version))
}

/// Collects complete lines up to the first empty one.
///
/// Returns the header lines and the bytes after the empty line, or `None`
/// if `buf` runs out first. A trailing fragment without CRLF never counts as
/// the terminator.
fn split_header_section(mut buf: &[u8]) -> Option<(Vec<&[u8]>, &[u8])> {
    let mut lines = Vec::new();

    loop {
        let pos = find_crlf(buf)?;
        let line = &buf[..pos];
        buf = &buf[pos + CRLF.len()..];

        if line.is_empty() {
            return Some((lines, buf));
        }
        lines.push(line);
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Returns true once `buf` holds a complete header section.
pub fn has_header_terminator(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n")
}
