use std::fmt;

/// HTTP protocol version decoded from a request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const HTTP_10: Version = Version { major: 1, minor: 0 };
    pub const HTTP_11: Version = Version { major: 1, minor: 1 };
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

const PREFIX: &[u8] = b"HTTP/";

/// Decodes a protocol token of the form `HTTP/<digit>.<digit>`.
///
/// Returns `None` for anything else: wrong prefix (the match is case-sensitive),
/// wrong length, or a non-digit component.
///
/// # Example
///
/// ```
/// # use pingback::http::version::{parse_version, Version};
/// assert_eq!(parse_version("HTTP/1.1"), Some(Version::HTTP_11));
/// assert_eq!(parse_version("HTTP/2.0"), Some(Version { major: 2, minor: 0 }));
/// assert_eq!(parse_version("http/1.1"), None);
/// ```
pub fn parse_version(token: &str) -> Option<Version> {
    match token {
        "HTTP/1.1" => return Some(Version::HTTP_11),
        "HTTP/1.0" => return Some(Version::HTTP_10),
        _ => {}
    }

    let bytes = token.as_bytes();
    if bytes.len() != b"HTTP/X.Y".len() || !bytes.starts_with(PREFIX) {
        return None;
    }

    match &bytes[PREFIX.len()..] {
        &[major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Some(Version {
                major: major - b'0',
                minor: minor - b'0',
            })
        }
        _ => None,
    }
}
