use crate::http::parser::ParseError;

/// Request headers keyed by the name exactly as the client wrote it.
///
/// Each line's value is split on commas into trimmed fragments. When a name
/// appears on more than one line, the fragments of later lines are appended
/// to the list of the first, so no value is lost. Names keep the order in
/// which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `values` under `name`, creating the entry if needed.
    pub fn append<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values = values.into_iter().map(Into::into);

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((name, values.collect())),
        }
    }

    /// All value fragments recorded for `name` (exact, case-sensitive match).
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

/// Parses the lines between the request line and the blank line.
///
/// Every line must contain a colon; the first one splits name from value.
/// Returns the first malformed line as [`ParseError::MalformedHeaderLine`].
pub fn parse_header_section(lines: &[&[u8]]) -> Result<Headers, ParseError> {
    let mut headers = Headers::new();

    for raw in lines {
        let line = std::str::from_utf8(raw)
            .map_err(|_| ParseError::MalformedHeaderLine)?;

        let (name, value) = line
            .split_once(':')
            .ok_or(ParseError::MalformedHeaderLine)?;

        if name.is_empty() {
            return Err(ParseError::MalformedHeaderLine);
        }

        headers.append(name, split_values(value));
    }

    Ok(headers)
}

fn split_values(raw: &str) -> impl Iterator<Item = &str> {
    raw.trim().split(',').map(str::trim)
}
