use lazy_static::lazy_static;
use regex::Regex;

/// A text file split into a leading header block and a body.
///
/// The header block is a run of `name: value` lines terminated by a blank
/// line. Files without a recognizable block parse as headers-free, with the
/// raw input kept as the body. Header order survives a parse/serialize
/// round trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderedText {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

fn header_line(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"^([A-Za-z0-9_-]+):[ \t]?(.*)$").unwrap();
    }

    HEADER_REGEX.captures(line).and_then(|cap| {
        let name = cap.get(1).map(|m| m.as_str());
        let value = cap.get(2).map(|m| m.as_str());
        match (name, value) {
            (Some(name), Some(value)) => Some((name, value)),
            _ => None,
        }
    })
}

impl HeaderedText {
    pub fn new() -> HeaderedText {
        HeaderedText::default()
    }

    pub fn parse(raw: &str) -> HeaderedText {
        let Some((block, body)) = raw.split_once("\n\n") else {
            return HeaderedText {
                headers: vec![],
                body: raw.to_string(),
            };
        };

        let mut headers = vec![];
        for line in block.lines() {
            match header_line(line) {
                Some((name, value)) => headers.push((name.to_string(), value.to_string())),
                // One stray line disqualifies the whole block
                None => {
                    return HeaderedText {
                        headers: vec![],
                        body: raw.to_string(),
                    };
                }
            }
        }

        if headers.is_empty() {
            return HeaderedText {
                headers: vec![],
                body: raw.to_string(),
            };
        }

        HeaderedText {
            headers,
            body: body.to_string(),
        }
    }

    pub fn serialize(&self) -> String {
        if self.headers.is_empty() {
            return self.body.clone();
        }

        let mut raw = String::new();
        for (name, value) in self.headers.iter() {
            raw.push_str(name);
            raw.push_str(": ");
            raw.push_str(value);
            raw.push('\n');
        }
        raw.push('\n');
        raw.push_str(&self.body);
        raw
    }

    /// Case-insensitive lookup on the trimmed header name.
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.trim();
        self.headers
            .iter()
            .find(|(n, _)| n.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces an existing header in place, or appends a new one.
    pub fn set_header(&mut self, name: &str, value: &str) {
        let wanted = name.trim();
        for (n, v) in self.headers.iter_mut() {
            if n.trim().eq_ignore_ascii_case(wanted) {
                *v = value.to_string();
                return;
            }
        }
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Returns whether the header was present.
    pub fn remove_header(&mut self, name: &str) -> bool {
        let wanted = name.trim();
        let before = self.headers.len();
        self.headers.retain(|(n, _)| !n.trim().eq_ignore_ascii_case(wanted));
        self.headers.len() != before
    }
}
