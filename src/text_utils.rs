use chrono::{DateTime, SecondsFormat, Utc};

/// Builds a filesystem-safe slug out of a human title.
/// "Qué pasa, World!" becomes "que-pasa-world".
pub fn slug_from_title(title: &str) -> String {
    let alpha_chars: String = title.chars()
        .filter(|&c| c.is_alphanumeric() || c == ' ' || c == '-')
        .map(|c| if c == ' ' { '-' } else { c })
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut slug = String::new();
    let mut prev_char = None;

    for c in alpha_chars.chars() {
        if c != '-' || prev_char != Some('-') {
            slug.push(c);
        }
        prev_char = Some(c);
    }

    let slug = unidecode::unidecode(&slug);
    slug.trim_matches('-').to_ascii_lowercase()
}

pub fn xmlschema(date_time: &DateTime<Utc>) -> String {
    date_time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Percent-encodes everything outside the URI unreserved set.
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use super::*;

    #[test]
    fn test_slug_from_title() {
        let slug = slug_from_title("Hello, World");
        assert_eq!(slug, "hello-world");

        let slug = slug_from_title("A title  with   gaps - and dashes");
        assert_eq!(slug, "a-title-with-gaps-and-dashes");

        let slug = slug_from_title("Um título com ácentos");
        assert_eq!(slug, "um-titulo-com-acentos");

        let slug = slug_from_title("  Trimmed!  ");
        assert_eq!(slug, "trimmed");
    }

    #[test]
    fn test_xmlschema() {
        let date = NaiveDate::from_ymd_opt(2012, 11, 15).unwrap();
        let time = NaiveTime::from_hms_opt(8, 30, 5).unwrap();
        let date_time = NaiveDateTime::new(date, time).and_utc();
        assert_eq!(xmlschema(&date_time), "2012-11-15T08:30:05Z");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("plain-slug_1.0~x"), "plain-slug_1.0~x");
        assert_eq!(encode_uri_component("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_uri_component("café"), "caf%C3%A9");
    }
}
