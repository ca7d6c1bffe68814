use std::io;
use std::io::ErrorKind;

use markdown::Options;

/// Markdown body to HTML, GFM profile (fenced code blocks included).
/// Trailing whitespace is trimmed off the rendered result.
pub fn to_html(md_text: &str) -> io::Result<String> {
    match markdown::to_html_with_options(md_text, &Options::gfm()) {
        Ok(html) => Ok(html.trim_end().to_string()),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_paragraphs_and_emphasis() {
        let html = to_html("Hi **there**\n").unwrap();
        assert_eq!(html, "<p>Hi <strong>there</strong></p>");
    }

    #[test]
    fn test_renders_fenced_code_blocks() {
        let html = to_html("```\nlet x = 1;\n```\n").unwrap();
        assert!(html.contains("<pre><code>"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn test_fenced_block_keeps_language_tag() {
        let html = to_html("```rust\nfn main() {}\n```\n").unwrap();
        assert!(html.contains("language-rust"));
    }

    #[test]
    fn test_trims_trailing_whitespace() {
        let html = to_html("word\n\n\n").unwrap();
        assert_eq!(html, "<p>word</p>");
    }
}
