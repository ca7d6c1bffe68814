use std::{fs, io};
use std::io::ErrorKind;
use std::path::Path;

use ramhorns::Template;

#[derive(ramhorns::Content)]
struct TitleItem {
    text: String,
}

#[derive(ramhorns::Content)]
struct PageScope {
    title: Vec<TitleItem>,
}

#[derive(ramhorns::Content)]
struct LayoutScope<'a> {
    page: PageScope,
    content: &'a str,
}

/// An outer template wrapping a page's rendered content. Templates see
/// `page.title` (a list, absent parts already filtered out) and
/// `content`.
#[derive(Debug)]
pub struct Layout<'a> {
    pub template: Template<'a>,
}

/// Reads `<layouts-dir>/<name>.html`; a missing layout is a hard error.
pub fn load_layout_src(layouts_dir: &Path, name: &str) -> io::Result<String> {
    let layout_path = layouts_dir.join(format!("{}.html", name));
    match fs::read_to_string(&layout_path) {
        Ok(src) => Ok(src),
        Err(e) => Err(io::Error::new(
            e.kind(),
            format!("Error reading layout {}: {}", layout_path.display(), e),
        )),
    }
}

impl Layout<'_> {
    pub fn new(layout_src: &str) -> io::Result<Layout> {
        let template = match Template::new(layout_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing layout template: {}", e),
                ));
            }
        };

        Ok(Layout { template })
    }

    pub fn render(&self, titles: &[&str], content: &str) -> String {
        let title = titles
            .iter()
            .map(|t| TitleItem { text: t.to_string() })
            .collect();

        self.template.render(&LayoutScope {
            page: PageScope { title },
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_content() {
        let layout_src = r##"<title>{{#page}}{{#title}}{{text}} | {{/title}}{{/page}}blog</title>
<body>{{{content}}}</body>"##;
        let layout = Layout::new(layout_src).unwrap();

        let res = layout.render(&["Posts", "Hello"], "<p>Hi</p>");
        assert_eq!(res, "<title>Posts | Hello | blog</title>\n<body><p>Hi</p></body>");
    }

    #[test]
    fn test_render_with_empty_title_list() {
        let layout = Layout::new("{{#page}}{{#title}}{{text}}{{/title}}{{/page}}[{{{content}}}]").unwrap();
        let res = layout.render(&[], "x");
        assert_eq!(res, "[x]");
    }

    #[test]
    fn test_new_rejects_bad_template() {
        let err = Layout::new("{{#page}} no closing tag").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_load_layout_src_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_layout_src(dir.path(), "default").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
