use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::view::PostContext;

#[derive(ramhorns::Content)]
struct PostScope<'a> {
    post: &'a PostContext,
}

/// Renders the fixed post template with a single post bound as `post`.
pub struct PostPageRenderer<'a> {
    pub template: Template<'a>,
}

impl PostPageRenderer<'_> {
    pub fn new(post_tpl_src: &str) -> io::Result<PostPageRenderer> {
        let template = match Template::new(post_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing post template: {}", e),
                ));
            }
        };

        Ok(PostPageRenderer { template })
    }

    pub fn render(&self, post: &PostContext) -> String {
        self.template.render(&PostScope { post })
    }
}
