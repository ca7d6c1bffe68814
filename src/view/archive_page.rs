use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::view::{MonthContext, PostContext, SiteContext};

#[derive(ramhorns::Content)]
struct ArchiveScope<'a> {
    site: &'a SiteContext<'a>,
    month: &'a MonthContext<'a>,
    posts: &'a Vec<&'a PostContext>,
}

/// Renders the fixed archive-page template for one month group, with the
/// site, the month marker and that month's posts in scope.
pub struct ArchivePageRenderer<'a> {
    pub template: Template<'a>,
}

impl ArchivePageRenderer<'_> {
    pub fn new(archive_tpl_src: &str) -> io::Result<ArchivePageRenderer> {
        let template = match Template::new(archive_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing archive template: {}", e),
                ));
            }
        };

        Ok(ArchivePageRenderer { template })
    }

    pub fn render(&self, site: &SiteContext, month: &MonthContext) -> String {
        self.template.render(&ArchiveScope {
            site,
            month,
            posts: &month.posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{NaiveDate, Utc};

    use crate::archive;
    use crate::content::content_file::ContentFile;
    use crate::content::post::Post;
    use crate::view::{build_post_contexts, build_site_context};

    use super::*;

    fn make_post(year: i32, month: u32, day: u32, slug: &str) -> Post {
        let mut file = ContentFile::new(slug.to_string(), PathBuf::from(slug));
        file.set_title(slug);
        file.text.body = "text".to_string();
        Post {
            file,
            created: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn test_render_archive_page() {
        let posts = vec![
            make_post(2012, 11, 15, "later"),
            make_post(2012, 11, 2, "earlier"),
        ];
        let contexts = build_post_contexts(&posts).unwrap();
        let arch = archive::build(&posts, "/archive/:year/:month");
        let site = build_site_context(&contexts, &arch, Utc::now());

        let renderer = ArchivePageRenderer::new(
            "{{#month}}{{display}}{{/month}}: {{#posts}}<{{slug}}>{{/posts}}",
        )
        .unwrap();

        let month = &site.archive.years[0].months[0];
        let res = renderer.render(&site, month);
        assert_eq!(res, "November 2012: <earlier><later>");
    }
}
