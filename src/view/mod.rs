use std::io;
use std::io::ErrorKind;

use chrono::{DateTime, Datelike, Utc};
use ramhorns::Template;

use crate::archive::Archive;
use crate::content::markdown;
use crate::content::post::Post;
use crate::text_utils::xmlschema;

pub mod archive_page;
pub mod layout;
pub mod post_page;

/// Typed template contexts. Templates only ever see these shapes, so the
/// rendering boundary has a single value grammar instead of a free-form
/// map.

#[derive(ramhorns::Content)]
pub struct PostContext {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub created: String,
    pub updated: String,
    pub content: String,
}

#[derive(ramhorns::Content)]
pub struct MonthContext<'a> {
    pub date: String,
    pub display: String,
    pub archive_url: String,
    pub posts: Vec<&'a PostContext>,
}

#[derive(ramhorns::Content)]
pub struct YearContext<'a> {
    pub year: i32,
    pub posts: Vec<&'a PostContext>,
    pub months: Vec<MonthContext<'a>>,
}

#[derive(ramhorns::Content)]
pub struct ArchiveContext<'a> {
    pub years: Vec<YearContext<'a>>,
}

#[derive(ramhorns::Content)]
pub struct SiteContext<'a> {
    pub posts: &'a Vec<PostContext>,
    pub latest_update_time: String,
    pub archive: ArchiveContext<'a>,
}

#[derive(ramhorns::Content)]
struct BodyScope<'a> {
    site: &'a SiteContext<'a>,
}

/// One context per post, markdown body already rendered to HTML.
/// Output order follows the input slice.
pub fn build_post_contexts(posts: &[Post]) -> io::Result<Vec<PostContext>> {
    let mut contexts = Vec::with_capacity(posts.len());
    for post in posts {
        contexts.push(PostContext {
            slug: post.slug().to_string(),
            title: post.title().unwrap_or("").trim().to_string(),
            url: post.url(),
            created: post.created.format("%Y-%m-%d").to_string(),
            updated: xmlschema(&post.updated),
            content: markdown::to_html(&post.file.text.body)?,
        });
    }
    Ok(contexts)
}

pub fn build_site_context<'a>(
    post_contexts: &'a Vec<PostContext>,
    archive: &Archive,
    latest_update_time: DateTime<Utc>,
) -> SiteContext<'a> {
    let years = archive
        .years
        .iter()
        .map(|year| YearContext {
            year: year.date.year(),
            posts: year.posts.iter().map(|&i| &post_contexts[i]).collect(),
            months: year
                .months
                .iter()
                .map(|month| MonthContext {
                    date: month.date.format("%Y-%m-%d").to_string(),
                    display: month.date.format("%B %Y").to_string(),
                    archive_url: month.archive_url.clone(),
                    posts: month.posts.iter().map(|&i| &post_contexts[i]).collect(),
                })
                .collect(),
        })
        .collect();

    SiteContext {
        posts: post_contexts,
        latest_update_time: xmlschema(&latest_update_time),
        archive: ArchiveContext { years },
    }
}

/// Renders a page body as a template with the site bound into scope.
pub fn render_body(body_src: &str, site: &SiteContext) -> io::Result<String> {
    let template = match Template::new(body_src) {
        Ok(x) => x,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Error parsing page template: {}", e),
            ));
        }
    };

    Ok(template.render(&BodyScope { site }))
}
