use std::{fs, io};
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::content::content_file::ContentFile;
use crate::site::Site;
use crate::text_utils::encode_uri_component;

/// A published entry under the posts root. The filename carries the
/// creation date: `<YYYY-MM-DD>-<slug>`. Posts are only ever read by the
/// build pipeline, never mutated in place.
#[derive(Debug)]
pub struct Post {
    pub file: ContentFile,
    pub created: NaiveDate,
    pub updated: DateTime<Utc>,
}

/// Splits a post filename into its creation date and slug.
pub fn split_post_filename(file_name: &str) -> Option<(NaiveDate, &str)> {
    lazy_static! {
        static ref POST_FILE_REGEX: Regex =
            Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").unwrap();
    }

    let cap = POST_FILE_REGEX.captures(file_name)?;
    let year = cap.get(1)?.as_str().parse::<i32>().ok()?;
    let month = cap.get(2)?.as_str().parse::<u32>().ok()?;
    let day = cap.get(3)?.as_str().parse::<u32>().ok()?;
    let slug = cap.get(4)?.as_str();

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some((date, slug))
}

impl Post {
    pub fn from_path(path: &Path) -> io::Result<Post> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let Some((created, slug)) = split_post_filename(file_name) else {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Post filename is not <date>-<slug>: {}", path.display()),
            ));
        };

        let slug = slug.to_string();
        let updated = fs::metadata(path)?.modified()?.into();
        let file = ContentFile::load(slug, path.to_path_buf())?;

        Ok(Post {
            file,
            created,
            updated,
        })
    }

    /// Every file directly under the posts root, parsed. Ordering here is
    /// whatever the directory listing gives back; the site sorts.
    pub fn all(site: &Site) -> io::Result<Vec<Post>> {
        let posts_dir = site.posts_path();
        if !posts_dir.is_dir() {
            return Ok(vec![]);
        }

        let mut posts = vec![];
        for entry in fs::read_dir(&posts_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            posts.push(Post::from_path(&entry.path())?);
        }
        Ok(posts)
    }

    /// Finds the post with the given slug. When the posts root somehow
    /// holds more than one match, the lexicographically first filename wins.
    pub fn from_slug(site: &Site, slug: &str) -> io::Result<Post> {
        let posts_dir = site.posts_path();
        let mut names: Vec<String> = vec![];

        if posts_dir.is_dir() {
            for entry in fs::read_dir(&posts_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        for name in names {
            if let Some((_, file_slug)) = split_post_filename(&name) {
                if file_slug == slug {
                    return Post::from_path(&posts_dir.join(name));
                }
            }
        }

        Err(io::Error::new(
            ErrorKind::NotFound,
            format!("No post with slug {}", slug),
        ))
    }

    /// Permalink path, also the output file's relative path (plus `.html`).
    /// Pure derivation from the creation date and slug.
    pub fn url(&self) -> String {
        format!(
            "/{:04}/{:02}/{}",
            self.created.year(),
            self.created.month(),
            encode_uri_component(&self.file.slug)
        )
    }

    pub fn slug(&self) -> &str {
        &self.file.slug
    }

    pub fn title(&self) -> Option<&str> {
        self.file.title()
    }
}
