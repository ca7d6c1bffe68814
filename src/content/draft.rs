use std::{fs, io};
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Local;

use crate::content::content_file::ContentFile;
use crate::site::Site;

const PUBLISH_HEADER: &str = "publish";
const AUTOPUBLISH_VALUE: &str = "now";

/// An unpublished entry under the drafts root, named by its bare slug.
///
/// Lifecycle: constructed unsaved, `save` puts it into the drafts root,
/// and from there it either `publish`es into the posts root (gaining a
/// date-prefixed filename) or `delete`s into the trash root. The instance
/// keeps tracking the file across both moves.
pub struct Draft {
    pub file: ContentFile,
}

impl Draft {
    /// An unsaved draft addressed at `<drafts-root>/<slug>`.
    pub fn new(site: &Site, slug: &str) -> Draft {
        Draft {
            file: ContentFile::new(slug.to_string(), site.drafts_path().join(slug)),
        }
    }

    pub fn open(site: &Site, slug: &str) -> io::Result<Draft> {
        let file = ContentFile::load(slug.to_string(), site.drafts_path().join(slug))?;
        Ok(Draft { file })
    }

    pub fn all(site: &Site) -> io::Result<Vec<Draft>> {
        let drafts_dir = site.drafts_path();
        if !drafts_dir.is_dir() {
            return Ok(vec![]);
        }

        let mut drafts = vec![];
        for entry in fs::read_dir(&drafts_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(slug) = entry.file_name().to_str() {
                drafts.push(Draft::open(site, slug)?);
            }
        }
        Ok(drafts)
    }

    /// A slug exists as a draft iff the file sits directly under the
    /// drafts root. Trash and posts are not consulted.
    pub fn exists(site: &Site, slug: &str) -> bool {
        site.drafts_path().join(slug).is_file()
    }

    pub fn slug(&self) -> &str {
        &self.file.slug
    }

    pub fn title(&self) -> Option<&str> {
        self.file.title()
    }

    pub fn set_title(&mut self, title: &str) {
        self.file.set_title(title);
    }

    /// True iff the publish header's trimmed value is exactly "now".
    pub fn autopublish(&self) -> bool {
        match self.file.text.header(PUBLISH_HEADER) {
            Some(value) => value.trim() == AUTOPUBLISH_VALUE,
            None => false,
        }
    }

    /// In-memory only; takes effect on the next save.
    pub fn set_autopublish(&mut self, autopublish: bool) {
        if autopublish {
            self.file.text.set_header(PUBLISH_HEADER, AUTOPUBLISH_VALUE);
        } else {
            self.file.text.remove_header(PUBLISH_HEADER);
        }
    }

    /// Writes (or overwrites) the draft file under the drafts root.
    pub fn save(&mut self, body: &str) -> io::Result<()> {
        self.file.save(body)
    }

    /// Moves the draft into the posts root as `<today>-<slug>`, stripping
    /// the publish marker on the way. Refuses to overwrite an existing
    /// post of the same destination name.
    pub fn publish(&mut self, site: &Site) -> io::Result<()> {
        // The move always sources from the drafts root, so publishing an
        // already-published draft fails as not-found
        let src = site.drafts_path().join(&self.file.slug);
        if !src.is_file() {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("Draft file is gone: {}", src.display()),
            ));
        }

        let today = Local::now().date_naive();
        let dest_name = format!("{}-{}", today.format("%Y-%m-%d"), self.file.slug);
        let dest = site.posts_path().join(dest_name);

        if dest.exists() {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("Refusing to overwrite existing post {}", dest.display()),
            ));
        }

        if self.file.text.remove_header(PUBLISH_HEADER) {
            fs::write(&src, self.file.text.serialize())?;
        }

        fs::create_dir_all(site.posts_path())?;
        fs::rename(&src, &dest)?;
        self.file.path = dest;
        Ok(())
    }

    /// Moves the file into the trash root as `<timestamp>-<slug>`,
    /// creating the trash root on demand. Valid wherever the file
    /// currently lives. The record stays addressable but must not be
    /// saved again.
    pub fn delete(&mut self, site: &Site) -> io::Result<()> {
        if !self.file.path.is_file() {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("Draft file is gone: {}", self.file.path.display()),
            ));
        }

        let trash_dir = site.trash_path();
        fs::create_dir_all(&trash_dir)?;

        let dest = Self::trash_dest(&trash_dir, &self.file.slug);
        fs::rename(&self.file.path, &dest)?;
        self.file.path = dest;
        Ok(())
    }

    // Bumps the timestamp until the name is free, so repeated deletions
    // of the same slug never collide.
    fn trash_dest(trash_dir: &PathBuf, slug: &str) -> PathBuf {
        let mut stamp = Local::now().timestamp();
        loop {
            let dest = trash_dir.join(format!("{}-{}", stamp, slug));
            if !dest.exists() {
                return dest;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use crate::content::post::Post;

    use super::*;

    fn test_site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path());
        (dir, site)
    }

    #[test]
    fn test_save_and_exists() {
        let (_dir, site) = test_site();

        let mut draft = Draft::new(&site, "test-draft");
        draft.set_title("Some draft title");

        assert!(!Draft::exists(&site, "test-draft"));

        draft.save("some content").unwrap();

        assert!(Draft::exists(&site, "test-draft"));
        assert!(site.drafts_path().join("test-draft").is_file());

        // Overwrite in place keeps a single file
        draft.save("new content").unwrap();
        let reloaded = Draft::open(&site, "test-draft").unwrap();
        assert_eq!(reloaded.file.text.body, "new content");
    }

    #[test]
    fn test_autopublish_detection() {
        let (_dir, site) = test_site();
        let mut draft = Draft::new(&site, "x");

        assert!(!draft.autopublish());

        draft.file.text.set_header("publish", " now  ");
        assert!(draft.autopublish());

        draft.file.text.set_header("publish", "tomorrow");
        assert!(!draft.autopublish());

        draft.set_autopublish(true);
        assert!(draft.autopublish());

        draft.set_autopublish(false);
        assert!(draft.file.text.header("publish").is_none());
        // Removing an absent marker is fine
        draft.set_autopublish(false);
        assert!(!draft.autopublish());
    }

    #[test]
    fn test_publish_moves_and_strips_marker() {
        let (_dir, site) = test_site();

        let mut draft = Draft::new(&site, "hello-world");
        draft.set_title("Hello");
        draft.set_autopublish(true);
        draft.save("Hi there").unwrap();

        draft.publish(&site).unwrap();

        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let expected = site.posts_path().join(format!("{}-hello-world", today));
        assert_eq!(draft.file.path, expected);
        assert!(expected.is_file());
        assert!(!site.drafts_path().join("hello-world").exists());
        assert!(!draft.autopublish());

        let post = Post::from_slug(&site, "hello-world").unwrap();
        assert_eq!(post.file.text.header("publish"), None);
        assert_eq!(post.title(), Some("Hello"));
        assert_eq!(post.file.text.body, "Hi there");
    }

    #[test]
    fn test_publish_twice_fails() {
        let (_dir, site) = test_site();

        let mut draft = Draft::new(&site, "once");
        draft.save("body").unwrap();
        draft.publish(&site).unwrap();

        let err = draft.publish(&site).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_publish_collision_is_an_error() {
        let (_dir, site) = test_site();

        let mut first = Draft::new(&site, "same-slug");
        first.save("first").unwrap();
        first.publish(&site).unwrap();

        let mut second = Draft::new(&site, "same-slug");
        second.save("second").unwrap();

        let err = second.publish(&site).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        // The losing draft stays put
        assert!(Draft::exists(&site, "same-slug"));
    }

    #[test]
    fn test_delete_moves_to_trash() {
        let (_dir, site) = test_site();

        let mut draft = Draft::new(&site, "test-draft");
        draft.set_title("Some draft title");
        draft.save("some content").unwrap();
        draft.delete(&site).unwrap();

        assert!(site.trash_path().is_dir());
        assert!(draft.file.path.starts_with(site.trash_path()));
        let name = draft.file.path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("-test-draft"));
        assert!(!Draft::exists(&site, "test-draft"));
    }

    #[test]
    fn test_delete_same_slug_twice() {
        let (_dir, site) = test_site();

        let mut first = Draft::new(&site, "dup");
        first.save("one").unwrap();
        first.delete(&site).unwrap();

        let mut second = Draft::new(&site, "dup");
        second.save("two").unwrap();
        second.delete(&site).unwrap();

        assert_ne!(first.file.path, second.file.path);
        assert!(first.file.path.is_file());
        assert!(second.file.path.is_file());
    }

    #[test]
    fn test_all_ignores_missing_drafts_dir() {
        let (_dir, site) = test_site();
        assert!(Draft::all(&site).unwrap().is_empty());
    }
}
