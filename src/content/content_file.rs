use std::{fs, io};
use std::path::PathBuf;

use crate::content::headers::HeaderedText;

pub const DEFAULT_LAYOUT: &str = "default";

/// A slug-addressed file backed by a header block and a body.
///
/// `path` always points at the current on-disk location; lifecycle moves
/// (publish, delete) update it so an in-memory instance stays valid.
#[derive(Debug)]
pub struct ContentFile {
    pub slug: String,
    pub path: PathBuf,
    pub text: HeaderedText,
}

impl ContentFile {
    pub fn new(slug: String, path: PathBuf) -> ContentFile {
        ContentFile {
            slug,
            path,
            text: HeaderedText::new(),
        }
    }

    pub fn load(slug: String, path: PathBuf) -> io::Result<ContentFile> {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                return Err(io::Error::new(
                    e.kind(),
                    format!("Error reading content file {}: {}", path.display(), e),
                ));
            }
        };

        Ok(ContentFile {
            slug,
            path,
            text: HeaderedText::parse(&raw),
        })
    }

    /// Serializes the current headers plus the given body and writes them to
    /// `path`, creating parent directories as needed.
    pub fn save(&mut self, body: &str) -> io::Result<()> {
        self.text.body = body.to_string();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.text.serialize())
    }

    pub fn title(&self) -> Option<&str> {
        self.text.header("title")
    }

    pub fn set_title(&mut self, title: &str) {
        self.text.set_header("title", title);
    }

    pub fn layout(&self) -> &str {
        self.text.header("layout").unwrap_or(DEFAULT_LAYOUT)
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn test_load_missing_file() {
        let err = ContentFile::load(
            "nope".to_string(),
            PathBuf::from("/definitely/not/here/nope"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("a-slug");

        let mut file = ContentFile::new("a-slug".to_string(), path.clone());
        file.set_title("A title");
        file.save("The body\n").unwrap();

        let loaded = ContentFile::load("a-slug".to_string(), path).unwrap();
        assert_eq!(loaded.title(), Some("A title"));
        assert_eq!(loaded.text.body, "The body\n");
    }

    #[test]
    fn test_layout_defaults() {
        let mut file = ContentFile::new("x".to_string(), PathBuf::from("x"));
        assert_eq!(file.layout(), "default");

        file.text.set_header("layout", "none");
        assert_eq!(file.layout(), "none");
    }

    #[test]
    fn test_header_mutation_is_not_persisted_until_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft");

        let mut file = ContentFile::new("draft".to_string(), path.clone());
        file.save("body").unwrap();

        let mut reloaded = ContentFile::load("draft".to_string(), path.clone()).unwrap();
        reloaded.text.set_header("publish", "now");

        let on_disk = ContentFile::load("draft".to_string(), path).unwrap();
        assert_eq!(on_disk.text.header("publish"), None);
    }
}
