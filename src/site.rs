use std::{fs, io};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use spdlog::info;

use crate::archive::{self, Archive};
use crate::config::{read_config, Config, Feed};
use crate::content::content_file::DEFAULT_LAYOUT;
use crate::content::draft::Draft;
use crate::content::headers::HeaderedText;
use crate::content::post::Post;
use crate::feed::{FeedChannel, FeedItem};
use crate::view::{self, PostContext, SiteContext};
use crate::view::archive_page::ArchivePageRenderer;
use crate::view::layout::{load_layout_src, Layout};
use crate::view::post_page::PostPageRenderer;

pub const CONFIG_FILE: &str = "_config.toml";
const DRAFTS_DIR: &str = "_drafts";
const POSTS_DIR: &str = "_posts";
const TRASH_DIR: &str = "_trash";
const LAYOUTS_DIR: &str = "_layouts";
const TEMPLATES_DIR: &str = "_templates";
const OUTPUT_DIR: &str = "_site";
const STAGING_SCAFFOLD: &str = "tmp";

/// A site rooted at one source directory. Holds no cached state; every
/// operation re-reads the disk, so paths are threaded explicitly instead
/// of switching the process directory.
pub struct Site {
    pub root: PathBuf,
}

impl Site {
    pub fn new<P: Into<PathBuf>>(root: P) -> Site {
        Site { root: root.into() }
    }

    pub fn drafts_path(&self) -> PathBuf {
        self.root.join(DRAFTS_DIR)
    }

    pub fn posts_path(&self) -> PathBuf {
        self.root.join(POSTS_DIR)
    }

    pub fn trash_path(&self) -> PathBuf {
        self.root.join(TRASH_DIR)
    }

    pub fn layouts_path(&self) -> PathBuf {
        self.root.join(LAYOUTS_DIR)
    }

    pub fn templates_path(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    /// Only operations that consult settings read the config file; draft
    /// and post lifecycle never does.
    pub fn config(&self) -> io::Result<Config> {
        read_config(&self.root.join(CONFIG_FILE))
    }

    /// All posts, newest first. Slug breaks creation-date ties so the
    /// ordering is stable across runs.
    pub fn posts(&self) -> io::Result<Vec<Post>> {
        let mut posts = Post::all(self)?;
        posts.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| a.slug().cmp(b.slug()))
        });
        Ok(posts)
    }

    pub fn archives(&self) -> io::Result<(Vec<Post>, Archive)> {
        let config = self.config()?;
        let posts = self.posts()?;
        let archive = archive::build(&posts, &config.archives.url_format);
        Ok((posts, archive))
    }

    pub fn archive_url_for_date(&self, date: NaiveDate) -> io::Result<String> {
        let config = self.config()?;
        Ok(archive::archive_url_for_date(&config.archives.url_format, date))
    }

    /// Most recent modification time across all posts; the current time
    /// for a site with no posts, so feeds always have a valid stamp.
    pub fn latest_update_time(&self) -> io::Result<DateTime<Utc>> {
        Ok(latest_update(&self.posts()?))
    }

    /// Bypassed files are copied byte-for-byte instead of templated.
    pub fn bypass(file_name: &str) -> bool {
        match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some("html") | Some("xml") => false,
            _ => true,
        }
    }

    /// The full build: autopublish sweep, render into a staging tree,
    /// then swap the staging tree into place. Any failure aborts before
    /// the swap, leaving the live output untouched.
    pub fn generate(&self) -> Result<()> {
        let config = self.config()?;

        self.preprocess_autopublish_drafts()?;

        let scaffold = self.root.join(STAGING_SCAFFOLD);
        let staging = scaffold.join(OUTPUT_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let files = collect_source_files(&self.root)?;

        let default_layout_src = load_layout_src(&self.layouts_path(), DEFAULT_LAYOUT)?;
        let default_layout = Layout::new(&default_layout_src)?;

        // Captured after the sweep so freshly published drafts are part
        // of this build
        let posts = self.posts()?;
        let latest = latest_update(&posts);
        let post_contexts = view::build_post_contexts(&posts)?;
        let arch = archive::build(&posts, &config.archives.url_format);
        let site_ctx = view::build_site_context(&post_contexts, &arch, latest);

        for rel in files.iter() {
            info!("Processing file: {}", rel.display());

            let src = self.root.join(rel);
            let dest = staging.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            let file_name = rel.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if Site::bypass(file_name) {
                fs::copy(&src, &dest)?;
            } else {
                let rendered = self.render_source_file(&src, &site_ctx, &default_layout)?;
                fs::write(&dest, rendered)?;
            }
        }

        if !post_contexts.is_empty() {
            let post_tpl_src = self.template_src("post.html")?;
            let post_page = PostPageRenderer::new(&post_tpl_src)?;

            for post_ctx in post_contexts.iter() {
                info!("Processing post: {}", post_ctx.slug);

                let content = post_page.render(post_ctx);
                let page = default_layout.render(&["Posts", &post_ctx.title], &content);

                let dest = staging.join(format!("{}.html", post_ctx.url.trim_start_matches('/')));
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&dest, page)?;
            }
        }

        if config.archives.enabled {
            let archive_tpl_src = self.template_src("archive_page.html")?;
            let archive_page = ArchivePageRenderer::new(&archive_tpl_src)?;

            for year in site_ctx.archive.years.iter() {
                for month in year.months.iter() {
                    info!("Processing archive page: {}", month.archive_url);

                    let content = archive_page.render(&site_ctx, month);
                    let page = default_layout.render(&[], &content);

                    let dest_dir = staging.join(month.archive_url.trim_start_matches('/'));
                    fs::create_dir_all(&dest_dir)?;
                    fs::write(dest_dir.join("index.html"), page)?;
                }
            }
        }

        if let Some(ref feed) = config.feed {
            info!("Processing feed");
            let items = feed_items(feed, &posts, &post_contexts);
            let channel = FeedChannel {
                title: &feed.title,
                link: &feed.site_url,
                description: &feed.description,
            };
            let xml = channel.render(&latest, &items)?;
            fs::write(staging.join("feed.xml"), xml)?;
        }

        // The only step touching the live tree. The previous output is
        // moved aside, never deleted.
        let live = self.output_path();
        if live.exists() {
            let backup = unique_backup_path(&self.root);
            info!("Backing up previous output to {}", backup.display());
            fs::rename(&live, &backup)?;
        }
        fs::rename(&staging, &live)?;

        // The scaffold is empty now; a leftover is not worth failing a
        // published build over
        let _ = fs::remove_dir(&scaffold);

        Ok(())
    }

    // Publishes every draft carrying the autopublish marker, before the
    // post list for the build is captured.
    fn preprocess_autopublish_drafts(&self) -> io::Result<()> {
        info!("Beginning pre-process step for drafts");
        for mut draft in Draft::all(self)? {
            if draft.autopublish() {
                info!("Autopublishing draft: {}", draft.slug());
                draft.publish(self)?;
            }
        }
        Ok(())
    }

    fn render_source_file(
        &self,
        src: &Path,
        site_ctx: &SiteContext,
        default_layout: &Layout,
    ) -> io::Result<String> {
        let raw = fs::read_to_string(src)?;
        let text = HeaderedText::parse(&raw);

        let title = text.header("title").map(|t| t.trim().to_string());
        let layout_name = text.header("layout").unwrap_or(DEFAULT_LAYOUT).to_string();

        let rendered_body = view::render_body(&text.body, site_ctx)?;

        if layout_name == "none" {
            return Ok(rendered_body);
        }

        // Absent titles are filtered out, keeping the list shape
        let titles: Vec<&str> = title.as_deref().into_iter().collect();

        if layout_name == DEFAULT_LAYOUT {
            Ok(default_layout.render(&titles, &rendered_body))
        } else {
            let layout_src = load_layout_src(&self.layouts_path(), &layout_name)?;
            let layout = Layout::new(&layout_src)?;
            Ok(layout.render(&titles, &rendered_body))
        }
    }

    fn template_src(&self, file_name: &str) -> io::Result<String> {
        let template_path = self.templates_path().join(file_name);
        match fs::read_to_string(&template_path) {
            Ok(src) => Ok(src),
            Err(e) => Err(io::Error::new(
                e.kind(),
                format!("Error reading template {}: {}", template_path.display(), e),
            )),
        }
    }
}

fn latest_update(posts: &[Post]) -> DateTime<Utc> {
    posts.iter().map(|p| p.updated).max().unwrap_or_else(Utc::now)
}

fn feed_items(feed: &Feed, posts: &[Post], contexts: &[PostContext]) -> Vec<FeedItem> {
    let base = feed.site_url.trim_end_matches('/');
    posts
        .iter()
        .zip(contexts.iter())
        .map(|(post, ctx)| FeedItem {
            title: ctx.title.clone(),
            link: format!("{}{}", base, ctx.url),
            description: ctx.content.clone(),
            pub_date: post.created.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        })
        .collect()
}

/// Every regular file under the source root, as relative paths.
/// Underscore-prefixed top-level segments and the staging scaffold are
/// left out; deeper underscores are ordinary content. Dot-prefixed
/// entries are skipped at every level.
fn collect_source_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('_') || name.starts_with('.') || name == STAGING_SCAFFOLD {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files_under(&entry.path(), PathBuf::from(name), &mut files)?;
        } else if file_type.is_file() {
            files.push(PathBuf::from(name));
        }
    }
    files.sort();
    Ok(files)
}

fn collect_files_under(dir: &Path, rel: PathBuf, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let child_rel = rel.join(name);
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files_under(&entry.path(), child_rel, files)?;
        } else if file_type.is_file() {
            files.push(child_rel);
        }
    }
    Ok(())
}

// Sibling of _site, stamped down to the second; a counter suffix covers
// two promotions inside the same second.
fn unique_backup_path(root: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
    let mut candidate = root.join(format!("{}.{}", OUTPUT_DIR, stamp));
    let mut counter = 1;
    while candidate.exists() {
        candidate = root.join(format!("{}.{}.{}", OUTPUT_DIR, stamp, counter));
        counter += 1;
    }
    candidate
}
