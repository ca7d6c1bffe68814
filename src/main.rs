use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use galley::content::draft::Draft;
use galley::logger::configure_logger;
use galley::scaffold::scaffold_site;
use galley::server::server_run;
use galley::site::Site;
use galley::text_utils::slug_from_title;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Build the site into _site
    Generate(SiteArgs),
    /// Manage drafts
    Draft(DraftArgs),
    /// Serve the generated site locally
    Serve(SiteArgs),
    /// Scaffold a new site
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct SiteArgs {
    /// Site root directory
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

#[derive(Parser, Debug)]
struct DraftArgs {
    /// Site root directory
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    action: DraftAction,
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    /// Create a draft
    New {
        /// Slug; derived from the title when not given
        slug: Option<String>,

        /// Title header for the new draft
        #[arg(short, long)]
        title: Option<String>,

        /// Mark the draft for publishing on the next build
        #[arg(long)]
        publish_now: bool,
    },
    /// Move a draft into the posts directory
    Publish { slug: String },
    /// Move a draft into the trash
    Delete { slug: String },
    /// List drafts
    List,
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Directory for the new site
    out_dir: PathBuf,
}

#[ntex::main]
async fn main() -> Result<()> {
    match Args::parse() {
        Args::Generate(args) => {
            let site = Site::new(args.dir);
            let config = site.config()?;
            configure_logger(&config)?;
            site.generate()?;
        }
        Args::Draft(args) => {
            let site = Site::new(args.dir);
            draft_cmd(&site, args.action)?;
        }
        Args::Serve(args) => {
            let site = Site::new(args.dir);
            let config = site.config()?;
            configure_logger(&config)?;
            server_run(site, config).await?;
        }
        Args::New(args) => {
            scaffold_site(&args.out_dir)?;
            println!("New site scaffolded at {}", args.out_dir.display());
        }
    }

    Ok(())
}

fn draft_cmd(site: &Site, action: DraftAction) -> Result<()> {
    match action {
        DraftAction::New {
            slug,
            title,
            publish_now,
        } => {
            let slug = match (slug, &title) {
                (Some(slug), _) => slug,
                (None, Some(title)) => slug_from_title(title),
                (None, None) => bail!("Either a slug or --title is required"),
            };
            if slug.is_empty() || slug.contains('/') || slug.starts_with('.') {
                bail!("Not a usable slug: {:?}", slug);
            }
            if Draft::exists(site, &slug) {
                bail!("Draft already exists: {}", slug);
            }

            let mut draft = Draft::new(site, &slug);
            if let Some(ref title) = title {
                draft.set_title(title);
            }
            draft.set_autopublish(publish_now);
            draft.save("")?;
            println!("Created draft {}", draft.file.path.display());
        }
        DraftAction::Publish { slug } => {
            let mut draft = Draft::open(site, &slug)?;
            draft.publish(site)?;
            println!("Published to {}", draft.file.path.display());
        }
        DraftAction::Delete { slug } => {
            let mut draft = Draft::open(site, &slug)?;
            draft.delete(site)?;
            println!("Moved to {}", draft.file.path.display());
        }
        DraftAction::List => {
            for draft in Draft::all(site)? {
                let marker = if draft.autopublish() { " (publish: now)" } else { "" };
                match draft.title() {
                    Some(title) => println!("{} - {}{}", draft.slug(), title, marker),
                    None => println!("{}{}", draft.slug(), marker),
                }
            }
        }
    }

    Ok(())
}
