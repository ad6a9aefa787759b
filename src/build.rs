//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: clearing the output directory,
//! loading templates ([`crate::template`]), parsing the posts
//! ([`crate::post`]), rendering post, home and archive pages
//! ([`crate::write`]), generating the RSS feed ([`crate::feed`]) and copying
//! static assets ([`crate::assets`]).
//!
//! Every step either completes or aborts the build. There is no rollback; a
//! failed build leaves a partially-populated output directory which the next
//! run clears.

use crate::assets::{copy_assets, Error as AssetsError};
use crate::collection::sort_posts;
use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError};
use crate::post::{parse_posts, Error as ParseError};
use crate::template::{Error as TemplateError, Templates};
use crate::write::{write_file, Error as WriteError, Writer};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The file name of the feed in the output root.
pub const FEED_FILE: &str = "feed.xml";

/// An empty file that tells GitHub Pages not to run Jekyll over the output.
pub const MARKER_FILE: &str = ".nojekyll";

/// Builds the site described by `config`. Returns the number of posts that
/// were published (drafts excluded).
pub fn build_site(config: &Config) -> Result<usize> {
    let output = &config.output_directory;

    clean_dir(output).in_step(Step::Clean)?;

    let templates = Templates::load(config).in_step(Step::LoadTemplates)?;

    let mut posts = parse_posts(&config.content_directory).in_step(Step::ParsePosts)?;
    sort_posts(&mut posts);
    log::info!("Found {} posts", posts.len());

    let writer = Writer {
        templates: &templates,
        site: &config.site,
        output_directory: output,
        home_page_size: config.home_page_size,
    };
    writer.write_post_pages(&posts).in_step(Step::PostPages)?;
    writer.write_home_page(&posts).in_step(Step::HomePage)?;
    writer.write_archive_page(&posts).in_step(Step::ArchivePage)?;

    let mut feed = Vec::new();
    write_feed(&config.site, &posts, config.feed_size, &mut feed).in_step(Step::Feed)?;
    write_file(&output.join(FEED_FILE), &feed).in_step(Step::Feed)?;
    log::info!("Generated: {}", FEED_FILE);

    copy_assets(&config.static_sources()[..], output).in_step(Step::StaticFiles)?;

    write_file(&output.join(MARKER_FILE), &[]).in_step(Step::Marker)?;

    log::info!("Site generated successfully!");
    Ok(posts.len())
}

/// Removes everything inside the output directory without removing the
/// directory itself.
pub fn clean(config: &Config) -> Result<()> {
    clean_dir(&config.output_directory).in_step(Step::Clean)?;
    log::info!("Cleaned output directory");
    Ok(())
}

/// Deletes the contents of `dir`, creating it first if it doesn't exist. The
/// directory itself is kept since it may be a mount point.
fn clean_dir(dir: &Path) -> std::result::Result<(), Cause> {
    std::fs::create_dir_all(dir).map_err(clean_error(dir))?;
    for result in std::fs::read_dir(dir).map_err(clean_error(dir))? {
        let entry = result.map_err(clean_error(dir))?;
        let path = entry.path();
        let removed = if entry.file_type().map_err(clean_error(&path))?.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(clean_error(&path))?;
    }
    Ok(())
}

fn clean_error(path: &Path) -> impl FnOnce(io::Error) -> Cause {
    let path = path.to_owned();
    move |err| Cause::Clean { path, err }
}

/// The named steps of a build, used to give errors context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Clean,
    LoadTemplates,
    ParsePosts,
    PostPages,
    HomePage,
    ArchivePage,
    Feed,
    StaticFiles,
    Marker,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Step::Clean => "cleaning output directory",
            Step::LoadTemplates => "loading templates",
            Step::ParsePosts => "parsing posts",
            Step::PostPages => "generating post pages",
            Step::HomePage => "generating home page",
            Step::ArchivePage => "generating archive page",
            Step::Feed => "generating RSS feed",
            Step::StaticFiles => "copying static files",
            Step::Marker => "writing .nojekyll",
        })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site: the step that failed and why.
#[derive(Debug)]
pub struct Error {
    pub step: Step,
    pub cause: Cause,
}

/// The underlying reason a build step failed.
#[derive(Debug)]
pub enum Cause {
    /// Returned for I/O problems while clearing the output directory.
    Clean { path: PathBuf, err: io::Error },

    /// Returned for errors loading or parsing template files.
    Template(TemplateError),

    /// Returned for errors reading or parsing content files.
    Parse(ParseError),

    /// Returned for errors rendering pages or writing output files.
    Write(WriteError),

    /// Returned for errors encoding the feed.
    Feed(FeedError),

    /// Returned for errors copying static assets.
    Assets(AssetsError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.cause)
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl fmt::Display for Cause {
    /// Implements [`fmt::Display`] for [`Cause`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cause::Clean { path, err } => {
                write!(f, "cleaning `{}`: {}", path.display(), err)
            }
            Cause::Template(err) => err.fmt(f),
            Cause::Parse(err) => err.fmt(f),
            Cause::Write(err) => err.fmt(f),
            Cause::Feed(err) => err.fmt(f),
            Cause::Assets(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Cause {
    /// Implements [`std::error::Error`] for [`Cause`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Cause::Clean { path: _, err } => Some(err),
            Cause::Template(err) => Some(err),
            Cause::Parse(err) => Some(err),
            Cause::Write(err) => Some(err),
            Cause::Feed(err) => Some(err),
            Cause::Assets(err) => Some(err),
        }
    }
}

impl From<TemplateError> for Cause {
    fn from(err: TemplateError) -> Cause {
        Cause::Template(err)
    }
}

impl From<ParseError> for Cause {
    fn from(err: ParseError) -> Cause {
        Cause::Parse(err)
    }
}

impl From<WriteError> for Cause {
    fn from(err: WriteError) -> Cause {
        Cause::Write(err)
    }
}

impl From<FeedError> for Cause {
    fn from(err: FeedError) -> Cause {
        Cause::Feed(err)
    }
}

impl From<AssetsError> for Cause {
    fn from(err: AssetsError) -> Cause {
        Cause::Assets(err)
    }
}

/// Tags a step's failure with the step's name.
trait InStep<T> {
    fn in_step(self, step: Step) -> Result<T>;
}

impl<T, E: Into<Cause>> InStep<T> for std::result::Result<T, E> {
    fn in_step(self, step: Step) -> Result<T> {
        self.map_err(|err| Error {
            step,
            cause: err.into(),
        })
    }
}
