//! Creates new content files with a frontmatter block filled in.

use crate::config::Config;
use crate::frontmatter::DATE_FORMAT;
use crate::write::{write_file, Error as WriteError};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The inputs for a new post.
#[derive(Debug, Default, Clone)]
pub struct NewPost {
    pub title: String,

    /// Defaults to today's local date.
    pub date: Option<NaiveDate>,

    pub description: Option<String>,

    /// Markdown to place after the frontmatter. Whatever produced it (an
    /// editor, a converter) is the caller's business.
    pub body: Option<String>,
}

#[derive(Serialize)]
struct NewFrontmatter<'a> {
    title: &'a str,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Writes `{date}-{slugified title}.md` into the content directory and
/// returns its path. Existing files are never overwritten.
pub fn create(config: &Config, post: &NewPost) -> Result<PathBuf> {
    let title = post.title.trim();
    if title.is_empty() {
        return Err(Error::MissingTitle);
    }

    let date = post
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive())
        .format(DATE_FORMAT)
        .to_string();
    let path = config
        .content_directory
        .join(format!("{}-{}.md", date, slug::slugify(title)));
    if path.exists() {
        return Err(Error::Exists(path));
    }

    let yaml = serde_yaml::to_string(&NewFrontmatter {
        title,
        date,
        description: post.description.as_deref().filter(|d| !d.is_empty()),
    })?;

    let mut contents = String::from("---\n");
    contents.push_str(yaml.strip_prefix("---\n").unwrap_or(&yaml));
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str("---\n");
    if let Some(body) = post.body.as_deref().filter(|b| !b.trim().is_empty()) {
        contents.push('\n');
        contents.push_str(body);
        if !body.ends_with('\n') {
            contents.push('\n');
        }
    }

    write_file(&path, contents.as_bytes())?;
    log::info!("Created {}", path.display());
    Ok(path)
}

/// The result of creating a post.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a post.
#[derive(Debug)]
pub enum Error {
    /// Returned when the title is empty.
    MissingTitle,

    /// Returned when a content file with the derived name already exists.
    Exists(PathBuf),

    /// Returned when the frontmatter can't be serialized.
    Serialize(serde_yaml::Error),

    /// Returned when the file can't be written.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTitle => write!(f, "a title is required"),
            Error::Exists(path) => write!(f, "`{}` already exists", path.display()),
            Error::Serialize(err) => write!(f, "serializing frontmatter: {}", err),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingTitle => None,
            Error::Exists(_) => None,
            Error::Serialize(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Serialize(err)
    }
}

impl From<WriteError> for Error {
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
