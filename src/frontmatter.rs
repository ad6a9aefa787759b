//! Splits a content file into its YAML frontmatter and its Markdown body.
//!
//! A content file looks like this:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2021-04-16
//! description: A greeting
//! draft: false
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! Parsing a [`Document`] only decodes the frontmatter; the body is converted
//! to HTML on demand by [`Document::to_html`], so callers can inspect the
//! metadata (e.g., to skip drafts) without paying for the conversion.

use chrono::NaiveDate;
use pulldown_cmark::{html, Parser};
use serde::Deserialize;
use std::fmt;

const FENCE: &str = "---";

/// Some editors prefix UTF-8 files with a byte order mark.
const BOM: char = '\u{feff}';

/// The fixed layout for frontmatter dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The metadata recognized in a content file's frontmatter. Unknown keys are
/// ignored.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// The title of the post.
    #[serde(default)]
    pub title: Option<String>,

    /// The publication date of the post as a `YYYY-MM-DD` string. Use
    /// [`Frontmatter::parse_date`] to get a calendar date.
    #[serde(default)]
    pub date: Option<String>,

    /// A short summary of the post.
    #[serde(default)]
    pub description: Option<String>,

    /// Drafts are excluded from every generated page and from the feed.
    #[serde(default)]
    pub draft: bool,
}

impl Frontmatter {
    /// Parses the `date` field, if present. Only the exact `YYYY-MM-DD`
    /// shape is accepted.
    pub fn parse_date(&self) -> Result<Option<NaiveDate>> {
        match &self.date {
            None => Ok(None),
            Some(date) => parse_date(date).map(Some),
        }
    }
}

/// Parses a `YYYY-MM-DD` date. [`NaiveDate::parse_from_str`] tolerates
/// unpadded fields, so the shape is checked before handing off to `chrono`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let well_formed = input.len() == 10
        && input.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::MalformedDate(input.to_owned()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| Error::MalformedDate(input.to_owned()))
}

/// A content file split into its decoded frontmatter and its raw Markdown
/// body.
#[derive(Debug)]
pub struct Document<'a> {
    pub frontmatter: Frontmatter,
    pub body: &'a str,
}

impl<'a> Document<'a> {
    /// Splits `input` into frontmatter and body. The frontmatter block must
    /// start on the first line with `---` and end at the next line consisting
    /// only of `---`. Input without an opening fence has empty frontmatter and
    /// is entirely body. The `date` field is left as text; drafts may carry a
    /// placeholder there.
    pub fn parse(input: &'a str) -> Result<Document<'a>> {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        let (yaml, body) = match split(input)? {
            Some(parts) => parts,
            None => {
                return Ok(Document {
                    frontmatter: Frontmatter::default(),
                    body: input,
                })
            }
        };

        let frontmatter = if yaml.trim().is_empty() {
            Frontmatter::default()
        } else {
            // A block holding only `~` or `null` decodes to `None`.
            serde_yaml::from_str::<Option<Frontmatter>>(yaml)?.unwrap_or_default()
        };

        Ok(Document { frontmatter, body })
    }

    /// Converts the Markdown body into an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut output = String::with_capacity(self.body.len() * 3 / 2);
        html::push_html(&mut output, Parser::new(self.body));
        output
    }
}

/// Returns the YAML text and the body, or `None` if the input doesn't open
/// with a fence line.
fn split(input: &str) -> Result<Option<(&str, &str)>> {
    let mut lines = input.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => return Ok(None),
    }

    let yaml_start = input.find('\n').map(|i| i + 1).unwrap_or(input.len());
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Ok(Some((
                &input[yaml_start..offset],
                &input[offset + line.len()..],
            )));
        }
        offset += line.len();
    }
    Err(Error::MissingEndFence)
}

/// Represents the result of a frontmatter-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem splitting or decoding a content file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the opening `---` fence has no matching closing fence.
    MissingEndFence,

    /// Returned when the frontmatter isn't YAML of the expected shape.
    MalformedMetadata(serde_yaml::Error),

    /// Returned when the `date` field isn't a `YYYY-MM-DD` calendar date.
    MalformedDate(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEndFence => {
                write!(f, "malformed metadata: missing closing `---`")
            }
            Error::MalformedMetadata(err) => {
                write!(f, "malformed metadata: {}", err)
            }
            Error::MalformedDate(date) => write!(
                f,
                "malformed date {:?}: expected the form YYYY-MM-DD",
                date
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEndFence => None,
            Error::MalformedMetadata(err) => Some(err),
            Error::MalformedDate(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::MalformedMetadata(err)
    }
}
