//! Loads the template set and renders [`Page`]s with it.
//!
//! A theme is a base layout (`base.html`) plus one template per page type
//! (`home.html`, `post.html`, `archive.html`). Each page template is
//! concatenated onto the base layout and parsed as one template, so the base
//! can call the named blocks (`{{template "title" .}}`,
//! `{{template "content" .}}`) that the page template `define`s.
//!
//! Two helpers are available in every template:
//!
//! * `formatDate` renders a `YYYY-MM-DD` date as `January 2, 2006`
//! * `formatDateShort` renders it as `Jan 2`

use crate::config::Config;
use crate::frontmatter::parse_date;
use crate::page::{Page, PageKind};
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// The base layout every page template is composed with.
pub const BASE_TEMPLATE: &str = "base.html";

/// One parsed template per [`PageKind`].
pub struct Templates {
    home: Template,
    post: Template,
    archive: Template,
}

impl Templates {
    /// Loads and parses the whole template set. Fails before anything is
    /// rendered if a file is missing or doesn't parse.
    pub fn load(config: &Config) -> Result<Templates> {
        let base_path = config.resolve_template(BASE_TEMPLATE);
        let base = read_template(&base_path)?;

        let load = |kind: PageKind| -> Result<Template> {
            let path = config.resolve_template(kind.template_name());
            let page = read_template(&path)?;
            parse_template(&base, &page).map_err(|message| Error::Parse { path, message })
        };

        Ok(Templates {
            home: load(PageKind::Home)?,
            post: load(PageKind::Post)?,
            archive: load(PageKind::Archive)?,
        })
    }

    /// Builds a template set from in-memory sources. `pages` are given in
    /// [`PageKind::ALL`] order.
    pub fn from_sources(base: &str, pages: [&str; 3]) -> Result<Templates> {
        let parse = |kind: PageKind, page: &str| -> Result<Template> {
            parse_template(base, page).map_err(|message| Error::Parse {
                path: PathBuf::from(kind.template_name()),
                message,
            })
        };
        let [home, post, archive] = pages;
        Ok(Templates {
            home: parse(PageKind::Home, home)?,
            post: parse(PageKind::Post, post)?,
            archive: parse(PageKind::Archive, archive)?,
        })
    }

    fn get(&self, kind: PageKind) -> &Template {
        match kind {
            PageKind::Home => &self.home,
            PageKind::Post => &self.post,
            PageKind::Archive => &self.archive,
        }
    }

    /// Renders `page` with the template for its kind.
    pub fn render(&self, page: &Page) -> Result<Vec<u8>> {
        let render_error = |message: String| Error::Render {
            page: page.output_path(),
            message,
        };
        let context = Context::from(page.to_value()).map_err(render_error)?;
        let mut output = Vec::new();
        self.get(page.kind())
            .execute(&mut output, &context)
            .map_err(render_error)?;
        Ok(output)
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::Load {
        path: path.to_owned(),
        err,
    })
}

// Appends the page template to the base layout and parses the result with
// the date helpers registered.
fn parse_template(base: &str, page: &str) -> std::result::Result<Template, String> {
    let mut contents = String::with_capacity(base.len() + page.len() + 1);
    contents.push_str(base);
    contents.push('\n');
    contents.push_str(page);

    let mut template = Template::default();
    template.add_func("formatDate", format_date);
    template.add_func("formatDateShort", format_date_short);
    template.parse(&contents)?;
    Ok(template)
}

fn date_arg(name: &str, args: &[Value]) -> std::result::Result<chrono::NaiveDate, String> {
    match args {
        [Value::String(date)] => parse_date(date).map_err(|e| format!("{}: {}", name, e)),
        _ => Err(format!("{} expects a single YYYY-MM-DD date", name)),
    }
}

/// `formatDate`: `2024-06-01` → `June 1, 2024`.
pub fn format_date(args: &[Value]) -> std::result::Result<Value, String> {
    let date = date_arg("formatDate", args)?;
    Ok(Value::String(date.format("%B %-d, %Y").to_string()))
}

/// `formatDateShort`: `2024-06-01` → `Jun 1`.
pub fn format_date_short(args: &[Value]) -> std::result::Result<Value, String> {
    let date = date_arg("formatDateShort", args)?;
    Ok(Value::String(date.format("%b %-d").to_string()))
}

/// Represents the result of a template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading or executing templates.
#[derive(Debug)]
pub enum Error {
    /// Returned when a template file can't be read (usually because it's
    /// missing from both the project and the defaults directory).
    Load { path: PathBuf, err: std::io::Error },

    /// Returned when a template doesn't parse.
    Parse { path: PathBuf, message: String },

    /// Returned when executing a template against a page fails, e.g. when
    /// the template calls a helper with the wrong arguments.
    Render { page: PathBuf, message: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load { path, err } => {
                write!(f, "loading template `{}`: {}", path.display(), err)
            }
            Error::Parse { path, message } => {
                write!(f, "parsing template `{}`: {}", path.display(), message)
            }
            Error::Render { page, message } => {
                write!(f, "rendering `{}`: {}", page.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load { path: _, err } => Some(err),
            Error::Parse { .. } => None,
            Error::Render { .. } => None,
        }
    }
}
