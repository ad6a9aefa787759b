use crate::collection::group_by_year;
use crate::config::SiteConfig;
use crate::page::Page;
use crate::post::Post;
use crate::template::{Error as TemplateError, Templates};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Responsible for templating pages and writing them to disk beneath the
/// output root.
pub struct Writer<'a> {
    /// The parsed template set.
    pub templates: &'a Templates,

    /// Site metadata shared by every page.
    pub site: &'a SiteConfig,

    /// The directory all pages are written beneath.
    pub output_directory: &'a Path,

    /// The number of posts listed on the home page.
    pub home_page_size: usize,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk. Parent
    /// directories are created as needed.
    fn write_page(&self, page: &Page) -> Result<()> {
        let output = self.templates.render(page)?;
        let relative = page.output_path();
        let path = self.output_directory.join(&relative);
        write_file(&path, &output)?;
        log::info!("Generated: {}", relative.display());
        Ok(())
    }

    /// Writes one page per post. `posts` must already be sorted.
    pub fn write_post_pages(&self, posts: &[Post]) -> Result<()> {
        posts
            .iter()
            .map(|post| {
                self.write_page(&Page::Post {
                    site: self.site,
                    post,
                })
            })
            .collect()
    }

    /// Writes the home page with the most recent posts.
    pub fn write_home_page(&self, posts: &[Post]) -> Result<()> {
        let recent = &posts[..posts.len().min(self.home_page_size)];
        self.write_page(&Page::Home {
            site: self.site,
            posts: recent,
        })
    }

    /// Writes the archive page with every post grouped by year.
    pub fn write_archive_page(&self, posts: &[Post]) -> Result<()> {
        let years = group_by_year(posts);
        self.write_page(&Page::Archive {
            site: self.site,
            years: &years,
        })
    }
}

/// Writes `contents` to `path`, creating parent directories first.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let write_error = |err: io::Error| Error::Write {
        path: path.to_owned(),
        err,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(TemplateError),

    /// An error writing the output files.
    Write { path: PathBuf, err: io::Error },
}

impl From<TemplateError> for Error {
    /// Converts a [`TemplateError`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible template operations.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Write { path, err } => {
                write!(f, "writing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frontmatter::parse_date;
    use std::fs;

    const BASE: &str = r#"{{template "content" .}}"#;
    const HOME: &str = r#"{{define "content"}}{{range .Posts}}<li>{{.Slug}}</li>{{end}}{{end}}"#;
    const POST: &str = r#"{{define "content"}}<h1>{{.Post.Title}}</h1>{{.Post.Content}}{{end}}"#;
    const ARCHIVE: &str = r#"{{define "content"}}{{range .Years}}<h2>{{.Year}}</h2>{{end}}{{end}}"#;

    fn posts(n: usize) -> Vec<Post> {
        (0..n)
            .map(|i| {
                let slug = format!("post-{}", i);
                Post {
                    title: slug.clone(),
                    date: parse_date(&format!("20{:02}-01-01", 30 - i)).unwrap(),
                    description: String::new(),
                    body: String::from("<p>body</p>"),
                    url: format!("/posts/{}/", slug),
                    slug,
                }
            })
            .collect()
    }

    #[test]
    fn test_write_pages() {
        let out = tempfile::tempdir().unwrap();
        let templates = Templates::from_sources(BASE, [HOME, POST, ARCHIVE]).unwrap();
        let site = SiteConfig::default();
        let writer = Writer {
            templates: &templates,
            site: &site,
            output_directory: out.path(),
            home_page_size: 5,
        };
        let posts = posts(7);

        writer.write_post_pages(&posts).unwrap();
        writer.write_home_page(&posts).unwrap();
        writer.write_archive_page(&posts).unwrap();

        let page = fs::read_to_string(out.path().join("posts/post-3/index.html")).unwrap();
        assert!(page.starts_with("<h1>post-3</h1><p>body</p>"));

        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert_eq!(home.matches("<li>").count(), 5);
        assert!(home.starts_with("<li>post-0</li><li>post-1</li>"));

        let archive = fs::read_to_string(out.path().join("archive/index.html")).unwrap();
        assert_eq!(archive.matches("<h2>").count(), 7);
        assert!(archive.starts_with("<h2>2030</h2><h2>2029</h2>"));
    }

    #[test]
    fn test_home_page_with_few_posts() {
        let out = tempfile::tempdir().unwrap();
        let templates = Templates::from_sources(BASE, [HOME, POST, ARCHIVE]).unwrap();
        let site = SiteConfig::default();
        let writer = Writer {
            templates: &templates,
            site: &site,
            output_directory: out.path(),
            home_page_size: 5,
        };

        writer.write_home_page(&posts(2)).unwrap();
        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert_eq!(home.matches("<li>").count(), 2);

        writer.write_home_page(&[]).unwrap();
        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert_eq!(home.matches("<li>").count(), 0);
    }
}
