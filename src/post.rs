//! Defines the [`Post`] type and the logic for building posts from content
//! files on disk. See [`parse_posts`] for the directory walk and
//! [`build_post`] for the per-file rules (slug derivation, draft filtering,
//! default title and date).

use chrono::NaiveDate;
use std::fmt;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

use crate::frontmatter::{self, Document};

const MARKDOWN_EXTENSION: &str = ".md";

/// Length of a `YYYY-MM-DD-` filename prefix.
const DATE_PREFIX_LEN: usize = 11;

/// A single publishable post. Posts are created by [`build_post`] and are
/// read-only from then on.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post title, or `Untitled` if the frontmatter didn't set one.
    pub title: String,

    /// The URL-safe identifier derived from the file name (see
    /// [`derive_slug`]).
    pub slug: String,

    /// The publication date. Posts without a date get [`zero_date`].
    pub date: NaiveDate,

    /// The description from the frontmatter, or the empty string.
    pub description: String,

    /// The rendered HTML body. This is trusted and emitted verbatim.
    pub body: String,

    /// The site-relative path of the post page (`/posts/{slug}/`).
    pub url: String,
}

impl Post {
    /// The path of the post page relative to the output root.
    pub fn output_path(&self) -> PathBuf {
        Path::new("posts").join(&self.slug).join("index.html")
    }
}

/// The result of building a post from a content file that parsed
/// successfully. Drafts are an expected outcome, not an error.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The file produced a publishable post.
    Post(Post),

    /// The file is marked `draft: true` and must be left out of the site.
    Draft,
}

/// The date assigned to posts whose frontmatter has no `date`. It sorts
/// before every real date.
pub fn zero_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Derives a slug from a content file name: the `.md` extension is removed,
/// then a leading `YYYY-MM-DD-` shaped prefix (hyphens at offsets 4, 7 and
/// 10) is removed if anything follows it. No other normalization is applied.
pub fn derive_slug(file_name: &str) -> &str {
    let stem = file_name
        .strip_suffix(MARKDOWN_EXTENSION)
        .unwrap_or(file_name);
    let bytes = stem.as_bytes();
    if bytes.len() > DATE_PREFIX_LEN
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'-'
    {
        &stem[DATE_PREFIX_LEN..]
    } else {
        stem
    }
}

/// Builds a [`Post`] from a parsed [`Document`]. Drafts short-circuit before
/// the body is converted to HTML.
pub fn build_post(file_name: &str, document: &Document) -> frontmatter::Result<Outcome> {
    let frontmatter = &document.frontmatter;
    if frontmatter.draft {
        return Ok(Outcome::Draft);
    }

    let slug = derive_slug(file_name).to_owned();
    let date = match frontmatter.parse_date()? {
        Some(date) => date,
        None => {
            log::debug!("{} has no date; using {}", file_name, zero_date());
            zero_date()
        }
    };

    Ok(Outcome::Post(Post {
        title: match frontmatter.title.as_deref() {
            None | Some("") => String::from("Untitled"),
            Some(title) => title.to_owned(),
        },
        url: format!("/posts/{}/", slug),
        date,
        description: frontmatter.description.clone().unwrap_or_default(),
        body: document.to_html(),
        slug,
    }))
}

/// Reads and builds a single content file. `file_name` is the bare file name
/// used for slug derivation and error context.
pub fn parse_post(path: &Path, file_name: &str) -> Result<Outcome> {
    let contents = std::fs::read_to_string(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    Document::parse(&contents)
        .and_then(|document| build_post(file_name, &document))
        .map_err(|err| Error::Parse {
            file_name: file_name.to_owned(),
            err,
        })
}

/// Searches `source_directory` for content files (extension `.md`, not
/// descending into subdirectories) and returns the publishable posts in
/// discovery order. Drafts are logged and skipped. The directory listing is
/// sorted by file name first so the result doesn't depend on the filesystem.
pub fn parse_posts(source_directory: &Path) -> Result<Vec<Post>> {
    let read_error = |err: std::io::Error| Error::Read {
        path: source_directory.to_owned(),
        err,
    };

    let mut entries = Vec::new();
    for result in read_dir(source_directory).map_err(read_error)? {
        let entry = result.map_err(read_error)?;
        if entry.file_type().map_err(read_error)?.is_dir() {
            continue;
        }
        let file_name = entry
            .file_name()
            .into_string()
            .map_err(|_| Error::InvalidFileName(entry.path()))?;
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            entries.push((file_name, entry.path()));
        }
    }
    entries.sort();

    let mut posts = Vec::with_capacity(entries.len());
    for (file_name, path) in entries {
        match parse_post(&path, &file_name)? {
            Outcome::Post(post) => posts.push(post),
            Outcome::Draft => log::info!("Skipping draft: {}", file_name),
        }
    }
    Ok(posts)
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading or parsing a content file.
#[derive(Debug)]
pub enum Error {
    /// Returned when a content file or the content directory can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when a content file's frontmatter is malformed.
    Parse {
        file_name: String,
        err: frontmatter::Error,
    },

    /// Returned when a content file name isn't valid UTF-8.
    InvalidFileName(PathBuf),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading `{}`: {}", path.display(), err)
            }
            Error::Parse { file_name, err } => {
                write!(f, "parsing {}: {}", file_name, err)
            }
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::Parse { file_name: _, err } => Some(err),
            Error::InvalidFileName(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn build(file_name: &str, input: &str) -> Outcome {
        build_post(file_name, &Document::parse(input).unwrap()).unwrap()
    }

    #[test]
    fn test_derive_slug_strips_date_prefix() {
        assert_eq!(derive_slug("2024-06-01-hello-world.md"), "hello-world");
        assert_eq!(derive_slug("1999-12-31-x.md"), "x");
    }

    #[test]
    fn test_derive_slug_without_prefix() {
        assert_eq!(derive_slug("hello-world.md"), "hello-world");
        assert_eq!(derive_slug("about.md"), "about");
        // Too short to carry anything after the prefix.
        assert_eq!(derive_slug("2024-06-01-.md"), "2024-06-01-");
        // Hyphens at the wrong offsets.
        assert_eq!(derive_slug("2024-6-01-hello.md"), "2024-6-01-hello");
        assert_eq!(derive_slug("20240601-hello.md"), "20240601-hello");
    }

    #[test]
    fn test_derive_slug_only_checks_shape() {
        assert_eq!(derive_slug("abcd-ef-gh-rest.md"), "rest");
    }

    #[test]
    fn test_derive_slug_non_ascii() {
        assert_eq!(derive_slug("2024-06-01-café.md"), "café");
        assert_eq!(derive_slug("café-notes.md"), "café-notes");
    }

    #[test]
    fn test_build_post() {
        let outcome = build(
            "2024-06-01-hello.md",
            "---\ntitle: Hello\ndate: 2024-06-01\ndescription: Hi there\n---\nBody\n",
        );
        assert_eq!(
            outcome,
            Outcome::Post(Post {
                title: "Hello".to_owned(),
                slug: "hello".to_owned(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                description: "Hi there".to_owned(),
                body: "<p>Body</p>\n".to_owned(),
                url: "/posts/hello/".to_owned(),
            })
        );
    }

    #[test]
    fn test_build_post_defaults() {
        match build("plain.md", "no frontmatter at all") {
            Outcome::Post(post) => {
                assert_eq!(post.title, "Untitled");
                assert_eq!(post.date, zero_date());
                assert_eq!(post.description, "");
                assert_eq!(post.url, "/posts/plain/");
            }
            Outcome::Draft => panic!("not a draft"),
        }
    }

    #[test]
    fn test_build_post_empty_title_is_untitled() {
        match build("x.md", "---\ntitle: \"\"\n---\n") {
            Outcome::Post(post) => assert_eq!(post.title, "Untitled"),
            Outcome::Draft => panic!("not a draft"),
        }
    }

    #[test]
    fn test_draft_is_skipped() {
        assert_eq!(
            build("secret.md", "---\ntitle: Secret\ndraft: true\n---\n"),
            Outcome::Draft
        );
    }

    #[test]
    fn test_draft_with_placeholder_date_is_skipped() {
        assert_eq!(
            build("wip.md", "---\ntitle: WIP\ndate: someday\ndraft: true\n---\n"),
            Outcome::Draft
        );
    }

    #[test]
    fn test_published_post_with_placeholder_date_fails() {
        let document = Document::parse("---\ntitle: WIP\ndate: someday\n---\n").unwrap();
        match build_post("wip.md", &document) {
            Err(frontmatter::Error::MalformedDate(date)) => assert_eq!(date, "someday"),
            other => panic!("expected MalformedDate, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_false_is_published() {
        match build("open.md", "---\ntitle: Open\ndraft: false\n---\n") {
            Outcome::Post(post) => assert_eq!(post.slug, "open"),
            Outcome::Draft => panic!("not a draft"),
        }
    }

    #[test]
    fn test_output_path() {
        if let Outcome::Post(post) = build("2024-01-01-a.md", "---\n---\n") {
            assert_eq!(post.output_path(), Path::new("posts/a/index.html"));
        } else {
            panic!("not a draft");
        }
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("2024-01-01-first.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\nOne\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("draft.md"),
            "---\ntitle: Draft\ndate: 2024-02-01\ndraft: true\n---\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.md")).unwrap();

        let posts = parse_posts(dir.path())?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "first");
        assert_eq!(posts[0].title, "First");
        Ok(())
    }

    #[test]
    fn test_parse_posts_reports_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), "---\ndate: 2024-1-1\n---\n").unwrap();

        match parse_posts(dir.path()) {
            Err(Error::Parse { file_name, err }) => {
                assert_eq!(file_name, "bad.md");
                assert!(matches!(err, frontmatter::Error::MalformedDate(_)));
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_posts_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        match parse_posts(&dir.path().join("missing")) {
            Err(Error::Read { .. }) => {}
            other => panic!("expected a read error, got {:?}", other),
        }
    }
}
