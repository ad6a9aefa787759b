//! Page contexts: the read-only projections of the site model that each page
//! type is rendered from.

use crate::collection::YearGroup;
use crate::config::SiteConfig;
use crate::post::Post;
use crate::value::posts_value;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The three page types. Each has its own template (composed with the base
/// layout) and a fixed output location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Post,
    Archive,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Home, PageKind::Post, PageKind::Archive];

    /// The template file for this page type.
    pub fn template_name(self) -> &'static str {
        match self {
            PageKind::Home => "home.html",
            PageKind::Post => "post.html",
            PageKind::Archive => "archive.html",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            PageKind::Home => "home",
            PageKind::Post => "post",
            PageKind::Archive => "archive",
        })
    }
}

/// The data bound to a template for one output page. Contexts borrow from the
/// post collection and own nothing.
#[derive(Debug)]
pub enum Page<'a> {
    /// The root page: the most recent posts, newest first.
    Home {
        site: &'a SiteConfig,
        posts: &'a [Post],
    },

    /// One post's own page.
    Post { site: &'a SiteConfig, post: &'a Post },

    /// Every post grouped by year, newest year first.
    Archive {
        site: &'a SiteConfig,
        years: &'a [YearGroup<'a>],
    },
}

impl Page<'_> {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Home { .. } => PageKind::Home,
            Page::Post { .. } => PageKind::Post,
            Page::Archive { .. } => PageKind::Archive,
        }
    }

    /// Where the page is written, relative to the output root.
    pub fn output_path(&self) -> PathBuf {
        match self {
            Page::Home { .. } => PathBuf::from("index.html"),
            Page::Post { post, .. } => post.output_path(),
            Page::Archive { .. } => Path::new("archive").join("index.html"),
        }
    }

    /// Converts the page into a [`Value::Object`] with a `Site` field plus
    /// `Posts` (home), `Post` (post) or `Years` (archive).
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        match self {
            Page::Home { site, posts } => {
                m.insert("Site".to_owned(), Value::from(*site));
                m.insert("Posts".to_owned(), posts_value(posts.iter()));
            }
            Page::Post { site, post } => {
                m.insert("Site".to_owned(), Value::from(*site));
                m.insert("Post".to_owned(), Value::from(*post));
            }
            Page::Archive { site, years } => {
                m.insert("Site".to_owned(), Value::from(*site));
                m.insert(
                    "Years".to_owned(),
                    Value::Array(years.iter().map(Value::from).collect()),
                );
            }
        }
        Value::Object(m)
    }
}
