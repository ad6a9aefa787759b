//! The library code for the `quire` static blog generator. A build is a
//! single sequential pass:
//!
//! 1. Parsing content files into posts ([`crate::frontmatter`],
//!    [`crate::post`])
//! 2. Ordering the posts and grouping them by year ([`crate::collection`])
//! 3. Rendering the post, home and archive pages ([`crate::template`],
//!    [`crate::page`], [`crate::write`])
//! 4. Writing the RSS feed ([`crate::feed`])
//! 5. Mirroring static assets into the output ([`crate::assets`])
//!
//! [`crate::build::build_site`] runs all of them in order against a
//! [`crate::config::Config`].
//!
//! Posts are Markdown files with YAML frontmatter. The slug comes from the
//! file name with any `YYYY-MM-DD-` prefix removed, so
//! `posts/2024-06-01-hello.md` is published at `/posts/hello/`. Posts marked
//! `draft: true` are left out of every page and the feed.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod collection;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod new_post;
pub mod page;
pub mod post;
pub mod template;
pub mod value;
pub mod write;
