//! Support for creating an RSS 2.0 feed from a list of posts.

use crate::config::SiteConfig;
use crate::post::Post;
use chrono::{NaiveDate, NaiveTime};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::fmt;
use std::io::Write;

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 -0700`.
const RFC1123Z: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Formats a calendar date as a feed timestamp at midnight UTC.
pub fn feed_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format(RFC1123Z)
        .to_string()
}

/// Builds the feed channel from the first `limit` posts of an already-sorted
/// collection. `lastBuildDate` is the newest post's date, so the document only
/// changes when the content does.
pub fn feed(site: &SiteConfig, posts: &[Post], limit: usize) -> Channel {
    let items: Vec<Item> = posts
        .iter()
        .take(limit)
        .map(|post| feed_item(site, post))
        .collect();

    ChannelBuilder::default()
        .title(site.title.clone())
        .link(site.url.clone())
        .description(site.description.clone())
        .last_build_date(posts.first().map(|post| feed_date(post.date)))
        .items(items)
        .build()
}

fn feed_item(site: &SiteConfig, post: &Post) -> Item {
    let link = format!("{}{}", site.url, post.url);
    ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(link.clone()))
        .description(Some(post.description.clone()))
        .pub_date(Some(feed_date(post.date)))
        .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
        .build()
}

/// Creates the feed and writes it to `w` with an XML declaration and
/// two-space indentation.
pub fn write_feed<W: Write>(site: &SiteConfig, posts: &[Post], limit: usize, w: W) -> Result<()> {
    feed(site, posts, limit).pretty_write_to(w, b' ', 2)?;
    Ok(())
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem serializing the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when the channel can't be encoded as XML.
    Serialize(rss::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Serialize(err) => write!(f, "encoding RSS: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialize(err) => Some(err),
        }
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Serialize(err)
    }
}
