//! Conversions from the site model into template [`Value`]s. Field names are
//! capitalized (`Title`, `Date`, ...) so themes address them as
//! `{{.Post.Title}}`.

use crate::collection::YearGroup;
use crate::config::SiteConfig;
use crate::frontmatter::DATE_FORMAT;
use crate::post::Post;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;

/// Escapes plain text for inclusion in HTML. Templates don't escape on their
/// own, so every untrusted string goes through here.
pub fn escaped(text: &str) -> Value {
    let mut out = String::with_capacity(text.len());
    // Writing into a `String` can't fail.
    let _ = escape_html(&mut out, text);
    Value::String(out)
}

impl From<&SiteConfig> for Value {
    fn from(site: &SiteConfig) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), escaped(&site.title));
        m.insert("URL".to_owned(), escaped(&site.url));
        m.insert("Description".to_owned(), escaped(&site.description));
        Value::Object(m)
    }
}

impl From<&Post> for Value {
    /// The body goes in as `Content` unescaped; it's already HTML.
    fn from(post: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), escaped(&post.title));
        m.insert("Slug".to_owned(), escaped(&post.slug));
        m.insert(
            "Date".to_owned(),
            Value::String(post.date.format(DATE_FORMAT).to_string()),
        );
        m.insert("Description".to_owned(), escaped(&post.description));
        m.insert("Content".to_owned(), Value::String(post.body.clone()));
        m.insert("URL".to_owned(), escaped(&post.url));
        Value::Object(m)
    }
}

impl From<&YearGroup<'_>> for Value {
    fn from(group: &YearGroup) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Year".to_owned(), Value::String(group.year.to_string()));
        m.insert("Posts".to_owned(), posts_value(group.posts.iter().copied()));
        Value::Object(m)
    }
}

/// Converts a sequence of posts into a [`Value::Array`].
pub fn posts_value<'a>(posts: impl Iterator<Item = &'a Post>) -> Value {
    Value::Array(posts.map(Value::from).collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
        match value {
            Value::Object(m) => &m[key],
            _ => panic!("not an object"),
        }
    }

    fn string(value: &Value) -> &str {
        match value {
            Value::String(s) => s,
            _ => panic!("not a string"),
        }
    }

    #[test]
    fn test_post_value() {
        let post = Post {
            title: "Fish & <Chips>".to_owned(),
            slug: "fish".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            description: "\"quoted\"".to_owned(),
            body: "<p>kept</p>".to_owned(),
            url: "/posts/fish/".to_owned(),
        };
        let value = Value::from(&post);
        assert_eq!(string(field(&value, "Title")), "Fish &amp; &lt;Chips&gt;");
        assert_eq!(string(field(&value, "Description")), "&quot;quoted&quot;");
        assert_eq!(string(field(&value, "Date")), "2024-03-09");
        assert_eq!(string(field(&value, "Content")), "<p>kept</p>");
        assert_eq!(string(field(&value, "URL")), "/posts/fish/");
    }

    #[test]
    fn test_site_value() {
        let site = SiteConfig {
            title: "A & B".to_owned(),
            url: "https://example.com".to_owned(),
            description: String::new(),
        };
        let value = Value::from(&site);
        assert_eq!(string(field(&value, "Title")), "A &amp; B");
        assert_eq!(string(field(&value, "URL")), "https://example.com");
        assert_eq!(string(field(&value, "Description")), "");
    }
}
