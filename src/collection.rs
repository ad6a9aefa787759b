//! Orders the post collection and groups it by year for the archive page.

use chrono::Datelike;

use crate::post::Post;

/// All of the posts published in one calendar year, in collection order.
#[derive(Debug, PartialEq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub posts: Vec<&'a Post>,
}

/// Sorts posts newest first. Posts sharing a date are ordered by slug so the
/// output doesn't depend on the order in which files were discovered.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

/// Groups an already-sorted collection by year. Because the input is sorted
/// newest first, years come out in descending order and each group keeps the
/// collection order.
pub fn group_by_year(posts: &[Post]) -> Vec<YearGroup<'_>> {
    let mut groups: Vec<YearGroup> = Vec::new();
    for post in posts {
        let year = post.date.year();
        match groups.last_mut() {
            Some(group) if group.year == year => group.posts.push(post),
            _ => groups.push(YearGroup {
                year,
                posts: vec![post],
            }),
        }
    }
    groups
}
