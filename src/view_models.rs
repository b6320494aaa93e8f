use serde::{Deserialize, Serialize};

use crate::models::{Category, Comment, Post, Tag};
use crate::pagination::Page;
use crate::post_util;

const SUMMARY_CHARS: usize = 160;

#[derive(Debug, Serialize, Deserialize)]
pub struct Date {
    year: i32,
    month: u32,
    day: u32,
    date: String,
    time: String,
}

impl<T> std::convert::From<&T> for Date
where
    T: chrono::Datelike + chrono::Timelike,
{
    fn from(date: &T) -> Self {
        let date_str = format!("{}-{:02}-{:02}", date.year(), date.month(), date.day());
        let time_str = format!("{:02}:{:02}:{:02}", date.hour(), date.minute(), date.second());
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            date: date_str,
            time: time_str,
        }
    }
}

/// A post with its category resolved and its tag links flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl PostView {
    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
    #[serde(flatten)]
    pub page: Page<PostView>,
}

impl From<Page<PostView>> for PostList {
    fn from(mut page: Page<PostView>) -> Self {
        PostList {
            posts: std::mem::take(&mut page.items),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub post_count: i64,
}

/// What the templates see for a post card or article.
#[derive(Debug, Serialize)]
pub struct PostCard {
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub cover_image: Option<String>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub date: Date,
}

impl From<PostView> for PostCard {
    fn from(view: PostView) -> Self {
        let summary = match view.post.excerpt.as_deref() {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.to_string(),
            _ => post_util::summarize(&view.post.content, SUMMARY_CHARS),
        };
        PostCard {
            date: Date::from(&view.post.created_at),
            title: view.post.title,
            slug: view.post.slug,
            summary,
            cover_image: view.post.cover_image,
            category: view.category,
            tags: view.tags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Article {
    #[serde(flatten)]
    pub card: PostCard,
    pub html: String,
    pub comments: Vec<CommentView>,
}

impl Article {
    pub fn new_from(view: PostView, comments: Vec<Comment>) -> Self {
        let html = post_util::render_markdown(&view.post.content);
        Article {
            card: PostCard::from(view),
            html,
            comments: comments.into_iter().map(CommentView::from).collect(),
        }
    }
}

/// Comment as rendered on the public page; the email stays private.
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub author: String,
    pub content: String,
    pub date: Date,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        CommentView {
            date: Date::from(&comment.created_at),
            author: comment.author,
            content: comment.content,
        }
    }
}

/// Navigation for paginated pages. `base` already carries any query string
/// other than `page`.
#[derive(Debug, Serialize)]
pub struct Pager {
    pub current: i64,
    pub total_pages: i64,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pager {
    pub fn new<T>(page: &Page<T>, base: &str) -> Self {
        let sep = if base.contains('?') { '&' } else { '?' };
        let link = |n: i64| format!("{}{}page={}", base, sep, n);
        Pager {
            current: page.page,
            total_pages: page.total_pages,
            previous: if page.has_previous() { Some(link(page.page - 1)) } else { None },
            next: if page.has_next() { Some(link(page.page + 1)) } else { None },
        }
    }
}
