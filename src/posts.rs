use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Deserializer};

use crate::errors::BlogError;
use crate::models::{Category, NewPost, Post, PostChanges, PostTag, Tag};
use crate::pagination::{Page, PageRequest};
use crate::post_util::{like_pattern, non_blank, validate_slug};
use crate::schema::{categories, comments, post_tags, posts, tags};
use crate::view_models::PostView;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPostInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

/// Partial update. Omitted fields keep their value; `categoryId: null`
/// clears the category while omitting it keeps the category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub category_id: Option<Option<i32>>,
    pub tag_ids: Option<Vec<i32>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.cover_image.is_none()
            && self.published.is_none()
            && self.category_id.is_none()
            && self.tag_ids.is_none()
    }
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

enum PostFilter {
    Published(Option<bool>),
    Search(String),
    Category(i32),
    Tag(i32),
}

impl PostFilter {
    fn query<'a>(&self) -> posts::BoxedQuery<'a, Sqlite> {
        let query = posts::table.into_boxed();
        match self {
            PostFilter::Published(None) => query,
            PostFilter::Published(Some(published)) => query.filter(posts::published.eq(*published)),
            PostFilter::Search(pattern) => query.filter(posts::published.eq(true)).filter(
                posts::title
                    .like(pattern.clone())
                    .escape('\\')
                    .or(posts::content.like(pattern.clone()).escape('\\'))
                    .or(posts::excerpt.like(pattern.clone()).escape('\\')),
            ),
            PostFilter::Category(category_id) => query
                .filter(posts::published.eq(true))
                .filter(posts::category_id.eq(*category_id)),
            PostFilter::Tag(tag_id) => query.filter(posts::published.eq(true)).filter(
                posts::id.eq_any(
                    post_tags::table
                        .filter(post_tags::tag_id.eq(*tag_id))
                        .select(post_tags::post_id),
                ),
            ),
        }
    }
}

pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Posts newest first, optionally restricted to one value of the published flag.
pub fn list(
    conn: &mut SqliteConnection,
    published: Option<bool>,
    page: PageRequest,
) -> Result<Page<PostView>, BlogError> {
    load_page(conn, &PostFilter::Published(published), page)
}

/// Literal substring match on title, content and excerpt of published posts.
pub fn search(
    conn: &mut SqliteConnection,
    term: &str,
    page: PageRequest,
) -> Result<Page<PostView>, BlogError> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Page::empty(page));
    }
    load_page(conn, &PostFilter::Search(like_pattern(term)), page)
}

pub fn list_by_category(
    conn: &mut SqliteConnection,
    category_id: i32,
    page: PageRequest,
) -> Result<Page<PostView>, BlogError> {
    load_page(conn, &PostFilter::Category(category_id), page)
}

pub fn list_by_tag(
    conn: &mut SqliteConnection,
    tag_id: i32,
    page: PageRequest,
) -> Result<Page<PostView>, BlogError> {
    load_page(conn, &PostFilter::Tag(tag_id), page)
}

fn load_page(
    conn: &mut SqliteConnection,
    filter: &PostFilter,
    page: PageRequest,
) -> Result<Page<PostView>, BlogError> {
    let total: i64 = filter.query().count().get_result(conn)?;
    let rows = filter
        .query()
        .order((posts::created_at.desc(), posts::id.desc()))
        .limit(page.limit)
        .offset(page.offset())
        .load::<Post>(conn)?;

    Ok(Page::new(with_relations(conn, rows)?, total, page))
}

pub fn get(conn: &mut SqliteConnection, id: i32) -> Result<PostView, BlogError> {
    let post = find(conn, id)?;
    one_with_relations(conn, post)
}

pub fn get_published_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<PostView, BlogError> {
    let post = Post::by_slug(slug)
        .filter(posts::published.eq(true))
        .first::<Post>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Post"))?;
    one_with_relations(conn, post)
}

pub fn create(conn: &mut SqliteConnection, input: NewPostInput) -> Result<PostView, BlogError> {
    let title = non_blank(input.title.as_deref()).ok_or_else(BlogError::missing_fields)?;
    let slug = non_blank(input.slug.as_deref()).ok_or_else(BlogError::missing_fields)?;
    let content = input
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(BlogError::missing_fields)?;
    validate_slug(slug)?;
    let tag_ids = distinct(&input.tag_ids);

    conn.transaction(|conn| {
        ensure_slug_free(conn, slug, None)?;
        if let Some(category_id) = input.category_id {
            ensure_category_exists(conn, category_id)?;
        }
        ensure_tags_exist(conn, &tag_ids)?;

        let now = now();
        diesel::insert_into(posts::table)
            .values(&NewPost {
                title,
                slug,
                content,
                excerpt: input.excerpt.as_deref(),
                cover_image: input.cover_image.as_deref(),
                published: input.published.unwrap_or(false),
                created_at: now,
                updated_at: now,
                category_id: input.category_id,
            })
            .execute(conn)?;

        let post = Post::by_slug(slug).first::<Post>(conn)?;
        link_tags(conn, post.id, &tag_ids)?;
        one_with_relations(conn, post)
    })
}

/// Applies `patch` and, when `tagIds` is given, replaces the tag set. Both
/// happen in one transaction, so a failure never leaves a post without its
/// tags. An empty patch writes nothing.
pub fn update(conn: &mut SqliteConnection, id: i32, patch: PostPatch) -> Result<PostView, BlogError> {
    conn.transaction(|conn| {
        let existing = find(conn, id)?;
        if patch.is_empty() {
            return one_with_relations(conn, existing);
        }

        let title = supplied(patch.title.as_deref())?;
        let slug = supplied(patch.slug.as_deref())?;
        let content = patch
            .content
            .as_deref()
            .map(|c| {
                if c.trim().is_empty() {
                    Err(BlogError::missing_fields())
                } else {
                    Ok(c)
                }
            })
            .transpose()?;

        if let Some(slug) = slug {
            validate_slug(slug)?;
            if slug != existing.slug {
                ensure_slug_free(conn, slug, Some(id))?;
            }
        }
        if let Some(Some(category_id)) = patch.category_id {
            ensure_category_exists(conn, category_id)?;
        }

        let changes = PostChanges {
            title,
            slug,
            content,
            excerpt: patch.excerpt.as_deref(),
            cover_image: patch.cover_image.as_deref(),
            published: patch.published,
            category_id: patch.category_id,
            updated_at: Some(now()),
        };
        diesel::update(posts::table.find(id))
            .set(&changes)
            .execute(conn)?;

        if let Some(tag_ids) = &patch.tag_ids {
            let tag_ids = distinct(tag_ids);
            ensure_tags_exist(conn, &tag_ids)?;
            diesel::delete(post_tags::table.filter(post_tags::post_id.eq(id))).execute(conn)?;
            link_tags(conn, id, &tag_ids)?;
        }

        get(conn, id)
    })
}

/// Removes the post along with its tag links and comments.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<(), BlogError> {
    conn.transaction(|conn| {
        find(conn, id)?;
        diesel::delete(post_tags::table.filter(post_tags::post_id.eq(id))).execute(conn)?;
        diesel::delete(comments::table.filter(comments::post_id.eq(id))).execute(conn)?;
        diesel::delete(posts::table.find(id)).execute(conn)?;
        Ok(())
    })
}

pub(crate) fn find(conn: &mut SqliteConnection, id: i32) -> Result<Post, BlogError> {
    posts::table
        .find(id)
        .first::<Post>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Post"))
}

fn one_with_relations(conn: &mut SqliteConnection, post: Post) -> Result<PostView, BlogError> {
    with_relations(conn, vec![post])?
        .pop()
        .ok_or(BlogError::NotFound("Post"))
}

/// Resolves categories and tags for a batch of posts with two queries.
fn with_relations(conn: &mut SqliteConnection, rows: Vec<Post>) -> Result<Vec<PostView>, BlogError> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let links: Vec<(PostTag, Tag)> = PostTag::belonging_to(&rows)
        .inner_join(tags::table)
        .select((PostTag::as_select(), Tag::as_select()))
        .order(tags::name.asc())
        .load(conn)?;
    let tags_per_post = links.grouped_by(&rows);

    let category_ids: Vec<i32> = rows.iter().filter_map(|p| p.category_id).collect();
    let mut by_id: HashMap<i32, Category> = HashMap::new();
    if !category_ids.is_empty() {
        for category in categories::table
            .filter(categories::id.eq_any(category_ids))
            .load::<Category>(conn)?
        {
            by_id.insert(category.id, category);
        }
    }

    Ok(rows
        .into_iter()
        .zip(tags_per_post)
        .map(|(post, links)| PostView {
            category: post.category_id.and_then(|id| by_id.get(&id).cloned()),
            tags: links.into_iter().map(|(_, tag)| tag).collect(),
            post,
        })
        .collect())
}

fn supplied(value: Option<&str>) -> Result<Option<&str>, BlogError> {
    match value {
        None => Ok(None),
        Some(v) => non_blank(Some(v))
            .map(Some)
            .ok_or_else(BlogError::missing_fields),
    }
}

fn distinct(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn ensure_slug_free(conn: &mut SqliteConnection, slug: &str, except: Option<i32>) -> Result<(), BlogError> {
    let owner = posts::table
        .filter(posts::slug.eq(slug))
        .select(posts::id)
        .first::<i32>(conn)
        .optional()?;
    match owner {
        Some(owner) if Some(owner) != except => Err(BlogError::slug_taken("post")),
        _ => Ok(()),
    }
}

fn ensure_category_exists(conn: &mut SqliteConnection, category_id: i32) -> Result<(), BlogError> {
    let found: i64 = categories::table
        .filter(categories::id.eq(category_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(BlogError::Validation(format!("Unknown category id {}", category_id)));
    }
    Ok(())
}

fn ensure_tags_exist(conn: &mut SqliteConnection, tag_ids: &[i32]) -> Result<(), BlogError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let known: Vec<i32> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load(conn)?;
    if let Some(missing) = tag_ids.iter().find(|id| !known.contains(id)) {
        return Err(BlogError::Validation(format!("Unknown tag id {}", missing)));
    }
    Ok(())
}

fn link_tags(conn: &mut SqliteConnection, post_id: i32, tag_ids: &[i32]) -> Result<(), BlogError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<PostTag> = tag_ids
        .iter()
        .map(|&tag_id| PostTag { post_id, tag_id })
        .collect();
    diesel::insert_into(post_tags::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use diesel::prelude::*;

    use super::{NewPostInput, PostPatch};
    use crate::comments::{self, NewCommentInput};
    use crate::errors::BlogError;
    use crate::pagination::PageRequest;
    use crate::schema::{comments as comments_table, post_tags, posts as posts_table};
    use crate::test_util;

    fn post_count(conn: &mut SqliteConnection) -> i64 {
        posts_table::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn create_resolves_category_and_tags() {
        let mut conn = test_util::conn();
        let rust = test_util::tag(&mut conn, "Rust", "rust");
        let go = test_util::tag(&mut conn, "Go", "go");
        let tech = test_util::category(&mut conn, "Tech", "tech");

        let created = super::create(
            &mut conn,
            NewPostInput {
                category_id: Some(tech),
                tag_ids: vec![rust, go, rust],
                ..test_util::post_input("Hello", "hello")
            },
        )
        .unwrap();

        assert!(!created.post.published);
        assert_eq!(created.category.as_ref().map(|c| c.id), Some(tech));
        let mut ids = created.tag_ids();
        ids.sort();
        assert_eq!(ids, vec![rust, go]);

        let fetched = super::get(&mut conn, created.post.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn create_requires_title_slug_and_content() {
        let mut conn = test_util::conn();
        let err = super::create(
            &mut conn,
            NewPostInput {
                content: Some("   ".into()),
                ..test_util::post_input("Title", "title")
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));

        let err = super::create(
            &mut conn,
            NewPostInput {
                slug: None,
                ..test_util::post_input("Title", "title")
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
        assert_eq!(post_count(&mut conn), 0);
    }

    #[test]
    fn create_with_taken_slug_conflicts_and_changes_nothing() {
        let mut conn = test_util::conn();
        test_util::post(&mut conn, "dup", true);

        let err = super::create(&mut conn, test_util::post_input("Other", "dup")).unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
        assert_eq!(post_count(&mut conn), 1);
    }

    #[test]
    fn create_with_unknown_tag_creates_nothing() {
        let mut conn = test_util::conn();
        let err = super::create(
            &mut conn,
            NewPostInput {
                tag_ids: vec![42],
                ..test_util::post_input("Title", "title")
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
        assert_eq!(post_count(&mut conn), 0);
    }

    #[test]
    fn empty_update_leaves_post_identical() {
        let mut conn = test_util::conn();
        let tag = test_util::tag(&mut conn, "Rust", "rust");
        let category = test_util::category(&mut conn, "Tech", "tech");
        let before = super::create(
            &mut conn,
            NewPostInput {
                excerpt: Some("short".into()),
                category_id: Some(category),
                tag_ids: vec![tag],
                ..test_util::post_input("Same", "same")
            },
        )
        .unwrap();

        let after = super::update(&mut conn, before.post.id, PostPatch::default()).unwrap();
        assert_eq!(after, before);
        assert_eq!(super::get(&mut conn, before.post.id).unwrap(), before);
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut conn = test_util::conn();
        let before = super::create(
            &mut conn,
            NewPostInput {
                excerpt: Some("short".into()),
                cover_image: Some("/api/uploads/a.png".into()),
                ..test_util::post_input("Old", "old")
            },
        )
        .unwrap();

        let after = super::update(
            &mut conn,
            before.post.id,
            PostPatch {
                title: Some("New".into()),
                published: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(after.post.title, "New");
        assert!(after.post.published);
        assert_eq!(after.post.slug, before.post.slug);
        assert_eq!(after.post.content, before.post.content);
        assert_eq!(after.post.excerpt, before.post.excerpt);
        assert_eq!(after.post.cover_image, before.post.cover_image);
        assert_eq!(after.post.created_at, before.post.created_at);
        assert!(after.post.updated_at >= before.post.updated_at);
    }

    #[test]
    fn explicit_null_category_clears_but_omission_keeps() {
        let mut conn = test_util::conn();
        let category = test_util::category(&mut conn, "Tech", "tech");
        let post = super::create(
            &mut conn,
            NewPostInput {
                category_id: Some(category),
                ..test_util::post_input("Post", "post")
            },
        )
        .unwrap();

        let kept: PostPatch = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();
        let kept = super::update(&mut conn, post.post.id, kept).unwrap();
        assert_eq!(kept.post.category_id, Some(category));

        let cleared: PostPatch = serde_json::from_str(r#"{"categoryId": null}"#).unwrap();
        let cleared = super::update(&mut conn, post.post.id, cleared).unwrap();
        assert_eq!(cleared.post.category_id, None);
        assert!(cleared.category.is_none());
    }

    #[test]
    fn update_replaces_the_whole_tag_set() {
        let mut conn = test_util::conn();
        let one = test_util::tag(&mut conn, "One", "one");
        let two = test_util::tag(&mut conn, "Two", "two");
        let three = test_util::tag(&mut conn, "Three", "three");
        let post = super::create(
            &mut conn,
            NewPostInput {
                tag_ids: vec![one, two],
                ..test_util::post_input("Tagged", "tagged")
            },
        )
        .unwrap();

        let updated = super::update(
            &mut conn,
            post.post.id,
            PostPatch {
                tag_ids: Some(vec![two, three]),
                ..Default::default()
            },
        )
        .unwrap();

        let mut ids = updated.tag_ids();
        ids.sort();
        assert_eq!(ids, vec![two, three]);
    }

    #[test]
    fn failed_tag_replacement_keeps_old_tags() {
        let mut conn = test_util::conn();
        let one = test_util::tag(&mut conn, "One", "one");
        let post = super::create(
            &mut conn,
            NewPostInput {
                tag_ids: vec![one],
                ..test_util::post_input("Tagged", "tagged")
            },
        )
        .unwrap();

        let err = super::update(
            &mut conn,
            post.post.id,
            PostPatch {
                title: Some("Changed".into()),
                tag_ids: Some(vec![999]),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));

        let unchanged = super::get(&mut conn, post.post.id).unwrap();
        assert_eq!(unchanged, post);
    }

    #[test]
    fn update_to_another_posts_slug_conflicts() {
        let mut conn = test_util::conn();
        test_util::post(&mut conn, "first", true);
        let second = test_util::post(&mut conn, "second", true);

        let err = super::update(
            &mut conn,
            second.post.id,
            PostPatch {
                slug: Some("first".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
        assert_eq!(super::get(&mut conn, second.post.id).unwrap().post.slug, "second");

        // re-sending its own slug is not a collision
        let same = super::update(
            &mut conn,
            second.post.id,
            PostPatch {
                slug: Some("second".into()),
                ..Default::default()
            },
        );
        assert!(same.is_ok());
    }

    #[test]
    fn update_missing_post_is_not_found() {
        let mut conn = test_util::conn();
        let err = super::update(&mut conn, 7, PostPatch::default()).unwrap_err();
        assert!(matches!(err, BlogError::NotFound(_)));
    }

    #[test]
    fn delete_removes_links_and_comments() {
        let mut conn = test_util::conn();
        let tag = test_util::tag(&mut conn, "Rust", "rust");
        let post = super::create(
            &mut conn,
            NewPostInput {
                published: Some(true),
                tag_ids: vec![tag],
                ..test_util::post_input("Doomed", "doomed")
            },
        )
        .unwrap();
        comments::create(
            &mut conn,
            NewCommentInput {
                post_id: Some(post.post.id),
                author: Some("ann".into()),
                email: Some("ann@example.com".into()),
                content: Some("nice".into()),
            },
        )
        .unwrap();

        super::delete(&mut conn, post.post.id).unwrap();

        let links: i64 = post_tags::table.count().get_result(&mut conn).unwrap();
        let remaining: i64 = comments_table::table.count().get_result(&mut conn).unwrap();
        assert_eq!(links, 0);
        assert_eq!(remaining, 0);
        assert!(matches!(
            super::get(&mut conn, post.post.id),
            Err(BlogError::NotFound(_))
        ));
        assert!(matches!(
            super::delete(&mut conn, post.post.id),
            Err(BlogError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_on_published_and_orders_newest_first() {
        let mut conn = test_util::conn();
        let old = test_util::post(&mut conn, "old", true);
        let draft = test_util::post(&mut conn, "draft", false);
        let new = test_util::post(&mut conn, "new", true);
        test_util::backdate(&mut conn, old.post.id, 30);
        test_util::backdate(&mut conn, draft.post.id, 20);
        test_util::backdate(&mut conn, new.post.id, 10);

        let published = super::list(&mut conn, Some(true), PageRequest::default()).unwrap();
        let slugs: Vec<&str> = published.items.iter().map(|p| p.post.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old"]);
        assert_eq!(published.total, 2);
        assert!(published.items.iter().all(|p| p.post.published));

        let drafts = super::list(&mut conn, Some(false), PageRequest::default()).unwrap();
        assert_eq!(drafts.total, 1);
        assert_eq!(drafts.items[0].post.slug, "draft");

        let all = super::list(&mut conn, None, PageRequest::default()).unwrap();
        assert_eq!(all.total, 3);
    }

    #[test]
    fn list_paginates_with_total_pages() {
        let mut conn = test_util::conn();
        for i in 0..5 {
            let p = test_util::post(&mut conn, &format!("p{}", i), true);
            test_util::backdate(&mut conn, p.post.id, 100 - i);
        }

        let page = super::list(&mut conn, None, PageRequest::new(Some(2), Some(2), 10)).unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let slugs: Vec<&str> = page.items.iter().map(|p| p.post.slug.as_str()).collect();
        assert_eq!(slugs, vec!["p2", "p1"]);
    }

    #[test]
    fn search_matches_excerpt_of_published_posts_only() {
        let mut conn = test_util::conn();
        let hit = super::create(
            &mut conn,
            NewPostInput {
                published: Some(true),
                excerpt: Some("a zanzibar tale".into()),
                ..test_util::post_input("First", "first")
            },
        )
        .unwrap();
        super::create(
            &mut conn,
            NewPostInput {
                published: Some(false),
                excerpt: Some("zanzibar again".into()),
                ..test_util::post_input("Draft", "draft")
            },
        )
        .unwrap();
        test_util::post(&mut conn, "third", true);

        let found = super::search(&mut conn, "zanzibar", PageRequest::default()).unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].post.id, hit.post.id);

        let by_title = super::search(&mut conn, "First", PageRequest::default()).unwrap();
        assert_eq!(by_title.total, 1);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let mut conn = test_util::conn();
        test_util::post(&mut conn, "plain", true);

        let found = super::search(&mut conn, "%", PageRequest::default()).unwrap();
        assert_eq!(found.total, 0);

        let blank = super::search(&mut conn, "   ", PageRequest::default()).unwrap();
        assert_eq!(blank.total, 0);
        assert!(blank.items.is_empty());
    }

    #[test]
    fn browse_by_tag_and_category_shows_published_only() {
        let mut conn = test_util::conn();
        let tag = test_util::tag(&mut conn, "Rust", "rust");
        let category = test_util::category(&mut conn, "Tech", "tech");
        for (slug, published) in [("live", true), ("hidden", false)] {
            super::create(
                &mut conn,
                NewPostInput {
                    published: Some(published),
                    category_id: Some(category),
                    tag_ids: vec![tag],
                    ..test_util::post_input(slug, slug)
                },
            )
            .unwrap();
        }
        test_util::post(&mut conn, "untagged", true);

        let by_tag = super::list_by_tag(&mut conn, tag, PageRequest::default()).unwrap();
        assert_eq!(by_tag.total, 1);
        assert_eq!(by_tag.items[0].post.slug, "live");

        let by_category = super::list_by_category(&mut conn, category, PageRequest::default()).unwrap();
        assert_eq!(by_category.total, 1);
        assert_eq!(by_category.items[0].post.slug, "live");
    }

    #[test]
    fn published_slug_lookup_hides_drafts() {
        let mut conn = test_util::conn();
        test_util::post(&mut conn, "visible", true);
        test_util::post(&mut conn, "secret", false);

        assert!(super::get_published_by_slug(&mut conn, "visible").is_ok());
        assert!(matches!(
            super::get_published_by_slug(&mut conn, "secret"),
            Err(BlogError::NotFound(_))
        ));
    }
}
