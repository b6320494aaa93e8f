use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Deserialize;

use crate::errors::BlogError;
use crate::models::{NewTag, Tag, TagChanges};
use crate::post_util::{non_blank, validate_slug};
use crate::posts::now;
use crate::schema::{post_tags, posts, tags};
use crate::view_models::TagWithCount;

#[derive(Debug, Default, Deserialize)]
pub struct NewTagInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

pub fn list(conn: &mut SqliteConnection, published_only: bool) -> Result<Vec<TagWithCount>, BlogError> {
    let rows = tags::table.order(tags::name.asc()).load::<Tag>(conn)?;

    let visible: &[bool] = if published_only { &[true] } else { &[true, false] };
    let counts: HashMap<i32, i64> = post_tags::table
        .inner_join(posts::table)
        .filter(posts::published.eq_any(visible.to_vec()))
        .group_by(post_tags::tag_id)
        .select((post_tags::tag_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(rows
        .into_iter()
        .map(|tag| TagWithCount {
            post_count: counts.get(&tag.id).copied().unwrap_or(0),
            tag,
        })
        .collect())
}

pub fn get_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Tag, BlogError> {
    tags::table
        .filter(tags::slug.eq(slug))
        .first::<Tag>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Tag"))
}

pub fn create(conn: &mut SqliteConnection, input: NewTagInput) -> Result<Tag, BlogError> {
    let (name, slug) = match (non_blank(input.name.as_deref()), non_blank(input.slug.as_deref())) {
        (Some(name), Some(slug)) => (name, slug),
        _ => return Err(BlogError::Validation("Name and slug are required".into())),
    };
    validate_slug(slug)?;

    conn.transaction(|conn| {
        ensure_slug_free(conn, slug)?;
        let now = now();
        diesel::insert_into(tags::table)
            .values(&NewTag {
                name,
                slug,
                created_at: now,
                updated_at: now,
            })
            .execute(conn)?;
        get_by_slug(conn, slug)
    })
}

pub fn update(conn: &mut SqliteConnection, id: i32, patch: TagPatch) -> Result<Tag, BlogError> {
    conn.transaction(|conn| {
        let existing = find(conn, id)?;
        if patch.name.is_none() && patch.slug.is_none() {
            return Ok(existing);
        }

        let name = patch
            .name
            .as_deref()
            .map(|n| non_blank(Some(n)).ok_or_else(BlogError::missing_fields))
            .transpose()?;
        let slug = patch
            .slug
            .as_deref()
            .map(|s| non_blank(Some(s)).ok_or_else(BlogError::missing_fields))
            .transpose()?;
        if let Some(slug) = slug {
            validate_slug(slug)?;
            if slug != existing.slug {
                ensure_slug_free(conn, slug)?;
            }
        }

        diesel::update(tags::table.find(id))
            .set(&TagChanges {
                name,
                slug,
                updated_at: Some(now()),
            })
            .execute(conn)?;
        find(conn, id)
    })
}

/// Deletes the tag and every link to it.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<(), BlogError> {
    conn.transaction(|conn| {
        find(conn, id)?;
        diesel::delete(post_tags::table.filter(post_tags::tag_id.eq(id))).execute(conn)?;
        diesel::delete(tags::table.find(id)).execute(conn)?;
        Ok(())
    })
}

fn find(conn: &mut SqliteConnection, id: i32) -> Result<Tag, BlogError> {
    tags::table
        .find(id)
        .first::<Tag>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Tag"))
}

fn ensure_slug_free(conn: &mut SqliteConnection, slug: &str) -> Result<(), BlogError> {
    let taken: i64 = tags::table
        .filter(tags::slug.eq(slug))
        .count()
        .get_result(conn)?;
    if taken > 0 {
        return Err(BlogError::slug_taken("tag"));
    }
    Ok(())
}
