use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Deserialize;

use crate::errors::BlogError;
use crate::models::{Category, CategoryChanges, NewCategory};
use crate::post_util::{non_blank, validate_slug};
use crate::posts::now;
use crate::schema::{categories, posts};
use crate::view_models::CategoryWithCount;

#[derive(Debug, Default, Deserialize)]
pub struct NewCategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// All categories by name. With `published_only`, drafts are left out of
/// the post counts.
pub fn list(conn: &mut SqliteConnection, published_only: bool) -> Result<Vec<CategoryWithCount>, BlogError> {
    let rows = categories::table
        .order(categories::name.asc())
        .load::<Category>(conn)?;

    let visible: &[bool] = if published_only { &[true] } else { &[true, false] };
    let counts: HashMap<i32, i64> = posts::table
        .filter(posts::category_id.is_not_null())
        .filter(posts::published.eq_any(visible.to_vec()))
        .group_by(posts::category_id)
        .select((posts::category_id, count_star()))
        .load::<(Option<i32>, i64)>(conn)?
        .into_iter()
        .filter_map(|(id, n)| id.map(|id| (id, n)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|category| CategoryWithCount {
            post_count: counts.get(&category.id).copied().unwrap_or(0),
            category,
        })
        .collect())
}

pub fn get_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Category, BlogError> {
    categories::table
        .filter(categories::slug.eq(slug))
        .first::<Category>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Category"))
}

pub fn create(conn: &mut SqliteConnection, input: NewCategoryInput) -> Result<Category, BlogError> {
    let name = non_blank(input.name.as_deref()).ok_or_else(|| {
        BlogError::Validation("Name and slug are required".into())
    })?;
    let slug = non_blank(input.slug.as_deref()).ok_or_else(|| {
        BlogError::Validation("Name and slug are required".into())
    })?;
    validate_slug(slug)?;

    conn.transaction(|conn| {
        ensure_slug_free(conn, slug)?;
        let now = now();
        diesel::insert_into(categories::table)
            .values(&NewCategory {
                name,
                slug,
                description: input.description.as_deref(),
                created_at: now,
                updated_at: now,
            })
            .execute(conn)?;
        get_by_slug(conn, slug)
    })
}

pub fn update(conn: &mut SqliteConnection, id: i32, patch: CategoryPatch) -> Result<Category, BlogError> {
    conn.transaction(|conn| {
        let existing = find(conn, id)?;
        if patch.name.is_none() && patch.slug.is_none() && patch.description.is_none() {
            return Ok(existing);
        }

        let name = match patch.name.as_deref() {
            Some(name) => Some(non_blank(Some(name)).ok_or_else(BlogError::missing_fields)?),
            None => None,
        };
        let slug = match patch.slug.as_deref() {
            Some(slug) => Some(non_blank(Some(slug)).ok_or_else(BlogError::missing_fields)?),
            None => None,
        };
        if let Some(slug) = slug {
            validate_slug(slug)?;
            if slug != existing.slug {
                ensure_slug_free(conn, slug)?;
            }
        }

        diesel::update(categories::table.find(id))
            .set(&CategoryChanges {
                name,
                slug,
                description: patch.description.as_deref(),
                updated_at: Some(now()),
            })
            .execute(conn)?;
        find(conn, id)
    })
}

/// Deletes the category; its posts stay and lose their category.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<(), BlogError> {
    conn.transaction(|conn| {
        find(conn, id)?;
        diesel::update(posts::table.filter(posts::category_id.eq(id)))
            .set(posts::category_id.eq(None::<i32>))
            .execute(conn)?;
        diesel::delete(categories::table.find(id)).execute(conn)?;
        Ok(())
    })
}

fn find(conn: &mut SqliteConnection, id: i32) -> Result<Category, BlogError> {
    categories::table
        .find(id)
        .first::<Category>(conn)
        .optional()?
        .ok_or(BlogError::NotFound("Category"))
}

fn ensure_slug_free(conn: &mut SqliteConnection, slug: &str) -> Result<(), BlogError> {
    let taken: i64 = categories::table
        .filter(categories::slug.eq(slug))
        .count()
        .get_result(conn)?;
    if taken > 0 {
        return Err(BlogError::slug_taken("category"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use diesel::prelude::*;

    use super::{CategoryPatch, NewCategoryInput};
    use crate::errors::BlogError;
    use crate::posts::{self, NewPostInput};
    use crate::schema::categories;
    use crate::test_util;

    #[test]
    fn duplicate_slug_conflicts() {
        let mut conn = test_util::conn();
        test_util::category(&mut conn, "Tech", "tech");

        let err = super::create(
            &mut conn,
            NewCategoryInput {
                name: Some("Technology".into()),
                slug: Some("tech".into()),
                description: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));

        let count: i64 = categories::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn create_requires_name_and_slug() {
        let mut conn = test_util::conn();
        let err = super::create(
            &mut conn,
            NewCategoryInput {
                name: Some("Tech".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
    }

    #[test]
    fn update_keeps_omitted_fields_and_checks_slug() {
        let mut conn = test_util::conn();
        test_util::category(&mut conn, "Life", "life");
        let tech = super::create(
            &mut conn,
            NewCategoryInput {
                name: Some("Tech".into()),
                slug: Some("tech".into()),
                description: Some("code and such".into()),
            },
        )
        .unwrap();

        let renamed = super::update(
            &mut conn,
            tech.id,
            CategoryPatch {
                name: Some("Technology".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(renamed.name, "Technology");
        assert_eq!(renamed.slug, "tech");
        assert_eq!(renamed.description.as_deref(), Some("code and such"));

        let err = super::update(
            &mut conn,
            tech.id,
            CategoryPatch {
                slug: Some("life".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));

        let err = super::update(&mut conn, 999, CategoryPatch::default()).unwrap_err();
        assert!(matches!(err, BlogError::NotFound(_)));
    }

    #[test]
    fn delete_uncategorizes_posts() {
        let mut conn = test_util::conn();
        let tech = test_util::category(&mut conn, "Tech", "tech");
        let post = posts::create(
            &mut conn,
            NewPostInput {
                category_id: Some(tech),
                ..test_util::post_input("Post", "post")
            },
        )
        .unwrap();

        super::delete(&mut conn, tech).unwrap();

        let post = posts::get(&mut conn, post.post.id).unwrap();
        assert_eq!(post.post.category_id, None);
        assert!(matches!(
            super::delete(&mut conn, tech),
            Err(BlogError::NotFound(_))
        ));
    }

    #[test]
    fn list_counts_posts_per_category() {
        let mut conn = test_util::conn();
        let tech = test_util::category(&mut conn, "Tech", "tech");
        test_util::category(&mut conn, "Art", "art");
        for (slug, published) in [("a", true), ("b", false)] {
            posts::create(
                &mut conn,
                NewPostInput {
                    published: Some(published),
                    category_id: Some(tech),
                    ..test_util::post_input(slug, slug)
                },
            )
            .unwrap();
        }

        let all = super::list(&mut conn, false).unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.category.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Tech"]);
        assert_eq!(all[0].post_count, 0);
        assert_eq!(all[1].post_count, 2);

        let public = super::list(&mut conn, true).unwrap();
        assert_eq!(public[1].post_count, 1);
    }
}
