use chrono::{Duration, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::categories::{self, NewCategoryInput};
use crate::posts::{self, NewPostInput};
use crate::tags::{self, NewTagInput};
use crate::view_models::PostView;

/// Fresh in-memory database with the schema applied.
pub fn conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    conn.batch_execute(crate::CONNECTION_PRAGMAS).unwrap();
    crate::run_migrations(&mut conn).unwrap();
    conn
}

pub fn tag(conn: &mut SqliteConnection, name: &str, slug: &str) -> i32 {
    tags::create(
        conn,
        NewTagInput {
            name: Some(name.into()),
            slug: Some(slug.into()),
        },
    )
    .unwrap()
    .id
}

pub fn category(conn: &mut SqliteConnection, name: &str, slug: &str) -> i32 {
    categories::create(
        conn,
        NewCategoryInput {
            name: Some(name.into()),
            slug: Some(slug.into()),
            description: None,
        },
    )
    .unwrap()
    .id
}

pub fn post_input(title: &str, slug: &str) -> NewPostInput {
    NewPostInput {
        title: Some(title.into()),
        slug: Some(slug.into()),
        content: Some(format!("# {}\n\nbody of {}", title, slug)),
        ..Default::default()
    }
}

pub fn post(conn: &mut SqliteConnection, slug: &str, published: bool) -> PostView {
    posts::create(
        conn,
        NewPostInput {
            published: Some(published),
            ..post_input(slug, slug)
        },
    )
    .unwrap()
}

/// Pins a post's creation time so ordering assertions do not depend on
/// the clock.
pub fn backdate(conn: &mut SqliteConnection, post_id: i32, minutes_ago: i64) {
    use crate::schema::posts;
    let at: NaiveDateTime = chrono::Utc::now().naive_utc() - Duration::minutes(minutes_ago);
    diesel::update(posts::table.find(post_id))
        .set(posts::created_at.eq(at))
        .execute(conn)
        .unwrap();
}
