use diesel::prelude::*;
use serde::Deserialize;

use crate::errors::BlogError;
use crate::models::{Comment, NewComment};
use crate::post_util::non_blank;
use crate::posts;
use crate::schema::comments;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentInput {
    pub post_id: Option<i32>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub content: Option<String>,
}

/// Appends a comment to an existing post. Comments are never edited.
pub fn create(conn: &mut SqliteConnection, input: NewCommentInput) -> Result<Comment, BlogError> {
    let (post_id, author, email, content) = match (
        input.post_id,
        non_blank(input.author.as_deref()),
        non_blank(input.email.as_deref()),
        non_blank(input.content.as_deref()),
    ) {
        (Some(post_id), Some(author), Some(email), Some(content)) => (post_id, author, email, content),
        _ => return Err(BlogError::missing_fields()),
    };

    conn.transaction(|conn| {
        posts::find(conn, post_id)?;
        diesel::insert_into(comments::table)
            .values(&NewComment {
                author,
                email,
                content,
                created_at: posts::now(),
                post_id,
            })
            .execute(conn)?;

        Ok(comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::id.desc())
            .first::<Comment>(conn)?)
    })
}

/// Newest first.
pub fn list_for_post(conn: &mut SqliteConnection, post_id: i32) -> Result<Vec<Comment>, BlogError> {
    posts::find(conn, post_id)?;
    Ok(comments::table
        .filter(comments::post_id.eq(post_id))
        .order((comments::created_at.desc(), comments::id.desc()))
        .load::<Comment>(conn)?)
}
