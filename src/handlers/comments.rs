use axum::extract::State;
use axum::Json;
use http::StatusCode;
use log::info;

use super::{ApiJson, ApiPath};
use crate::comments::{self, NewCommentInput};
use crate::errors::BlogError;
use crate::models::Comment;
use crate::routes::AppState;
use crate::view_models::CommentView;

pub async fn create_comment(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCommentInput>,
) -> Result<(StatusCode, Json<Comment>), BlogError> {
    let comment = state
        .db
        .run(move |conn| comments::create(conn, input))
        .await?;
    info!("new comment {} on post {}", comment.id, comment.post_id);
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_post_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
) -> Result<Json<Vec<CommentView>>, BlogError> {
    let listed = state
        .db
        .run(move |conn| comments::list_for_post(conn, post_id))
        .await?;
    Ok(Json(listed.into_iter().map(CommentView::from).collect()))
}
