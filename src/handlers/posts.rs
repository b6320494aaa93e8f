use axum::extract::State;
use axum::Json;
use http::StatusCode;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiJson, ApiPath, ApiQuery};
use crate::auth::AdminSession;
use crate::errors::BlogError;
use crate::pagination::PageRequest;
use crate::posts::{self, NewPostInput, PostPatch};
use crate::routes::AppState;
use crate::view_models::{PostList, PostView};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<PostList>, BlogError> {
    let page = PageRequest::new(params.page, params.limit, crate::DEFAULT_PAGE_SIZE);
    let published = params.published;
    let posts = state
        .db
        .run(move |conn| posts::list(conn, published, page))
        .await?;
    Ok(Json(PostList::from(posts)))
}

pub async fn search_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<PostList>, BlogError> {
    let page = PageRequest::new(params.page, params.limit, crate::DEFAULT_PAGE_SIZE);
    let term = params.q.unwrap_or_default();
    let posts = state
        .db
        .run(move |conn| posts::search(conn, &term, page))
        .await?;
    Ok(Json(PostList::from(posts)))
}

pub async fn create_post(
    _: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPostInput>,
) -> Result<(StatusCode, Json<PostView>), BlogError> {
    let post = state.db.run(move |conn| posts::create(conn, input)).await?;
    info!("created post {} with slug {:?}", post.post.id, post.post.slug);
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<PostView>, BlogError> {
    let post = state.db.run(move |conn| posts::get(conn, id)).await?;
    Ok(Json(post))
}

pub async fn update_post(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<PostPatch>,
) -> Result<Json<PostView>, BlogError> {
    let post = state
        .db
        .run(move |conn| posts::update(conn, id, patch))
        .await?;
    info!("updated post {}", id);
    Ok(Json(post))
}

pub async fn delete_post(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, BlogError> {
    state.db.run(move |conn| posts::delete(conn, id)).await?;
    info!("deleted post {}", id);
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}
