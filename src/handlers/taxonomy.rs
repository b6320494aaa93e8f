use axum::extract::State;
use axum::Json;
use http::StatusCode;
use log::info;
use serde_json::{json, Value};

use super::{ApiJson, ApiPath};
use crate::auth::AdminSession;
use crate::categories::{self, CategoryPatch, NewCategoryInput};
use crate::errors::BlogError;
use crate::models::{Category, Tag};
use crate::routes::AppState;
use crate::tags::{self, NewTagInput, TagPatch};
use crate::view_models::{CategoryWithCount, TagWithCount};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, BlogError> {
    let listed = state
        .db
        .run(|conn| categories::list(conn, false))
        .await?;
    Ok(Json(listed))
}

pub async fn create_category(
    _: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCategoryInput>,
) -> Result<(StatusCode, Json<Category>), BlogError> {
    let category = state
        .db
        .run(move |conn| categories::create(conn, input))
        .await?;
    info!("created category {} ({})", category.id, category.slug);
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> Result<Json<Category>, BlogError> {
    let category = state
        .db
        .run(move |conn| categories::update(conn, id, patch))
        .await?;
    Ok(Json(category))
}

pub async fn delete_category(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, BlogError> {
    state
        .db
        .run(move |conn| categories::delete(conn, id))
        .await?;
    info!("deleted category {}", id);
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagWithCount>>, BlogError> {
    let listed = state.db.run(|conn| tags::list(conn, false)).await?;
    Ok(Json(listed))
}

pub async fn create_tag(
    _: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTagInput>,
) -> Result<(StatusCode, Json<Tag>), BlogError> {
    let tag = state.db.run(move |conn| tags::create(conn, input)).await?;
    info!("created tag {} ({})", tag.id, tag.slug);
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn update_tag(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<TagPatch>,
) -> Result<Json<Tag>, BlogError> {
    let tag = state
        .db
        .run(move |conn| tags::update(conn, id, patch))
        .await?;
    Ok(Json(tag))
}

pub async fn delete_tag(
    _: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, BlogError> {
    state.db.run(move |conn| tags::delete(conn, id)).await?;
    info!("deleted tag {}", id);
    Ok(Json(json!({ "message": "Tag deleted successfully" })))
}
