use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header;
use log::{debug, info};
use serde_json::{json, Value};

use super::ApiPath;
use crate::auth::AdminSession;
use crate::errors::BlogError;
use crate::media_util::{content_type_for, is_safe_name, random_file_name, too_large, validate_image_type};
use crate::routes::AppState;

const FILE_FIELD: &str = "file";

pub async fn upload_image(
    _: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, BlogError> {
    let max_bytes = state.config.max_upload_bytes;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("skipping multipart field {:?}", field.name());
            continue;
        }
        let ext = validate_image_type(field.content_type())?;

        // count while reading so an oversized body never touches the disk
        let mut contents: Vec<u8> = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if contents.len() + chunk.len() > max_bytes {
                return Err(too_large(max_bytes));
            }
            contents.extend_from_slice(&chunk);
        }
        if contents.is_empty() {
            return Err(BlogError::Validation("Please choose an image file".into()));
        }

        let name = random_file_name(chrono::Utc::now().timestamp_millis(), ext);
        tokio::fs::create_dir_all(&state.config.upload_dir).await?;
        tokio::fs::write(state.config.upload_dir.join(&name), &contents).await?;
        info!("stored upload {} ({} bytes)", name, contents.len());

        return Ok(Json(json!({ "url": format!("{}/{}", crate::UPLOADS_URL_PREFIX, name) })));
    }

    Err(BlogError::Validation("Please choose an image file".into()))
}

pub async fn get_upload(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<Response, BlogError> {
    if !is_safe_name(&name) {
        return Err(BlogError::Validation("Bad request".into()));
    }
    let contents = match tokio::fs::read(state.config.upload_dir.join(&name)).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BlogError::NotFound("Image"))
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&name)),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        contents,
    )
        .into_response())
}
