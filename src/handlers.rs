use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::BlogError;

mod admin;
mod comments;
mod pages;
mod posts;
mod taxonomy;
mod upload;

pub use admin::{login, logout, session_status};
pub use comments::{create_comment, list_post_comments};
pub use pages::{
    categories_page, category_page, index_page, post_page, posts_page, search_page, tag_page,
    tags_page,
};
pub use posts::{create_post, delete_post, get_post, list_posts, search_posts, update_post};
pub use taxonomy::{
    create_category, create_tag, delete_category, delete_tag, list_categories, list_tags,
    update_category, update_tag,
};
pub use upload::{get_upload, upload_image};

/// `axum::Json` whose rejections come back as a 400 JSON error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BlogError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with JSON rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BlogError))]
pub struct ApiPath<T>(pub T);

/// `axum::extract::Query` with JSON rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BlogError))]
pub struct ApiQuery<T>(pub T);
