use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, get_service, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use log::{info, warn};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::handler::{BlogDB, WithDB};
use crate::handlers;
use crate::templates::Templates;

/// Everything the handlers share. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: BlogDB,
    pub templates: Arc<Templates>,
    pub config: Arc<BlogConfig>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    /// Opens the pool, applies pending migrations and loads the templates.
    pub fn from_config(config: BlogConfig) -> Result<Self, anyhow::Error> {
        let dbpool = Arc::new(crate::new_dbconn_pool(&config.database_url)?);
        let db = BlogDB::new(dbpool);
        crate::run_migrations(&mut *db.dbconn()?)?;
        info!("created dbpool from {:?}", config.database_url);

        let templates = Templates::load(&config.template_dir, &config.site)?;
        info!(
            "initialized template system with templates in {:?}",
            config.template_dir
        );

        let cookie_key = match config.admin.session_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes())
                .context("admin.session_secret must be at least 64 bytes")?,
            None => {
                warn!("no admin.session_secret configured, sessions will not survive a restart");
                Key::generate()
            }
        };

        Ok(Self {
            db,
            templates: Arc::new(templates),
            config: Arc::new(config),
            cookie_key,
        })
    }
}

pub fn router(state: AppState) -> Router {
    // leave headroom above the image limit so oversized files reach the
    // handler and get a validation error instead of a bare 413
    let upload_body_limit = state.config.max_upload_bytes * 2 + 64 * 1024;
    let static_dir = state.config.template_dir.join("static");

    let api = Router::new()
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/:id/comments", get(handlers::list_post_comments))
        .route("/search", get(handlers::search_posts))
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            axum::routing::put(handlers::update_category).delete(handlers::delete_category),
        )
        .route("/tags", get(handlers::list_tags).post(handlers::create_tag))
        .route(
            "/tags/:id",
            axum::routing::put(handlers::update_tag).delete(handlers::delete_tag),
        )
        .route("/comments", post(handlers::create_comment))
        .route(
            "/upload/image",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/uploads/:name", get(handlers::get_upload))
        .route("/admin/login", post(handlers::login))
        .route("/admin/logout", post(handlers::logout))
        .route("/admin/session", get(handlers::session_status));

    Router::new()
        .route("/", get(handlers::index_page))
        .route("/posts", get(handlers::posts_page))
        .route("/posts/:slug", get(handlers::post_page))
        .route("/categories", get(handlers::categories_page))
        .route("/categories/:slug", get(handlers::category_page))
        .route("/tags", get(handlers::tags_page))
        .route("/tags/:slug", get(handlers::tag_page))
        .route("/search", get(handlers::search_page))
        .nest("/api", api)
        .nest_service("/theme", get_service(ServeDir::new(static_dir)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
