use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiJson;
use crate::auth::{is_admin, removal_cookie, session_cookie};
use crate::errors::BlogError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(SignedCookieJar, Json<Value>), BlogError> {
    let admin = &state.config.admin;
    match req.password {
        Some(password) if password == admin.password => {
            info!("admin logged in");
            let cookie = session_cookie(
                chrono::Utc::now().timestamp(),
                admin.session_days,
                admin.secure_cookie,
            );
            Ok((jar.add(cookie), Json(json!({ "success": true }))))
        }
        _ => {
            warn!("failed admin login attempt");
            Err(BlogError::Unauthorized)
        }
    }
}

pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Json<Value>) {
    (jar.remove(removal_cookie()), Json(json!({ "success": true })))
}

pub async fn session_status(jar: SignedCookieJar) -> Json<Value> {
    Json(json!({ "authenticated": is_admin(&jar) }))
}
