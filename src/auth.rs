use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use http::request::Parts;
use log::warn;

use crate::errors::BlogError;

/// Cookie payload: the fixed marker plus the unix time the session ends.
/// The jar signs it, so neither half can be forged.
pub fn session_value(now: i64, days: i64) -> String {
    format!("{}:{}", crate::ADMIN_COOKIE_VALUE, now + days * 24 * 60 * 60)
}

pub fn is_valid_session(value: &str, now: i64) -> bool {
    match value.split_once(':') {
        Some((marker, expires)) => {
            marker == crate::ADMIN_COOKIE_VALUE
                && expires.parse::<i64>().map(|e| now < e).unwrap_or(false)
        }
        None => false,
    }
}

pub fn session_cookie(now: i64, days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((crate::ADMIN_COOKIE, session_value(now, days)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(days))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((crate::ADMIN_COOKIE, "")).path("/").build()
}

pub fn is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(crate::ADMIN_COOKIE)
        .map(|c| is_valid_session(c.value(), chrono::Utc::now().timestamp()))
        .unwrap_or(false)
}

/// Extractor for admin-only handlers; rejects with 401 when the signed
/// session cookie is missing, tampered with or expired.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = BlogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match SignedCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        if is_admin(&jar) {
            Ok(AdminSession)
        } else {
            warn!("rejected unauthenticated request to {}", parts.uri);
            Err(BlogError::Unauthorized)
        }
    }
}
