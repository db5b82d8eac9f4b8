//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, warn};

use super::session::{self, SESSION_COOKIE};
use crate::common::{safe_email_log, ApiError, AppState};

/// Current user extractor
///
/// Reads the session cookie and validates its JWT. Handlers that allow
/// anonymous access take `Option<CurrentUser>`; a missing or invalid
/// session then simply renders the logged-out view.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub sub: String,
    pub email: String,
    pub nickname: Option<String>,
    pub picture: Option<String>,
}

impl CurrentUser {
    /// Name shown on the landing page.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.email)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InternalServer("cookie parsing failed".to_string()))?;

        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Err(ApiError::Unauthorized("no session".to_string())),
        };

        let claims = match session::decode_session(&app.config.session_secret, &token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Session cookie validation failed");
                return Err(ApiError::Unauthorized("invalid session".to_string()));
            }
        };

        debug!(
            email = %safe_email_log(&claims.email),
            sub = %claims.sub,
            "Session cookie accepted"
        );

        Ok(CurrentUser {
            sub: claims.sub,
            email: claims.email,
            nickname: claims.nickname,
            picture: claims.picture,
        })
    }
}
