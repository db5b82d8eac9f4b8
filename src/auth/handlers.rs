//! Authentication handlers: the `/login`, `/callback`, `/logout` flow.

use axum::{
    extract::{Extension, Query},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use openidconnect::Nonce;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::CallbackParams;
use super::session::{self, FLOW_COOKIE, SESSION_COOKIE};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::users;

/// GET /login
///
/// Builds an authorization URL with a fresh state and nonce, binds both to
/// the browser via the flow cookie, and redirects to the provider. Always
/// a 302, never a 200.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let (auth_url, csrf_state, nonce) = state.oidc.authorize_url();

    let flow = session::issue_flow(
        &state.config.session_secret,
        csrf_state.secret(),
        nonce.secret(),
    )?;

    info!("Redirecting to provider authorization endpoint");

    Ok((jar.add(flow), Redirect::to(&auth_url)))
}

/// GET /callback
///
/// Completes the authorization-code flow: verifies state against the flow
/// cookie, exchanges the code, validates the ID token against the nonce,
/// provisions the local user on first login, and establishes the session.
///
/// Authorization failures (denied consent, expired code, state mismatch)
/// are flashed and redirected home; persistence failures propagate as 500.
pub async fn callback(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let flow_token = jar.get(FLOW_COOKIE).map(|c| c.value().to_string());

    // The flow cookie is single-use regardless of outcome.
    let jar = jar.add(session::removal(FLOW_COOKIE));

    match complete_login(&state, flow_token, params).await {
        Ok(session_cookie) => Ok((jar.add(session_cookie), Redirect::to("/"))),
        Err(CallbackError::Authorization(reason)) => {
            warn!(reason = %reason, "Login attempt failed");
            let flash = session::flash_cookie(&format!("Error during callback: {}", reason));
            Ok((jar.add(flash), Redirect::to("/")))
        }
        Err(CallbackError::Database(e)) => Err(ApiError::DatabaseError(e)),
        Err(CallbackError::Internal(e)) => Err(e),
    }
}

/// GET /logout
///
/// Clears the session cookie and hands the browser to the provider's
/// logout endpoint, which redirects back to `/`.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    info!("User logout");

    let logout_url = state.oidc.logout_url(&state.config.base_url);

    (
        jar.add(session::removal(SESSION_COOKIE)),
        Redirect::to(&logout_url),
    )
}

/// Failure modes of the callback, split by how they surface: authorization
/// problems flash and redirect, everything else fails the request.
enum CallbackError {
    Authorization(String),
    Database(sqlx::Error),
    Internal(ApiError),
}

/// Pre-exchange validation of the callback: provider error param, flow
/// cookie presence and signature, state comparison, code presence. Runs
/// entirely locally; returns the code and nonce needed for the exchange,
/// or the reason the attempt is rejected.
pub(crate) fn validate_callback(
    secret: &str,
    flow_token: Option<String>,
    params: CallbackParams,
) -> Result<(String, String), String> {
    if let Some(error) = params.error {
        return Err(params.error_description.unwrap_or(error));
    }

    let flow_token = flow_token.ok_or_else(|| "no login in progress".to_string())?;

    let flow = session::decode_flow(secret, &flow_token)
        .map_err(|_| "login attempt expired".to_string())?;

    match params.state {
        Some(ref s) if *s == flow.state => {}
        _ => return Err("state mismatch".to_string()),
    }

    let code = params
        .code
        .ok_or_else(|| "missing authorization code".to_string())?;

    Ok((code, flow.nonce))
}

async fn complete_login(
    state: &AppState,
    flow_token: Option<String>,
    params: CallbackParams,
) -> Result<Cookie<'static>, CallbackError> {
    let (code, nonce) = validate_callback(&state.config.session_secret, flow_token, params)
        .map_err(CallbackError::Authorization)?;

    let token_response = state
        .oidc
        .exchange_code(code)
        .await
        .map_err(|e| CallbackError::Authorization(e.to_string()))?;

    let identity = state
        .oidc
        .verify_id_token(&token_response, &Nonce::new(nonce))
        .map_err(|e| CallbackError::Authorization(e.to_string()))?;

    // First login provisions the local record; later logins reuse it
    // untouched. The upsert keeps concurrent first logins on one row.
    let user = users::store::get_or_create(
        &state.db,
        &identity.username(),
        &identity.email,
        identity.picture.as_deref(),
    )
    .await
    .map_err(CallbackError::Database)?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        "User authenticated via OIDC callback"
    );

    session::issue_session(&state.config.session_secret, &identity)
        .map_err(CallbackError::Internal)
}
