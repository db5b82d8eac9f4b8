//! Session layer: signed cookies for the login session, the in-flight
//! authorization, and one-shot flash messages.
//!
//! Cookies are signed by being JWTs (HS256 with the app session secret);
//! there is no server-side session store.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::models::{FlowClaims, SessionClaims};
use crate::common::ApiError;
use crate::services::IdentityClaims;

pub const SESSION_COOKIE: &str = "session";
pub const FLOW_COOKIE: &str = "oauth_flow";
pub const FLASH_COOKIE: &str = "flash";

const SESSION_TTL_HOURS: i64 = 24;
const FLOW_TTL_MINUTES: i64 = 10;

/// Build the session cookie for a verified identity.
pub fn issue_session(secret: &str, identity: &IdentityClaims) -> Result<Cookie<'static>, ApiError> {
    let claims = SessionClaims {
        sub: identity.subject.clone(),
        email: identity.email.clone(),
        nickname: identity.nickname.clone(),
        picture: identity.picture.clone(),
        exp: (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
    };
    Ok(signed_cookie(SESSION_COOKIE, encode_claims(secret, &claims)?))
}

pub fn decode_session(secret: &str, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    decode_claims(secret, token)
}

/// Build the short-lived cookie binding state and nonce to the browser
/// while the provider round-trip is in flight.
pub fn issue_flow(secret: &str, state: &str, nonce: &str) -> Result<Cookie<'static>, ApiError> {
    let claims = FlowClaims {
        state: state.to_string(),
        nonce: nonce.to_string(),
        exp: (Utc::now() + Duration::minutes(FLOW_TTL_MINUTES)).timestamp() as usize,
    };
    Ok(signed_cookie(FLOW_COOKIE, encode_claims(secret, &claims)?))
}

pub fn decode_flow(secret: &str, token: &str) -> Result<FlowClaims, jsonwebtoken::errors::Error> {
    decode_claims(secret, token)
}

/// One-shot message shown (and cleared) by the landing page.
/// Percent-encoded so arbitrary text survives the cookie value grammar.
pub fn flash_cookie(message: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, urlencoding::encode(message).into_owned());
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn read_flash(value: &str) -> String {
    urlencoding::decode(value)
        .map(|s| s.into_owned())
        .unwrap_or_default()
}

/// Expired cookie that instructs the browser to drop `name`.
pub fn removal(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

fn signed_cookie(name: &'static str, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn encode_claims<T: serde::Serialize>(secret: &str, claims: &T) -> Result<String, ApiError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalServer(format!("cookie signing failed: {}", e)))
}

fn decode_claims<T: serde::de::DeserializeOwned>(
    secret: &str,
    token: &str,
) -> Result<T, jsonwebtoken::errors::Error> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}
