// src/common/config.rs
//! Environment configuration
//!
//! All provider settings are read once at startup. Missing required
//! variables abort the process rather than failing later on a request.

use anyhow::{Context, Result};
use rand::Rng;
use std::env;

/// Application configuration, constructed once in `main` and carried
/// inside `AppState`. Read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Signing key for session, flow, and flash cookies.
    pub session_secret: String,
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with the provider, e.g.
    /// `http://localhost:8080/callback`.
    pub callback_url: String,
    /// Provider domain, e.g. `dev-xyz.us.auth0.com`. Used to build the
    /// discovery URL and the logout URL.
    pub provider_domain: String,
    /// Public base URL of this app, used as the logout `returnTo` target.
    pub base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let client_id =
            env::var("AUTH0_CLIENT_ID").context("AUTH0_CLIENT_ID must be set")?;
        let client_secret =
            env::var("AUTH0_CLIENT_SECRET").context("AUTH0_CLIENT_SECRET must be set")?;
        let callback_url =
            env::var("AUTH0_CALLBACK_URL").context("AUTH0_CALLBACK_URL must be set")?;
        let provider_domain =
            env::var("AUTH0_DOMAIN").context("AUTH0_DOMAIN must be set")?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://database.db".to_string());

        // Sessions do not survive a restart without a configured secret,
        // same trade-off as the per-boot secret the app always had.
        let session_secret =
            env::var("SESSION_SECRET").unwrap_or_else(|_| generate_secret_hex(32));

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(Config {
            database_url,
            session_secret,
            client_id,
            client_secret,
            callback_url,
            provider_domain,
            base_url,
            port,
        })
    }

    /// Discovery document lives at
    /// `https://{domain}/.well-known/openid-configuration`; the library
    /// appends the well-known path to this issuer URL.
    pub fn issuer_url(&self) -> String {
        format!("https://{}/", self.provider_domain)
    }
}

/// Random hex string, used for the per-boot session secret fallback.
fn generate_secret_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..bytes)
        .map(|_| format!("{:02x}", rng.gen::<u8>()))
        .collect()
}
