// src/services/oidc.rs
//! OIDC client wrapping discovery, authorization redirects, code exchange,
//! and ID-token validation for the single configured provider.

use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreProviderMetadata, CoreTokenResponse,
};
use openidconnect::reqwest::async_http_client;
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, RedirectUrl, Scope,
    TokenResponse,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::common::Config;

#[derive(Debug, Error)]
pub enum OidcError {
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("provider discovery failed: {0}")]
    Discovery(String),

    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("id token validation failed: {0}")]
    IdToken(String),

    #[error("id token missing required claim: {0}")]
    MissingClaim(&'static str),
}

/// Verified identity attributes extracted from a validated ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub subject: String,
    pub email: String,
    pub nickname: Option<String>,
    pub picture: Option<String>,
}

impl IdentityClaims {
    /// Username for the local record: the provider nickname when present,
    /// otherwise the local part of the email.
    pub fn username(&self) -> String {
        match &self.nickname {
            Some(n) if !n.is_empty() => n.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(self.email.as_str())
                .to_string(),
        }
    }
}

/// OAuth client for the configured provider. Discovery runs once at
/// startup; the client is read-only afterwards.
pub struct OidcService {
    client: CoreClient,
    provider_domain: String,
    client_id: String,
}

impl OidcService {
    /// Fetch the provider's discovery document and build the client.
    /// A failure here is a startup failure.
    pub async fn discover(config: &Config) -> Result<Self, OidcError> {
        let issuer = IssuerUrl::new(config.issuer_url())
            .map_err(|e| OidcError::InvalidConfig(e.to_string()))?;

        debug!(issuer = %issuer.as_str(), "Fetching OIDC provider metadata");

        let provider_metadata = CoreProviderMetadata::discover_async(issuer, async_http_client)
            .await
            .map_err(|e| OidcError::Discovery(e.to_string()))?;

        let redirect_url = RedirectUrl::new(config.callback_url.clone())
            .map_err(|e| OidcError::InvalidConfig(e.to_string()))?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
        )
        .set_redirect_uri(redirect_url);

        info!(domain = %config.provider_domain, "OIDC provider discovered");

        Ok(OidcService {
            client,
            provider_domain: config.provider_domain.clone(),
            client_id: config.client_id.clone(),
        })
    }

    /// Authorization URL with a fresh random state and nonce. The caller
    /// must bind both to the browser before redirecting.
    pub fn authorize_url(&self) -> (String, CsrfToken, Nonce) {
        let (auth_url, csrf_state, nonce) = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url();
        (auth_url.to_string(), csrf_state, nonce)
    }

    /// Exchange the authorization code for tokens. Fails if the code is
    /// invalid or expired; there is no retry.
    pub async fn exchange_code(&self, code: String) -> Result<CoreTokenResponse, OidcError> {
        self.client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| OidcError::Exchange(e.to_string()))
    }

    /// Validate the ID token (signature, issuer, audience, nonce) and pull
    /// out the claim set. Email is required: local records are keyed by it.
    pub fn verify_id_token(
        &self,
        token_response: &CoreTokenResponse,
        nonce: &Nonce,
    ) -> Result<IdentityClaims, OidcError> {
        let id_token = token_response
            .id_token()
            .ok_or(OidcError::MissingClaim("id_token"))?;

        let claims = id_token
            .claims(&self.client.id_token_verifier(), nonce)
            .map_err(|e| OidcError::IdToken(e.to_string()))?;

        let email = claims
            .email()
            .map(|e| e.as_str().to_string())
            .ok_or(OidcError::MissingClaim("email"))?;

        let nickname = claims
            .nickname()
            .and_then(|c| c.get(None))
            .map(|n| n.as_str().to_string());

        let picture = claims
            .picture()
            .and_then(|c| c.get(None))
            .map(|p| p.as_str().to_string());

        Ok(IdentityClaims {
            subject: claims.subject().as_str().to_string(),
            email,
            nickname,
            picture,
        })
    }

    /// Provider logout URL; the provider redirects back to `return_to`
    /// after clearing its own session.
    pub fn logout_url(&self, return_to: &str) -> String {
        build_logout_url(&self.provider_domain, &self.client_id, return_to)
    }
}

fn build_logout_url(domain: &str, client_id: &str, return_to: &str) -> String {
    format!(
        "https://{}/v2/logout?returnTo={}&client_id={}",
        domain,
        urlencoding::encode(return_to),
        urlencoding::encode(client_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_prefers_nickname() {
        let claims = IdentityClaims {
            subject: "auth0|123".to_string(),
            email: "jane@example.com".to_string(),
            nickname: Some("jane.d".to_string()),
            picture: None,
        };
        assert_eq!(claims.username(), "jane.d");
    }

    #[test]
    fn test_username_falls_back_to_email_local_part() {
        let claims = IdentityClaims {
            subject: "auth0|123".to_string(),
            email: "jane@example.com".to_string(),
            nickname: None,
            picture: None,
        };
        assert_eq!(claims.username(), "jane");

        let empty_nick = IdentityClaims {
            nickname: Some(String::new()),
            ..claims
        };
        assert_eq!(empty_nick.username(), "jane");
    }

    #[test]
    fn test_logout_url_encodes_return_target() {
        let url = build_logout_url(
            "dev-tenant.us.auth0.com",
            "abc123",
            "http://localhost:8080/",
        );
        assert_eq!(
            url,
            "https://dev-tenant.us.auth0.com/v2/logout?returnTo=http%3A%2F%2Flocalhost%3A8080%2F&client_id=abc123"
        );
    }

    #[test]
    fn test_identity_claims_roundtrip() {
        let claims = IdentityClaims {
            subject: "auth0|abc".to_string(),
            email: "user@example.com".to_string(),
            nickname: Some("user".to_string()),
            picture: Some("https://cdn.example.com/u.png".to_string()),
        };

        let json = serde_json::to_string(&claims).expect("serialize");
        let back: IdentityClaims = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.subject, claims.subject);
        assert_eq!(back.email, claims.email);
    }
}
