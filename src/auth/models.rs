//! Authentication data models

use serde::{Deserialize, Serialize};

/// Claim set carried in the session cookie (HS256 JWT).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionClaims {
    /// Provider subject id.
    pub sub: String,
    pub email: String,
    pub nickname: Option<String>,
    pub picture: Option<String>,
    pub exp: usize,
}

/// Claims binding a pending authorization to this browser between
/// `/login` and `/callback`.
#[derive(Serialize, Deserialize, Debug)]
pub struct FlowClaims {
    pub state: String,
    pub nonce: String,
    pub exp: usize,
}

/// Query parameters the provider sends back to the callback.
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
