//! User store data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local user record, keyed by email. Created on first successful OIDC
/// callback and never updated by the login path afterwards.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Never populated by the OIDC provisioning path; nullable so that
    /// path can omit it.
    pub password: Option<String>,
    pub profile_picture: Option<String>,
}

/// Short text record owned by a user. No route in this app touches posts;
/// the schema is carried for the data it already holds.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub date_posted: String,
    pub user_id: i64,
}
