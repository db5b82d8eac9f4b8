//! User store operations

use sqlx::SqlitePool;
use tracing::debug;

use super::models::User;
use crate::common::safe_email_log;

/// Look up a user by email. Returns at most one record (email is unique).
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Insert-or-fetch in a single statement.
///
/// Concurrent first logins for the same email both land here; the
/// `ON CONFLICT(email)` no-op update makes `RETURNING` yield the surviving
/// row for whichever caller lost the insert, so exactly one record exists
/// and both callers observe it. An existing record keeps its original
/// username and picture. A username collision across distinct emails is a
/// unique-constraint violation and surfaces as a database error.
pub async fn get_or_create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    profile_picture: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, profile_picture)
        VALUES (?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET email = excluded.email
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(profile_picture)
    .fetch_one(pool)
    .await?;

    debug!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        "User record resolved"
    );

    Ok(user)
}
