//! Tests for users module
//!
//! These tests verify the user store against an in-memory SQLite pool:
//! - First login creates exactly one record
//! - Repeat logins reuse the record without updating it
//! - Concurrent first logins converge on one row
//! - Unique constraints still fire for username collisions
//! - Post schema constraints

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::migrations;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        // Single connection: every handle must see the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect in-memory sqlite");
        migrations::run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn user_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .expect("count users")
    }

    #[tokio::test]
    async fn test_first_login_creates_one_record() {
        let pool = test_pool().await;

        let user = store::get_or_create(
            &pool,
            "jane.d",
            "jane@example.com",
            Some("https://cdn.example.com/jane.png"),
        )
        .await
        .expect("create user");

        assert_eq!(user.username, "jane.d");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(
            user.profile_picture.as_deref(),
            Some("https://cdn.example.com/jane.png")
        );
        assert!(user.password.is_none());
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_repeat_login_reuses_record_untouched() {
        let pool = test_pool().await;

        let first = store::get_or_create(&pool, "jane.d", "jane@example.com", None)
            .await
            .expect("first login");

        // The provider may report a changed nickname or picture later; the
        // local record keeps what it was created with.
        let second = store::get_or_create(
            &pool,
            "jane_renamed",
            "jane@example.com",
            Some("https://cdn.example.com/new.png"),
        )
        .await
        .expect("second login");

        assert_eq!(second.id, first.id);
        assert_eq!(second.username, "jane.d");
        assert!(second.profile_picture.is_none());
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let pool = test_pool().await;

        assert!(store::find_by_email(&pool, "jane@example.com")
            .await
            .expect("lookup")
            .is_none());

        let created = store::get_or_create(&pool, "jane.d", "jane@example.com", None)
            .await
            .expect("create");

        let found = store::find_by_email(&pool, "jane@example.com")
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_concurrent_first_logins_converge_on_one_row() {
        let pool = test_pool().await;

        let (a, b) = tokio::join!(
            store::get_or_create(&pool, "jane.d", "jane@example.com", None),
            store::get_or_create(&pool, "jane.d", "jane@example.com", None),
        );

        let a = a.expect("first concurrent login");
        let b = b.expect("second concurrent login");

        assert_eq!(a.id, b.id);
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_username_collision_is_a_database_error() {
        let pool = test_pool().await;

        store::get_or_create(&pool, "jane", "jane@example.com", None)
            .await
            .expect("first user");

        // Same nickname, different email: the email upsert does not apply,
        // so the username unique constraint fires.
        let result = store::get_or_create(&pool, "jane", "other-jane@example.com", None).await;
        assert!(result.is_err());
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_post_length_constraint() {
        let pool = test_pool().await;

        let user = store::get_or_create(&pool, "jane", "jane@example.com", None)
            .await
            .expect("user");

        sqlx::query("INSERT INTO posts (content, user_id) VALUES (?, ?)")
            .bind("hello world")
            .bind(user.id)
            .execute(&pool)
            .await
            .expect("post within limit");

        let too_long = "a".repeat(281);
        let result = sqlx::query("INSERT INTO posts (content, user_id) VALUES (?, ?)")
            .bind(&too_long)
            .bind(user.id)
            .execute(&pool)
            .await;
        assert!(result.is_err(), "281-char post must violate the check");

        let post: models::Post = sqlx::query_as("SELECT * FROM posts WHERE user_id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .expect("fetch post");
        assert_eq!(post.content, "hello world");
        assert_eq!(post.user_id, user.id);
    }
}
