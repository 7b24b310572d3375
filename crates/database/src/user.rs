//! User operations.

use chat_core::UserId;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

const COLUMNS: &str =
    "id, name, language, avatar, status_line, is_online, last_seen_ms, created_at_ms";

/// Create a new user and return the stored row.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, language, avatar, status_line, created_at_ms)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.language)
    .bind(&new.avatar)
    .bind(&new.status_line)
    .bind(chat_core::now_ms())
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "User", new.name.clone()))?;

    get_user(pool, result.last_insert_rowid()).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: UserId) -> Result<User> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        })
}

/// Get a user by display name.
pub async fn get_user_by_name(pool: &SqlitePool, name: &str) -> Result<User> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE name = ?", COLUMNS))
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: name.to_string(),
        })
}

/// Update a user's preferred language.
pub async fn update_language(pool: &SqlitePool, id: UserId, language: &str) -> Result<()> {
    let result = sqlx::query("UPDATE users SET language = ? WHERE id = ?")
        .bind(language)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Update avatar and status line.
pub async fn update_profile(
    pool: &SqlitePool,
    id: UserId,
    avatar: &str,
    status_line: &str,
) -> Result<()> {
    let result = sqlx::query("UPDATE users SET avatar = ?, status_line = ? WHERE id = ?")
        .bind(avatar)
        .bind(status_line)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Mark a user online.
pub async fn set_online(pool: &SqlitePool, id: UserId) -> Result<()> {
    sqlx::query("UPDATE users SET is_online = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark a user offline and record when they were last seen.
pub async fn set_offline(pool: &SqlitePool, id: UserId, last_seen_ms: i64) -> Result<()> {
    sqlx::query("UPDATE users SET is_online = 0, last_seen_ms = ? WHERE id = ?")
        .bind(last_seen_ms)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List all users ordered by name.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY name", COLUMNS))
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn test_user_crud() {
        let db = test_db().await;

        let alice = create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        assert_eq!(alice.language, "fr");
        assert!(!alice.is_online);

        update_language(db.pool(), alice.id, "es").await.unwrap();
        let fetched = get_user(db.pool(), alice.id).await.unwrap();
        assert_eq!(fetched.language, "es");

        let by_name = get_user_by_name(db.pool(), "alice").await.unwrap();
        assert_eq!(by_name.id, alice.id);

        assert_eq!(count_users(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;

        create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();
        let result = create_user(db.pool(), &NewUser::new("bob", "de")).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_online_offline() {
        let db = test_db().await;
        let u = create_user(db.pool(), &NewUser::new("carol", "en"))
            .await
            .unwrap();

        set_online(db.pool(), u.id).await.unwrap();
        assert!(get_user(db.pool(), u.id).await.unwrap().is_online);

        set_offline(db.pool(), u.id, 123_456).await.unwrap();
        let off = get_user(db.pool(), u.id).await.unwrap();
        assert!(!off.is_online);
        assert_eq!(off.last_seen_ms, Some(123_456));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = test_db().await;
        let result = get_user(db.pool(), 999).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
