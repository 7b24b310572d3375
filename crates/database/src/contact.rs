//! Contact list operations.

use chat_core::UserId;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::User;

/// Add `contact_id` to `user_id`'s contact list. Idempotent.
pub async fn add_contact(pool: &SqlitePool, user_id: UserId, contact_id: UserId) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO contacts (user_id, contact_id, created_at_ms)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, contact_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(contact_id)
    .bind(chat_core::now_ms())
    .execute(pool)
    .await?;

    Ok(())
}

/// All users on `user_id`'s contact list, ordered by name.
pub async fn contacts_of(pool: &SqlitePool, user_id: UserId) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.name, u.language, u.avatar, u.status_line,
               u.is_online, u.last_seen_ms, u.created_at_ms
        FROM contacts c
        JOIN users u ON u.id = c.contact_id
        WHERE c.user_id = ?
        ORDER BY u.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// User ids that have `user_id` on *their* contact list. Used to fan out
/// presence changes to everyone who is watching this user.
pub async fn watchers_of(pool: &SqlitePool, user_id: UserId) -> Result<Vec<UserId>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM contacts WHERE contact_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

/// Whether `contact_id` is on `user_id`'s contact list.
pub async fn is_contact(pool: &SqlitePool, user_id: UserId, contact_id: UserId) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM contacts WHERE user_id = ? AND contact_id = ?",
    )
    .bind(user_id)
    .bind(contact_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::{test_db, user};

    #[tokio::test]
    async fn test_add_and_list_contacts() {
        let db = test_db().await;
        let a = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let b = user::create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();

        add_contact(db.pool(), a.id, b.id).await.unwrap();
        // Duplicate add is a no-op
        add_contact(db.pool(), a.id, b.id).await.unwrap();

        let contacts = contacts_of(db.pool(), a.id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "bob");

        assert!(is_contact(db.pool(), a.id, b.id).await.unwrap());
        assert!(!is_contact(db.pool(), b.id, a.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_watchers() {
        let db = test_db().await;
        let a = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let b = user::create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();
        let c = user::create_user(db.pool(), &NewUser::new("carol", "en"))
            .await
            .unwrap();

        add_contact(db.pool(), b.id, a.id).await.unwrap();
        add_contact(db.pool(), c.id, a.id).await.unwrap();

        let mut watchers = watchers_of(db.pool(), a.id).await.unwrap();
        watchers.sort();
        assert_eq!(watchers, vec![b.id, c.id]);
    }
}
