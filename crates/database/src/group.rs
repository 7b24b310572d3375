//! Group registry and group message log.

use chat_core::{GroupId, MessageId, UserId};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Group, GroupMember, GroupMessage, NewGroupMessage, User};
use crate::user;

/// Create a group. The creator is enrolled as its first member and admin.
pub async fn create_group(
    pool: &SqlitePool,
    name: &str,
    description: &str,
    created_by: UserId,
) -> Result<Group> {
    let now = chat_core::now_ms();

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO groups (name, description, created_by, created_at_ms) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(description)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let id = result.last_insert_rowid();

    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, is_admin, joined_at_ms) VALUES (?, ?, 1, ?)",
    )
    .bind(id)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_group(pool, id).await
}

/// Get a group by id.
pub async fn get_group(pool: &SqlitePool, id: GroupId) -> Result<Group> {
    sqlx::query_as::<_, Group>(
        "SELECT id, name, description, created_by, created_at_ms FROM groups WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Group",
        id: id.to_string(),
    })
}

/// Enroll a user in a group. Joining twice is `AlreadyExists`.
pub async fn add_member(pool: &SqlitePool, group_id: GroupId, user_id: UserId) -> Result<()> {
    // Reject unknown groups/users up front so the caller gets NotFound
    // instead of a foreign key error.
    get_group(pool, group_id).await?;
    user::get_user(pool, user_id).await?;

    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, is_admin, joined_at_ms) VALUES (?, ?, 0, ?)",
    )
    .bind(group_id)
    .bind(user_id)
    .bind(chat_core::now_ms())
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "GroupMember", format!("{}:{}", group_id, user_id)))?;

    Ok(())
}

/// Membership records for a group, ordered by join time.
pub async fn members_of(pool: &SqlitePool, group_id: GroupId) -> Result<Vec<GroupMember>> {
    let rows = sqlx::query_as::<_, GroupMember>(
        r#"
        SELECT group_id, user_id, is_admin, joined_at_ms
        FROM group_members WHERE group_id = ?
        ORDER BY joined_at_ms ASC, user_id ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Member user profiles for a group, for language-aware fan-out.
pub async fn member_users(pool: &SqlitePool, group_id: GroupId) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.name, u.language, u.avatar, u.status_line,
               u.is_online, u.last_seen_ms, u.created_at_ms
        FROM users u
        JOIN group_members gm ON gm.user_id = u.id
        WHERE gm.group_id = ?
        ORDER BY gm.joined_at_ms ASC, u.id ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn is_member(pool: &SqlitePool, group_id: GroupId, user_id: UserId) -> Result<bool> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count.0 > 0)
}

/// Groups a user belongs to.
pub async fn groups_of(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Group>> {
    let rows = sqlx::query_as::<_, Group>(
        r#"
        SELECT g.id, g.name, g.description, g.created_by, g.created_at_ms
        FROM groups g
        JOIN group_members gm ON gm.group_id = g.id
        WHERE gm.user_id = ?
        ORDER BY g.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Append a group message and return its assigned id.
pub async fn append_group_message(pool: &SqlitePool, new: &NewGroupMessage) -> Result<MessageId> {
    let timestamp_ms = new.timestamp_ms.unwrap_or_else(chat_core::now_ms);

    let result = sqlx::query(
        r#"
        INSERT INTO group_messages (group_id, sender_id, content, translated_contents, timestamp_ms)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.group_id)
    .bind(new.sender_id)
    .bind(&new.content)
    .bind(&new.translated_contents)
    .bind(timestamp_ms)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// The group's message log, ascending by `(timestamp_ms, id)`.
pub async fn group_messages(pool: &SqlitePool, group_id: GroupId) -> Result<Vec<GroupMessage>> {
    let rows = sqlx::query_as::<_, GroupMessage>(
        r#"
        SELECT id, group_id, sender_id, content, translated_contents, timestamp_ms
        FROM group_messages WHERE group_id = ?
        ORDER BY timestamp_ms ASC, id ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_group_message(pool: &SqlitePool, id: MessageId) -> Result<GroupMessage> {
    sqlx::query_as::<_, GroupMessage>(
        r#"
        SELECT id, group_id, sender_id, content, translated_contents, timestamp_ms
        FROM group_messages WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "GroupMessage",
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::test_db;

    #[tokio::test]
    async fn test_create_group_enrolls_creator_as_admin() {
        let db = test_db().await;
        let alice = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();

        let group = create_group(db.pool(), "equipe", "project chat", alice.id)
            .await
            .unwrap();
        assert_eq!(group.created_by, alice.id);

        let members = members_of(db.pool(), group.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].is_admin);
        assert_eq!(members[0].user_id, alice.id);
    }

    #[tokio::test]
    async fn test_add_member_rejects_duplicates_and_unknowns() {
        let db = test_db().await;
        let alice = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let bob = user::create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();
        let group = create_group(db.pool(), "equipe", "", alice.id).await.unwrap();

        add_member(db.pool(), group.id, bob.id).await.unwrap();
        assert!(matches!(
            add_member(db.pool(), group.id, bob.id).await,
            Err(DatabaseError::AlreadyExists { .. })
        ));
        assert!(matches!(
            add_member(db.pool(), group.id, 9999).await,
            Err(DatabaseError::NotFound { entity: "User", .. })
        ));
        assert!(matches!(
            add_member(db.pool(), 9999, bob.id).await,
            Err(DatabaseError::NotFound { entity: "Group", .. })
        ));
    }

    #[tokio::test]
    async fn test_group_log_ordering() {
        let db = test_db().await;
        let alice = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let group = create_group(db.pool(), "equipe", "", alice.id).await.unwrap();

        for (content, ts) in [("late", 2000), ("early", 1000)] {
            append_group_message(
                db.pool(),
                &NewGroupMessage {
                    group_id: group.id,
                    sender_id: alice.id,
                    content: content.to_string(),
                    translated_contents: "{}".to_string(),
                    timestamp_ms: Some(ts),
                },
            )
            .await
            .unwrap();
        }

        let log = group_messages(db.pool(), group.id).await.unwrap();
        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_groups_of_and_membership() {
        let db = test_db().await;
        let alice = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let bob = user::create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();
        let group = create_group(db.pool(), "equipe", "", alice.id).await.unwrap();

        assert!(is_member(db.pool(), group.id, alice.id).await.unwrap());
        assert!(!is_member(db.pool(), group.id, bob.id).await.unwrap());
        assert!(groups_of(db.pool(), bob.id).await.unwrap().is_empty());
        assert_eq!(groups_of(db.pool(), alice.id).await.unwrap(), vec![group]);
    }
}
