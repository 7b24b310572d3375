//! Direct message log: append, ordered range fetch, read-state transitions.

use chat_core::{MessageBody, MessageId, UserId};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{MessageRow, NewMessage};

const COLUMNS: &str = "id, sender_id, receiver_id, content, translated_content, \
     original_language, translated_language, timestamp_ms, is_read, is_delivered, \
     kind, file_url, file_name, file_size, file_type, duration_secs, \
     latitude, longitude, contact_info";

/// Flattened kind-specific columns for an insert.
struct KindColumns {
    file_url: Option<String>,
    file_name: Option<String>,
    file_size: Option<i64>,
    file_type: Option<String>,
    duration_secs: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    contact_info: Option<String>,
}

fn flatten_body(body: &MessageBody) -> Result<KindColumns> {
    let mut cols = KindColumns {
        file_url: None,
        file_name: None,
        file_size: None,
        file_type: None,
        duration_secs: None,
        latitude: None,
        longitude: None,
        contact_info: None,
    };

    match body {
        MessageBody::Text(_) => {}
        MessageBody::File(file) => {
            cols.file_url = Some(file.url.clone());
            cols.file_name = Some(file.name.clone());
            cols.file_size = Some(file.size);
            cols.file_type = Some(file.file_type.clone());
        }
        MessageBody::MultipleFiles(files) => {
            // The batch manifest is stored as JSON in file_url.
            let manifest = serde_json::to_string(files).map_err(|e| DatabaseError::Corrupt {
                entity: "Message",
                id: "new".to_string(),
                detail: format!("unencodable file manifest: {}", e),
            })?;
            cols.file_url = Some(manifest);
            cols.file_size = Some(files.iter().map(|f| f.size).sum());
        }
        MessageBody::Voice {
            file,
            duration_secs,
        } => {
            cols.file_url = Some(file.url.clone());
            cols.file_name = Some(file.name.clone());
            cols.file_size = Some(file.size);
            cols.file_type = Some(file.file_type.clone());
            cols.duration_secs = Some(*duration_secs as i64);
        }
        MessageBody::Location {
            latitude,
            longitude,
        } => {
            cols.latitude = Some(*latitude);
            cols.longitude = Some(*longitude);
        }
        MessageBody::ContactCard(card) => {
            cols.contact_info =
                Some(serde_json::to_string(card).map_err(|e| DatabaseError::Corrupt {
                    entity: "Message",
                    id: "new".to_string(),
                    detail: format!("unencodable contact card: {}", e),
                })?);
        }
    }

    Ok(cols)
}

/// Append a message to the log and return its assigned id.
///
/// Assigns a server-side timestamp when the request carries none. The insert
/// completes (durably) before this function returns, so callers can notify
/// receivers only after persistence.
pub async fn append_message(pool: &SqlitePool, new: &NewMessage) -> Result<MessageId> {
    let timestamp_ms = new.timestamp_ms.unwrap_or_else(chat_core::now_ms);
    let cols = flatten_body(&new.body)?;

    let result = sqlx::query(
        r#"
        INSERT INTO messages (
            sender_id, receiver_id, content, translated_content,
            original_language, translated_language, timestamp_ms,
            is_read, is_delivered, kind,
            file_url, file_name, file_size, file_type,
            duration_secs, latitude, longitude, contact_info
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.sender_id)
    .bind(new.receiver_id)
    .bind(&new.content)
    .bind(&new.translated_content)
    .bind(&new.original_language)
    .bind(&new.translated_language)
    .bind(timestamp_ms)
    .bind(new.is_delivered)
    .bind(new.body.kind().as_str())
    .bind(&cols.file_url)
    .bind(&cols.file_name)
    .bind(cols.file_size)
    .bind(&cols.file_type)
    .bind(cols.duration_secs)
    .bind(cols.latitude)
    .bind(cols.longitude)
    .bind(&cols.contact_info)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a single message by id.
pub async fn get_message(pool: &SqlitePool, id: MessageId) -> Result<MessageRow> {
    sqlx::query_as::<_, MessageRow>(&format!("SELECT {} FROM messages WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Message",
            id: id.to_string(),
        })
}

/// All messages between the unordered pair `{a, b}`, both directions,
/// ordered ascending by `(timestamp_ms, id)`. The id breaks ties
/// deterministically when two messages share a timestamp.
pub async fn messages_between(pool: &SqlitePool, a: UserId, b: UserId) -> Result<Vec<MessageRow>> {
    let rows = sqlx::query_as::<_, MessageRow>(&format!(
        r#"
        SELECT {} FROM messages
        WHERE (sender_id = ?1 AND receiver_id = ?2)
           OR (sender_id = ?2 AND receiver_id = ?1)
        ORDER BY timestamp_ms ASC, id ASC
        "#,
        COLUMNS
    ))
    .bind(a)
    .bind(b)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Flip the read flag on one message.
pub async fn mark_read(pool: &SqlitePool, id: MessageId) -> Result<()> {
    let result = sqlx::query("UPDATE messages SET is_read = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Message",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Flip the delivered flag on every undelivered message addressed to
/// `receiver_id` and return how many rows flipped. Runs when the receiver
/// comes online to catch up on messages sent while they were away.
pub async fn mark_delivered_to(pool: &SqlitePool, receiver_id: UserId) -> Result<u64> {
    let result =
        sqlx::query("UPDATE messages SET is_delivered = 1 WHERE receiver_id = ? AND is_delivered = 0")
            .bind(receiver_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

/// Mark every unread message from `sender_id` to `receiver_id` as read and
/// return how many rows flipped. Idempotent: re-invoking returns 0.
pub async fn mark_all_read_from(
    pool: &SqlitePool,
    sender_id: UserId,
    receiver_id: UserId,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE messages SET is_read = 1
        WHERE sender_id = ? AND receiver_id = ? AND is_read = 0
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Unread message counts for `receiver_id`, grouped by sender. Senders with
/// zero unread messages are omitted.
pub async fn unread_counts(pool: &SqlitePool, receiver_id: UserId) -> Result<Vec<(UserId, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT sender_id, COUNT(*) as unread
        FROM messages
        WHERE receiver_id = ? AND is_read = 0
        GROUP BY sender_id
        "#,
    )
    .bind(receiver_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::{test_db, user, Database};
    use chat_core::{ContactCard, FileInfo};

    async fn two_users(db: &Database) -> (UserId, UserId) {
        let a = user::create_user(db.pool(), &NewUser::new("alice", "fr"))
            .await
            .unwrap();
        let b = user::create_user(db.pool(), &NewUser::new("bob", "en"))
            .await
            .unwrap();
        (a.id, b.id)
    }

    fn text(sender: UserId, receiver: UserId, content: &str, ts: Option<i64>) -> NewMessage {
        NewMessage {
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
            translated_content: content.to_string(),
            original_language: "en".to_string(),
            translated_language: "en".to_string(),
            timestamp_ms: ts,
            is_delivered: true,
            body: MessageBody::Text(content.to_string()),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        let id1 = append_message(db.pool(), &text(a, b, "one", None))
            .await
            .unwrap();
        let id2 = append_message(db.pool(), &text(a, b, "two", None))
            .await
            .unwrap();
        assert!(id2 > id1);
    }

    #[tokio::test]
    async fn test_range_orders_by_timestamp_then_id() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        // Same timestamp: insertion order must break the tie.
        append_message(db.pool(), &text(a, b, "first", Some(1000)))
            .await
            .unwrap();
        append_message(db.pool(), &text(b, a, "second", Some(1000)))
            .await
            .unwrap();
        append_message(db.pool(), &text(a, b, "earlier", Some(500)))
            .await
            .unwrap();

        let rows = messages_between(db.pool(), a, b).await.unwrap();
        let contents: Vec<&str> = rows.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["earlier", "first", "second"]);

        // Pair key is unordered: both directions return the same sequence.
        let reversed = messages_between(db.pool(), b, a).await.unwrap();
        assert_eq!(rows, reversed);
    }

    #[tokio::test]
    async fn test_mark_all_read_idempotent() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        append_message(db.pool(), &text(a, b, "x", None)).await.unwrap();
        append_message(db.pool(), &text(a, b, "y", None)).await.unwrap();

        assert_eq!(mark_all_read_from(db.pool(), a, b).await.unwrap(), 2);
        assert_eq!(mark_all_read_from(db.pool(), a, b).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_delivered_to_catches_up_offline_messages() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        let offline = NewMessage {
            is_delivered: false,
            ..text(a, b, "while away", None)
        };
        let id = append_message(db.pool(), &offline).await.unwrap();
        append_message(db.pool(), &text(a, b, "seen live", None))
            .await
            .unwrap();

        assert_eq!(mark_delivered_to(db.pool(), b).await.unwrap(), 1);
        assert!(get_message(db.pool(), id).await.unwrap().is_delivered);
        assert_eq!(mark_delivered_to(db.pool(), b).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unread_counts() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        append_message(db.pool(), &text(a, b, "1", None)).await.unwrap();
        append_message(db.pool(), &text(a, b, "2", None)).await.unwrap();

        let counts = unread_counts(db.pool(), b).await.unwrap();
        assert_eq!(counts, vec![(a, 2)]);

        // The sender has nothing unread.
        assert!(unread_counts(db.pool(), a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_kind_columns_round_trip() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        let body = MessageBody::Voice {
            file: FileInfo {
                url: "/uploads/audio/v.webm".to_string(),
                name: "v.webm".to_string(),
                size: 2048,
                file_type: "audio".to_string(),
            },
            duration_secs: 7,
        };
        let new = NewMessage {
            body: body.clone(),
            content: "Voice message".to_string(),
            translated_content: "Message vocal".to_string(),
            original_language: "en".to_string(),
            translated_language: "fr".to_string(),
            ..text(a, b, "unused", None)
        };

        let id = append_message(db.pool(), &new).await.unwrap();
        let row = get_message(db.pool(), id).await.unwrap();
        assert_eq!(row.kind, "voice");
        assert_eq!(row.duration_secs, Some(7));
        assert_eq!(row.body().unwrap(), body);
    }

    #[tokio::test]
    async fn test_contact_card_round_trip() {
        let db = test_db().await;
        let (a, b) = two_users(&db).await;

        let card = ContactCard {
            name: "Dora".to_string(),
            phone: Some("+33123456789".to_string()),
            email: None,
        };
        let new = NewMessage {
            body: MessageBody::ContactCard(card.clone()),
            content: "Contact: Dora".to_string(),
            ..text(a, b, "unused", None)
        };

        let id = append_message(db.pool(), &new).await.unwrap();
        let row = get_message(db.pool(), id).await.unwrap();
        assert_eq!(row.body().unwrap(), MessageBody::ContactCard(card));
    }
}
