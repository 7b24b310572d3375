//! Persistent translation cache keyed by (source_lang, target_lang, source_text).

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::TranslationEntry;

/// Cached translation lookup. `None` on miss.
pub async fn get_translation(
    pool: &SqlitePool,
    source_lang: &str,
    target_lang: &str,
    source_text: &str,
) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT translated_text FROM custom_translations
        WHERE source_lang = ? AND target_lang = ? AND source_text = ?
        "#,
    )
    .bind(source_lang)
    .bind(target_lang)
    .bind(source_text)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(text,)| text))
}

/// Insert or overwrite a cache entry. Last write wins; entries never expire.
pub async fn upsert_translation(
    pool: &SqlitePool,
    source_lang: &str,
    target_lang: &str,
    source_text: &str,
    translated_text: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO custom_translations
            (source_lang, target_lang, source_text, translated_text, updated_at_ms)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (source_lang, target_lang, source_text)
        DO UPDATE SET translated_text = excluded.translated_text,
                      updated_at_ms = excluded.updated_at_ms
        "#,
    )
    .bind(source_lang)
    .bind(target_lang)
    .bind(source_text)
    .bind(translated_text)
    .bind(chat_core::now_ms())
    .execute(pool)
    .await?;

    Ok(())
}

/// All cached entries for a language pair, most recently updated first.
pub async fn translations_for_pair(
    pool: &SqlitePool,
    source_lang: &str,
    target_lang: &str,
) -> Result<Vec<TranslationEntry>> {
    let rows = sqlx::query_as::<_, TranslationEntry>(
        r#"
        SELECT source_lang, target_lang, source_text, translated_text, updated_at_ms
        FROM custom_translations
        WHERE source_lang = ? AND target_lang = ?
        ORDER BY updated_at_ms DESC, source_text ASC
        "#,
    )
    .bind(source_lang)
    .bind(target_lang)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total number of cached entries.
pub async fn count_translations(pool: &SqlitePool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM custom_translations")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn test_miss_then_hit() {
        let db = test_db().await;

        assert_eq!(
            get_translation(db.pool(), "fr", "en", "Bonjour").await.unwrap(),
            None
        );

        upsert_translation(db.pool(), "fr", "en", "Bonjour", "Hello")
            .await
            .unwrap();
        assert_eq!(
            get_translation(db.pool(), "fr", "en", "Bonjour").await.unwrap(),
            Some("Hello".to_string())
        );

        // Direction is part of the key.
        assert_eq!(
            get_translation(db.pool(), "en", "fr", "Bonjour").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let db = test_db().await;

        upsert_translation(db.pool(), "fr", "en", "Salut", "Hi").await.unwrap();
        upsert_translation(db.pool(), "fr", "en", "Salut", "Hey").await.unwrap();

        assert_eq!(
            get_translation(db.pool(), "fr", "en", "Salut").await.unwrap(),
            Some("Hey".to_string())
        );
        assert_eq!(count_translations(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pair_listing() {
        let db = test_db().await;

        upsert_translation(db.pool(), "fr", "en", "Bonjour", "Hello").await.unwrap();
        upsert_translation(db.pool(), "fr", "es", "Bonjour", "Hola").await.unwrap();

        let pair = translations_for_pair(db.pool(), "fr", "en").await.unwrap();
        assert_eq!(pair.len(), 1);
        assert_eq!(pair[0].translated_text, "Hello");
    }
}
