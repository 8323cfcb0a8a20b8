//! User preference persistence.

use accessnav_core::models::{MobilityProfile, UserPreferences};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Stored preferences, or defaults for users who never saved any.
pub async fn get_preferences(pool: &SqlitePool, user_id: &str) -> Result<UserPreferences> {
    let row: Option<(String, Option<String>)> = sqlx::query_as(
        "SELECT default_mobility, voice_uri FROM user_preferences WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some((mobility, voice_uri)) => UserPreferences {
            default_mobility: mobility.parse().unwrap_or_default(),
            voice_uri,
        },
        None => UserPreferences::default(),
    })
}

/// Partial update: `None` fields keep their stored value.
///
/// The merge happens inside a single upsert so concurrent partial updates for
/// the same user never drop each other's fields.
pub async fn update_preferences(
    pool: &SqlitePool,
    user_id: &str,
    default_mobility: Option<MobilityProfile>,
    voice_uri: Option<Option<String>>,
) -> Result<UserPreferences> {
    let voice_supplied = voice_uri.is_some();
    let (mobility, voice_uri): (String, Option<String>) = sqlx::query_as(
        r#"
        INSERT INTO user_preferences (user_id, default_mobility, voice_uri, updated_at)
        VALUES (?1, COALESCE(?2, 'standard'), ?3, ?5)
        ON CONFLICT(user_id) DO UPDATE SET
            default_mobility = COALESCE(?2, default_mobility),
            voice_uri = CASE WHEN ?4 THEN ?3 ELSE voice_uri END,
            updated_at = excluded.updated_at
        RETURNING default_mobility, voice_uri
        "#,
    )
    .bind(user_id)
    .bind(default_mobility.map(|m| m.as_str()))
    .bind(voice_uri.flatten())
    .bind(voice_supplied)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(UserPreferences {
        default_mobility: mobility.parse().unwrap_or_default(),
        voice_uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;

    #[tokio::test]
    async fn missing_row_yields_defaults() {
        let db = init_database(":memory:", 1).await.unwrap();
        let prefs = get_preferences(db.pool(), "nobody").await.unwrap();
        assert_eq!(prefs, UserPreferences::default());
    }

    #[tokio::test]
    async fn partial_updates_merge_with_stored_values() {
        let db = init_database(":memory:", 1).await.unwrap();
        let pool = db.pool();

        update_preferences(pool, "u1", Some(MobilityProfile::Wheelchair), None)
            .await
            .unwrap();
        let prefs = update_preferences(pool, "u1", None, Some(Some("Samantha".into())))
            .await
            .unwrap();
        assert_eq!(prefs.default_mobility, MobilityProfile::Wheelchair);
        assert_eq!(prefs.voice_uri.as_deref(), Some("Samantha"));

        let cleared = update_preferences(pool, "u1", None, Some(None)).await.unwrap();
        assert_eq!(cleared.voice_uri, None);
        assert_eq!(get_preferences(pool, "u1").await.unwrap(), cleared);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_partial_updates_keep_both_fields() {
        let path = std::env::temp_dir().join(format!("accessnav-prefs-{}.db", uuid::Uuid::new_v4()));
        let db_path = path.to_string_lossy().to_string();
        let db = init_database(&db_path, 5).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..30 {
            let user = format!("user-{}", i);
            let pool = db.pool().clone();
            let mobility_user = user.clone();
            tasks.push(tokio::spawn(async move {
                update_preferences(&pool, &mobility_user, Some(MobilityProfile::Wheelchair), None)
                    .await
            }));
            let pool = db.pool().clone();
            tasks.push(tokio::spawn(async move {
                update_preferences(&pool, &user, None, Some(Some("Samantha".into()))).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        for i in 0..30 {
            let prefs = get_preferences(db.pool(), &format!("user-{}", i)).await.unwrap();
            assert_eq!(prefs.default_mobility, MobilityProfile::Wheelchair);
            assert_eq!(prefs.voice_uri.as_deref(), Some("Samantha"));
        }

        db.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", db_path, suffix));
        }
    }
}
