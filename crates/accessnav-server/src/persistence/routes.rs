//! Saved route persistence.

use accessnav_core::models::SavedRoute;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

pub async fn insert_route(pool: &SqlitePool, route: &SavedRoute) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO saved_routes
            (id, user_id, name, origin, destination, route_data, custom_warnings, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&route.id)
    .bind(&route.user_id)
    .bind(&route.name)
    .bind(serde_json::to_string(&route.origin)?)
    .bind(serde_json::to_string(&route.destination)?)
    .bind(serde_json::to_string(&route.google_route_data)?)
    .bind(serde_json::to_string(&route.custom_warnings)?)
    // Fixed-width timestamps keep ORDER BY created_at chronological.
    .bind(route.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
    .execute(pool)
    .await?;

    Ok(())
}

/// A user's routes, newest first.
pub async fn list_routes(pool: &SqlitePool, user_id: &str) -> Result<Vec<SavedRoute>> {
    let rows = sqlx::query_as::<_, RouteRow>(
        "SELECT id, user_id, name, origin, destination, route_data, custom_warnings, created_at
         FROM saved_routes WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Load a route owned by `user_id`.
pub async fn get_route(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Option<SavedRoute>> {
    let row = sqlx::query_as::<_, RouteRow>(
        "SELECT id, user_id, name, origin, destination, route_data, custom_warnings, created_at
         FROM saved_routes WHERE id = ?1 AND user_id = ?2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Delete a route owned by `user_id`. Returns false when nothing matched.
pub async fn delete_route(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM saved_routes WHERE id = ?1 AND user_id = ?2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: String,
    user_id: String,
    name: String,
    origin: String,
    destination: String,
    route_data: String,
    custom_warnings: String,
    created_at: String,
}

impl TryFrom<RouteRow> for SavedRoute {
    type Error = anyhow::Error;

    fn try_from(row: RouteRow) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(SavedRoute {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            origin: serde_json::from_str(&row.origin)?,
            destination: serde_json::from_str(&row.destination)?,
            google_route_data: serde_json::from_str(&row.route_data)?,
            custom_warnings: serde_json::from_str(&row.custom_warnings)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;
    use chrono::Duration;
    use serde_json::json;

    fn route(id: &str, user: &str, created_at: DateTime<Utc>) -> SavedRoute {
        SavedRoute {
            id: id.to_string(),
            user_id: user.to_string(),
            name: format!("Route {}", id),
            origin: json!("Union Square"),
            destination: json!({"lat": 40.75, "lng": -73.99}),
            google_route_data: json!({"status": "OK", "routes": []}),
            custom_warnings: vec![json!({"id": "w1", "type": "hazard"})],
            created_at,
        }
    }

    #[tokio::test]
    async fn routes_are_scoped_to_owner_and_listed_newest_first() {
        let db = init_database(":memory:", 1).await.unwrap();
        let pool = db.pool();
        let now = Utc::now();
        insert_route(pool, &route("old", "alice", now - Duration::hours(2))).await.unwrap();
        insert_route(pool, &route("new", "alice", now)).await.unwrap();
        insert_route(pool, &route("other", "bob", now)).await.unwrap();

        let listed = list_routes(pool, "alice").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        assert!(get_route(pool, "bob", "old").await.unwrap().is_none());
        let loaded = get_route(pool, "alice", "old").await.unwrap().unwrap();
        assert_eq!(loaded.destination, json!({"lat": 40.75, "lng": -73.99}));
        assert_eq!(loaded.custom_warnings.len(), 1);
    }

    #[tokio::test]
    async fn delete_only_removes_own_route() {
        let db = init_database(":memory:", 1).await.unwrap();
        let pool = db.pool();
        insert_route(pool, &route("r1", "alice", Utc::now())).await.unwrap();

        assert!(!delete_route(pool, "bob", "r1").await.unwrap());
        assert!(delete_route(pool, "alice", "r1").await.unwrap());
        assert!(!delete_route(pool, "alice", "r1").await.unwrap());
        assert!(list_routes(pool, "alice").await.unwrap().is_empty());
    }
}
