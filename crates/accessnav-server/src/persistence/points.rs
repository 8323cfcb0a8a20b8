//! Accessibility point persistence and radius search.

use accessnav_core::enrichment::{PointStore, StoreError};
use accessnav_core::models::{AccessibilityPoint, Coordinate, HazardPoint, HazardType};
use accessnav_core::spatial::{bounding_box, distance_m};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Insert a new accessibility point.
pub async fn insert_point(pool: &SqlitePool, point: &AccessibilityPoint) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO accessibility_points
            (id, point_type, description, lat, lng, status, image_url, source, submitted_by, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&point.hazard.id)
    .bind(point.hazard.hazard_type.as_str())
    .bind(&point.hazard.description)
    .bind(point.hazard.location.lat)
    .bind(point.hazard.location.lng)
    .bind(point.status.as_str())
    .bind(&point.image_url)
    .bind(&point.source)
    .bind(&point.submitted_by)
    .bind(point.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a single point by ID.
pub async fn get_point(pool: &SqlitePool, id: &str) -> Result<Option<AccessibilityPoint>> {
    let row = sqlx::query_as::<_, PointRow>(
        "SELECT id, point_type, description, lat, lng, status, image_url, source, submitted_by, created_at
         FROM accessibility_points WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Points within `radius_m` meters of `center`, nearest first.
///
/// The SQL bounding box only narrows candidates; the great-circle check
/// decides membership.
pub async fn find_points_near(
    pool: &SqlitePool,
    center: &Coordinate,
    radius_m: f64,
    point_type: Option<HazardType>,
) -> Result<Vec<(AccessibilityPoint, f64)>> {
    let bbox = bounding_box(center, radius_m);
    let rows = sqlx::query_as::<_, PointRow>(
        r#"
        SELECT id, point_type, description, lat, lng, status, image_url, source, submitted_by, created_at
        FROM accessibility_points
        WHERE lat BETWEEN ?1 AND ?2
          AND lng BETWEEN ?3 AND ?4
          AND (?5 IS NULL OR point_type = ?5)
        "#,
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lng)
    .bind(bbox.max_lng)
    .bind(point_type.map(|t| t.as_str()))
    .fetch_all(pool)
    .await?;

    let mut matches = Vec::with_capacity(rows.len());
    for row in rows {
        let point: AccessibilityPoint = row.try_into()?;
        let distance = distance_m(center, &point.hazard.location);
        if distance <= radius_m {
            matches.push((point, distance));
        }
    }
    matches.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(matches)
}

/// SQLite-backed [`PointStore`] used by route enrichment.
#[derive(Clone)]
pub struct SqlitePointStore {
    pool: SqlitePool,
}

impl SqlitePointStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointStore for SqlitePointStore {
    async fn find_near(
        &self,
        point: Coordinate,
        radius_m: f64,
    ) -> Result<Vec<HazardPoint>, StoreError> {
        find_points_near(&self.pool, &point, radius_m, None)
            .await
            .map(|found| found.into_iter().map(|(p, _)| p.hazard).collect())
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct PointRow {
    id: String,
    point_type: String,
    description: String,
    lat: f64,
    lng: f64,
    status: String,
    image_url: Option<String>,
    source: String,
    submitted_by: Option<String>,
    created_at: String,
}

impl TryFrom<PointRow> for AccessibilityPoint {
    type Error = anyhow::Error;

    fn try_from(row: PointRow) -> Result<Self> {
        let hazard_type: HazardType = row.point_type.parse().map_err(anyhow::Error::msg)?;
        let status = row.status.parse().unwrap_or_default();
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(AccessibilityPoint {
            hazard: HazardPoint {
                id: row.id,
                hazard_type,
                description: row.description,
                location: Coordinate::new(row.lat, row.lng),
            },
            status,
            image_url: row.image_url,
            source: row.source,
            submitted_by: row.submitted_by,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;
    use accessnav_core::models::PointStatus;

    fn point(id: &str, hazard_type: HazardType, lat: f64, lng: f64) -> AccessibilityPoint {
        AccessibilityPoint {
            hazard: HazardPoint {
                id: id.to_string(),
                hazard_type,
                description: format!("{} point", id),
                location: Coordinate::new(lat, lng),
            },
            status: PointStatus::Unverified,
            image_url: None,
            source: "user".to_string(),
            submitted_by: Some("tester".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn radius_search_uses_great_circle_distance() {
        let db = init_database(":memory:", 1).await.unwrap();
        let pool = db.pool();
        // ~11 m, ~22 m and ~111 m north of the query point.
        insert_point(pool, &point("near", HazardType::Ramp, 40.0001, -73.0)).await.unwrap();
        insert_point(pool, &point("edge", HazardType::Elevator, 40.0002, -73.0)).await.unwrap();
        insert_point(pool, &point("far", HazardType::Hazard, 40.001, -73.0)).await.unwrap();

        let center = Coordinate::new(40.0, -73.0);
        let found = find_points_near(pool, &center, 25.0, None).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|(p, _)| p.hazard.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "edge"]);
        assert!(found[0].1 < found[1].1);

        let ramps = find_points_near(pool, &center, 25.0, Some(HazardType::Ramp))
            .await
            .unwrap();
        assert_eq!(ramps.len(), 1);
        assert_eq!(ramps[0].0.hazard.id, "near");
    }

    #[tokio::test]
    async fn get_point_round_trips_metadata() {
        let db = init_database(":memory:", 1).await.unwrap();
        let pool = db.pool();
        let mut stored = point("p1", HazardType::StepFreeEntrance, 51.5, -0.12);
        stored.image_url = Some("https://img.example/p1.jpg".to_string());
        insert_point(pool, &stored).await.unwrap();

        let loaded = get_point(pool, "p1").await.unwrap().unwrap();
        assert_eq!(loaded.hazard, stored.hazard);
        assert_eq!(loaded.image_url, stored.image_url);
        assert_eq!(loaded.submitted_by.as_deref(), Some("tester"));
        assert!(get_point(pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_adapter_reports_closed_pool_as_unavailable() {
        let db = init_database(":memory:", 1).await.unwrap();
        let store = SqlitePointStore::new(db.pool().clone());
        assert!(store
            .find_near(Coordinate::new(0.0, 0.0), 25.0)
            .await
            .unwrap()
            .is_empty());

        db.pool().close().await;
        let err = store
            .find_near(Coordinate::new(0.0, 0.0), 25.0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
