//! Accessibility point helpers.

use accessnav_core::models::{AccessibilityPoint, CreatePointRequest, HazardType};
use serde::Deserialize;

use crate::client::{AccessNavClient, Result};

/// A search hit with its distance from the query center.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPoint {
    #[serde(flatten)]
    pub point: AccessibilityPoint,
    pub distance_m: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedPoint {
    point_id: String,
}

impl AccessNavClient {
    /// Submit a point; returns its id.
    pub async fn submit_point(&self, request: &CreatePointRequest) -> Result<String> {
        let builder = self
            .client
            .post(self.url("/api/accessibility-points"))
            .json(request);
        let created: CreatedPoint = self.send_json(builder).await?;
        Ok(created.point_id)
    }

    /// Points within `radius_m` of a location, nearest first.
    pub async fn points_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: Option<f64>,
        point_type: Option<HazardType>,
    ) -> Result<Vec<NearbyPoint>> {
        let mut query = vec![("lat", lat.to_string()), ("lng", lng.to_string())];
        if let Some(radius) = radius_m {
            query.push(("radius", radius.to_string()));
        }
        if let Some(point_type) = point_type {
            query.push(("type", point_type.as_str().to_string()));
        }
        let builder = self
            .client
            .get(self.url("/api/accessibility-points"))
            .query(&query);
        self.send_json(builder).await
    }

    pub async fn get_point(&self, id: &str) -> Result<AccessibilityPoint> {
        let builder = self
            .client
            .get(self.url(&format!("/api/accessibility-points/{}", id)));
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[tokio::test]
    async fn points_near_sends_filters_and_decodes_hits() {
        let app = Router::new().route(
            "/api/accessibility-points",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("type").map(String::as_str), Some("elevator"));
                assert_eq!(q.get("radius").map(String::as_str), Some("250"));
                Json(json!([{
                    "id": "p9",
                    "type": "elevator",
                    "description": "Lobby lift",
                    "location": { "lat": 1.0, "lng": 2.0 },
                    "status": "verified",
                    "source": "city",
                    "createdAt": "2024-05-01T12:00:00Z",
                    "distanceM": 12.5
                }]))
            }),
        );
        let client = AccessNavClient::new(spawn(app).await);

        let hits = client
            .points_near(1.0, 2.0, Some(250.0), Some(HazardType::Elevator))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point.hazard.id, "p9");
        assert_eq!(hits[0].distance_m, 12.5);
    }

    #[tokio::test]
    async fn submit_point_returns_id() {
        let app = Router::new().route(
            "/api/accessibility-points",
            axum::routing::post(|Json(body): Json<Value>| async move {
                assert_eq!(body["type"], "ramp");
                assert!(body.get("imageUrl").is_none());
                (
                    axum::http::StatusCode::CREATED,
                    Json(json!({ "message": "ok", "pointId": "new-id" })),
                )
            }),
        );
        let client = AccessNavClient::new(spawn(app).await);

        let id = client
            .submit_point(&CreatePointRequest {
                lat: 1.0,
                lng: 2.0,
                point_type: "ramp".to_string(),
                description: Some("Side door".to_string()),
                image_url: None,
                source: None,
            })
            .await
            .unwrap();
        assert_eq!(id, "new-id");
    }
}
