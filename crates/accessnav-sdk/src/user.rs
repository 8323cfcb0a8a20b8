//! Saved routes and preferences for the authenticated user.

use accessnav_core::models::{MobilityProfile, SavedRoute, SavedRouteSummary, UserPreferences};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{AccessNavClient, Result};

/// Body for saving a route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRoute {
    pub name: String,
    pub origin: Value,
    pub destination: Value,
    pub google_route_data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_warnings: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedRouteId {
    route_id: String,
}

impl AccessNavClient {
    /// Save a route; returns its id.
    pub async fn save_route(&self, route: &SaveRoute) -> Result<String> {
        let builder = self.client.post(self.url("/api/routes")).json(route);
        let saved: SavedRouteId = self.send_json(builder).await?;
        Ok(saved.route_id)
    }

    pub async fn list_routes(&self) -> Result<Vec<SavedRouteSummary>> {
        self.send_json(self.client.get(self.url("/api/routes"))).await
    }

    pub async fn get_route(&self, id: &str) -> Result<SavedRoute> {
        self.send_json(self.client.get(self.url(&format!("/api/routes/{}", id))))
            .await
    }

    pub async fn delete_route(&self, id: &str) -> Result<()> {
        self.send(self.client.delete(self.url(&format!("/api/routes/{}", id))))
            .await?;
        Ok(())
    }

    pub async fn preferences(&self) -> Result<UserPreferences> {
        self.send_json(self.client.get(self.url("/api/user/preferences")))
            .await
    }

    /// Partial update; `Some(None)` for `voice_uri` clears the stored voice.
    pub async fn update_preferences(
        &self,
        default_mobility: Option<MobilityProfile>,
        voice_uri: Option<Option<String>>,
    ) -> Result<UserPreferences> {
        let mut body = Map::new();
        if let Some(mobility) = default_mobility {
            body.insert("defaultMobility".into(), Value::from(mobility.as_str()));
        }
        if let Some(voice) = voice_uri {
            body.insert("voiceURI".into(), voice.map(Value::from).unwrap_or(Value::Null));
        }
        let builder = self
            .client
            .put(self.url("/api/user/preferences"))
            .json(&body);
        self.send_json(builder).await
    }
}
