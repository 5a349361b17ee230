//! Place model: a spot on the road recommended by a user.

use serde::{Deserialize, Serialize};

use super::Level;

/// Request body for POST /api/place.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaceRequest {
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub review: String,
    pub user_id: i64,
}

/// A place as listed to the mini-app, with the author's display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceListing {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    pub photo_url: Option<String>,
    pub review: String,
    pub username: Option<String>,
}

/// Outcome of storing a place: the new row and the author's updated standing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceReceipt {
    pub place_id: i64,
    pub places_count: i64,
    pub level: Level,
}

/// Plain `{"status": "ok"}` acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
