//! Event domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// How attendees take part in an event
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

/// A developer event listing as stored in the `events` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id", with = "database::mongodb::uuid_as_string")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub title: String,
    /// URL key derived from the title; unique across events
    pub slug: String,
    pub description: String,
    pub overview: String,
    /// Banner image URI
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Start time, 24-hour `HH:MM`
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    /// Millisecond precision; fixed-width so stored values sort by time
    #[serde(with = "database::mongodb::timestamp_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::timestamp_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Write payload for [`EventService::create_or_update`](crate::EventService::create_or_update).
///
/// Without `id` every field is required and a new event is created. With
/// `id` the stored event is updated and omitted fields keep their values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    /// Any common calendar format, e.g. `2025-06-14` or `June 14, 2025`
    pub date: Option<String>,
    /// `H:MM` or `HH:MM`, 24-hour
    pub time: Option<String>,
    /// `online`, `offline` or `hybrid`
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Body of `GET /events`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

/// Body of `GET /events/{slug}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(EventMode::from_str("hybrid").unwrap(), EventMode::Hybrid);
        assert!(EventMode::from_str("in-person").is_err());
        assert_eq!(EventMode::Online.to_string(), "online");
    }

    #[test]
    fn test_input_accepts_camel_case() {
        let input: EventInput = serde_json::from_value(serde_json::json!({
            "title": "RustConf",
            "tags": ["rust"],
        }))
        .unwrap();
        assert_eq!(input.title.as_deref(), Some("RustConf"));
        assert!(input.id.is_none());
        assert!(input.agenda.is_none());
    }
}
