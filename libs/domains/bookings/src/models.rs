//! Booking domain models

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A visitor's reservation for an event, stored in the `bookings` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id", with = "database::mongodb::uuid_as_string")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    /// Id of the booked event
    #[serde(with = "database::mongodb::uuid_as_string")]
    #[schema(value_type = String, format = Uuid)]
    pub event_id: Uuid,
    /// Lowercased, trimmed address
    pub email: String,
    #[serde(with = "database::mongodb::timestamp_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::timestamp_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(event_id: Uuid, email: String) -> Self {
        let now = Utc::now().trunc_subsecs(3);
        Self {
            id: Uuid::now_v7(),
            event_id,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Booking request as submitted by the event page
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub event_id: Option<String>,
    pub email: Option<String>,
    /// Slug of the page the booking came from; logged only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Outcome of `POST /bookings`; failures carry no detail
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookingCountQuery {
    /// Event to count bookings for
    pub event_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCountResponse {
    pub event_id: Uuid,
    pub count: u64,
}
