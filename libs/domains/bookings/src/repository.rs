use async_trait::async_trait;
use domain_events::{EventRepository, MongoEventRepository};
use uuid::Uuid;

use crate::error::BookingResult;
use crate::models::Booking;

/// Persistence port for bookings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> BookingResult<()>;

    async fn count_for_event(&self, event_id: Uuid) -> BookingResult<u64>;
}

/// What bookings need to know about events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLookup: Send + Sync {
    async fn event_exists(&self, event_id: Uuid) -> BookingResult<bool>;
}

#[async_trait]
impl EventLookup for MongoEventRepository {
    async fn event_exists(&self, event_id: Uuid) -> BookingResult<bool> {
        Ok(self.get_by_id(event_id).await?.is_some())
    }
}
