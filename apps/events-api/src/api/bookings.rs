//! Bookings wiring
//!
//! Bookings check their event through the same repository instance the
//! events routes use.

use domain_bookings::{BookingService, MongoBookingRepository};
use domain_events::{EventService, MongoEventRepository};

use crate::state::AppState;

pub fn service(
    state: &AppState,
    events: &EventService<MongoEventRepository>,
) -> BookingService<MongoBookingRepository, MongoEventRepository> {
    BookingService::new(
        MongoBookingRepository::new(state.mongo.clone()),
        events.repository(),
    )
}
