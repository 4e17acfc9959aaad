//! Booking Service - validation and referential checks before persisting

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, CreateBooking};
use crate::repository::{BookingRepository, EventLookup};
use crate::validation::{parse_event_id, validate_booking};

pub struct BookingService<B: BookingRepository, E: EventLookup> {
    bookings: Arc<B>,
    events: Arc<E>,
}

impl<B: BookingRepository, E: EventLookup> BookingService<B, E> {
    pub fn new(bookings: B, events: Arc<E>) -> Self {
        Self {
            bookings: Arc::new(bookings),
            events,
        }
    }

    /// Validate the request, make sure the event exists, then store.
    ///
    /// No duplicate check is made and nothing else changes: no capacity,
    /// no notification.
    #[instrument(skip(self, input), fields(slug = ?input.slug))]
    pub async fn create_booking(&self, input: CreateBooking) -> BookingResult<Booking> {
        let valid = validate_booking(&input)?;

        if !self.events.event_exists(valid.event_id).await? {
            return Err(BookingError::Referential("event not found".to_string()));
        }

        let booking = Booking::new(valid.event_id, valid.email);
        self.bookings.insert(&booking).await?;

        info!(booking_id = %booking.id, event_id = %booking.event_id, "Booking stored");
        Ok(booking)
    }

    #[instrument(skip(self))]
    pub async fn count_for_event(&self, event_id: &str) -> BookingResult<(Uuid, u64)> {
        let event_id = parse_event_id(event_id)?;
        let count = self.bookings.count_for_event(event_id).await?;
        Ok((event_id, count))
    }
}

impl<B: BookingRepository, E: EventLookup> Clone for BookingService<B, E> {
    fn clone(&self) -> Self {
        Self {
            bookings: Arc::clone(&self.bookings),
            events: Arc::clone(&self.events),
        }
    }
}
