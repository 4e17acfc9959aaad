//! MongoDB implementation of BookingRepository

use async_trait::async_trait;
use database::mongodb::MongoConnectionManager;
use mongodb::{Collection, IndexModel, bson::doc};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::BookingResult;
use crate::models::Booking;
use crate::repository::BookingRepository;

pub const BOOKINGS_COLLECTION: &str = "bookings";

pub struct MongoBookingRepository {
    manager: Arc<MongoConnectionManager>,
    collection_name: String,
    indexes: OnceCell<()>,
}

impl MongoBookingRepository {
    pub fn new(manager: Arc<MongoConnectionManager>) -> Self {
        Self::with_collection(manager, BOOKINGS_COLLECTION)
    }

    pub fn with_collection(manager: Arc<MongoConnectionManager>, collection_name: &str) -> Self {
        Self {
            manager,
            collection_name: collection_name.to_string(),
            indexes: OnceCell::new(),
        }
    }

    async fn collection(&self) -> BookingResult<Collection<Booking>> {
        let db = self.manager.get().await?;
        let collection = db.collection::<Booking>(&self.collection_name);

        self.indexes
            .get_or_try_init(|| Self::create_indexes(&collection))
            .await?;

        Ok(collection)
    }

    /// Lookups by event, and by event and email. Neither is unique: the
    /// same address may book an event more than once.
    async fn create_indexes(collection: &Collection<Booking>) -> BookingResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "eventId": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "eventId": 1, "email": 1 })
                .build(),
        ];

        collection.create_indexes(indexes).await?;
        info!(collection = collection.name(), "Booking indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, event_id = %booking.event_id))]
    async fn insert(&self, booking: &Booking) -> BookingResult<()> {
        self.collection().await?.insert_one(booking).await?;
        info!("Booking created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_for_event(&self, event_id: Uuid) -> BookingResult<u64> {
        let count = self
            .collection()
            .await?
            .count_documents(doc! { "eventId": event_id.to_string() })
            .await?;
        Ok(count)
    }
}
