//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use database::mongodb::{MongoConnectionManager, is_duplicate_key_error};
use futures::TryStreamExt;
use mongodb::{
    Collection, IndexModel,
    bson::doc,
    options::{FindOptions, IndexOptions},
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::Event;
use crate::repository::EventRepository;

pub const EVENTS_COLLECTION: &str = "events";

/// MongoDB-backed event repository.
///
/// The database handle comes from the shared connection manager on every
/// call, so the first request pays for the connection and later ones reuse
/// it. Indexes are created once, on first use.
pub struct MongoEventRepository {
    manager: Arc<MongoConnectionManager>,
    collection_name: String,
    indexes: OnceCell<()>,
}

impl MongoEventRepository {
    pub fn new(manager: Arc<MongoConnectionManager>) -> Self {
        Self::with_collection(manager, EVENTS_COLLECTION)
    }

    pub fn with_collection(manager: Arc<MongoConnectionManager>, collection_name: &str) -> Self {
        Self {
            manager,
            collection_name: collection_name.to_string(),
            indexes: OnceCell::new(),
        }
    }

    async fn collection(&self) -> EventResult<Collection<Event>> {
        let db = self.manager.get().await?;
        let collection = db.collection::<Event>(&self.collection_name);

        self.indexes
            .get_or_try_init(|| Self::create_indexes(&collection))
            .await?;

        Ok(collection)
    }

    /// Unique slug, plus tags for similar-event lookups
    async fn create_indexes(collection: &Collection<Event>) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "tags": 1 }).build(),
        ];

        collection.create_indexes(indexes).await?;
        info!(collection = collection.name(), "Event indexes ensured");
        Ok(())
    }

    fn write_error(err: mongodb::error::Error, slug: &str) -> EventError {
        if is_duplicate_key_error(&err) {
            EventError::Conflict(slug.to_string())
        } else {
            EventError::Database(err.to_string())
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id, slug = %event.slug))]
    async fn insert(&self, event: &Event) -> EventResult<()> {
        self.collection()
            .await?
            .insert_one(event)
            .await
            .map_err(|e| Self::write_error(e, &event.slug))?;

        info!("Event created");
        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id, slug = %event.slug))]
    async fn replace(&self, event: &Event) -> EventResult<()> {
        let result = self
            .collection()
            .await?
            .replace_one(doc! { "_id": event.id.to_string() }, event)
            .await
            .map_err(|e| Self::write_error(e, &event.slug))?;

        if result.matched_count == 0 {
            return Err(EventError::NotFound(event.id));
        }

        info!("Event updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let event = self
            .collection()
            .await?
            .find_one(doc! { "_id": id.to_string() })
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> EventResult<Option<Event>> {
        let event = self
            .collection()
            .await?
            .find_one(doc! { "slug": slug })
            .await?;
        Ok(event)
    }

    #[instrument(skip(self, source), fields(slug = %source.slug))]
    async fn find_similar(&self, source: &Event) -> EventResult<Vec<Event>> {
        let filter = doc! {
            "_id": { "$ne": source.id.to_string() },
            "tags": { "$in": source.tags.clone() },
        };

        let cursor = self.collection().await?.find(filter).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> EventResult<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let cursor = self
            .collection()
            .await?
            .find(doc! {})
            .with_options(options)
            .await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }
}
