use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::Event;

/// Persistence port for events.
///
/// Writes take a fully normalized [`Event`]; the write pipeline runs before
/// the repository is reached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event. A taken slug fails with `EventError::Conflict`.
    async fn insert(&self, event: &Event) -> EventResult<()>;

    /// Overwrite the stored event with the same id.
    async fn replace(&self, event: &Event) -> EventResult<()>;

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Exact match on the stored slug
    async fn find_by_slug(&self, slug: &str) -> EventResult<Option<Event>>;

    /// Events sharing at least one tag with `source`, excluding `source`
    async fn find_similar(&self, source: &Event) -> EventResult<Vec<Event>>;

    /// All events, newest first
    async fn list(&self) -> EventResult<Vec<Event>>;
}
