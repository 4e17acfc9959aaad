//! Event service: write pipeline and the read side used by pages

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::cache::{EVENTS_TAG, SIMILAR_EVENTS_EMPTY_TTL, SIMILAR_EVENTS_TTL, TaggedCache};
use crate::error::{EventError, EventResult};
use crate::models::{Event, EventInput};
use crate::pipeline::{normalize, validate};
use crate::repository::EventRepository;

/// Result of [`EventService::create_or_update`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Created(Event),
    Updated(Event),
}

impl WriteOutcome {
    pub fn event(&self) -> &Event {
        match self {
            WriteOutcome::Created(event) | WriteOutcome::Updated(event) => event,
        }
    }

    pub fn into_event(self) -> Event {
        match self {
            WriteOutcome::Created(event) | WriteOutcome::Updated(event) => event,
        }
    }
}

pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
    similar: Arc<TaggedCache<Vec<Event>>>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_cache_ttl(repository, SIMILAR_EVENTS_TTL)
    }

    pub fn with_cache_ttl(repository: R, ttl: Duration) -> Self {
        Self {
            repository: Arc::new(repository),
            similar: Arc::new(TaggedCache::new(ttl)),
        }
    }

    /// Shared handle to the underlying repository
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Validate, normalize and persist an event.
    ///
    /// Input without an `id` creates an event; with an `id` it updates the
    /// stored one, failing with `NotFound` when there is none. Every
    /// successful write invalidates the cached similar-events results.
    #[instrument(skip(self, input), fields(event_id = ?input.id))]
    pub async fn create_or_update(&self, input: EventInput) -> EventResult<WriteOutcome> {
        let existing = match input.id {
            Some(id) => Some(
                self.repository
                    .get_by_id(id)
                    .await?
                    .ok_or(EventError::NotFound(id))?,
            ),
            None => None,
        };

        let validated = validate(input, existing.as_ref())?;
        let event = normalize(validated, existing.as_ref(), Utc::now())?;

        let outcome = match existing {
            None => {
                self.repository.insert(&event).await?;
                WriteOutcome::Created(event)
            }
            Some(_) => {
                self.repository.replace(&event).await?;
                WriteOutcome::Updated(event)
            }
        };

        self.similar.invalidate_tag(EVENTS_TAG);
        Ok(outcome)
    }

    /// Exact lookup; the caller sanitizes the key.
    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> EventResult<Option<Event>> {
        self.repository.find_by_slug(slug).await
    }

    /// Events sharing a tag with the event at `slug`.
    ///
    /// Never fails: an unknown slug gives an empty list, and so does any
    /// repository error (logged, not cached). Empty results are cached for
    /// a shorter time than non-empty ones.
    #[instrument(skip(self))]
    pub async fn find_similar(&self, slug: &str) -> Vec<Event> {
        if let Some(events) = self.similar.get(slug) {
            return events;
        }

        let epoch = self.similar.epoch();
        match self.load_similar(slug).await {
            Ok(events) => {
                let ttl = if events.is_empty() {
                    SIMILAR_EVENTS_EMPTY_TTL.min(self.similar.ttl())
                } else {
                    self.similar.ttl()
                };
                self.similar
                    .insert_with_ttl(epoch, slug, events.clone(), &[EVENTS_TAG], ttl);
                events
            }
            Err(e) => {
                warn!(error = %e, "Similar events lookup failed");
                Vec::new()
            }
        }
    }

    async fn load_similar(&self, slug: &str) -> EventResult<Vec<Event>> {
        match self.repository.find_by_slug(slug).await? {
            Some(source) => self.repository.find_similar(&source).await,
            None => Ok(Vec::new()),
        }
    }

    /// All events, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> EventResult<Vec<Event>> {
        self.repository.list().await
    }
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            similar: Arc::clone(&self.similar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventMode;
    use crate::repository::MockEventRepository;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn input(title: &str, tags: &[&str]) -> EventInput {
        EventInput {
            title: Some(title.into()),
            description: Some("A day of talks".into()),
            overview: Some("Talks and workshops".into()),
            image: Some("https://cdn.example.com/banner.png".into()),
            venue: Some("Main Hall".into()),
            location: Some("Berlin".into()),
            date: Some("2025-09-01".into()),
            time: Some("10:00".into()),
            mode: Some("offline".into()),
            audience: Some("Developers".into()),
            agenda: Some(vec!["Keynote".into()]),
            organizer: Some("Dev Community".into()),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    fn stored(title: &str, tags: &[&str]) -> Event {
        let validated = validate(input(title, tags), None).unwrap();
        normalize(validated, None, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_inserts() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .withf(|event: &Event| event.slug == "react-summit-2025" && event.mode == EventMode::Offline)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_replace().never();

        let service = EventService::new(repo);
        let outcome = service
            .create_or_update(input("React Summit 2025!!", &["react"]))
            .await
            .unwrap();

        assert!(matches!(outcome, WriteOutcome::Created(_)));
        assert_eq!(outcome.event().slug, "react-summit-2025");
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_repository() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert().never();

        let service = EventService::new(repo);
        let mut bad = input("RustConf", &["rust"]);
        bad.time = Some("25:00".into());

        let err = service.create_or_update(bad).await.unwrap_err();
        assert!(matches!(err, EventError::Validation(msg) if msg == "invalid time"));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .returning(|event| Err(EventError::Conflict(event.slug.clone())));

        let service = EventService::new(repo);
        let err = service
            .create_or_update(input("React Summit 2025", &["react"]))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Conflict(slug) if slug == "react-summit-2025"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let id = Uuid::now_v7();
        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = EventService::new(repo);
        let err = service
            .create_or_update(EventInput {
                id: Some(id),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_update_merges_and_replaces() {
        let existing = stored("RustConf", &["rust"]);
        let id = existing.id;
        let created_at = existing.created_at;

        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_replace()
            .withf(move |event: &Event| {
                event.id == id && event.venue == "Annex" && event.slug == "rustconf"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = EventService::new(repo);
        let outcome = service
            .create_or_update(EventInput {
                id: Some(id),
                venue: Some("  Annex ".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(outcome, WriteOutcome::Updated(_)));
        assert_eq!(outcome.event().created_at, created_at);
    }

    #[tokio::test]
    async fn test_find_similar_unknown_slug_is_empty() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_find_similar().never();

        let service = EventService::new(repo);
        assert!(service.find_similar("nope").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_similar_empty_result_expires_early() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_slug()
            .with(eq("nope"))
            .times(2)
            .returning(|_| Ok(None));

        let service = EventService::new(repo);
        assert!(service.find_similar("nope").await.is_empty());
        assert!(service.find_similar("nope").await.is_empty());

        tokio::time::advance(SIMILAR_EVENTS_EMPTY_TTL).await;
        assert!(service.find_similar("nope").await.is_empty());
    }

    #[tokio::test]
    async fn test_find_similar_error_is_empty_and_not_cached() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_slug()
            .times(2)
            .returning(|_| Err(EventError::Connection("refused".into())));

        let service = EventService::new(repo);
        assert!(service.find_similar("ai-days").await.is_empty());
        assert!(service.find_similar("ai-days").await.is_empty());
    }

    #[tokio::test]
    async fn test_find_similar_is_cached_until_write() {
        let source = stored("AI Days", &["ai", "ml"]);
        let neighbour = stored("ML Summit", &["ml"]);

        let mut repo = MockEventRepository::new();
        let source_clone = source.clone();
        repo.expect_find_by_slug()
            .with(eq("ai-days"))
            .times(2)
            .returning(move |_| Ok(Some(source_clone.clone())));
        let neighbour_clone = neighbour.clone();
        repo.expect_find_similar()
            .times(2)
            .returning(move |_| Ok(vec![neighbour_clone.clone()]));
        repo.expect_insert().returning(|_| Ok(()));

        let service = EventService::new(repo);

        let first = service.find_similar("ai-days").await;
        let cached = service.find_similar("ai-days").await;
        assert_eq!(first, vec![neighbour.clone()]);
        assert_eq!(cached, first);

        service
            .create_or_update(input("Data Week", &["data"]))
            .await
            .unwrap();

        assert_eq!(service.find_similar("ai-days").await, vec![neighbour]);
    }

    #[tokio::test]
    async fn test_list_delegates() {
        let mut repo = MockEventRepository::new();
        repo.expect_list().times(1).returning(|| Ok(vec![]));

        let service = EventService::new(repo);
        assert!(service.list().await.unwrap().is_empty());
    }
}
