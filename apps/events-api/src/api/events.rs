//! Events wiring

use domain_events::{EventService, MongoEventRepository};

use crate::state::AppState;

/// Event service over the shared MongoDB connection
pub fn service(state: &AppState) -> EventService<MongoEventRepository> {
    EventService::new(MongoEventRepository::new(state.mongo.clone()))
}
