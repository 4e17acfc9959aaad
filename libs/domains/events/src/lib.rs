//! Events Domain
//!
//! Developer event listings stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← write pipeline, similar-events cache
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Connection  │  ← shared, lazily connected manager
//! └─────────────┘
//! ```
//!
//! Writes go through [`pipeline::validate`] and [`pipeline::normalize`]
//! before reaching the repository, which derives the slug and canonicalizes
//! date and time.
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::{MongoConnectionManager, MongoConnector};
//! use domain_events::{EventService, MongoEventRepository, handlers};
//! use std::sync::Arc;
//!
//! let manager = Arc::new(MongoConnectionManager::new(MongoConnector::from_env()));
//! let service = EventService::new(MongoEventRepository::new(manager));
//! let router = handlers::router(service);
//! ```

pub mod cache;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pipeline;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{Event, EventInput, EventListResponse, EventMode, EventResponse};
pub use crate::mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::{EventService, WriteOutcome};
