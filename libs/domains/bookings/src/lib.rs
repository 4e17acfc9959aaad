//! Bookings Domain
//!
//! Visitors reserve a spot at an event by email. A booking is only stored
//! when its event exists; the check runs at write time through
//! [`EventLookup`], implemented for the events domain's MongoDB repository.
//!
//! ```rust,no_run
//! use database::mongodb::{MongoConnectionManager, MongoConnector};
//! use domain_bookings::{BookingService, MongoBookingRepository, handlers};
//! use domain_events::MongoEventRepository;
//! use std::sync::Arc;
//!
//! let manager = Arc::new(MongoConnectionManager::new(MongoConnector::from_env()));
//! let events = Arc::new(MongoEventRepository::new(manager.clone()));
//! let service = BookingService::new(MongoBookingRepository::new(manager), events);
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{BookingError, BookingResult};
pub use handlers::ApiDoc;
pub use models::{Booking, BookingCountResponse, BookingResponse, CreateBooking};
pub use crate::mongodb::MongoBookingRepository;
pub use repository::{BookingRepository, EventLookup};
pub use service::BookingService;
