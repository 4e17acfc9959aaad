use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{Event, EventInput, EventListResponse, EventMode, EventResponse};
use crate::repository::EventRepository;
use crate::service::{EventService, WriteOutcome};
use crate::slug::{SlugKeyError, sanitize_lookup_key};

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(list_events, create_or_update_event, get_event_by_slug, get_similar_events),
    components(
        schemas(Event, EventInput, EventMode, EventListResponse, EventResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Events", description = "Developer event listings")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_or_update_event))
        .route("/{slug}", get(get_event_by_slug))
        .route("/{slug}/similar", get(get_similar_events))
        .with_state(shared_service)
}

/// List all events, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    responses(
        (status = 200, description = "All events", body = EventListResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
) -> EventResult<Json<EventListResponse>> {
    let events = service.list().await?;
    Ok(Json(EventListResponse { events }))
}

/// Create an event, or update it when the body carries an `id`
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_or_update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;

    let response = match service.create_or_update(input).await? {
        WriteOutcome::Created(event) => (StatusCode::CREATED, Json(event)),
        WriteOutcome::Updated(event) => (StatusCode::OK, Json(event)),
    };
    Ok(response)
}

/// Fetch one event by slug
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Events",
    params(
        ("slug" = String, Path, description = "Event slug, matched case-insensitively")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event_by_slug<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(slug): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let slug = sanitize_lookup_key(&slug).map_err(|e| match e {
        SlugKeyError::Empty => AppError::BadRequest("Slug cannot be empty".to_string()),
        SlugKeyError::InvalidCharacters => AppError::BadRequest("Invalid slug format".to_string()),
    })?;

    match service.find_by_slug(&slug).await {
        Ok(Some(event)) => Ok(Json(EventResponse {
            message: "Event retrieved successfully".to_string(),
            event,
        })),
        Ok(None) => Err(AppError::NotFound(format!(
            "Event with slug '{}' not found",
            slug
        ))),
        Err(e) => {
            error!(slug = %slug, error = %e, "Error fetching event by slug");
            Err(AppError::InternalServerError(
                "Failed to retrieve event".to_string(),
            ))
        }
    }
}

/// Events sharing a tag with the given event; empty when there are none
#[utoipa::path(
    get,
    path = "/{slug}/similar",
    tag = "Events",
    params(
        ("slug" = String, Path, description = "Slug of the source event")
    ),
    responses(
        (status = 200, description = "Similar events, unordered", body = Vec<Event>)
    )
)]
async fn get_similar_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(slug): Path<String>,
) -> Json<Vec<Event>> {
    match sanitize_lookup_key(&slug) {
        Ok(slug) => Json(service.find_similar(&slug).await),
        Err(_) => Json(Vec::new()),
    }
}
