use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::OpenApi;

use crate::models::{BookingCountQuery, BookingCountResponse, BookingResponse, CreateBooking};
use crate::repository::{BookingRepository, EventLookup};
use crate::service::BookingService;

/// OpenAPI documentation for the Bookings API
#[derive(OpenApi)]
#[openapi(
    paths(create_booking, count_bookings),
    components(
        schemas(CreateBooking, BookingResponse, BookingCountResponse),
        responses(
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Bookings", description = "Event bookings")
    )
)]
pub struct ApiDoc;

pub fn router<B, E>(service: BookingService<B, E>) -> Router
where
    B: BookingRepository + 'static,
    E: EventLookup + 'static,
{
    Router::new()
        .route("/", post(create_booking))
        .route("/count", get(count_bookings))
        .with_state(Arc::new(service))
}

/// Book a spot at an event
///
/// The response only says whether the booking went through.
#[utoipa::path(
    post,
    path = "",
    tag = "Bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking stored", body = BookingResponse),
        (status = 400, description = "Invalid request or unknown event", body = BookingResponse),
        (status = 500, description = "Booking failed", body = BookingResponse)
    )
)]
async fn create_booking<B: BookingRepository, E: EventLookup>(
    State(service): State<Arc<BookingService<B, E>>>,
    payload: Result<Json<CreateBooking>, JsonRejection>,
) -> (StatusCode, Json<BookingResponse>) {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected booking payload");
            return failure(StatusCode::BAD_REQUEST);
        }
    };

    match service.create_booking(input).await {
        Ok(_) => (StatusCode::CREATED, Json(BookingResponse { success: true })),
        Err(e) if e.is_client_error() => {
            warn!(error = %e, "Booking rejected");
            failure(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!(error = %e, "create booking failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn failure(status: StatusCode) -> (StatusCode, Json<BookingResponse>) {
    (status, Json(BookingResponse { success: false }))
}

/// Number of bookings for an event
#[utoipa::path(
    get,
    path = "/count",
    tag = "Bookings",
    params(BookingCountQuery),
    responses(
        (status = 200, description = "Booking count", body = BookingCountResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn count_bookings<B: BookingRepository, E: EventLookup>(
    State(service): State<Arc<BookingService<B, E>>>,
    query: Result<Query<BookingCountQuery>, QueryRejection>,
) -> Result<Json<BookingCountResponse>, AppError> {
    let Query(query) = query?;
    let (event_id, count) = service.count_for_event(&query.event_id).await?;
    Ok(Json(BookingCountResponse { event_id, count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::repository::{MockBookingRepository, MockEventLookup};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(value: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap()
    }

    fn app(bookings: MockBookingRepository, events: MockEventLookup) -> Router {
        router(BookingService::new(bookings, Arc::new(events)))
    }

    #[tokio::test]
    async fn test_create_booking_returns_201() {
        let mut events = MockEventLookup::new();
        events.expect_event_exists().returning(|_| Ok(true));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().times(1).returning(|_| Ok(()));

        let response = app(bookings, events)
            .oneshot(post_json(json!({
                "eventId": Uuid::now_v7(),
                "email": "Visitor@Example.com",
                "slug": "rustconf"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: serde_json::Value = json_body(response.into_body()).await;
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_unknown_event_is_400_without_detail() {
        let mut events = MockEventLookup::new();
        events.expect_event_exists().returning(|_| Ok(false));

        let response = app(MockBookingRepository::new(), events)
            .oneshot(post_json(json!({ "eventId": Uuid::now_v7(), "email": "a@b.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = json_body(response.into_body()).await;
        assert_eq!(body, json!({ "success": false }));
    }

    #[tokio::test]
    async fn test_missing_email_is_400() {
        let response = app(MockBookingRepository::new(), MockEventLookup::new())
            .oneshot(post_json(json!({ "eventId": Uuid::now_v7() })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let mut events = MockEventLookup::new();
        events
            .expect_event_exists()
            .returning(|_| Err(BookingError::Connection("refused".into())));

        let response = app(MockBookingRepository::new(), events)
            .oneshot(post_json(json!({ "eventId": Uuid::now_v7(), "email": "a@b.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = json_body(response.into_body()).await;
        assert_eq!(body, json!({ "success": false }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();

        let response = app(MockBookingRepository::new(), MockEventLookup::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = json_body(response.into_body()).await;
        assert_eq!(body, json!({ "success": false }));
    }

    #[tokio::test]
    async fn test_count_bookings() {
        let event_id = Uuid::now_v7();
        let mut bookings = MockBookingRepository::new();
        bookings.expect_count_for_event().returning(|_| Ok(2));

        let response = app(bookings, MockEventLookup::new())
            .oneshot(
                Request::builder()
                    .uri(format!("/count?eventId={}", event_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: BookingCountResponse = json_body(response.into_body()).await;
        assert_eq!(body.event_id, event_id);
        assert_eq!(body.count, 2);
    }

    #[tokio::test]
    async fn test_count_with_bad_id_is_400() {
        let response = app(MockBookingRepository::new(), MockEventLookup::new())
            .oneshot(
                Request::builder()
                    .uri("/count?eventId=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
