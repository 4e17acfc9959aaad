//! API routes module
//!
//! Routes here are nested under /api by `axum_helpers::create_router`.

pub mod bookings;
pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let events = events::service(state);
    let bookings = bookings::service(state, &events);

    Router::new()
        .nest("/events", domain_events::handlers::router(events))
        .nest("/bookings", domain_bookings::handlers::router(bookings))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::{MongoConfig, MongoConnectionManager, MongoConnector};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// State whose MongoDB URI can never connect
    fn offline_state() -> AppState {
        let connector = MongoConnector::new(MongoConfig::new("not-a-mongodb-uri"));
        AppState {
            config: Config {
                app: app_info!(),
                server: ServerConfig::default(),
                environment: Environment::Development,
            },
            mongo: Arc::new(MongoConnectionManager::new(connector)),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_slug_is_rejected_before_the_database() {
        let app = routes(&offline_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events/react%20summit!")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Invalid slug format");
    }

    #[tokio::test]
    async fn test_event_lookup_without_database_is_opaque_500() {
        let app = routes(&offline_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events/react-summit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["message"],
            "Failed to retrieve event"
        );
    }

    #[tokio::test]
    async fn test_similar_events_without_database_is_empty() {
        let app = routes(&offline_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events/react-summit/similar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_booking_without_email_is_rejected() {
        let app = routes(&offline_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"eventId":"0190b6a0-7d3c-7c2e-9a51-3c8f0e2b4d61"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "success": false })
        );
    }

    #[tokio::test]
    async fn test_booking_without_database_fails_with_500() {
        let app = routes(&offline_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"eventId":"0190b6a0-7d3c-7c2e-9a51-3c8f0e2b4d61","email":"dev@example.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "success": false })
        );
    }
}
