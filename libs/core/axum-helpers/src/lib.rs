//! # Axum Helpers
//!
//! Shared pieces for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] body with stable error codes
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::{FromEnv, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes).await?;
//! create_app(router, &ServerConfig::from_env()?).await?;
//! ```

pub mod errors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer, cors_layer_from_env, security_headers};
