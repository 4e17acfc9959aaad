//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dev Events API",
        version = "0.1.0",
        description = "Developer event listings and bookings backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc),
        (path = "/api/bookings", api = domain_bookings::ApiDoc)
    ),
    tags(
        (name = "Events", description = "Event listings, lookup by slug and similar events"),
        (name = "Bookings", description = "Event bookings")
    )
)]
pub struct ApiDoc;
