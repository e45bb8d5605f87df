//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Diagrams
        crate::routes::diagrams::save_diagram,
        crate::routes::diagrams::list_diagrams,
        crate::routes::diagrams::get_diagram,
        // Authentication
        crate::routes::auth::refresh_token,
        crate::routes::auth::logout,
        // OpenAPI
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::models::Diagram,
        crate::models::DiagramSummary,
        crate::models::SaveDiagramForm,
        crate::models::SaveDiagramResponse,
        crate::services::TokenPair,
        crate::routes::auth::RefreshTokenRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Diagrams", description = "Create, update and read user-owned diagrams"),
        (name = "Authentication", description = "Session token refresh and logout"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "Diagram API",
        description = "REST API for saving user-owned graph diagrams",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8081/api/v1", description = "Local development server")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Update version to match Cargo.toml version
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();

        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::new)
            .add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
    }
}
