//! OpenAPI specification for the Wares API.

use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::routes::HealthResponse;
use wares_core::{
    AuthResponse, CreateProductRequest, ErrorBody, LoginRequest, Product, SignupRequest, UserInfo,
};

/// Main OpenAPI specification for the Wares server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wares API",
        version = "0.1.0",
        description = "Signup, login, and product catalog endpoints",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::routes::health_check,
        crate::auth::handlers::signup,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::products::list_products,
        crate::products::create_product,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserInfo,
            Product,
            CreateProductRequest,
            ErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Account signup and login"),
        (name = "Products", description = "Product catalog operations"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for the API
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Wares API");
        assert!(!openapi.paths.paths.is_empty());
    }
}
