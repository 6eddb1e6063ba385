//! Wares web server.
//!
//! Serves the signup/login/product-catalog API over axum, backed by SQLite.
//! The binary in `main.rs` wires configuration and logging around
//! [`WaresServer`]; everything else lives behind [`create_app`] so tests can
//! drive the router directly.

pub mod auth;
pub mod db;
pub mod openapi;
pub mod products;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{WaresServer, WaresServerBuilder};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("WARES_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("WARES_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: std::env::var("WARES_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:wares.db".to_string()),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Browser clients come from the Vite dev server; the CLI doesn't care.
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:5173".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:5173".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    Router::new()
        // API routes
        .nest("/api", routes::api_routes())
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024)) // requests here are tiny
        .with_state(state)
}
