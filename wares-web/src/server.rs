//! Server startup and builder.

use tracing::{error, info};

use crate::state::AppState;
use crate::{create_app, WebConfig, WebError, WebResult};

/// The wares web server
pub struct WaresServer {
    config: WebConfig,
    state: AppState,
}

impl WaresServer {
    /// Create a new server with the given configuration
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start the server and serve until shutdown
    pub async fn start(self) -> WebResult<()> {
        info!("🚀 Starting Wares Web Server");
        info!("📍 Server address: http://{}", self.config.address());
        info!("📄 OpenAPI document: http://{}/api/openapi.json", self.config.address());

        let app = create_app(self.state);

        let listener = tokio::net::TcpListener::bind(&self.config.address())
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on {}", self.config.address());

        axum::serve(listener, app).await.map_err(|e| {
            error!("❌ Server error: {}", e);
            WebError::Server(e)
        })
    }

    /// Get the server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get the application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for [`WaresServer`]
pub struct WaresServerBuilder {
    config: WebConfig,
}

impl WaresServerBuilder {
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, database_url: impl Into<String>) -> Self {
        self.config.database_url = database_url.into();
        self
    }

    pub fn config(mut self, config: WebConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> WebResult<WaresServer> {
        WaresServer::new(self.config).await
    }
}

impl Default for WaresServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
