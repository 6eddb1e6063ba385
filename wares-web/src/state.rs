//! Shared application state.

use crate::auth::users::{UserService, UserStore};
use crate::db::Database;
use crate::products::ProductStore;
use crate::{WebConfig, WebResult};

/// State shared by every handler. Cloning is cheap; everything inside is
/// pool-backed.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub db: Database,
    pub user_service: UserService,
    pub product_store: ProductStore,
}

impl AppState {
    /// Connect to the database and build the services on top of it.
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let db = Database::connect(&config.database_url).await?;
        let user_service = UserService::new(UserStore::new(db.pool().clone()));
        let product_store = ProductStore::new(db.pool().clone());

        Ok(Self {
            config,
            db,
            user_service,
            product_store,
        })
    }
}
