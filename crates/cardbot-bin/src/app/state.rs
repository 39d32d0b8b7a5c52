//! Bot state definition.

use card_catalog_database::{AsyncDatabase, CardCatalog};
use card_command_dispatch::{CatalogService, Dispatcher};
use cardbot_config_and_utils::{Config, Paths};
use std::sync::Arc;
use tracing::info;

/// Long-lived service objects, built once at startup.
#[derive(Clone)]
pub struct BotState {
    pub config: Arc<Config>,
    pub paths: Arc<Paths>,
    /// SQLite-backed record store.
    pub catalog: CardCatalog,
    pub service: CatalogService,
}

impl BotState {
    /// Open the catalog database and build the service layer on top of it.
    pub async fn open(config: Config, paths: Paths) -> Result<Self, Box<dyn std::error::Error>> {
        paths.ensure_dirs()?;

        let db = AsyncDatabase::open(&paths.database_file())
            .await
            .map_err(|e| format!("Failed to open card database: {}", e))?;
        db.health_check().await?;
        info!(path = %paths.database_file().display(), "Card database opened");

        let catalog = CardCatalog::new(db);
        let service = CatalogService::new(Arc::new(catalog.clone()));

        Ok(Self {
            config: Arc::new(config),
            paths: Arc::new(paths),
            catalog,
            service,
        })
    }

    /// Build the dispatcher for this bot's identity.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.service.clone(), self.config.bot_identity.clone())
    }
}
