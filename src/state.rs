use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{self, PgStore, RecordStore};
use crate::storage::{ContentStore, LocalDiskStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub content: Arc<dyn ContentStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let pool = db::connect(&config.database_url).await?;
        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing with existing schema");
        }

        let store = Arc::new(PgStore::new(pool)) as Arc<dyn RecordStore>;
        let content = Arc::new(LocalDiskStorage::new(&config.upload_dir).await?) as Arc<dyn ContentStore>;

        Ok(Self::from_parts(config, store, content))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn RecordStore>,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            config,
            store,
            content,
        }
    }
}
