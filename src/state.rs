use crate::activities::repo::{ActivityStore, SqliteActivityStore};
use crate::config::AppConfig;
use crate::db;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ActivityStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        if config.production {
            tracing::info!(path = %config.database_path.display(), "using production database");
        } else {
            tracing::info!(path = %config.database_path.display(), "using development database");
        }

        let pool = db::connect(&config.database_path).await?;
        db::ensure_schema(&pool, config.reset_on_schema_mismatch).await?;

        let store = Arc::new(SqliteActivityStore::new(pool)) as Arc<dyn ActivityStore>;
        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn ActivityStore>) -> Self {
        Self { config, store }
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        let pool = db::memory_pool().await;
        db::ensure_schema(&pool, false)
            .await
            .expect("schema on in-memory db");

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_path: ":memory:".into(),
            production: false,
            reset_on_schema_mismatch: false,
        });

        let store = Arc::new(SqliteActivityStore::new(pool)) as Arc<dyn ActivityStore>;
        Self::from_parts(config, store)
    }
}
