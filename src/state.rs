use crate::config::{AppConfig, StoreBackend};
use crate::store::{self, JsonFileStore, MemoryStore, SubmissionStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SubmissionStore>,
    /// Local JSON file read by the export fallback when `store` fails.
    pub fallback_store: Arc<dyn SubmissionStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let store = store::connect(&config.store)?;
        Ok(Self::with_primary(config, store))
    }

    /// Uses an already built primary store; the fallback file comes from `config`.
    pub fn with_primary(config: Arc<AppConfig>, store: Arc<dyn SubmissionStore>) -> Self {
        let fallback_store =
            Arc::new(JsonFileStore::new(config.fallback_file.clone())) as Arc<dyn SubmissionStore>;
        Self::from_parts(config, store, fallback_store)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn SubmissionStore>,
        fallback_store: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            config,
            store,
            fallback_store,
        }
    }

    /// Memory-backed state with an empty memory fallback.
    pub fn fake() -> Self {
        Self::with_store(Arc::new(MemoryStore::default()))
    }

    pub fn with_store(store: Arc<dyn SubmissionStore>) -> Self {
        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory,
            fallback_file: "fake.json".into(),
        });
        Self::from_parts(config, store, Arc::new(MemoryStore::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CredentialTier, DatabaseConfig};
    use crate::store::PgSubmissionStore;

    #[tokio::test]
    async fn with_primary_shares_the_given_store() {
        let db = DatabaseConfig {
            url: "postgres://feedback@localhost:5432/feedback".into(),
            credential: None,
            tier: CredentialTier::Service,
            max_connections: 2,
        };
        let pg = Arc::new(PgSubmissionStore::connect_lazy(&db).unwrap());
        let config = Arc::new(AppConfig {
            store: StoreBackend::Postgres(db),
            fallback_file: "fallback.json".into(),
        });

        let primary: Arc<dyn SubmissionStore> = pg.clone();
        let state = AppState::with_primary(config, primary);
        assert_eq!(state.store.backend(), "postgres");
        assert_eq!(state.fallback_store.backend(), "file");
        // the state holds the caller's pool, not a second one
        assert_eq!(Arc::strong_count(&pg), 2);
    }
}
