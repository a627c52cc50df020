use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{CredentialTier, StoreBackend};
use crate::feedback::model::FeedbackSubmission;

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use postgres::PgSubmissionStore;

/// Operations a store exposes, used for credential-tier checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    List,
    Count,
    DeleteAll,
}

impl StoreOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOp::Insert => "insert",
            StoreOp::List => "list",
            StoreOp::Count => "count",
            StoreOp::DeleteAll => "delete_all",
        }
    }
}

impl CredentialTier {
    /// The anonymous credential may write and count, nothing else.
    pub fn permits(&self, op: StoreOp) -> bool {
        match self {
            CredentialTier::Service => true,
            CredentialTier::Anonymous => matches!(op, StoreOp::Insert | StoreOp::Count),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission store is not configured")]
    NotConfigured,
    #[error("{tier} credential may not perform {}", .op.as_str())]
    Forbidden { op: StoreOp, tier: CredentialTier },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only collection of feedback submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: FeedbackSubmission) -> StoreResult<FeedbackSubmission>;
    /// Every record, newest first.
    async fn list_all(&self) -> StoreResult<Vec<FeedbackSubmission>>;
    async fn count(&self) -> StoreResult<u64>;
    /// Removes every record unconditionally, returning how many went.
    async fn delete_all(&self) -> StoreResult<u64>;
    fn backend(&self) -> &'static str;
    fn tier(&self) -> CredentialTier {
        CredentialTier::Service
    }
}

/// Stand-in used when no backend is configured; every call fails.
pub struct UnconfiguredStore;

#[async_trait]
impl SubmissionStore for UnconfiguredStore {
    async fn insert(&self, _submission: FeedbackSubmission) -> StoreResult<FeedbackSubmission> {
        Err(StoreError::NotConfigured)
    }
    async fn list_all(&self) -> StoreResult<Vec<FeedbackSubmission>> {
        Err(StoreError::NotConfigured)
    }
    async fn count(&self) -> StoreResult<u64> {
        Err(StoreError::NotConfigured)
    }
    async fn delete_all(&self) -> StoreResult<u64> {
        Err(StoreError::NotConfigured)
    }
    fn backend(&self) -> &'static str {
        "unconfigured"
    }
}

/// Builds the configured store. Postgres connects lazily so the service can
/// boot while the database is unreachable.
pub fn connect(backend: &StoreBackend) -> anyhow::Result<Arc<dyn SubmissionStore>> {
    let store: Arc<dyn SubmissionStore> = match backend {
        StoreBackend::Postgres(db) => Arc::new(PgSubmissionStore::connect_lazy(db)?),
        StoreBackend::File(path) => Arc::new(JsonFileStore::new(path.clone())),
        StoreBackend::Memory => Arc::new(MemoryStore::default()),
        StoreBackend::Unconfigured => {
            warn!("no submission store configured; ingestion and export will fail");
            Arc::new(UnconfiguredStore)
        }
    };
    info!(backend = store.backend(), tier = %store.tier(), "submission store ready");
    Ok(store)
}
