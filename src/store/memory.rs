use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreResult, SubmissionStore};
use crate::feedback::model::FeedbackSubmission;

/// In-process store for tests and local demos. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<FeedbackSubmission>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<FeedbackSubmission>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, submission: FeedbackSubmission) -> StoreResult<FeedbackSubmission> {
        self.rows.write().await.push(submission.clone());
        Ok(submission)
    }

    async fn list_all(&self) -> StoreResult<Vec<FeedbackSubmission>> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::model::{FeedbackAnswers, SubmissionSource};
    use time::Duration;

    #[tokio::test]
    async fn lists_newest_first() {
        let mut old = FeedbackSubmission::new(FeedbackAnswers::default(), SubmissionSource::Test);
        old.submitted_at -= Duration::days(1);
        let new = FeedbackSubmission::new(FeedbackAnswers::default(), SubmissionSource::Test);

        let store = MemoryStore::with_rows(vec![old.clone(), new.clone()]);
        let rows = store.list_all().await.unwrap();
        assert_eq!(rows[0].id, new.id);
        assert_eq!(rows[1].id, old.id);
    }

    #[tokio::test]
    async fn delete_all_reports_removed_rows() {
        let store = MemoryStore::default();
        for _ in 0..3 {
            store
                .insert(FeedbackSubmission::new(FeedbackAnswers::default(), SubmissionSource::Test))
                .await
                .unwrap();
        }
        assert_eq!(store.delete_all().await.unwrap(), 3);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
