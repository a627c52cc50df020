use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::{StoreResult, SubmissionStore};
use crate::feedback::model::FeedbackSubmission;

/// Submissions kept as one JSON array on local disk.
///
/// A missing file reads as empty. Writes replace the file through a sibling
/// temp file and a rename, so readers never see a half-written array.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> StoreResult<Vec<FeedbackSubmission>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, rows: &[FeedbackSubmission]) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(rows)?).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), rows = rows.len(), "feedback file written");
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn insert(&self, submission: FeedbackSubmission) -> StoreResult<FeedbackSubmission> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        rows.push(submission.clone());
        self.save(&rows).await?;
        Ok(submission)
    }

    async fn list_all(&self) -> StoreResult<Vec<FeedbackSubmission>> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn count(&self) -> StoreResult<u64> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len() as u64)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let _guard = self.lock.lock().await;
        let removed = self.load().await?.len() as u64;
        self.save(&[]).await?;
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
