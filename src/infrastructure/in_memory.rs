use crate::domain::ports::SubmissionStore;
use crate::domain::submission::Submission;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for submitted payment requests.
///
/// Uses `Arc<RwLock<HashMap<u32, Submission>>>` so clones share the same data.
/// Used by the CLI when no database path is configured, and by tests.
#[derive(Default, Clone)]
pub struct InMemorySubmissionStore {
    submissions: Arc<RwLock<HashMap<u32, Submission>>>,
}

impl InMemorySubmissionStore {
    /// Creates a new, empty in-memory submission store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn store(&self, submission: Submission) -> Result<()> {
        let mut submissions = self.submissions.write().await;
        submissions.insert(submission.id, submission);
        Ok(())
    }

    async fn get(&self, id: u32) -> Result<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut all: Vec<Submission> = submissions.values().cloned().collect();
        all.sort_by_key(|submission| submission.id);
        Ok(all)
    }
}
