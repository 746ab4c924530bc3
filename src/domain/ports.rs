use super::submission::Submission;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn store(&self, submission: Submission) -> Result<()>;
    async fn get(&self, id: u32) -> Result<Option<Submission>>;
    async fn get_all(&self) -> Result<Vec<Submission>>;
}

pub type SubmissionStoreBox = Box<dyn SubmissionStore>;
pub type SubmissionStoreFactory = Box<dyn Fn() -> SubmissionStoreBox + Send + Sync>;
