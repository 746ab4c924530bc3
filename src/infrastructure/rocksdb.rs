use crate::domain::ports::SubmissionStore;
use crate::domain::submission::Submission;
use crate::error::{FormError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing submitted payment requests.
pub const CF_SUBMISSIONS: &str = "submissions";

/// A persistent submission store backed by RocksDB.
///
/// Submissions are stored as JSON under their big-endian id, so iteration
/// returns them in id order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_submissions = ColumnFamilyDescriptor::new(CF_SUBMISSIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_submissions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn handle(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_SUBMISSIONS).ok_or_else(|| {
            FormError::InternalError(Box::new(std::io::Error::other(
                "Submissions column family not found",
            )))
        })
    }
}

#[async_trait]
impl SubmissionStore for RocksDBStore {
    async fn store(&self, submission: Submission) -> Result<()> {
        let cf = self.handle()?;
        let key = submission.id.to_be_bytes();
        let value = serde_json::to_vec(&submission)?;

        self.db.put_cf(cf, key, value)?;

        Ok(())
    }

    async fn get(&self, id: u32) -> Result<Option<Submission>> {
        let cf = self.handle()?;
        let key = id.to_be_bytes();

        match self.db.get_pinned_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Submission>> {
        let cf = self.handle()?;

        let mut submissions = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            submissions.push(serde_json::from_slice(&value)?);
        }

        Ok(submissions)
    }
}
