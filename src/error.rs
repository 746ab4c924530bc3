use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
    #[error("Unknown submission: {0}")]
    UnknownSubmission(u32),
    #[error("A submission is already in flight")]
    Busy,
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, String>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, FormError>;
