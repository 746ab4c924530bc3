//! Adapters: template loading and submission storage.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod template_files;
