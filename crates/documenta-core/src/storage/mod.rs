//! Project persistence.

mod file;
mod memory;

pub use file::{FileStorage, PROJECT_EXTENSION};
pub use memory::MemoryStorage;

use crate::store::ContentStore;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Invalid project id: {0:?}")]
    InvalidId(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Project ids are any non-empty string.
pub(crate) fn check_id(id: &str) -> StorageResult<()> {
    if id.is_empty() {
        return Err(StorageError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Trait for project storage backends.
pub trait Storage {
    /// Save a project.
    fn save(&self, id: &str, project: &ContentStore) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a project.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ContentStore>>;

    /// Delete a project. Missing projects are `NotFound`.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All project ids, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a project exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
