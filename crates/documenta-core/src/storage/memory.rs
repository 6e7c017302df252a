//! Projects held in memory as their saved JSON.

use super::{BoxFuture, Storage, StorageError, StorageResult, check_id};
use crate::store::ContentStore;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Storage for tests and scratch sessions.
///
/// Projects go through the same JSON encoding as [`FileStorage`], so a load
/// never aliases the saved store.
///
/// [`FileStorage`]: super::FileStorage
#[derive(Default)]
pub struct MemoryStorage {
    projects: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn save_now(&self, id: &str, project: &ContentStore) -> StorageResult<()> {
        check_id(id)?;
        let json = project
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.projects.borrow_mut().insert(id.to_string(), json);
        Ok(())
    }

    fn load_now(&self, id: &str) -> StorageResult<ContentStore> {
        let projects = self.projects.borrow();
        let json = projects
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        ContentStore::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, project: &ContentStore) -> BoxFuture<'_, StorageResult<()>> {
        let result = self.save_now(id, project);
        Box::pin(async move { result })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ContentStore>> {
        let result = self.load_now(id);
        Box::pin(async move { result })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let result = match self.projects.borrow_mut().remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(id.to_string())),
        };
        Box::pin(async move { result })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let ids = self.projects.borrow().keys().cloned().collect();
        Box::pin(async move { Ok(ids) })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let found = self.projects.borrow().contains_key(id);
        Box::pin(async move { Ok(found) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_load_is_a_copy_of_the_save() {
        let storage = MemoryStorage::new();
        let mut project = ContentStore::new();
        project.add_text("kept");

        block_on(storage.save("test", &project)).unwrap();
        project.add_text("not saved");
        let loaded = block_on(storage.load("test")).unwrap();

        assert_eq!(project.id, loaded.id);
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_missing_and_invalid() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            block_on(storage.load("nonexistent")),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            block_on(storage.delete("nonexistent")),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            block_on(storage.save("", &ContentStore::new())),
            Err(StorageError::InvalidId(_))
        ));
    }

    #[test]
    fn test_delete_then_list() {
        let storage = MemoryStorage::new();
        let project = ContentStore::new();

        block_on(storage.save("p2", &project)).unwrap();
        block_on(storage.save("p1", &project)).unwrap();
        block_on(storage.save("p3", &project)).unwrap();
        block_on(storage.delete("p2")).unwrap();

        assert!(!block_on(storage.exists("p2")).unwrap());
        assert_eq!(block_on(storage.list()).unwrap(), vec!["p1", "p3"]);
    }
}
