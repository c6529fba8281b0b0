use std::sync::Arc;

use dashmap::DashMap;

use crate::errors::{CoreError, CoreResult};
use crate::store::DocStore;
use crate::validator::Validator;

/// Process-wide set of named databases. Create/drop/list are backed by a
/// `DashMap`, whose per-shard locking serializes concurrent mutation of the
/// name -> store mapping at the granularity the map provides.
#[derive(Default)]
pub struct Registry {
    dbs: DashMap<String, Arc<DocStore>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            dbs: DashMap::new(),
        }
    }

    pub fn create(&self, name: &str) -> CoreResult<()> {
        if !Validator::is_valid_db_name(name) {
            return Err(CoreError::InvalidDbName);
        }
        match self.dbs.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(CoreError::DbExists),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(DocStore::new()));
                Ok(())
            }
        }
    }

    pub fn drop(&self, name: &str) -> CoreResult<()> {
        self.dbs
            .remove(name)
            .map(|_| ())
            .ok_or(CoreError::DbNotFound)
    }

    pub fn get(&self, name: &str) -> CoreResult<Arc<DocStore>> {
        self.dbs
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(CoreError::DbNotFound)
    }

    pub fn list(&self) -> Vec<String> {
        self.dbs.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_invalid_names() {
        let registry = Registry::new();
        assert_eq!(
            registry.create("$3213324").unwrap_err(),
            CoreError::InvalidDbName
        );
    }

    #[test]
    fn create_then_get_then_duplicate_create_conflicts() {
        let registry = Registry::new();
        registry.create("testdb").unwrap();
        assert!(registry.get("testdb").is_ok());
        assert_eq!(registry.create("testdb").unwrap_err(), CoreError::DbExists);
    }

    #[test]
    fn drop_then_get_not_found() {
        let registry = Registry::new();
        registry.create("testdb").unwrap();
        registry.drop("testdb").unwrap();
        assert_eq!(registry.get("testdb").unwrap_err(), CoreError::DbNotFound);
        assert_eq!(registry.drop("testdb").unwrap_err(), CoreError::DbNotFound);
    }

    #[test]
    fn list_reflects_live_databases() {
        let registry = Registry::new();
        registry.create("alpha").unwrap();
        registry.create("beta").unwrap();
        let names = registry.list();
        assert!(names.contains(&"alpha".to_string()));
        assert!(names.contains(&"beta".to_string()));
    }
}
