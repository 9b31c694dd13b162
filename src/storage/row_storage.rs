use crate::models::FeatureRow;
use crate::storage::{FeatureStorage, RowKey};
use dashmap::DashMap;
use std::sync::Arc;

pub struct RowStorage {
    cache: Arc<DashMap<RowKey, Vec<FeatureRow>>>
}

impl RowStorage {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for RowStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStorage for RowStorage {
    fn load(&self, key: &RowKey) -> Option<Vec<FeatureRow>> {
        self.cache.remove(key).map(|(_, rows)| rows)
    }

    fn save(&self, key: RowKey, rows: Vec<FeatureRow>) {
        self.cache.insert(key, rows);
    }

    fn drain(&self) -> Vec<FeatureRow> {
        let keys: Vec<RowKey> = self.cache.iter().map(|item| item.key().clone()).collect();

        keys.iter()
            .filter_map(|key| self.load(key))
            .flatten()
            .collect()
    }
}
