//! In-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use gradepred_core::traits::PersistentStore;

/// Keeps values in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, serde_json::Value>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PersistentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.lock().insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.save("studentData", &json!({"grades": []})).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.load("studentData").unwrap(),
            Some(json!({"grades": []}))
        );
        assert_eq!(store.load("predictionHistory").unwrap(), None);
    }
}
