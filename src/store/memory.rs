use super::{ConfigStore, StoreValue};
use crate::error::Result;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::Path;

/// Хранилище в памяти для dry-run режима и тестов. Запоминает все записи.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: DashMap<String, StoreValue>,
    writes: Mutex<Vec<(String, StoreValue)>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, StoreValue)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.values.insert(key.to_string(), value);
        }
        store
    }

    /// Записи, сделанные через `write`, в порядке выполнения
    #[allow(dead_code)]
    pub fn writes(&self) -> Vec<(String, StoreValue)> {
        self.writes.lock().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.to_string())
    }

    fn write(&self, key: &str, value: StoreValue) -> Result<()> {
        self.writes.lock().push((key.to_string(), value.clone()));
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn file_name(&self) -> Option<&Path> {
        None
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_is_recorded_and_readable() {
        let store = MemoryConfigStore::with_entries([("lock/action", "screenlock".into())]);

        assert!(store.contains("lock/action"));
        assert!(!store.contains("lock/delay"));

        store.write("lock/delay", StoreValue::Integer(0)).unwrap();

        assert_eq!(store.read("lock/delay").as_deref(), Some("0"));
        assert_eq!(store.writes(), vec![("lock/delay".to_string(), StoreValue::Integer(0))]);
    }
}
