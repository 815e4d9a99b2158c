use super::{RecordStore, StorageError};
use std::cell::RefCell;
use std::collections::HashMap;

/// Records held in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RefCell<HashMap<String, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
