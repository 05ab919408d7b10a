use super::StorageBackend;
use crate::data::PluginData;
use crate::error::{RemindzError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// The durable blob is kept as serialized JSON so that saves and loads go
/// through the same serde path as the filesystem backend.
///
/// Uses `RefCell` for interior mutability since the persistence core is
/// single-threaded. This keeps `&self` on every `StorageBackend` method.
#[derive(Default)]
pub struct MemBackend {
    data: RefCell<Option<String>>,
    items: RefCell<HashMap<String, String>>,
    simulate_durable_write_error: Cell<bool>,
    simulate_cache_write_error: Cell<bool>,
    durable_writes: Cell<usize>,
    cache_writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the durable region with raw JSON.
    pub fn with_data_json(self, json: &str) -> Self {
        *self.data.borrow_mut() = Some(json.to_string());
        self
    }

    /// Seed a fast-region item.
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Raw JSON currently held in the durable region.
    pub fn data_json(&self) -> Option<String> {
        self.data.borrow().clone()
    }

    /// Enable write error simulation on the durable region.
    pub fn set_simulate_durable_write_error(&self, simulate: bool) {
        self.simulate_durable_write_error.set(simulate);
    }

    /// Enable write error simulation on the fast region.
    pub fn set_simulate_cache_write_error(&self, simulate: bool) {
        self.simulate_cache_write_error.set(simulate);
    }

    pub fn durable_write_count(&self) -> usize {
        self.durable_writes.get()
    }

    pub fn cache_write_count(&self) -> usize {
        self.cache_writes.get()
    }

    /// Forget every fast-region item, as a host clearing its cache would.
    pub fn clear_items(&self) {
        self.items.borrow_mut().clear();
    }
}

impl StorageBackend for MemBackend {
    fn load_data(&self) -> Result<Option<PluginData>> {
        let data = self.data.borrow();
        match data.as_deref() {
            None => Ok(None),
            Some(json) => {
                let parsed: Option<PluginData> =
                    serde_json::from_str(json).map_err(RemindzError::Serialization)?;
                Ok(parsed)
            }
        }
    }

    fn save_data(&self, data: &PluginData) -> Result<()> {
        if self.simulate_durable_write_error.get() {
            return Err(RemindzError::Store("Simulated write error".to_string()));
        }
        let json = serde_json::to_string(data).map_err(RemindzError::Serialization)?;
        *self.data.borrow_mut() = Some(json);
        self.durable_writes.set(self.durable_writes.get() + 1);
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_cache_write_error.get() {
            return Err(RemindzError::Store("Simulated write error".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.cache_writes.set(self.cache_writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
