use crate::local_storage::core_local_storage::{CoreLocalStorage, StorageError};
use crate::models::delivery::DeliveryRecord;
use crate::services::merge_service;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Accessor for the single persisted board document.
pub struct DeliveryLocalStorage {
    core_storage: Arc<CoreLocalStorage>,
    slot: String,
}

impl DeliveryLocalStorage {
    pub fn new(core_storage: Arc<CoreLocalStorage>, slot: &str) -> Self {
        DeliveryLocalStorage {
            core_storage,
            slot: slot.to_string(),
        }
    }

    /// Loads the whole document. A missing slot, malformed JSON or a
    /// non-object top level all read as an empty document.
    pub fn load_document(&self) -> Result<Value, StorageError> {
        let raw = match self.core_storage.read_slot(&self.slot)? {
            Some(raw) => raw,
            None => return Ok(Value::Object(Map::new())),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(document @ Value::Object(_)) => Ok(document),
            Ok(_) => {
                tracing::warn!(slot = %self.slot, "stored document is not a JSON object");
                Ok(Value::Object(Map::new()))
            }
            Err(e) => {
                tracing::warn!(slot = %self.slot, "stored document parse error: {}", e);
                Ok(Value::Object(Map::new()))
            }
        }
    }

    /// Serializes and rewrites the whole document, replacing any prior
    /// value. Last writer wins.
    pub fn save_document(&self, document: &Value) -> Result<(), StorageError> {
        let raw = serde_json::to_string(document)?;
        self.core_storage.write_slot(&self.slot, &raw)
    }

    /// Typed view of the stored records: the primary `deliveries` list
    /// overlaid on the secondary `state.deliveries` list.
    pub fn load_records(&self) -> Result<Vec<DeliveryRecord>, StorageError> {
        let document = self.load_document()?;
        let primary = record_list(&document, &["deliveries"]);
        let secondary = record_list(&document, &["state", "deliveries"]);

        let merged = merge_service::merge_records(&primary, &secondary);
        Ok(merged.iter().map(DeliveryRecord::from_json).collect())
    }
}

fn record_list(document: &Value, path: &[&str]) -> Vec<Value> {
    let mut node = document;
    for key in path {
        match node.get(key) {
            Some(next) => node = next,
            None => return Vec::new(),
        }
    }
    node.as_array().cloned().unwrap_or_default()
}
