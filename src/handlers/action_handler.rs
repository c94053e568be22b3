use crate::local_storage::StorageError;
use crate::local_storage::delivery::DeliveryLocalStorage;
use crate::models::delivery::{DeliveryRecord, Progress};
use crate::services::progress_service;
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// User-triggered mutations on the stored board. Every action loads the
/// whole document, edits one record in place and writes the document back;
/// the caller re-renders afterwards.
pub struct ActionHandler {
    delivery_storage: Arc<DeliveryLocalStorage>,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid quantity: must be a positive number")]
    InvalidQuantity,

    #[error("Invalid total: must be zero or a positive number")]
    InvalidTotal,

    #[error("A delivery date is required")]
    EmptyDate,

    #[error("Delivery \"{0}\" was not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ActionHandler {
    pub fn new(delivery_storage: Arc<DeliveryLocalStorage>) -> Self {
        ActionHandler { delivery_storage }
    }

    /// Appends a partial delivery to a record's history and refreshes the
    /// derived flow fields. `date` defaults to today when omitted.
    pub fn add_delivery(
        &self,
        ref_id: &str,
        date: Option<&str>,
        qty: f64,
    ) -> Result<Progress, ActionError> {
        if !qty.is_finite() || qty <= 0.0 {
            return Err(ActionError::InvalidQuantity);
        }
        let date = match date {
            Some(date) if date.is_empty() => return Err(ActionError::EmptyDate),
            Some(date) => date.to_string(),
            None => Utc::now().format("%Y-%m-%d").to_string(),
        };

        let mut document = self.delivery_storage.load_document()?;
        let record = find_record_mut(&mut document, ref_id)
            .ok_or_else(|| ActionError::NotFound(ref_id.to_string()))?;

        push_history_entry(record, &date, qty);
        let progress = refresh_flow(record);

        self.delivery_storage.save_document(&document)?;
        tracing::debug!(ref_id, qty, "delivery added");
        Ok(progress)
    }

    /// Sets a record's target quantity and refreshes the derived flow fields.
    pub fn edit_total(&self, ref_id: &str, total: f64) -> Result<Progress, ActionError> {
        if !total.is_finite() || total < 0.0 {
            return Err(ActionError::InvalidTotal);
        }

        let mut document = self.delivery_storage.load_document()?;
        let record = find_record_mut(&mut document, ref_id)
            .ok_or_else(|| ActionError::NotFound(ref_id.to_string()))?;

        if let Some(map) = record.as_object_mut() {
            map.insert("total".to_string(), json!(total));
        }
        let progress = refresh_flow(record);

        self.delivery_storage.save_document(&document)?;
        tracing::debug!(ref_id, total, "total updated");
        Ok(progress)
    }

    /// Removes the record matching `ref` from the stored list.
    pub fn remove_delivery(&self, ref_id: &str) -> Result<(), ActionError> {
        let mut document = self.delivery_storage.load_document()?;

        let deliveries = document
            .get_mut("deliveries")
            .and_then(|v| v.as_array_mut())
            .ok_or_else(|| ActionError::NotFound(ref_id.to_string()))?;

        let before = deliveries.len();
        deliveries.retain(|record| {
            record.get("ref").and_then(|v| v.as_str()).unwrap_or("") != ref_id
        });
        if deliveries.len() == before {
            return Err(ActionError::NotFound(ref_id.to_string()));
        }

        self.delivery_storage.save_document(&document)?;
        tracing::info!(ref_id, "delivery removed");
        Ok(())
    }
}

fn find_record_mut<'a>(document: &'a mut Value, ref_id: &str) -> Option<&'a mut Value> {
    document
        .get_mut("deliveries")
        .and_then(|v| v.as_array_mut())?
        .iter_mut()
        .find(|record| record.get("ref").and_then(|v| v.as_str()).unwrap_or("") == ref_id)
}

fn push_history_entry(record: &mut Value, date: &str, qty: f64) {
    let Some(map) = record.as_object_mut() else {
        return;
    };
    let history = map.entry("history").or_insert_with(|| json!([]));
    if !history.is_array() {
        *history = json!([]);
    }
    if let Some(entries) = history.as_array_mut() {
        entries.push(json!({ "date": date, "qty": qty }));
    }
}

/// Rewrites the unit-count flow fields (`entregado` = delivered, `fab` =
/// still pending) from the record's current totals, then returns the derived
/// progress of the updated record.
fn refresh_flow(record: &mut Value) -> Progress {
    let typed = DeliveryRecord::from_json(record);
    let delivered = progress_service::sum_delivered(&typed.history);
    let pending = (typed.total - delivered).max(0.0);

    if let Some(map) = record.as_object_mut() {
        let flow = map.entry("flow").or_insert_with(|| json!({}));
        if !flow.is_object() {
            *flow = json!({});
        }
        if let Some(flow_map) = flow.as_object_mut() {
            flow_map.insert("entregado".to_string(), json!(delivered));
            flow_map.insert("fab".to_string(), json!(pending));
        }
    }

    progress_service::derive_progress(&DeliveryRecord::from_json(record))
}
