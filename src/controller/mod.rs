use crate::config::Config;
use crate::error::Result;
use crate::handlers::ActionHandler;
use crate::local_storage::CoreLocalStorage;
use crate::local_storage::delivery::DeliveryLocalStorage;
use crate::models::delivery::{DeliveryRecord, Progress, StageFilter};
use crate::services::progress_service;
use std::sync::Arc;

/// Wires configuration, storage and actions into the surface a renderer
/// talks to. The renderer owns all presentation; it calls in here only for
/// data and mutation.
pub struct Controller {
    delivery_storage: Arc<DeliveryLocalStorage>,
    action_handler: Arc<ActionHandler>,
    config: Arc<Config>,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let core_storage = Arc::new(CoreLocalStorage::new(&config.storage_dir)?);
        let delivery_storage = Arc::new(DeliveryLocalStorage::new(
            core_storage,
            &config.storage_key,
        ));
        let action_handler = Arc::new(ActionHandler::new(delivery_storage.clone()));

        Ok(Self {
            delivery_storage,
            action_handler,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merged records with their derived progress, narrowed by the caller's
    /// stage filter. View state is the caller's argument, not shared state.
    pub fn overview(&self, filter: StageFilter) -> Result<Vec<(DeliveryRecord, Progress)>> {
        let records = self.delivery_storage.load_records()?;
        Ok(records
            .into_iter()
            .map(|record| {
                let progress = progress_service::derive_progress(&record);
                (record, progress)
            })
            .filter(|(_, progress)| filter.matches(progress.stage))
            .collect())
    }

    pub fn add_delivery(&self, ref_id: &str, date: Option<&str>, qty: f64) -> Result<Progress> {
        Ok(self.action_handler.add_delivery(ref_id, date, qty)?)
    }

    pub fn edit_total(&self, ref_id: &str, total: f64) -> Result<Progress> {
        Ok(self.action_handler.edit_total(ref_id, total)?)
    }

    pub fn remove_delivery(&self, ref_id: &str) -> Result<()> {
        Ok(self.action_handler.remove_delivery(ref_id)?)
    }
}
