use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub storage_dir: String,
    pub storage_key: String,
    pub render_debug_list: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self {
            storage_dir: env::var("STORAGE_DIR").unwrap_or_else(|_| "data".to_string()),
            storage_key: env::var("STORAGE_KEY").unwrap_or_else(|_| "TallerFlowDB".to_string()),
            render_debug_list: env::var("RENDER_DEBUG_LIST")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        // The storage key names a slot file, so it must stay a plain name.
        if config.storage_key.is_empty()
            || config.storage_key.contains('/')
            || config.storage_key.contains('\\')
        {
            return Err(ConfigError::InvalidStorageKey);
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Storage key must be a plain name without path separators")]
    InvalidStorageKey,
}
