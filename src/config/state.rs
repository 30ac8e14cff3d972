// Application state module
// Shared, immutable per-process state handed to every request

use std::path::PathBuf;

use super::types::Config;
use crate::storage::ImageStore;

/// Application state
///
/// Requests only read from it; all mutable state lives in the image
/// directory.
pub struct AppState {
    pub config: Config,
    pub store: ImageStore,
    pub template_path: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: ImageStore::new(config.image_dir()),
            template_path: config.template_path(),
        }
    }

    pub const fn max_body_size(&self) -> u64 {
        self.config.http.max_body_size
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
