use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::dataset::Dataset;

/// Two clicks on the same cell within this window read as a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// The dataset slot; empty until the startup load publishes into it.
pub type SharedDataset = Arc<OnceLock<Arc<Dataset>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dataset: SharedDataset,
    /// Set instead of `dataset` when the startup load fails.
    pub load_error: Arc<OnceLock<String>>,
    /// Rendered into the dashboard for the browser-side click handler.
    pub click_window: Duration,
}

impl AppState {
    /// State with an empty dataset slot.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(OnceLock::new()),
            load_error: Arc::new(OnceLock::new()),
            click_window: DOUBLE_CLICK_WINDOW,
        }
    }

    /// State with the dataset already loaded.
    pub fn ready(config: Config, dataset: Dataset) -> Self {
        let state = Self::new(config);
        state.publish(dataset);
        state
    }

    /// Makes the dataset visible to requests. Returns false if one was
    /// already published or the load already failed; the first outcome wins.
    pub fn publish(&self, dataset: Dataset) -> bool {
        if self.load_error.get().is_some() {
            return false;
        }
        self.dataset.set(Arc::new(dataset)).is_ok()
    }

    /// Records why the startup load failed. Ignored once a dataset is
    /// published.
    pub fn fail(&self, error: &AppError) -> bool {
        if self.dataset.get().is_some() {
            return false;
        }
        self.load_error.set(error.to_string()).is_ok()
    }

    pub fn dataset(&self) -> AppResult<Arc<Dataset>> {
        if let Some(dataset) = self.dataset.get() {
            return Ok(dataset.clone());
        }
        match self.load_error.get() {
            Some(reason) => Err(AppError::LoadFailed(reason.clone())),
            None => Err(AppError::NotReady),
        }
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.get().map(String::as_str)
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn click_window_millis(&self) -> u64 {
        self.click_window.as_millis() as u64
    }
}
