use hl_core::config::SettingReport;
use hl_sources::HeadlineManager;
use std::sync::Arc;

pub struct AppState {
    pub manager: Arc<HeadlineManager>,
    /// Where each upstream setting was resolved from, for `/api/status`.
    pub settings: Vec<SettingReport>,
}

impl AppState {
    pub fn new(manager: Arc<HeadlineManager>, settings: Vec<SettingReport>) -> Self {
        Self { manager, settings }
    }
}
