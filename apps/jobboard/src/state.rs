use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::session::SessionStore;

/// Shared state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    /// `None` when no model key is configured; AI commands then report
    /// insights as unavailable.
    pub llm: Option<Arc<dyn TextGenerator>>,
    pub config: Config,
}
