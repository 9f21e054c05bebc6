use std::sync::Arc;

use crate::catalog::repository::PromptCatalog;
use crate::chat::transport::Transport;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote prompt service. Default: ODataPromptCatalog.
    pub catalog: Arc<dyn PromptCatalog>,
    /// Transport used by every chat orchestrator. Default: HttpTransport.
    pub chat_transport: Arc<dyn Transport>,
}
