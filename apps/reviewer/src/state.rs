use std::sync::Arc;

use crate::config::Config;
use crate::review_client::ReviewService;
use crate::session::SharedSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote review service. Default: `ReviewClient` over HTTP.
    pub service: Arc<dyn ReviewService>,
    /// Catalog, batch controller and displayed results for the UI session.
    pub session: SharedSession,
    pub config: Config,
}
