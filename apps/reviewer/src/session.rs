use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::CvCatalog;
use crate::models::review::ReviewResult;
use crate::review::batch::BatchController;
use crate::review::presentation::{render_results, ResultsView};
use crate::review::ranking::Ranking;

/// Session state shared by all handlers. Never locked across a call to the
/// review service.
pub type SharedSession = Arc<Mutex<Session>>;

/// Everything one user session holds: the catalog, the batch controller and
/// what is currently on display.
#[derive(Debug, Default)]
pub struct Session {
    pub catalog: CvCatalog,
    pub batch: BatchController,
    displayed: Option<DisplayedResults>,
    catalog_requests: u64,
}

#[derive(Debug, Clone)]
pub struct DisplayedResults {
    pub view: ResultsView,
    pub ranking: Option<Ranking>,
}

impl Session {
    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Session::default()))
    }

    /// Registers a catalog load about to go out. The returned ticket orders
    /// it against loads requested before and after it.
    pub fn begin_catalog_load(&mut self) -> u64 {
        self.catalog_requests += 1;
        self.catalog_requests
    }

    /// Installs `catalog` if no later load has been requested since `ticket`
    /// was taken. Returns whether it was installed.
    pub fn commit_catalog(&mut self, ticket: u64, catalog: CvCatalog) -> bool {
        if ticket != self.catalog_requests {
            debug!(
                "Discarding stale catalog load {} (latest is {})",
                ticket, self.catalog_requests
            );
            return false;
        }
        self.catalog = catalog;
        true
    }

    /// Renders a batch response against the catalog of `source` and puts it
    /// on display, replacing whatever was there in one step.
    pub fn show_results(&mut self, source: &str, results: &[ReviewResult]) -> ResultsView {
        let rendered = render_results(results, self.catalog.entries_for(source), source);
        let view = rendered.view.clone();
        self.displayed = Some(DisplayedResults {
            view: rendered.view,
            ranking: rendered.ranking,
        });
        view
    }

    pub fn clear_results(&mut self) {
        self.displayed = None;
    }

    pub fn displayed(&self) -> Option<&DisplayedResults> {
        self.displayed.as_ref()
    }

    /// Results in on-screen order, or `None` when there is nothing ranked.
    pub fn displayed_ranking(&self) -> Option<&[ReviewResult]> {
        self.displayed
            .as_ref()
            .and_then(|d| d.ranking.as_ref())
            .map(|r| r.sorted.as_slice())
    }
}
