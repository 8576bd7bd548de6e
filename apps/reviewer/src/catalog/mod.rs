// CV catalog: the listing of one source, used as the lookup table when
// correlating review results.

pub mod correlation;
pub mod handlers;
pub mod naming;

use tracing::info;

use crate::models::cv::CvDescriptor;
use crate::review_client::{ReviewService, ServiceError};

/// The most recently loaded listing. Reloading replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct CvCatalog {
    source: Option<String>,
    entries: Vec<CvDescriptor>,
}

impl CvCatalog {
    pub fn new(source: impl Into<String>, entries: Vec<CvDescriptor>) -> Self {
        Self {
            source: Some(source.into()),
            entries,
        }
    }

    /// Fetches the listing for `source`. An empty listing is still a loaded catalog.
    pub async fn load(service: &dyn ReviewService, source: &str) -> Result<Self, ServiceError> {
        let entries = service.list_cvs(source).await?;
        info!("Loaded {} CVs from source {}", entries.len(), source);
        Ok(Self::new(source, entries))
    }

    /// Entries of the last load; empty before the first one.
    pub fn current(&self) -> &[CvDescriptor] {
        &self.entries
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    /// Correlation targets for `source`. A catalog loaded for another source
    /// contributes nothing.
    pub fn entries_for(&self, source: &str) -> &[CvDescriptor] {
        match self.source.as_deref() {
            Some(loaded) if loaded == source => &self.entries,
            _ => &[],
        }
    }
}
