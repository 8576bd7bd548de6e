use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::naming::display_name;
use crate::catalog::CvCatalog;
use crate::errors::AppError;
use crate::models::cv::CvDescriptor;
use crate::review::pipeline::require_source;
use crate::state::AppState;

pub const EMPTY_CATALOG_NOTICE: &str = "No CVs found in the selected source.";

#[derive(Deserialize)]
pub struct SourceQuery {
    pub source: String,
}

#[derive(Deserialize)]
pub struct ContentQuery {
    pub source: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub cv: CvDescriptor,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub source: Option<String>,
    pub count: usize,
    pub cvs: Vec<CatalogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CatalogResponse {
    fn from_catalog(catalog: &CvCatalog) -> Self {
        let cvs: Vec<CatalogEntry> = catalog
            .current()
            .iter()
            .map(|cv| CatalogEntry {
                display_name: display_name(&cv.name, &cv.path),
                cv: cv.clone(),
            })
            .collect();

        let notice = (catalog.is_loaded() && cvs.is_empty())
            .then(|| EMPTY_CATALOG_NOTICE.to_string());

        Self {
            source: catalog.source().map(str::to_string),
            count: cvs.len(),
            cvs,
            notice,
        }
    }
}

/// GET /api/v1/cvs?source=
///
/// Loads the listing for a source and replaces the session catalog with it,
/// unless a later load was requested while this one was in flight.
pub async fn handle_load_catalog(
    State(state): State<AppState>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<CatalogResponse>, AppError> {
    require_source(&query.source)?;

    let ticket = state.session.lock().await.begin_catalog_load();
    let catalog = CvCatalog::load(state.service.as_ref(), &query.source).await?;
    let response = CatalogResponse::from_catalog(&catalog);
    state.session.lock().await.commit_catalog(ticket, catalog);

    Ok(Json(response))
}

/// GET /api/v1/cvs/current
pub async fn handle_current_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let session = state.session.lock().await;
    Json(CatalogResponse::from_catalog(&session.catalog))
}

/// GET /api/v1/cvs/content?source=&path=
///
/// Raw text of one document, for the preview pane.
pub async fn handle_cv_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_source(&query.source)?;
    if query.path.is_empty() {
        return Err(AppError::Validation("path cannot be empty".to_string()));
    }

    let text = state
        .service
        .fetch_content(&query.source, &query.path)
        .await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}
