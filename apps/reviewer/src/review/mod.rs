// Review orchestration: batch lifecycle, ranking, presentation and export.
// All service calls go through review_client — nothing here talks HTTP to the service.

pub mod batch;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod presentation;
pub mod ranking;
