mod handlers;
mod page;

pub use handlers::{DatasetView, RankingView, ViewQuery};
pub use page::render_page;

use crate::pipeline::PreparedDatasets;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Shared, read-only state behind every dashboard route.
#[derive(Debug, Clone)]
pub struct DashboardState {
    datasets: Arc<PreparedDatasets>,
    default_limit: usize,
}

impl DashboardState {
    pub fn new(datasets: Arc<PreparedDatasets>, default_limit: usize) -> Self {
        Self {
            datasets,
            default_limit: default_limit.max(1),
        }
    }

    pub fn datasets(&self) -> &PreparedDatasets {
        &self.datasets
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }
}

/// Router builder exposing the dashboard page, chart images and JSON views.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(handlers::page_handler))
        .route("/charts/scatter.svg", get(handlers::scatter_chart_handler))
        .route("/charts/ranking.svg", get(handlers::ranking_chart_handler))
        .route("/api/v1/datasets/:dataset", get(handlers::dataset_handler))
        .route("/api/v1/ranking", get(handlers::ranking_handler))
        .route("/api/v1/previews", get(handlers::previews_handler))
        .with_state(state)
}
