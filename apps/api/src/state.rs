use std::sync::Arc;

use crate::analysis::history::HistoryCache;
use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::store::AnalysisStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Record store. Default: `PgAnalysisStore`.
    pub store: Arc<dyn AnalysisStore>,
    /// Recent-history snapshot, shared with the pipeline's background refresh.
    pub history: HistoryCache,
    pub pipeline: Arc<AnalysisPipeline>,
}
