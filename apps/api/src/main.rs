mod analysis;
mod config;
mod db;
mod errors;
mod evidence;
mod extraction;
mod models;
mod roadmap;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::history::HistoryCache;
use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::store::{AnalysisStore, PgAnalysisStore};
use crate::config::Config;
use crate::db::create_pool;
use crate::evidence::github::GithubClient;
use crate::evidence::tech::TechDictionary;
use crate::evidence::EvidenceMiner;
use crate::roadmap::RoadmapBuilder;
use crate::routes::build_router;
use crate::skills::NlpClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting skillgap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store: Arc<dyn AnalysisStore> = Arc::new(PgAnalysisStore::new(db));

    // Outbound clients
    let nlp = NlpClient::new(config.nlp_url.clone(), config.http_timeout)?;
    info!("NLP client initialized ({})", config.nlp_url);

    let github = GithubClient::new(
        config.github_api_url.clone(),
        config.github_token.as_deref(),
        config.http_timeout,
    )?;
    info!(
        "GitHub client initialized ({}, authenticated: {})",
        config.github_api_url,
        config.github_token.is_some()
    );

    let history = HistoryCache::default();
    let pipeline = AnalysisPipeline::new(
        Arc::new(nlp),
        EvidenceMiner::new(github, TechDictionary::default()),
        RoadmapBuilder::default(),
        store.clone(),
        history.clone(),
    );

    let cors = build_cors(&config)?;

    let state = AppState {
        config: config.clone(),
        store,
        history,
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to `CORS_ORIGIN` when set; permissive otherwise.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = config.cors_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid header value: '{origin}'"))?;
    Ok(CorsLayer::permissive().allow_origin(origin))
}
