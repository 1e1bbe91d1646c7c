pub mod analysis; // Downstream symptom analyzer (Gemini)
pub mod api; // HTTP router, endpoints, server lifecycle
pub mod config;
pub mod gate; // Symptom-text admissibility gate

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::analysis::{AnalysisError, GeminiAnalyzer, SymptomAnalyzer, UnconfiguredAnalyzer};
use crate::config::{ConfigError, ServiceConfig};
use crate::gate::{AdmissibilityGate, Vocabulary, VocabularyError};

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),
    #[error("Analyzer setup failed: {0}")]
    Analyzer(#[from] AnalysisError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load the vocabulary named by the configuration, or the bundled one.
pub fn load_vocabulary(cfg: &ServiceConfig) -> Result<Vocabulary, VocabularyError> {
    match &cfg.vocabulary_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading vocabulary override");
            Vocabulary::from_path(path)
        }
        None => Vocabulary::bundled(),
    }
}

/// Build the analyzer named by the configuration.
pub fn build_analyzer(cfg: &ServiceConfig) -> Result<Arc<dyn SymptomAnalyzer>, AnalysisError> {
    match &cfg.gemini {
        Some(gemini) => {
            let analyzer = GeminiAnalyzer::new(gemini.clone())?;
            tracing::info!(model = analyzer.model(), "Gemini analyzer configured");
            Ok(Arc::new(analyzer))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set: admitted requests will fail with 500");
            Ok(Arc::new(UnconfiguredAnalyzer))
        }
    }
}

/// Start the service and run until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = ServiceConfig::from_env()?;
    tracing::info!(
        policy = %cfg.gate.policy,
        max_invalid_ratio = cfg.gate.max_invalid_ratio,
        "Gate configured"
    );

    let vocab = load_vocabulary(&cfg)?;
    let analyzer = build_analyzer(&cfg)?;
    let gate = AdmissibilityGate::new(cfg.gate.clone(), vocab);

    let app = api::api_router(gate, analyzer);
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), cfg.port);
    let mut server = api::start_server_on(app, addr)
        .await
        .map_err(StartupError::Server)?;

    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        started_at = %server.session.started_at,
        "Server running on port {}",
        server.session.port
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.wait().await;
    Ok(())
}
