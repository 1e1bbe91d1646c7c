//! Downstream symptom analysis collaborator.
//!
//! The gate only dispatches to a `SymptomAnalyzer` after every stage has
//! passed. The analyzer result is opaque JSON returned verbatim to the
//! client.

pub mod gemini;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::{GeminiAnalyzer, GeminiConfig};

/// Analyzer output, passed through to the HTTP response untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub serde_json::Value);

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analyzer rejected input: {0}")]
    InvalidInput(String),

    #[error("Cannot connect to analysis service at {0}")]
    Connection(String),

    #[error("Analysis request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Analysis service returned error {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Analysis service returned no content")]
    EmptyResponse,

    #[error("Failed to parse analysis response: {0}")]
    ResponseParsing(String),

    #[error("Analysis service is not configured")]
    NotConfigured,
}

/// Remote analysis of an admitted symptom description.
///
/// Object-safe so the server can hold any implementation behind `Arc<dyn _>`.
pub trait SymptomAnalyzer: Send + Sync {
    fn analyze<'a>(
        &'a self,
        text: &'a str,
        locale: &'a str,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Analyzer used when no API key is configured. Every call fails.
pub struct UnconfiguredAnalyzer;

impl SymptomAnalyzer for UnconfiguredAnalyzer {
    fn analyze<'a>(
        &'a self,
        _text: &'a str,
        _locale: &'a str,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>> {
        Box::pin(async { Err(AnalysisError::NotConfigured) })
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
