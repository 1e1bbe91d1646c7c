//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::SymptomAnalyzer;
use crate::gate::AdmissibilityGate;

/// Shared context for all routes. Cheap to clone; everything inside is
/// immutable after startup.
#[derive(Clone)]
pub struct ApiContext {
    pub gate: AdmissibilityGate,
    pub analyzer: Arc<dyn SymptomAnalyzer>,
}

impl ApiContext {
    pub fn new(gate: AdmissibilityGate, analyzer: Arc<dyn SymptomAnalyzer>) -> Self {
        Self { gate, analyzer }
    }
}

/// Soft-failure body: the request was well-formed but lacks detail.
#[derive(Debug, Serialize)]
pub struct NeedsMoreInfoBody {
    pub status: &'static str,
    pub message: &'static str,
}

impl NeedsMoreInfoBody {
    pub fn new(message: &'static str) -> Self {
        Self {
            status: "needs_more_info",
            message,
        }
    }
}
