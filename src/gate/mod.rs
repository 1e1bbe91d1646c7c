//! Admissibility gate for free-text symptom descriptions.
//!
//! Stages run in a fixed order and the first unmet gate stops the pipeline:
//! shape guard → lexical validity → domain signal → structural completeness.
//! Every stage is a pure function of the text, the `GateConfig` and the
//! `Vocabulary`; nothing is kept between calls.

pub mod domain;
pub mod lexical;
pub mod shape;
pub mod structure;
pub mod tokenize;
pub mod types;
pub mod vocabulary;

use std::sync::Arc;

pub use shape::ShapedInput;
pub use types::{Category, GateConfig, GateOutcome, GateStage, Guidance, Rejection, ValidityPolicy};
pub use vocabulary::{Vocabulary, VocabularyError};

/// Run every text stage over `text`.
///
/// The trimmed-length guard is included so the result is meaningful for any
/// string, not only for bodies that already went through `shape::check_body`.
pub fn evaluate_text(text: &str, config: &GateConfig, vocab: &Vocabulary) -> GateOutcome {
    if let Err(rejection) = shape::check_length(text, config.min_trimmed_chars) {
        return GateOutcome::Rejected(rejection);
    }

    let tokens = tokenize::tokenize(text);

    let report = lexical::score_tokens(
        &tokens,
        config.policy,
        config.min_tokens,
        config.max_invalid_ratio,
    );
    if !report.passed {
        tracing::debug!(
            policy = %config.policy,
            total = report.total,
            valid = report.valid,
            invalid = report.invalid,
            skipped = report.skipped,
            ratio = ?report.invalid_ratio,
            "Lexical validity gate failed"
        );
        return match config.policy {
            ValidityPolicy::Strict => GateOutcome::Rejected(Rejection::Unclear),
            ValidityPolicy::Lenient => GateOutcome::NeedsMoreInfo(Guidance::UnclearWording),
        };
    }

    if !domain::has_domain_signal(&tokens, vocab, config.min_domain_matches) {
        tracing::debug!(
            matches = domain::count_matches(&tokens, vocab),
            required = config.min_domain_matches,
            "Domain signal gate failed"
        );
        return GateOutcome::NeedsMoreInfo(Guidance::MissingMedicalDetail);
    }

    let present = structure::categories_present(&tokens, vocab);
    if present.len() < config.min_categories {
        tracing::debug!(
            categories = ?present,
            required = config.min_categories,
            "Structural completeness gate failed"
        );
        return GateOutcome::NeedsMoreInfo(Guidance::IncompleteDescription);
    }

    GateOutcome::Accepted
}

/// Result of screening one request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    /// Every gate passed; forward this input to the analyzer.
    Dispatch(ShapedInput),
    Rejected(Rejection),
    NeedsMoreInfo(Guidance),
}

impl Screening {
    pub fn outcome(&self) -> GateOutcome {
        match self {
            Screening::Dispatch(_) => GateOutcome::Accepted,
            Screening::Rejected(r) => GateOutcome::Rejected(*r),
            Screening::NeedsMoreInfo(g) => GateOutcome::NeedsMoreInfo(*g),
        }
    }
}

/// The gate with its configuration bound, shared across request handlers.
#[derive(Debug, Clone)]
pub struct AdmissibilityGate {
    config: Arc<GateConfig>,
    vocab: Arc<Vocabulary>,
}

impl AdmissibilityGate {
    pub fn new(config: GateConfig, vocab: Vocabulary) -> Self {
        Self {
            config: Arc::new(config),
            vocab: Arc::new(vocab),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Screen a request whose body is only read when it is declared as JSON.
    pub fn screen_request(&self, content_type: Option<&str>, body: &[u8]) -> Screening {
        if !shape::is_json_content_type(content_type) {
            return Screening::Rejected(Rejection::InvalidInput);
        }
        self.screen(body)
    }

    /// Screen a raw JSON request body through every stage.
    pub fn screen(&self, body: &[u8]) -> Screening {
        let input = match shape::check_body(body, self.config.min_trimmed_chars) {
            Ok(input) => input,
            Err(rejection) => return Screening::Rejected(rejection),
        };

        match evaluate_text(&input.text, &self.config, &self.vocab) {
            GateOutcome::Accepted => Screening::Dispatch(input),
            GateOutcome::Rejected(r) => Screening::Rejected(r),
            GateOutcome::NeedsMoreInfo(g) => Screening::NeedsMoreInfo(g),
        }
    }
}
