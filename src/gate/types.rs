use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════

/// How short tokens are weighted by the lexical scorer, and how a
/// lexical failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidityPolicy {
    /// Tokens shorter than 3 characters count as noise. Failure is a hard 400.
    Strict,
    /// Tokens shorter than 3 characters are skipped. Failure asks for more detail.
    #[default]
    Lenient,
}

impl ValidityPolicy {
    /// Threshold paired with this policy when none is configured explicitly.
    pub fn default_max_invalid_ratio(self) -> f64 {
        match self {
            ValidityPolicy::Strict => 0.2,
            ValidityPolicy::Lenient => 0.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidityPolicy::Strict => "strict",
            ValidityPolicy::Lenient => "lenient",
        }
    }
}

impl fmt::Display for ValidityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl FromStr for ValidityPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidityPolicy::Strict),
            "lenient" => Ok(ValidityPolicy::Lenient),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Thresholds for every gate stage. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub policy: ValidityPolicy,
    /// Minimum length of the trimmed text, in characters.
    pub min_trimmed_chars: usize,
    /// Below this many tokens the text is too short to judge.
    pub min_tokens: usize,
    /// Lexical quality passes iff the invalid ratio is strictly below this.
    pub max_invalid_ratio: f64,
    /// Vocabulary hits needed for the domain signal.
    pub min_domain_matches: usize,
    /// Distinct vocabulary categories needed for structural completeness.
    pub min_categories: usize,
}

impl GateConfig {
    pub fn for_policy(policy: ValidityPolicy) -> Self {
        Self {
            policy,
            min_trimmed_chars: 10,
            min_tokens: 3,
            max_invalid_ratio: policy.default_max_invalid_ratio(),
            min_domain_matches: 2,
            min_categories: 2,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::for_policy(ValidityPolicy::default())
    }
}

// ═══════════════════════════════════════════════════════════
// Vocabulary categories
// ═══════════════════════════════════════════════════════════

/// Semantic category of a controlled-vocabulary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Symptom,
    BodyPart,
    Severity,
    Duration,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Symptom,
        Category::BodyPart,
        Category::Severity,
        Category::Duration,
    ];
}

// ═══════════════════════════════════════════════════════════
// Outcomes
// ═══════════════════════════════════════════════════════════

/// Which stage of the pipeline produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Shape,
    Lexical,
    DomainSignal,
    Structure,
}

impl GateStage {
    pub fn as_str(self) -> &'static str {
        match self {
            GateStage::Shape => "shape",
            GateStage::Lexical => "lexical",
            GateStage::DomainSignal => "domain_signal",
            GateStage::Structure => "structure",
        }
    }
}

/// Hard failures. Each maps to a 400 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `text` missing, not a string, or empty.
    InvalidInput,
    /// Trimmed text shorter than the configured minimum.
    TooShort,
    /// Lexical noise under the strict policy.
    Unclear,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::InvalidInput => "Invalid input",
            Rejection::TooShort => "Input too short for analysis",
            Rejection::Unclear => "Input unclear",
        }
    }

    pub fn stage(self) -> GateStage {
        match self {
            Rejection::InvalidInput | Rejection::TooShort => GateStage::Shape,
            Rejection::Unclear => GateStage::Lexical,
        }
    }
}

/// Soft failures. The user is expected to rephrase and retry in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    /// Lexical noise under the lenient policy.
    UnclearWording,
    /// Not enough controlled-vocabulary terms.
    MissingMedicalDetail,
    /// Terms drawn from too few categories.
    IncompleteDescription,
}

impl Guidance {
    pub fn message(self) -> &'static str {
        match self {
            Guidance::UnclearWording => {
                "We couldn't quite understand that. Please describe how you feel in plain words, for example what hurts and since when."
            }
            Guidance::MissingMedicalDetail => {
                "Please mention specific symptoms, the body part affected, or how long you have had them."
            }
            Guidance::IncompleteDescription => {
                "Please add more detail: the type of symptom, where in the body it occurs, and how long it has lasted."
            }
        }
    }

    pub fn stage(self) -> GateStage {
        match self {
            Guidance::UnclearWording => GateStage::Lexical,
            Guidance::MissingMedicalDetail => GateStage::DomainSignal,
            Guidance::IncompleteDescription => GateStage::Structure,
        }
    }
}

/// Verdict of the admissibility gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// All gates passed; the text may be dispatched.
    Accepted,
    Rejected(Rejection),
    NeedsMoreInfo(Guidance),
}

impl GateOutcome {
    /// The stage that stopped the pipeline, if any.
    pub fn stage(&self) -> Option<GateStage> {
        match self {
            GateOutcome::Accepted => None,
            GateOutcome::Rejected(r) => Some(r.stage()),
            GateOutcome::NeedsMoreInfo(g) => Some(g.stage()),
        }
    }
}
