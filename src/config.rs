use std::path::PathBuf;

use crate::analysis::gemini::GeminiConfig;
use crate::gate::types::{GateConfig, ValidityPolicy};

/// Application-level constants
pub const APP_NAME: &str = "symptom-gate";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Log filter used when `RUST_LOG` is absent or unparsable.
pub fn default_log_filter() -> &'static str {
    "info,symptom_gate_lib=debug"
}

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("SYMPTOM_GATE_MAX_INVALID_RATIO must be in (0, 1], got {0}")]
    RatioOutOfRange(f64),
}

/// Everything the service needs at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub gate: GateConfig,
    /// Vocabulary override. `None` uses the bundled term list.
    pub vocabulary_path: Option<PathBuf>,
    /// `None` when no API key is configured.
    pub gemini: Option<GeminiConfig>,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let policy = match get("SYMPTOM_GATE_POLICY") {
            Some(raw) => raw.parse::<ValidityPolicy>().map_err(|_| ConfigError::InvalidValue {
                key: "SYMPTOM_GATE_POLICY",
                value: raw,
            })?,
            None => ValidityPolicy::default(),
        };

        let mut gate = GateConfig::for_policy(policy);
        if let Some(raw) = get("SYMPTOM_GATE_MAX_INVALID_RATIO") {
            let ratio = raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                key: "SYMPTOM_GATE_MAX_INVALID_RATIO",
                value: raw.clone(),
            })?;
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::RatioOutOfRange(ratio));
            }
            gate.max_invalid_ratio = ratio;
        }

        let vocabulary_path = get("SYMPTOM_GATE_VOCABULARY").map(PathBuf::from);

        let gemini = match get("GEMINI_API_KEY") {
            Some(api_key) => {
                let mut cfg = GeminiConfig::new(api_key.trim().to_string());
                if let Some(model) = get("GEMINI_MODEL") {
                    cfg.model = model.trim().to_string();
                }
                if let Some(base_url) = get("GEMINI_BASE_URL") {
                    cfg.base_url = base_url.trim().trim_end_matches('/').to_string();
                }
                if let Some(raw) = get("GEMINI_TIMEOUT_SECS") {
                    // A zero timeout would fail every analyzer call.
                    cfg.timeout_secs = raw
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ConfigError::InvalidValue {
                            key: "GEMINI_TIMEOUT_SECS",
                            value: raw,
                        })?;
                }
                Some(cfg)
            }
            None => None,
        };

        Ok(Self {
            port,
            gate,
            vocabulary_path,
            gemini,
        })
    }
}
