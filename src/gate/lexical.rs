//! Lexical validity scoring: is this human-written prose or noise?
//!
//! Each token is classified as valid, invalid, or (lenient policy only)
//! skipped. The text passes when the share of invalid tokens is strictly
//! below the configured threshold. This is a noise filter, not a spell
//! checker: misspelled words with a vowel count as valid.

use super::types::ValidityPolicy;

/// Tokens shorter than this are "short" (noise under strict, ignored under lenient).
const SHORT_TOKEN_LEN: usize = 3;

/// A token made of one character repeated at least this many times is key-repeat noise.
const MIN_REPEAT_RUN: usize = 4;

/// How a single token was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Valid,
    Invalid,
    /// Excluded from both counts.
    Skipped,
}

/// Counts behind a lexical decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub skipped: usize,
    /// `invalid / (valid + invalid)`, or `None` when the denominator is zero.
    pub invalid_ratio: Option<f64>,
    pub passed: bool,
}

/// Classify one normalized token under `policy`.
pub fn classify_token(token: &str, policy: ValidityPolicy) -> TokenClass {
    if token.len() < SHORT_TOKEN_LEN {
        return match policy {
            ValidityPolicy::Strict => TokenClass::Invalid,
            ValidityPolicy::Lenient => TokenClass::Skipped,
        };
    }
    if is_repeated_char(token) || !has_vowel(token) {
        return TokenClass::Invalid;
    }
    TokenClass::Valid
}

/// Score already-normalized tokens.
pub fn score_tokens<S: AsRef<str>>(
    tokens: &[S],
    policy: ValidityPolicy,
    min_tokens: usize,
    max_invalid_ratio: f64,
) -> LexicalReport {
    let mut report = LexicalReport {
        total: tokens.len(),
        valid: 0,
        invalid: 0,
        skipped: 0,
        invalid_ratio: None,
        passed: false,
    };

    if tokens.len() < min_tokens {
        return report;
    }

    for token in tokens {
        match classify_token(token.as_ref(), policy) {
            TokenClass::Valid => report.valid += 1,
            TokenClass::Invalid => report.invalid += 1,
            TokenClass::Skipped => report.skipped += 1,
        }
    }

    let judged = report.valid + report.invalid;
    if judged == 0 {
        return report;
    }

    let ratio = report.invalid as f64 / judged as f64;
    report.invalid_ratio = Some(ratio);
    report.passed = ratio < max_invalid_ratio;
    report
}

/// The whole token is one character repeated `MIN_REPEAT_RUN` or more times.
fn is_repeated_char(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes.first() {
        Some(&first) => bytes.len() >= MIN_REPEAT_RUN && bytes.iter().all(|&b| b == first),
        None => false,
    }
}

fn has_vowel(token: &str) -> bool {
    token.bytes().any(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u'))
}
