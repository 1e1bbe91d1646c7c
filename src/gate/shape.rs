//! Shape guard: cheap structural checks on the raw request body, run
//! before any tokenization.

use serde_json::Value;

use super::types::Rejection;

/// Locale used when the request does not carry a usable one.
pub const DEFAULT_LOCALE: &str = "en";

/// A request body that passed the shape guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedInput {
    /// The submitted text, untrimmed.
    pub text: String,
    pub locale: String,
}

/// Whether a `Content-Type` header value names a JSON body.
///
/// Only `application/json` qualifies; parameters such as `charset` are
/// ignored. Anything else is treated as if no body had been sent.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Parse and check a raw JSON body of the form `{ text, locale? }`.
pub fn check_body(body: &[u8], min_trimmed_chars: usize) -> Result<ShapedInput, Rejection> {
    let value: Value = serde_json::from_slice(body).map_err(|_| Rejection::InvalidInput)?;
    check_value(&value, min_trimmed_chars)
}

/// Check an already-parsed JSON body.
pub fn check_value(value: &Value, min_trimmed_chars: usize) -> Result<ShapedInput, Rejection> {
    let text = match value.get("text") {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(Rejection::InvalidInput),
    };

    check_length(text, min_trimmed_chars)?;

    let locale = match value.get("locale") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_LOCALE.to_string(),
    };

    Ok(ShapedInput {
        text: text.clone(),
        locale,
    })
}

/// Trimmed length guard, counted in Unicode scalar values.
///
/// Characters outside the Basic Multilingual Plane count once, not as two
/// UTF-16 code units, so five emoji are five characters here.
pub fn check_length(text: &str, min_trimmed_chars: usize) -> Result<(), Rejection> {
    if text.trim().chars().count() < min_trimmed_chars {
        return Err(Rejection::TooShort);
    }
    Ok(())
}
