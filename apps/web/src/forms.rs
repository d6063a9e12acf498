//! Boundary helper over raw `application/x-www-form-urlencoded` submissions.
//!
//! Handlers extract `Form<Vec<(String, String)>>` and wrap it in `FormFields`
//! so every missing or malformed field surfaces as `AppError::Validation`
//! naming the offending key, instead of axum's plain-text rejection.

use std::str::FromStr;

use crate::errors::AppError;

#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Last submitted value for `key`, trimmed. Browsers repeat keys for
    /// multi-selects; a repeated scalar field takes the final value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
    }

    pub fn require(&self, key: &str) -> Result<&str, AppError> {
        match self.get(key) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(AppError::Validation(format!("{key} is required"))),
        }
    }

    pub fn require_string(&self, key: &str) -> Result<String, AppError> {
        self.require(key).map(str::to_string)
    }

    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, AppError> {
        let raw = self.require(key)?;
        raw.parse::<T>()
            .map_err(|_| AppError::Validation(format!("{key} must be a number, got '{raw}'")))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Parses a score in the 0–100 range.
pub fn parse_score(key: &str, raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{key} must be a number, got '{raw}'")))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::Validation(format!(
            "{key} must be between 0 and 100, got {value}"
        )));
    }
    Ok(value)
}
