//! Flat key-value configuration passed to solver backends.
//!
//! Recognized keys are backend-specific and documented on each backend.
//! Both shipped backends reject unrecognized keys rather than ignoring
//! them: a typo in a tolerance key must not masquerade as solver
//! disagreement.

use std::collections::BTreeMap;

use crate::error::{HarnessError, HarnessResult};

/// A single option value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptValue {
    /// Floating-point parameter (tolerances, step sizes)
    Float(f64),
    /// Integer parameter (iteration caps, scaling passes)
    Int(u64),
    /// Toggle (verbosity, polishing)
    Bool(bool),
}

impl From<f64> for OptValue {
    fn from(v: f64) -> Self {
        OptValue::Float(v)
    }
}

impl From<u64> for OptValue {
    fn from(v: u64) -> Self {
        OptValue::Int(v)
    }
}

impl From<bool> for OptValue {
    fn from(v: bool) -> Self {
        OptValue::Bool(v)
    }
}

/// Ordered option map handed to a backend alongside the problem.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    values: BTreeMap<String, OptValue>,
}

impl SolverOptions {
    /// Empty option set (backend defaults apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or overwrite a key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&OptValue> {
        self.values.get(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when no options were set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn type_error(backend: &str, key: &str, expected: &str) -> HarnessError {
    HarnessError::UnsupportedOption {
        backend: backend.to_string(),
        key: key.to_string(),
        message: format!("expected a {} value", expected),
    }
}

/// Extract a float parameter (integers widen).
pub(crate) fn expect_f64(backend: &str, key: &str, value: &OptValue) -> HarnessResult<f64> {
    match value {
        OptValue::Float(v) => Ok(*v),
        OptValue::Int(v) => Ok(*v as f64),
        OptValue::Bool(_) => Err(type_error(backend, key, "numeric")),
    }
}

/// Extract an integer parameter.
pub(crate) fn expect_u64(backend: &str, key: &str, value: &OptValue) -> HarnessResult<u64> {
    match value {
        OptValue::Int(v) => Ok(*v),
        _ => Err(type_error(backend, key, "integer")),
    }
}

/// Extract an integer parameter narrowed to u32.
pub(crate) fn expect_u32(backend: &str, key: &str, value: &OptValue) -> HarnessResult<u32> {
    let v = expect_u64(backend, key, value)?;
    u32::try_from(v).map_err(|_| type_error(backend, key, "32-bit integer"))
}

/// Extract a boolean parameter.
pub(crate) fn expect_bool(backend: &str, key: &str, value: &OptValue) -> HarnessResult<bool> {
    match value {
        OptValue::Bool(v) => Ok(*v),
        _ => Err(type_error(backend, key, "boolean")),
    }
}

/// Rejection for a key the backend does not know at all.
pub(crate) fn unknown_key(backend: &str, key: &str) -> HarnessError {
    HarnessError::UnsupportedOption {
        backend: backend.to_string(),
        key: key.to_string(),
        message: "unrecognized option".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let opts = SolverOptions::new()
            .with("max_iter", 4000u64)
            .with("eps_abs", 1e-6)
            .with("polish", true);

        assert_eq!(opts.get("max_iter"), Some(&OptValue::Int(4000)));
        assert_eq!(opts.get("eps_abs"), Some(&OptValue::Float(1e-6)));
        assert_eq!(opts.get("polish"), Some(&OptValue::Bool(true)));
        assert_eq!(opts.get("missing"), None);
        assert_eq!(opts.iter().count(), 3);
    }

    #[test]
    fn test_typed_extraction() {
        assert_eq!(expect_f64("b", "k", &OptValue::Float(1.5)).unwrap(), 1.5);
        assert_eq!(expect_f64("b", "k", &OptValue::Int(3)).unwrap(), 3.0);
        assert!(expect_f64("b", "k", &OptValue::Bool(true)).is_err());
        assert!(expect_u64("b", "k", &OptValue::Float(1.5)).is_err());
        assert!(expect_bool("b", "k", &OptValue::Int(1)).is_err());
    }

    #[test]
    fn test_type_error_names_backend_and_key() {
        let err = expect_bool("osqp", "polish", &OptValue::Float(1.0)).unwrap_err();
        match err {
            HarnessError::UnsupportedOption { backend, key, .. } => {
                assert_eq!(backend, "osqp");
                assert_eq!(key, "polish");
            }
            other => panic!("expected UnsupportedOption, got {:?}", other),
        }
    }
}
