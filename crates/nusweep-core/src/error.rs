//! Error types for the analysis core.

use thiserror::Error;

/// Fatal errors surfaced by an analysis run.
///
/// Recoverable conditions (unreadable source files, missing namespace
/// metadata) are logged and absorbed; they never appear here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The in-flight run was aborted through its `CancelToken`.
    #[error("analysis cancelled")]
    Cancelled,
}

/// Outcome of the pre-flight input validation.
///
/// Collects every violation instead of failing on the first, so a caller
/// can report all problems in one pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn add(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::default();
        assert!(result.is_valid());
    }

    #[test]
    fn errors_accumulate() {
        let mut result = ValidationResult::default();
        result.add("first");
        result.add("second");
        assert!(!result.is_valid());
        assert_eq!(result.errors, vec!["first", "second"]);
    }
}
