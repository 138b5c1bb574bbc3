use std::time::Duration;
use thiserror::Error;

/// Result type used throughout the suite
pub type Result<T> = std::result::Result<T, E2eError>;

/// Failures a scenario can surface to the runner
#[derive(Debug, Error)]
pub enum E2eError {
    /// The browser process could not be launched or attached
    #[error("Failed to start browser session: {0}")]
    SessionStart(String),

    /// A wait condition was not satisfied in time. Too slow and never
    /// happening are indistinguishable here.
    #[error("Timed out after {waited:?} waiting for {condition}")]
    Timeout { condition: String, waited: Duration },

    /// A required affordance is missing from the page
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Observed state differs from the expected literal
    #[error("Assertion failed for {what}: expected {expected}, got {actual}")]
    Assertion { what: String, expected: String, actual: String },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Interaction '{action}' failed: {reason}")]
    Interaction { action: String, reason: String },

    #[error("JavaScript evaluation failed: {0}")]
    Evaluation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl E2eError {
    pub(crate) fn interaction(action: &str, reason: impl ToString) -> Self {
        Self::Interaction { action: action.to_string(), reason: reason.to_string() }
    }

    /// Whether this error is the primary test-failure signal rather than an
    /// infrastructure or page problem
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}

/// Compare an observed value against the expected literal, producing an
/// [`E2eError::Assertion`] on mismatch.
pub fn expect_eq<T>(what: &str, expected: T, actual: T) -> Result<()>
where
    T: PartialEq + std::fmt::Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::Assertion {
            what: what.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = E2eError::Timeout { condition: "visible 'input.new-todo'".to_string(), waited: Duration::from_secs(5) };
        assert_eq!(err.to_string(), "Timed out after 5s waiting for visible 'input.new-todo'");
    }

    #[test]
    fn test_expect_eq_match() {
        assert!(expect_eq("labels", vec!["a"], vec!["a"]).is_ok());
    }

    #[test]
    fn test_expect_eq_mismatch() {
        let err = expect_eq("remaining count", 1, 2).unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Assertion failed for remaining count: expected 1, got 2");
    }

    #[test]
    fn test_interaction_error() {
        let err = E2eError::interaction("click", "node detached");
        assert_eq!(err.to_string(), "Interaction 'click' failed: node detached");
        assert!(!err.is_assertion());
    }
}
