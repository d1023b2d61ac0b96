//! Error types shared across opsdeck crates.
//!
//! Expected conditions (unknown service, unknown plan, unknown action) are
//! never errors in opsdeck; they are typed results. `CoreError` is reserved
//! for invariant violations that indicate a misconfigured deployment.

use thiserror::Error;

/// Result alias for fallible core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A URI template could not be parsed.
    #[error("Invalid URI template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Two components were registered under the same name.
    #[error("Duplicate registration: {0}")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidTemplate {
            template: "ops/{id".into(),
            reason: "unclosed parameter".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid URI template 'ops/{id': unclosed parameter"
        );
        assert_eq!(
            CoreError::Duplicate("trace.ping".into()).to_string(),
            "Duplicate registration: trace.ping"
        );
    }
}
