//! OCT-002: Errors raised by the extra-variable container.

use thiserror::Error;

/// Failure to address a container field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariablesError {
    /// The key does not name one of the fixed fields.
    #[error("No such option `{0}`.")]
    NoSuchOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oct002_message_names_key() {
        let err = VariablesError::NoSuchOption("nonexistent".to_string());
        assert_eq!(err.to_string(), "No such option `nonexistent`.");
    }
}
