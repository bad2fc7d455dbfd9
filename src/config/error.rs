//! Errors raised while loading or validating configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The merged sources did not deserialize into `Settings`
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),

    #[error("Invalid value for {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Unknown name in `JOBLY_APP_ENV` or `--env`
    #[error("Unknown environment '{0}' (expected development, test, staging or production)")]
    UnknownEnvironment(String),

    /// Two configuration sources that exclude each other were both given
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ConfigError::validation("jwt.secret", "must be at least 32 characters");
        assert_eq!(
            err.to_string(),
            "Invalid value for jwt.secret: must be at least 32 characters"
        );
    }
}
