use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type shared by every pipeline stage.
///
/// Generation, feature engineering, model training, and prediction all
/// return `Result<_, ServiceError>` and propagate with `?`. The binary maps
/// these into its anyhow boundary.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ServiceError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// True when the error stems from caller-supplied input rather than a
    /// pipeline defect.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfiguration(_)
                | ServiceError::UnknownCategory(_)
                | ServiceError::UnknownRegion(_)
                | ServiceError::InvalidOperation(_)
                | ServiceError::NotFound(_)
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::InvalidConfiguration(errors.to_string())
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::InvalidConfiguration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_flagged() {
        assert!(ServiceError::UnknownCategory("Toys".into()).is_client_error());
        assert!(ServiceError::InvalidConfiguration("bad window".into()).is_client_error());
        assert!(!ServiceError::Generation("invariant violated".into()).is_client_error());
        assert!(!ServiceError::Model("did not converge".into()).is_client_error());
    }

    #[test]
    fn messages_carry_prefixes() {
        let err = ServiceError::UnknownRegion("Oceania".to_string());
        assert_eq!(err.to_string(), "Unknown region: Oceania");
    }
}
