//! Error taxonomy shared by the window and ranking engines

use thiserror::Error;

/// Failure reported by a [`Fetcher`](crate::source::Fetcher) for one resource
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error fetching {resource}: {cause}")]
    Transport { resource: String, cause: String },

    #[error("timed out fetching {resource} after {timeout_ms}ms")]
    Timeout { resource: String, timeout_ms: u64 },

    #[error("upstream returned status {status} for {resource}")]
    Status { resource: String, status: u16 },

    #[error("malformed payload for {resource}: {cause}")]
    Decode { resource: String, cause: String },
}

impl FetchError {
    /// Resource id the failed fetch was issued for
    pub fn resource(&self) -> &str {
        match self {
            FetchError::Transport { resource, .. }
            | FetchError::Timeout { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::Decode { resource, .. } => resource,
        }
    }
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("invalid number category '{0}', expected one of p, f, e, r")]
    InvalidCategory(String),

    #[error("invalid type parameter '{0}', use \"popular\" or \"latest\"")]
    InvalidQueryType(String),

    #[error("data source failure: {0}")]
    DataSource(#[from] FetchError),
}

impl AggregatorError {
    /// True when the caller supplied a bad key (surfaced as a 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::InvalidCategory(_) | AggregatorError::InvalidQueryType(_)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type AggregatorResult<T> = Result<T, AggregatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(AggregatorError::InvalidCategory("x".into()).is_client_error());
        assert!(AggregatorError::InvalidQueryType("hot".into()).is_client_error());

        let fetch = FetchError::Status {
            resource: "users".into(),
            status: 503,
        };
        let err: AggregatorError = fetch.into();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_fetch_error_resource() {
        let err = FetchError::Timeout {
            resource: "primes".into(),
            timeout_ms: 500,
        };
        assert_eq!(err.resource(), "primes");
        assert_eq!(err.to_string(), "timed out fetching primes after 500ms");
    }
}
