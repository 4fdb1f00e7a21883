use thiserror::Error;

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start date must be before or equal to end date")]
    InvalidRange,
}

/// Errors that can occur during repository operations.
///
/// Not-found on point reads is `Ok(None)` and not-found on updates is
/// `Ok(false)`; the `NotFound` variant exists for callers that convert an
/// absent result into an error at their own boundary, and for engine-level
/// mappings where the store itself reports the miss.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// The store throttled the operation and bounded retries were exhausted.
    #[error("Throttled: {0}")]
    Throttled(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_error_display() {
        assert_eq!(
            DateRangeError::InvalidRange.to_string(),
            "Invalid date range: start date must be before or equal to end date"
        );
    }

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Company",
            id: "42".to_string(),
        };
        assert_eq!(error.to_string(), "Company not found: 42");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Company",
            id: "Acme".to_string(),
        };
        assert_eq!(error.to_string(), "Company already exists: Acme");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_throttled_display() {
        let error = RepositoryError::Throttled("counter increment retries exhausted".to_string());
        assert_eq!(
            error.to_string(),
            "Throttled: counter increment retries exhausted"
        );
    }
}
