//! Error types for provisioning operations
//!
//! Every failure surfaced by this crate is an [`S1Error`]. Callers branch on
//! [`S1Error::kind`] rather than on individual platform error codes; the
//! platform's own error list is logged where it is received and collapsed
//! into a single [`S1Error::ApiReported`].

use thiserror::Error;

/// Broad failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be issued or its response not read
    Transport,
    /// The server rejected the request with a fault status
    ServerFault,
    /// The response envelope carried platform errors
    ApiReported,
    /// A response did not have the expected shape
    Decode,
    /// An existing resource is in a state that forbids the operation
    StateConflict,
    /// The provisioning input itself is invalid
    Validation,
}

/// Provisioning error types.
#[derive(Debug, Error)]
pub enum S1Error {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Network or I/O failure issuing the request
    #[error("{method} {url} | failed to execute request: {source}")]
    Transport {
        /// HTTP method
        method: String,
        /// Full request URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Server returned a 5xx status
    #[error("{method} {url} | request returned server error code {status}")]
    ServerError {
        /// HTTP method
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Server refused the operation for the resource (405 and above)
    #[error("{method} {url} | method is not allowed for endpoint (status {status})")]
    NotPermitted {
        /// HTTP method
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Response envelope contained one or more platform errors
    #[error("{method} {url} | server returned {count} API error(s)")]
    ApiReported {
        /// HTTP method
        method: String,
        /// Full request URL
        url: String,
        /// Number of errors in the envelope
        count: usize,
    },

    /// Response body or payload did not match the expected shape
    #[error("failed to decode {context}: {message}")]
    Decode {
        /// What was being decoded
        context: String,
        /// Decoder message
        message: String,
    },

    /// A timestamp returned by the platform could not be parsed
    #[error("failed to parse timestamp '{value}': {message}")]
    InvalidTimestamp {
        /// Raw timestamp
        value: String,
        /// Parser message
        message: String,
    },

    /// The requested expiration is neither a duration nor a timestamp
    #[error("failed to parse account expiration time and date '{value}'")]
    InvalidExpiration {
        /// Raw expiration value
        value: String,
    },

    /// The account exists, is expired, and reactivation was not requested
    #[error("account '{name}' already exists and is expired; it is not set to be reactivated")]
    AccountExpired {
        /// Account name
        name: String,
    },

    /// The account exists in a state provisioning does not handle
    #[error("account '{name}' already exists and is currently '{state}'")]
    UnexpectedAccountState {
        /// Account name
        name: String,
        /// Observed state
        state: String,
    },

    /// The platform did not confirm the reactivation
    #[error("failed to reactivate account {account_id}: activation was not successful")]
    ReactivationFailed {
        /// Account identifier
        account_id: String,
    },

    /// A role required for user provisioning does not exist in the account
    #[error("role '{role}' was not found in account {account_id}")]
    RoleNotFound {
        /// Account identifier
        account_id: String,
        /// Role name
        role: String,
    },

    /// The platform did not recognise the user for a password reset
    #[error("failed to reset password for user {user_id}: user ID was not found")]
    PasswordResetFailed {
        /// User identifier
        user_id: String,
    },
}

/// Result type for provisioning operations.
pub type S1Result<T> = Result<T, S1Error>;

impl S1Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            S1Error::ClientBuild(_) | S1Error::Transport { .. } => ErrorKind::Transport,
            S1Error::ServerError { .. } | S1Error::NotPermitted { .. } => ErrorKind::ServerFault,
            S1Error::ApiReported { .. } => ErrorKind::ApiReported,
            S1Error::Decode { .. } | S1Error::InvalidTimestamp { .. } => ErrorKind::Decode,
            S1Error::AccountExpired { .. }
            | S1Error::UnexpectedAccountState { .. }
            | S1Error::ReactivationFailed { .. }
            | S1Error::RoleNotFound { .. }
            | S1Error::PasswordResetFailed { .. } => ErrorKind::StateConflict,
            S1Error::InvalidExpiration { .. } => ErrorKind::Validation,
        }
    }

    /// Check if repeating the same request could succeed.
    ///
    /// Only transport failures and 5xx responses qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, S1Error::Transport { .. } | S1Error::ServerError { .. })
    }

    /// Check if the error came from issuing a request rather than from
    /// interpreting its result.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::ServerFault | ErrorKind::ApiReported
        )
    }

    /// Get a stable error code for logs and reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            S1Error::ClientBuild(_) => "CLIENT_BUILD",
            S1Error::Transport { .. } => "TRANSPORT",
            S1Error::ServerError { .. } => "SERVER_ERROR",
            S1Error::NotPermitted { .. } => "NOT_PERMITTED",
            S1Error::ApiReported { .. } => "API_ERROR",
            S1Error::Decode { .. } => "DECODE_FAILED",
            S1Error::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            S1Error::InvalidExpiration { .. } => "INVALID_EXPIRATION",
            S1Error::AccountExpired { .. } => "ACCOUNT_EXPIRED",
            S1Error::UnexpectedAccountState { .. } => "UNEXPECTED_ACCOUNT_STATE",
            S1Error::ReactivationFailed { .. } => "REACTIVATION_FAILED",
            S1Error::RoleNotFound { .. } => "ROLE_NOT_FOUND",
            S1Error::PasswordResetFailed { .. } => "PASSWORD_RESET_FAILED",
        }
    }

    pub(crate) fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        S1Error::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_faults_are_classified_together() {
        let server = S1Error::ServerError {
            method: "GET".to_string(),
            url: "https://x/web/api/v2.1/accounts".to_string(),
            status: 503,
        };
        let refused = S1Error::NotPermitted {
            method: "PUT".to_string(),
            url: "https://x/web/api/v2.1/accounts".to_string(),
            status: 405,
        };

        assert_eq!(server.kind(), ErrorKind::ServerFault);
        assert_eq!(refused.kind(), ErrorKind::ServerFault);
        assert!(server.is_retryable());
        assert!(!refused.is_retryable());
    }

    #[test]
    fn test_state_conflicts_are_not_request_errors() {
        let err = S1Error::AccountExpired {
            name: "Acme".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert!(!err.is_request_error());
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "ACCOUNT_EXPIRED");
    }

    #[test]
    fn test_api_reported_message() {
        let err = S1Error::ApiReported {
            method: "POST".to_string(),
            url: "https://x/web/api/v2.1/users".to_string(),
            count: 2,
        };
        assert!(err.is_request_error());
        assert_eq!(
            err.to_string(),
            "POST https://x/web/api/v2.1/users | server returned 2 API error(s)"
        );
    }

    #[test]
    fn test_invalid_expiration_is_validation() {
        let err = S1Error::InvalidExpiration {
            value: "soon".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("'soon'"));
    }
}
