use thiserror::Error;

// Domain-level errors for configuration workflows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no valid session")]
    NotAuthenticated,
    #[error("session expired")]
    SessionExpired,
    #[error("admin role required")]
    NotAdmin,
    #[error("csrf token mismatch")]
    CsrfMismatch,
    #[error("invalid login name")]
    InvalidLoginName,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("storage failure")]
    StorageFailure,
}
