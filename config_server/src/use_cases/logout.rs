use crate::domain::errors::ConfigError;
use crate::domain::ports::SessionStore;

// Response returned by the logout use case.
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<S> {
    pub store: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub async fn execute(&self, session_token: Option<String>) -> Result<LogoutResponse, ConfigError> {
        let Some(token) = session_token else {
            return Ok(LogoutResponse { revoked: false });
        };

        let revoked = self
            .store
            .remove(&token)
            .await
            .map_err(|_| ConfigError::StorageFailure)?;

        Ok(LogoutResponse { revoked })
    }
}
