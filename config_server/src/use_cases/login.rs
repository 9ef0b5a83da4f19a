use uuid::Uuid;

use crate::domain::entities::{Role, Session};
use crate::domain::errors::ConfigError;
use crate::domain::ports::{Clock, CredentialVerifier, SessionStore};
use crate::interface_adapters::protocol::LoginForm;

// Response returned by the login use case.
pub struct LoginResponse {
    pub session_token: String,
    pub csrf_token: String,
    pub expires_at: u64,
    pub user_name: String,
    pub role: Role,
}

// Operator login use case with injected dependencies.
pub struct LoginUseCase<C, S, V> {
    pub clock: C,
    pub store: S,
    pub verifier: V,
    pub ttl_seconds: u64,
}

impl<C, S, V> LoginUseCase<C, S, V>
where
    C: Clock,
    S: SessionStore,
    V: CredentialVerifier,
{
    pub async fn execute(&self, form: LoginForm) -> Result<LoginResponse, ConfigError> {
        let user_name = validate_login_name(&form.login)?;

        let account = self
            .verifier
            .verify(&user_name, &form.pwd)
            .await
            .map_err(|_| ConfigError::StorageFailure)?
            .ok_or(ConfigError::InvalidCredentials)?;

        let now = self.clock.now_epoch_seconds();
        match self.store.remove_expired(now).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "swept expired sessions"),
            Err(err) => tracing::warn!(error = %err, "failed to sweep expired sessions"),
        }

        // Session and CSRF tokens are minted independently.
        let session_token = Uuid::new_v4().to_string();
        let csrf_token = Uuid::new_v4().to_string();
        let expires_at = now + self.ttl_seconds;

        let session = Session {
            user_id: account.user_id,
            user_name: account.user_name.clone(),
            role: account.role,
            csrf_token: csrf_token.clone(),
            session_id: Uuid::new_v4().to_string(),
            expires_at,
        };

        self.store
            .insert(session_token.clone(), session)
            .await
            .map_err(|_| ConfigError::StorageFailure)?;

        Ok(LoginResponse {
            session_token,
            csrf_token,
            expires_at,
            user_name: account.user_name,
            role: account.role,
        })
    }
}

fn validate_login_name(value: &str) -> Result<String, ConfigError> {
    const MIN_LEN: usize = 1;
    const MAX_LEN: usize = 32;

    let len = value.chars().count();

    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(ConfigError::InvalidLoginName);
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ConfigError::InvalidLoginName);
    }

    Ok(value.to_string())
}
