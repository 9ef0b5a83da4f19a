use crate::domain::entities::ModulePlan;
use crate::domain::errors::ConfigError;
use crate::domain::ports::{Clock, ModeStore, SessionStore};
use crate::use_cases::session::{constant_time_eq, require_admin};

// Response returned by the set CTF mode use case.
pub struct SetCtfModeResponse {
    pub user_name: String,
    pub mode: ModulePlan,
    // False when the plan was already incremental.
    pub changed: bool,
}

// Enables CTF mode for admins presenting the session's CSRF token.
pub struct SetCtfModeUseCase<C, S, M> {
    pub clock: C,
    pub sessions: S,
    pub modes: M,
}

impl<C, S, M> SetCtfModeUseCase<C, S, M>
where
    C: Clock,
    S: SessionStore,
    M: ModeStore,
{
    pub async fn execute(
        &self,
        session_token: Option<String>,
        csrf_token: String,
    ) -> Result<SetCtfModeResponse, ConfigError> {
        // Role check precedes the CSRF check.
        let session = require_admin(&self.clock, &self.sessions, session_token.as_deref()).await?;

        if csrf_token.is_empty()
            || !constant_time_eq(session.csrf_token.as_bytes(), csrf_token.as_bytes())
        {
            return Err(ConfigError::CsrfMismatch);
        }

        let changed = self
            .modes
            .enable_incremental_floor()
            .await
            .map_err(|_| ConfigError::StorageFailure)?;

        Ok(SetCtfModeResponse {
            user_name: session.user_name,
            mode: ModulePlan::IncrementalFloor,
            changed,
        })
    }
}
