use crate::domain::entities::ModulePlan;
use crate::domain::errors::ConfigError;
use crate::domain::ports::{Clock, ModeStore, SessionStore};
use crate::use_cases::session::require_admin;

// Reads the module plan on behalf of an admin session.
pub struct CurrentModeUseCase<C, S, M> {
    pub clock: C,
    pub sessions: S,
    pub modes: M,
}

impl<C, S, M> CurrentModeUseCase<C, S, M>
where
    C: Clock,
    S: SessionStore,
    M: ModeStore,
{
    pub async fn execute(&self, session_token: Option<String>) -> Result<ModulePlan, ConfigError> {
        require_admin(&self.clock, &self.sessions, session_token.as_deref()).await?;

        self.modes
            .current_mode()
            .await
            .map_err(|_| ConfigError::StorageFailure)
    }
}
