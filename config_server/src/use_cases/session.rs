use crate::domain::entities::Session;
use crate::domain::errors::ConfigError;
use crate::domain::ports::{Clock, SessionStore};

// Resolve a session token into a live session, dropping it if expired.
pub async fn resolve_session<C, S>(
    clock: &C,
    store: &S,
    token: Option<&str>,
) -> Result<Session, ConfigError>
where
    C: Clock,
    S: SessionStore,
{
    let token = token.ok_or(ConfigError::NotAuthenticated)?;

    let session = store
        .get(token)
        .await
        .map_err(|_| ConfigError::StorageFailure)?
        .ok_or(ConfigError::NotAuthenticated)?;

    if session.expires_at <= clock.now_epoch_seconds() {
        // Best-effort cleanup of expired session.
        if let Err(err) = store.remove(token).await {
            tracing::warn!(error = %err, "failed to remove expired session");
        }
        return Err(ConfigError::SessionExpired);
    }

    Ok(session)
}

// Resolve a session and require the admin role.
pub async fn require_admin<C, S>(
    clock: &C,
    store: &S,
    token: Option<&str>,
) -> Result<Session, ConfigError>
where
    C: Clock,
    S: SessionStore,
{
    let session = resolve_session(clock, store, token).await?;
    if !session.role.is_admin() {
        return Err(ConfigError::NotAdmin);
    }
    Ok(session)
}

// Byte comparison that does not short-circuit on the first difference.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
