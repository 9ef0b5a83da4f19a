use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::{Account, ModulePlan, Session};
use crate::domain::ports::{Clock, CredentialVerifier, ModeStore, SessionStore};
use crate::use_cases::session::constant_time_eq;

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    // Module plan store, in memory or PostgreSQL-backed.
    pub modes: Arc<dyn ModeStore>,
    pub accounts: Arc<Vec<Account>>,
    pub session_ttl_seconds: u64,
}

impl AppState {
    pub fn new(modes: Arc<dyn ModeStore>, accounts: Vec<Account>, session_ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            modes,
            accounts: Arc::new(accounts),
            session_ttl_seconds,
        }
    }
}

// In-memory session store adapter.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }

    async fn remove_expired(&self, now: u64) -> Result<usize, String> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        Ok(before - sessions.len())
    }
}

// Process-local module plan. The lock is held across read-compare-write.
#[derive(Clone)]
pub struct InMemoryModeStore {
    plan: Arc<Mutex<ModulePlan>>,
}

impl InMemoryModeStore {
    pub fn new(plan: ModulePlan) -> Self {
        Self {
            plan: Arc::new(Mutex::new(plan)),
        }
    }
}

#[async_trait]
impl ModeStore for InMemoryModeStore {
    async fn current_mode(&self) -> Result<ModulePlan, String> {
        Ok(*self.plan.lock().await)
    }

    async fn enable_incremental_floor(&self) -> Result<bool, String> {
        let mut plan = self.plan.lock().await;
        let changed = *plan == ModulePlan::OpenFloor;
        *plan = ModulePlan::IncrementalFloor;
        Ok(changed)
    }

    async fn set_mode(&self, plan: ModulePlan) -> Result<(), String> {
        *self.plan.lock().await = plan;
        Ok(())
    }
}

// PostgreSQL-backed module plan, a single row in `module_plan`.
#[derive(Clone)]
pub struct PostgresModeStore {
    pub db: PgPool,
}

#[async_trait]
impl ModeStore for PostgresModeStore {
    async fn current_mode(&self) -> Result<ModulePlan, String> {
        let plan = sqlx::query_scalar::<_, String>("SELECT plan FROM module_plan WHERE id = 1")
            .fetch_optional(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        let plan = plan.ok_or_else(|| "module_plan row missing".to_string())?;
        ModulePlan::parse(&plan).ok_or_else(|| format!("unknown module plan {plan}"))
    }

    async fn enable_incremental_floor(&self) -> Result<bool, String> {
        // Conditional update keeps concurrent enables from racing.
        let result = sqlx::query(
            r#"
            UPDATE module_plan
            SET plan = $1, updated_at = NOW()
            WHERE id = 1 AND plan = $2
            "#,
        )
        .bind(ModulePlan::IncrementalFloor.as_str())
        .bind(ModulePlan::OpenFloor.as_str())
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        match self.current_mode().await? {
            ModulePlan::IncrementalFloor => Ok(false),
            ModulePlan::OpenFloor => Err("module plan update had no effect".to_string()),
        }
    }

    async fn set_mode(&self, plan: ModulePlan) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO module_plan (id, plan)
            VALUES (1, $1)
            ON CONFLICT (id) DO UPDATE SET
                plan = EXCLUDED.plan,
                updated_at = NOW()
            "#,
        )
        .bind(plan.as_str())
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }
}

// Lets handlers hand the shared trait object to generic use cases.
#[async_trait]
impl ModeStore for Arc<dyn ModeStore> {
    async fn current_mode(&self) -> Result<ModulePlan, String> {
        (**self).current_mode().await
    }

    async fn enable_incremental_floor(&self) -> Result<bool, String> {
        (**self).enable_incremental_floor().await
    }

    async fn set_mode(&self, plan: ModulePlan) -> Result<(), String> {
        (**self).set_mode(plan).await
    }
}

// Credential verifier over the configured operator accounts.
#[derive(Clone)]
pub struct ConfiguredAccounts {
    pub accounts: Arc<Vec<Account>>,
}

#[async_trait]
impl CredentialVerifier for ConfiguredAccounts {
    async fn verify(&self, user_name: &str, password: &str) -> Result<Option<Account>, String> {
        let Some(account) = self
            .accounts
            .iter()
            .find(|account| account.user_name == user_name)
        else {
            return Ok(None);
        };

        let digest = password_digest(password);
        let expected = account.password_sha256.trim().to_ascii_lowercase();
        if constant_time_eq(expected.as_bytes(), digest.as_bytes()) {
            Ok(Some(account.clone()))
        } else {
            Ok(None)
        }
    }
}

// Lowercase hex SHA-256 of a password, the format stored in account config.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

// System clock adapter used by config use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
