use async_trait::async_trait;

use crate::domain::entities::{Account, ModulePlan, Session};

// Port for session storage used by config use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<Session>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
    // Drops every session expiring at or before `now`. Returns how many went.
    async fn remove_expired(&self, now: u64) -> Result<usize, String>;
}

// Port for the process-wide module plan.
#[async_trait]
pub trait ModeStore: Send + Sync {
    async fn current_mode(&self) -> Result<ModulePlan, String>;
    // Moves OpenFloor to IncrementalFloor. Returns whether the plan changed.
    async fn enable_incremental_floor(&self) -> Result<bool, String>;
    async fn set_mode(&self, plan: ModulePlan) -> Result<(), String>;
}

// Port for checking operator credentials.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, user_name: &str, password: &str) -> Result<Option<Account>, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
