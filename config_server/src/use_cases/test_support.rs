use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{Account, ModulePlan, Role, Session};
use crate::domain::ports::{Clock, CredentialVerifier, ModeStore, SessionStore};

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, Session>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Session that stays valid for an hour after the usual fixed test time.
pub(crate) fn test_session(role: Role, csrf_token: &str) -> Session {
    Session {
        user_id: 7,
        user_name: "Tester".to_string(),
        role,
        csrf_token: csrf_token.to_string(),
        session_id: "test-session".to_string(),
        expires_at: 1_700_003_600,
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
    pub sweep: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token.into(), session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }

    async fn remove_expired(&self, now: u64) -> Result<usize, String> {
        if self.failures.sweep {
            return Err("sweep failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        let before = guard.len();
        guard.retain(|_, session| session.expires_at > now);
        Ok(before - guard.len())
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct ModeFailureFlags {
    pub current: bool,
    pub enable: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingModeStore {
    plan: Arc<Mutex<ModulePlan>>,
    enable_calls: Arc<AtomicUsize>,
    failures: ModeFailureFlags,
}

impl RecordingModeStore {
    pub(crate) fn new(plan: ModulePlan) -> Self {
        Self {
            plan: Arc::new(Mutex::new(plan)),
            enable_calls: Arc::new(AtomicUsize::new(0)),
            failures: ModeFailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: ModeFailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn plan(&self) -> ModulePlan {
        *self.plan.lock().expect("plan mutex poisoned")
    }

    pub(crate) fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModeStore for RecordingModeStore {
    async fn current_mode(&self) -> Result<ModulePlan, String> {
        if self.failures.current {
            return Err("current failed".to_string());
        }
        Ok(self.plan())
    }

    async fn enable_incremental_floor(&self) -> Result<bool, String> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.enable {
            return Err("enable failed".to_string());
        }

        let mut guard = self.plan.lock().expect("plan mutex poisoned");
        let changed = *guard == ModulePlan::OpenFloor;
        *guard = ModulePlan::IncrementalFloor;
        Ok(changed)
    }

    async fn set_mode(&self, plan: ModulePlan) -> Result<(), String> {
        *self.plan.lock().expect("plan mutex poisoned") = plan;
        Ok(())
    }
}

// Verifier that accepts "<name>" as the password for every known account.
#[derive(Clone)]
pub(crate) struct FakeVerifier {
    accounts: Vec<Account>,
    pub(crate) should_fail: bool,
}

impl FakeVerifier {
    pub(crate) fn with_accounts(accounts: &[(u64, &str, Role)]) -> Self {
        Self {
            accounts: accounts
                .iter()
                .map(|(user_id, user_name, role)| Account {
                    user_id: *user_id,
                    user_name: user_name.to_string(),
                    role: *role,
                    password_sha256: String::new(),
                })
                .collect(),
            should_fail: false,
        }
    }
}

#[async_trait]
impl CredentialVerifier for FakeVerifier {
    async fn verify(&self, user_name: &str, password: &str) -> Result<Option<Account>, String> {
        if self.should_fail {
            return Err("verify failed".to_string());
        }
        Ok(self
            .accounts
            .iter()
            .find(|account| account.user_name == user_name && password == user_name)
            .cloned())
    }
}
