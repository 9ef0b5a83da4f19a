use serde::{Deserialize, Serialize};

// Role carried by an authenticated session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

// Operator session record stored in memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
    pub user_name: String,
    pub role: Role,
    // CSRF token bound to this session at login.
    pub csrf_token: String,
    pub session_id: String,
    pub expires_at: u64,
}

// Module layout new players are given. CTF mode is the incremental floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulePlan {
    #[default]
    OpenFloor,
    IncrementalFloor,
}

impl ModulePlan {
    pub fn as_str(self) -> &'static str {
        match self {
            ModulePlan::OpenFloor => "open_floor",
            ModulePlan::IncrementalFloor => "incremental_floor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open_floor" => Some(ModulePlan::OpenFloor),
            "incremental_floor" => Some(ModulePlan::IncrementalFloor),
            _ => None,
        }
    }

    pub fn is_ctf_mode(self) -> bool {
        matches!(self, ModulePlan::IncrementalFloor)
    }
}

// Operator account known to the credential verifier.
#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    pub user_id: u64,
    pub user_name: String,
    pub role: Role,
    // Lowercase hex SHA-256 digest of the password.
    pub password_sha256: String,
}
