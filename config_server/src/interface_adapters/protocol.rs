use serde::{Deserialize, Serialize};

use crate::domain::entities::ModulePlan;

// Form payload for operator login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login: String,
    pub pwd: String,
}

// Form payload for enabling CTF mode.
#[derive(Debug, Deserialize)]
pub struct SetCtfModeForm {
    // A missing field is treated like a mismatched token.
    #[serde(rename = "csrfToken", default)]
    pub csrf_token: String,
}

// Response payload for the module plan query.
#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: ModulePlan,
    pub ctf_mode: bool,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
