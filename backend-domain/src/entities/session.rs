// Staff session entity

use serde::{Deserialize, Serialize};

pub const STAFF_ROLE: &str = "staff";
pub const SESSION_TTL_HOURS: i64 = 12;

/// Claims carried by a staff credential. `iat` and `exp` are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffClaims {
    pub role: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub ok: bool,
    pub user: StaffClaims,
}
