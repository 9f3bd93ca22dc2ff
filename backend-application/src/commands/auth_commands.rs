use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::error::{BAD_CREDENTIALS, MISSING_TOKEN};
use crate::session::{issue_token, verify_token};
use crate::{AppError, AppState};
use backend_domain::{LoginRequest, LoginResponse, StaffClaims};

/// Exchanges the single configured staff account's username and password
/// for a signed 12 hour credential.
pub fn login(state: &AppState, payload: LoginRequest) -> Result<LoginResponse, AppError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if !credentials_match(
        &state.config.admin_username,
        &state.config.admin_password,
        &username,
        &password,
    ) {
        warn!(username = %username, "staff login rejected");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    }

    let (token, claims) = issue_token(&state.config.jwt_secret, &username, state.clock.now())?;
    info!(username = %claims.username, exp = claims.exp, "staff login");
    Ok(LoginResponse { token })
}

/// Checks a bearer credential. `None` means the request carried no token.
pub fn authenticate(state: &AppState, token: Option<&str>) -> Result<StaffClaims, AppError> {
    let token = token.ok_or(AppError::Unauthorized(MISSING_TOKEN))?;
    verify_token(&state.config.jwt_secret, token, state.clock.now())
}

fn credentials_match(
    expected_user: &str,
    expected_pass: &str,
    username: &str,
    password: &str,
) -> bool {
    if expected_user.is_empty() || expected_pass.is_empty() {
        return false;
    }
    let user_ok = username.as_bytes().ct_eq(expected_user.as_bytes());
    let pass_ok = password.as_bytes().ct_eq(expected_pass.as_bytes());
    (user_ok & pass_ok).into()
}
