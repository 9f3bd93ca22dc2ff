//! Staff credential codec.
//!
//! Credentials are HS256 JWTs over [`StaffClaims`]. Expiry is checked
//! against the caller's clock instead of the system time so the 12 hour
//! horizon can be driven from tests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};

use backend_domain::{StaffClaims, SESSION_TTL_HOURS, STAFF_ROLE};

use crate::error::{AppError, INVALID_TOKEN, TOKEN_SIGNING_FAILED};

pub fn issue_token(
    secret: &str,
    username: &str,
    now: DateTime<Utc>,
) -> Result<(String, StaffClaims), AppError> {
    let claims = StaffClaims {
        role: STAFF_ROLE.to_string(),
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(signing_failed)?;
    Ok((token, claims))
}

fn signing_failed(err: jsonwebtoken::errors::Error) -> AppError {
    error!("token signing failed: {}", err);
    AppError::internal(TOKEN_SIGNING_FAILED)
}

pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Result<StaffClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        debug!("credential rejected: {}", err);
        AppError::Unauthorized(INVALID_TOKEN)
    })?;

    let claims = data.claims;
    if claims.exp <= now.timestamp() {
        debug!(username = %claims.username, "credential expired");
        return Err(AppError::Unauthorized(INVALID_TOKEN));
    }
    if claims.role != STAFF_ROLE {
        return Err(AppError::Unauthorized(INVALID_TOKEN));
    }
    Ok(claims)
}
