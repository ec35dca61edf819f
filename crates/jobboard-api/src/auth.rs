//! Session token authentication.
//!
//! Logins are issued an HS256 JWT whose only claim of interest is the user
//! id, carried in an HTTP-only, SameSite=Strict cookie. The extractor
//! rejects with 401 before a handler runs; handlers then re-resolve the id
//! against the store and answer 404 if the account has vanished.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jobboard_models::ObjectId;

use crate::error::ApiError;
use crate::state::AppState;

/// Session cookie name.
pub const TOKEN_COOKIE: &str = "token";

/// Session lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID (hex ObjectId)
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Issue a signed session token for a user.
pub fn issue_token(user_id: &ObjectId, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = SessionClaims {
        user_id: user_id.to_hex(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign session token: {}", e)))
}

/// Verify a session token and return its claims. Expired and tampered
/// tokens are both rejected.
pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::unauthorized("Invalid token"))
}

/// Build the session cookie set on login.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(TOKEN_TTL_HOURS))
        .build()
}

/// Build the expired cookie set on logout: empty value, zero max-age.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Authenticated caller extracted from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))?;

        let claims = verify_token(&token, &state.config.jwt_secret)?;

        let user_id = ObjectId::parse_str(&claims.user_id)
            .map_err(|_| ApiError::unauthorized("Invalid token"))?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let user_id = ObjectId::new();
        let token = issue_token(&user_id, "test-secret").unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, user_id.to_hex());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = issue_token(&ObjectId::new(), "secret-a").unwrap();
        assert!(verify_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = SessionClaims {
            user_id: ObjectId::new().to_hex(),
            iat: (now - Duration::hours(48)).timestamp(),
            exp: (now - Duration::hours(24)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(verify_token(&token, "test-secret").is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));

        let cleared = clear_session_cookie();
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    }
}
