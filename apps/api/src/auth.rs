//! JWT authentication module.
//!
//! Issues and validates staff access tokens, and hashes staff passwords.
//!
//! ## Token Lifecycle
//! ```text
//! register / login ──► JwtManager::issue ──► "eyJ..." (10 minutes)
//!                                               │
//!   Authorization: Bearer eyJ... ──► AuthenticatedStaff extractor
//!                                               │
//!                         validate ──► Claims  or  401 "Unauthorized"
//!                                                   401 "Token expired"
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use till_core::Staff;

/// Access tokens expire ten minutes after issue.
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 600;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff id)
    pub sub: String,

    /// Staff display name
    pub name: String,

    pub phone_number: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        // Expiry is exact: no clock-skew allowance past `exp`.
        let mut validation = Validation::default();
        validation.leeway = 0;

        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime_secs,
        }
    }

    /// Issue an access token for a staff member.
    pub fn issue(&self, staff: &Staff) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: staff.id.clone(),
            name: staff.name.clone(),
            phone_number: staff.phone_number.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::internal()
        })
    }

    /// Validate and decode a token.
    ///
    /// Expired tokens are reported separately so clients know to log in
    /// again rather than suspect a bad credential.
    pub fn validate(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => ApiError::unauthorized("Token expired"),
                _ => ApiError::unauthorized("Unauthorized"),
            })
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a password with Argon2id and a random salt.
///
/// CPU-bound, so it runs on the blocking pool.
pub async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || {
        use argon2::{
            password_hash::{rand_core::OsRng, SaltString},
            Argon2, PasswordHasher,
        };

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                ApiError::internal()
            })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password hashing task failed");
        ApiError::internal()
    })?
}

/// Checks a password against a stored PHC string. Malformed hashes never
/// verify.
pub async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || {
        use argon2::{Argon2, PasswordHash, PasswordVerifier};

        match PasswordHash::new(&hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password verification task failed");
        ApiError::internal()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Staff {
        Staff {
            id: "staff-001".to_string(),
            phone_number: "+628123456789".to_string(),
            name: "Siti Aminah".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", ACCESS_TOKEN_LIFETIME_SECS);
        let token = manager.issue(&staff()).unwrap();

        let claims = manager.validate(&token).unwrap();
        assert_eq!(claims.sub, "staff-001");
        assert_eq!(claims.name, "Siti Aminah");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_expired_token() {
        let manager = JwtManager::new("test-secret", -120);
        let token = manager.issue(&staff()).unwrap();

        let err = manager.validate(&token).unwrap_err();
        assert_eq!(err.message, "Token expired");
    }

    #[test]
    fn test_token_just_past_expiry_is_rejected() {
        let manager = JwtManager::new("test-secret", -2);
        let token = manager.issue(&staff()).unwrap();

        assert_eq!(manager.validate(&token).unwrap_err().message, "Token expired");
    }

    #[test]
    fn test_wrong_secret_and_garbage() {
        let issuer = JwtManager::new("secret-a", 600);
        let verifier = JwtManager::new("secret-b", 600);
        let token = issuer.issue(&staff()).unwrap();

        assert_eq!(verifier.validate(&token).unwrap_err().message, "Unauthorized");
        assert_eq!(verifier.validate("not.a.jwt").unwrap_err().message, "Unauthorized");
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let hash = hash_password("rahasia1".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("rahasia1".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
        assert!(!verify_password("x".to_string(), "garbage".to_string()).await.unwrap());
    }
}
