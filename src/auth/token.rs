use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// Holds the signing keys derived once from the configured secret; nothing is
/// read from the environment after construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Generates a JWT for a given user ID, expiring after the configured lifetime.
    ///
    /// # Returns
    /// The encoded token, or `AppError::Internal` if encoding fails.
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("Token expiry overflows".into()))?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a JWT string and decodes its claims.
    ///
    /// Signature and expiration are checked (`Validation::default()`, HS256).
    ///
    /// # Returns
    /// The decoded `Claims`, or `AppError::InvalidCredential` if the token is malformed,
    /// its signature is invalid, or it has expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(24))
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service("test_secret_for_gen_verify");
        let user_id = Uuid::new_v4();
        let token = tokens.generate_token(user_id).unwrap();
        let claims = tokens.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_expiration() {
        let secret = "test_secret_for_expiration";
        let two_hours_ago = Utc::now()
            .checked_sub_signed(Duration::hours(2))
            .expect("valid timestamp");

        let claims_expired = Claims {
            sub: Uuid::new_v4(),
            iat: (two_hours_ago - Duration::hours(1)).timestamp() as usize,
            exp: two_hours_ago.timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        match service(secret).verify_token(&expired_token) {
            Err(AppError::InvalidCredential(msg)) => {
                assert!(msg.contains("ExpiredSignature"), "{}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = service("one_secret").generate_token(Uuid::new_v4()).unwrap();

        match service("a_completely_different_secret").verify_token(&token) {
            Err(AppError::InvalidCredential(msg)) => {
                assert!(msg.contains("InvalidSignature"), "{}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            service("secret").verify_token("not-a-jwt"),
            Err(AppError::InvalidCredential(_))
        ));
    }
}
