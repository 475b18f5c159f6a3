use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Length of generated provisional passwords.
pub const PROVISIONAL_PASSWORD_LEN: usize = 22;

/// Claims of a password-reset token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetClaims {
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub exp: i64,
    pub iat: i64,
}

impl ResetClaims {
    pub fn new(id: String, email: String, nombre: String, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            nombre,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_reset_token(security: &SecurityConfig, claims: &ResetClaims) -> Result<String, JwtError> {
    if security.reset_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.reset_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Check signature and expiry of a reset token.
pub fn verify_reset_token(security: &SecurityConfig, token: &str) -> Result<ResetClaims, JwtError> {
    if security.reset_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.reset_secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<ResetClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

/// Random alphanumeric password handed out on sign-up and reset.
pub fn provisional_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PROVISIONAL_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig {
            reset_secret: "test-secret".to_string(),
            reset_token_ttl_secs: 3600,
        }
    }

    fn claims(ttl: i64) -> ResetClaims {
        ResetClaims::new("u1".to_string(), "ana@estudio.ec".to_string(), "Ana".to_string(), ttl)
    }

    #[test]
    fn reset_token_round_trip() {
        let token = generate_reset_token(&security(), &claims(3600)).unwrap();
        let decoded = verify_reset_token(&security(), &token).unwrap();
        assert_eq!(decoded.email, "ana@estudio.ec");
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_reset_token(&security(), &claims(-120)).unwrap();
        assert!(matches!(
            verify_reset_token(&security(), &token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = generate_reset_token(&security(), &claims(3600)).unwrap();
        let other = SecurityConfig {
            reset_secret: "another".to_string(),
            ..security()
        };
        assert!(verify_reset_token(&other, &token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let empty = SecurityConfig {
            reset_secret: String::new(),
            ..security()
        };
        assert!(matches!(
            generate_reset_token(&empty, &claims(3600)),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[test]
    fn provisional_password_shape() {
        let password = provisional_password();
        assert_eq!(password.len(), PROVISIONAL_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(password, provisional_password());
    }
}
