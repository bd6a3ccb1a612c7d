//! Password hashing and session token issuance.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("malformed session token subject")]
    BadSubject,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 session tokens and salted password hashes.
#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl AuthService {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_hours,
        }
    }

    /// Stored form is `base64(salt)$base64(sha256(salt || password))`.
    pub fn hash_password(password: &str) -> String {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, password);
        format!("{}${}", BASE64.encode(salt), BASE64.encode(digest))
    }

    pub fn verify_password(password: &str, stored: &str) -> bool {
        let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(digest_b64)) else {
            return false;
        };
        let actual = Self::digest(&salt, password);
        // Fixed-shape comparison over the digests.
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    fn digest(salt: &[u8], password: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Returns the user id the token was issued for.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::BadSubject)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_hours * 3600
    }
}
