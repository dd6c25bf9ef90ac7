use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::domain::user::Identity;

/// Lifetime of a session token.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl: Duration::seconds(TOKEN_TTL_SECONDS),
        }
    }

    pub fn generate_token(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate_token_at(identity, Utc::now())
    }

    pub fn generate_token_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Checks signature and expiry; the identity comes from the claims alone.
    /// Expiry is exact: no clock leeway past `exp`.
    pub fn verify_token(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(Identity {
            id: data.claims.id,
            username: data.claims.username,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            id: 42,
            username: "alice".into(),
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let keys = JwtKeys::new("secret".into());
        let token = keys.generate_token(&alice()).unwrap();
        assert_eq!(keys.verify_token(&token).unwrap(), alice());
    }

    #[test]
    fn token_is_valid_just_before_the_hour_ends() {
        let keys = JwtKeys::new("secret".into());
        let issued = Utc::now() - Duration::minutes(59);
        let token = keys.generate_token_at(&alice(), issued).unwrap();
        assert!(keys.verify_token(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("secret".into());
        let issued = Utc::now() - Duration::hours(2);
        let token = keys.generate_token_at(&alice(), issued).unwrap();
        assert!(keys.verify_token(&token).is_err());
    }

    #[test]
    fn token_is_rejected_seconds_after_expiry() {
        let keys = JwtKeys::new("secret".into());
        let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS + 5);
        let token = keys.generate_token_at(&alice(), issued).unwrap();
        assert!(keys.verify_token(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::new("one".into()).generate_token(&alice()).unwrap();
        assert!(JwtKeys::new("two".into()).verify_token(&token).is_err());
        assert!(JwtKeys::new("one".into()).verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("hunter22", &first).unwrap());
        assert!(!verify_password("hunter23", &first).unwrap());
    }
}
