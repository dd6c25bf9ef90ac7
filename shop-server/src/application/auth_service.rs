use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::{
    error::DomainError,
    user::{Identity, NewUser, User},
};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// Token returned by a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        require("username", username)?;
        require("password", password)?;
        require("email", email)?;

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self
            .repo
            .create(NewUser::new(username.to_string(), email.to_string(), hash))
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        require("username", username)?;
        require("password", password)?;

        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .keys
            .generate_token(&Identity::from(&user))
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        Ok(Session {
            token,
            username: user.username,
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Identity, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::MissingToken);
        }
        self.keys
            .verify_token(token)
            .map_err(|_| DomainError::InvalidToken)
    }
}
