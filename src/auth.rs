//! Session gate.
//!
//! Access to projects and tasks is gated on the presence of a stored session
//! token, the same way a route guard would check it. The gate never talks to
//! the stores.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::cache::KeyValueStore;
use crate::error::StoreError;

/// Storage key of the session token.
pub const TOKEN_KEY: &str = "authToken";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Login form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email must look like `local@domain`; password needs 6+ characters.
    pub fn validate(&self) -> Result<(), AuthError> {
        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid_email {
            return Err(AuthError::InvalidCredentials(format!(
                "`{email}` is not a valid email address"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidCredentials(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Stores and checks the session token.
#[derive(Clone)]
pub struct AuthGate {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Validate credentials and store a fresh session token.
    pub fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        credentials.validate()?;
        let token = Uuid::new_v4().simple().to_string();
        self.backend.set(TOKEN_KEY, &token)?;
        info!(email = %credentials.email.trim(), "signed in");
        Ok(token)
    }

    /// Drop the session token. Returns true if one was stored.
    pub fn logout(&self) -> Result<bool, AuthError> {
        Ok(self.backend.remove(TOKEN_KEY)?)
    }

    pub fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self
            .backend
            .get(TOKEN_KEY)?
            .is_some_and(|token| !token.is_empty()))
    }

    /// Fails with `NotAuthenticated` unless a token is stored.
    pub fn require(&self) -> Result<(), AuthError> {
        if self.is_authenticated()? {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}
