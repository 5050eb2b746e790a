//! User accounts and bearer token sessions

use crate::credentials::{
    generate_token, hash_password_blocking, hash_token, verify_password_blocking,
};
use mailmaster_common::types::UserRole;
use mailmaster_common::{Error, Result};
use mailmaster_storage::{CreateUser, Store, User};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// Name recorded on every issued token
pub const TOKEN_NAME: &str = "MailMasterAuthToken";

/// Login failure message, shared by unknown email and wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message for missing or unknown bearer tokens
pub const UNAUTHENTICATED: &str = "Unauthenticated.";

/// A user with a freshly issued plaintext token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// New account details, already validated
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Registration, login, logout and token authentication
#[derive(Clone)]
pub struct AccountService {
    store: Store,
}

impl AccountService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a user and issue their first token
    pub async fn register(&self, registration: Registration) -> Result<Session> {
        let password_hash = hash_password_blocking(registration.password).await?;

        let user = self
            .store
            .users
            .create(CreateUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                role: registration.role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        self.issue_token(user).await
    }

    /// Check credentials and issue an additional token
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let user = self.store.users.get_by_email(email).await?;

        // Unknown users still pay for a verification
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => dummy_hash()?.to_string(),
        };
        let verified = verify_password_blocking(password.to_string(), hash).await?;

        match user {
            Some(user) if verified => {
                info!(user_id = %user.id, "User logged in");
                self.issue_token(user).await
            }
            _ => {
                warn!(email = %email, "Login failed");
                Err(Error::Auth(INVALID_CREDENTIALS.to_string()))
            }
        }
    }

    /// Revoke every token of the user
    pub async fn logout(&self, user: &User) -> Result<u64> {
        let revoked = self.store.tokens.delete_for_user(user.id).await?;
        info!(user_id = %user.id, revoked, "User logged out");
        Ok(revoked)
    }

    /// Resolve a plaintext bearer token to its user
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let token_hash = hash_token(token);
        let record = self
            .store
            .tokens
            .find_by_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                debug!("Unknown bearer token");
                Error::Auth(UNAUTHENTICATED.to_string())
            })?;

        let user = self.store.users.get(record.user_id).await?.ok_or_else(|| {
            warn!(token_id = %record.id, "Token refers to a missing user");
            Error::Auth(UNAUTHENTICATED.to_string())
        })?;

        if let Err(e) = self.store.tokens.touch(record.id).await {
            error!("Failed to update token last_used_at: {}", e);
        }

        Ok(user)
    }

    /// Create a user unless the email is already taken; returns whether
    /// a user was created
    pub async fn ensure_user(&self, registration: Registration) -> Result<bool> {
        if self
            .store
            .users
            .get_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let password_hash = hash_password_blocking(registration.password).await?;
        self.store
            .users
            .create(CreateUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                role: registration.role,
            })
            .await?;
        Ok(true)
    }

    async fn issue_token(&self, user: User) -> Result<Session> {
        let token = generate_token();
        self.store
            .tokens
            .create(user.id, TOKEN_NAME, &hash_token(&token))
            .await?;
        debug!(user_id = %user.id, "Token issued");
        Ok(Session { user, token })
    }
}

fn dummy_hash() -> Result<&'static str> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = crate::credentials::hash_password("mailmaster-dummy-password")?;
    Ok(DUMMY.get_or_init(|| hash))
}
