use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    error::{Result, ServiceError},
    models::AuthUser,
};

use super::IdentityProvider;

pub const MIN_PASSWORD_LEN: usize = 8;

struct Account {
    user: AuthUser,
    salt: String,
    password_digest: Vec<u8>,
}

/// Identity provider keeping accounts and the session in memory.
#[derive(Default)]
pub struct InMemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<AuthUser>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `user` already signed in.
    pub fn signed_in(user: AuthUser) -> Self {
        let identity = Self::default();
        *identity.session.write() = Some(user);
        identity
    }
}

fn digest(salt: &str, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ServiceError::Auth(format!("invalid email address: {}", email))),
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn current_user(&self) -> Option<AuthUser> {
        self.session.read().clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = normalize_email(email)?;
        let user = {
            let accounts = self.accounts.read();
            let account = accounts
                .get(&email)
                .ok_or_else(|| ServiceError::Auth("invalid email or password".into()))?;
            if digest(&account.salt, password) != account.password_digest {
                return Err(ServiceError::Auth("invalid email or password".into()));
            }
            account.user.clone()
        };

        log::info!("Signed in user {}", user.id);
        *self.session.write() = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Auth(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(&email) {
                return Err(ServiceError::Auth("an account with this email already exists".into()));
            }
            let user = AuthUser {
                id: format!("user_{}", Uuid::new_v4().simple()),
                email: email.clone(),
                first_name: None,
                last_name: None,
            };
            let salt = Uuid::new_v4().to_string();
            let password_digest = digest(&salt, password);
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    salt,
                    password_digest,
                },
            );
            user
        };

        log::info!("Created account {}", user.id);
        *self.session.write() = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.session.write().take();
        Ok(())
    }
}
