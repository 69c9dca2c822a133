pub mod memory;

use async_trait::async_trait;

use crate::{error::Result, models::AuthUser};

pub use memory::InMemoryIdentity;

/// Session state of the identity provider the app signs users in with.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        self.current_user().map(|u| u.id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    async fn sign_out(&self) -> Result<()>;
}
