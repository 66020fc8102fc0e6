use crate::domain::auth::{AuthSession, AuthUser};
use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Resolve the current session.
    async fn auth(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>>;

    /// Resolve the current user's profile.
    async fn current_user(&self) -> Result<AuthUser, Box<dyn Error + Send + Sync>>;
}
