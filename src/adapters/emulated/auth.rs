//! Auth emulator: every call resolves to one fixed development identity.

use crate::domain::auth::{dev_user, AuthSession, AuthUser};
use crate::ports::auth::AuthPort;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Once;

static INIT_LOG: Once = Once::new();

/// Static auth provider for local development.
#[derive(Debug, Clone, Copy)]
pub struct DevAuth;

impl DevAuth {
    pub fn new() -> Self {
        INIT_LOG.call_once(|| {
            println!("[DevAuth] static identity active (user: devuser)");
        });
        Self
    }
}

impl Default for DevAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthPort for DevAuth {
    async fn auth(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>> {
        let user = dev_user();
        Ok(AuthSession {
            user_id: user.provider_id,
            session_id: String::from("local-session-id"),
            token: String::from("local-token"),
        })
    }

    async fn current_user(&self) -> Result<AuthUser, Box<dyn Error + Send + Sync>> {
        Ok(dev_user())
    }
}
