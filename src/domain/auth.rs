use serde::{Deserialize, Serialize};

/// User identity as reported by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    /// Provider-side user id
    pub provider_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
    #[serde(default)]
    pub created_at: u64,
}

/// Authenticated session as resolved on the server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub session_id: String,
    pub token: String,
}

/// The fixed identity every auth call resolves to in local dev mode.
pub fn dev_user() -> AuthUser {
    AuthUser {
        id: String::from("local-dev-user-id"),
        provider_id: String::from("local_dev_user"),
        name: String::from("Dev User"),
        username: String::from("devuser"),
        email: String::from("dev@localhost"),
        image_url: String::from("https://api.dicebear.com/7.x/avataaars/svg?seed=devuser"),
        created_at: super::video::now_ms(),
    }
}
