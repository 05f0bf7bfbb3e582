//! Signed-in identity passed explicitly to every authenticated client.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Bearer token and display name of the signed-in player.
///
/// Clients receive this value at construction time; nothing reads tokens
/// from ambient storage while building requests.
#[derive(Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct AuthContext {
    token: String,
    username: String,
}

impl AuthContext {
    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}
