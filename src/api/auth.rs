//! Sign-in and sign-up exchanges.

use tracing::{info, instrument};

use crate::api::client::ApiClient;
use crate::api::error::ServiceError;
use crate::api::schema::{AuthResponse, LoginRequest, RegisterRequest};
use crate::auth::AuthContext;

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Exchanges credentials for an [`AuthContext`].
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Creates an auth client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Signs in with email and password.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, ServiceError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.api.post_json(LOGIN_PATH, &body, None).await?;
        info!(username = %response.user.username, "Signed in");
        Ok(AuthContext::new(response.token, response.user.username))
    }

    /// Creates an account and signs in as it.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthContext, ServiceError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.api.post_json(REGISTER_PATH, &body, None).await?;
        info!(username = %response.user.username, "Account created");
        Ok(AuthContext::new(response.token, response.user.username))
    }
}
