//! Session lifecycle operations for the Shortly API
//!
//! Login is the only operation that mints a credential pair; everything
//! after that rides on the client's transparent refresh. The service writes
//! the pair into the client's credential store so subsequent calls pick it
//! up, same as the web app dropping its two cookies.

use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use shortly_protocol::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    UserProfile, VerifyEmailRequest,
};

use crate::client::ApiClient;
use crate::error::Result;
use crate::guard;
use crate::store::CredentialPair;

/// Snapshot of the session shown by `shortly status`
#[derive(Debug)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
    /// Why the profile could not be fetched, when it could not
    pub server_message: Option<String>,
}

/// Authentication service
#[derive(Debug)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Sign in with email and password and persist the issued pair
    pub async fn login(&self, email: String, password: String) -> Result<LoginResponse> {
        let request = LoginRequest {
            email,
            password,
            remember_me: true,
        };
        request.validate()?;

        // While the login call is in flight we are, for 401 purposes, on the
        // login page: a rejection must surface, not spin the refresh flow.
        self.client.set_current_route(guard::LOGIN_ROUTE);
        let outcome = self
            .client
            .post::<LoginRequest, LoginResponse>("/auth/login", &request)
            .await;
        self.client.clear_current_route();

        let response = outcome?;
        self.client.store().write(CredentialPair::new(
            response.access_token.clone(),
            response.refresh_token.clone(),
        ))?;
        debug!(user = %response.user.email, "signed in");

        Ok(response)
    }

    /// Create an account; the backend sends a verification email
    pub async fn register(&self, request: RegisterRequest) -> Result<()> {
        request.validate()?;
        let _: serde_json::Value = self.client.post("/auth/register", &request).await?;
        Ok(())
    }

    /// Ask for a password reset email
    pub async fn forgot_password(&self, email: String) -> Result<()> {
        let request = ForgotPasswordRequest { email };
        request.validate()?;
        let _: serde_json::Value = self.client.post("/auth/forgot-password", &request).await?;
        Ok(())
    }

    /// Complete a password reset with the emailed token
    pub async fn reset_password(&self, token: String, password: String) -> Result<()> {
        let request = ResetPasswordRequest { token, password };
        request.validate()?;
        let _: serde_json::Value = self.client.post("/auth/reset-password", &request).await?;
        Ok(())
    }

    /// Confirm an email address with the emailed token
    pub async fn verify_email(&self, token: String) -> Result<()> {
        let request = VerifyEmailRequest { token };
        request.validate()?;
        let _: serde_json::Value = self.client.post("/auth/verify-email", &request).await?;
        Ok(())
    }

    /// Fetch the signed-in user's profile
    pub async fn profile(&self) -> Result<UserProfile> {
        self.client.get("/users/profile").await
    }

    /// End the session: tell the backend (best effort) and drop the pair
    pub async fn logout(&self) -> Result<()> {
        if self.client.is_authenticated() {
            let _ = self
                .client
                .post::<serde_json::Value, serde_json::Value>(
                    "/auth/logout",
                    &serde_json::json!({}),
                )
                .await;
        }

        self.client.store().clear()?;
        Ok(())
    }

    /// Summarize the session for the status card
    pub async fn status(&self) -> AuthStatus {
        if !self.client.is_authenticated() {
            let has_refresh = self
                .client
                .store()
                .read()
                .is_some_and(|credentials| credentials.refresh_token().is_some());
            // A live refresh token still counts: the next call renews it.
            if !has_refresh {
                return AuthStatus {
                    authenticated: false,
                    user: None,
                    server_message: None,
                };
            }
        }

        match self.profile().await {
            Ok(user) => AuthStatus {
                authenticated: true,
                user: Some(user),
                server_message: None,
            },
            Err(err) if err.is_session_expired() => AuthStatus {
                authenticated: false,
                user: None,
                server_message: None,
            },
            Err(err) => AuthStatus {
                authenticated: true,
                user: None,
                server_message: Some(err.to_string()),
            },
        }
    }
}
