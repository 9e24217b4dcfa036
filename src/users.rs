//! Account administration against the `/users` endpoints

use shortly_protocol::AccountSummary;

use crate::client::ApiClient;
use crate::error::Result;

/// User administration service; the backend rejects non-admin callers
#[derive(Debug, Default)]
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// List all accounts (admin only)
    pub async fn list(&self, client: &ApiClient) -> Result<Vec<AccountSummary>> {
        client.get("/users").await
    }
}
