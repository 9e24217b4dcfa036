//! Custom domain management against the `/domains` endpoints

use validator::Validate;

use shortly_protocol::{AddDomainRequest, Domain};

use crate::client::ApiClient;
use crate::error::Result;

/// Domain service for CLI commands and embedders
#[derive(Debug, Default)]
pub struct DomainService;

impl DomainService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, client: &ApiClient) -> Result<Vec<Domain>> {
        client.get("/domains").await
    }

    /// Attach a domain; it stays `PENDING` until DNS verification passes
    pub async fn add(&self, client: &ApiClient, domain: String) -> Result<Domain> {
        let request = AddDomainRequest { domain };
        request.validate()?;
        client.post("/domains", &request).await
    }

    pub async fn delete(&self, client: &ApiClient, id: &str) -> Result<()> {
        let _: serde_json::Value = client.delete(&format!("/domains/{}", id)).await?;
        Ok(())
    }
}
