//! Custom domain API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Attach a custom domain to the account, `POST /domains`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddDomainRequest {
    /// Bare hostname, e.g. `links.example.com`
    #[validate(length(min = 4, max = 253))]
    pub domain: String,
}
