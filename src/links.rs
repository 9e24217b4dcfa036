//! Short link management against the `/urls` endpoints

use url::form_urlencoded;
use validator::Validate;

use shortly_protocol::{
    CreateLinkRequest, Link, Page, UpdateLinkRequest, VerifyLinkPasswordRequest,
    VerifyLinkPasswordResponse,
};

use crate::client::ApiClient;
use crate::error::Result;

/// Listing filters for `GET /urls`
#[derive(Debug, Clone, Default)]
pub struct ListLinksQuery {
    pub folder_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListLinksQuery {
    fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(folder_id) = &self.folder_id {
            serializer.append_pair("folderId", folder_id);
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }

        let query = serializer.finish();
        if query.is_empty() {
            String::new()
        } else {
            format!("?{}", query)
        }
    }
}

/// Link service for CLI commands and embedders
#[derive(Debug, Default)]
pub struct LinkService;

impl LinkService {
    pub fn new() -> Self {
        Self
    }

    /// List links, newest first, optionally scoped to a folder
    pub async fn list(&self, client: &ApiClient, query: &ListLinksQuery) -> Result<Page<Link>> {
        client
            .get(&format!("/urls{}", query.query_string()))
            .await
    }

    /// Shorten a URL
    pub async fn create(&self, client: &ApiClient, request: &CreateLinkRequest) -> Result<Link> {
        request.validate()?;
        client.post("/urls", request).await
    }

    /// Partially update a link
    pub async fn update(
        &self,
        client: &ApiClient,
        id: &str,
        request: &UpdateLinkRequest,
    ) -> Result<Link> {
        client.patch(&format!("/urls/{}", id), request).await
    }

    /// Delete a link
    pub async fn delete(&self, client: &ApiClient, id: &str) -> Result<()> {
        let _: serde_json::Value = client.delete(&format!("/urls/{}", id)).await?;
        Ok(())
    }

    /// Answer the password challenge of a protected short link
    pub async fn verify_password(
        &self,
        client: &ApiClient,
        code: &str,
        password: String,
    ) -> Result<VerifyLinkPasswordResponse> {
        let request = VerifyLinkPasswordRequest { password };
        request.validate()?;
        client
            .post(&format!("/s/{}/verify", code), &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::store::{CredentialPair, MemoryStore};
    use std::sync::Arc;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ClientConfig::builder()
            .base_url(server.uri())
            .timeout(5)
            .build()
            .unwrap();
        let store = Arc::new(MemoryStore::with_pair(CredentialPair::new("at", "rt")));
        ApiClient::new(config, store).unwrap()
    }

    fn link_body(id: &str, code: &str) -> serde_json::Value {
        json!({
            "id": id,
            "originalUrl": "https://example.com",
            "shortCode": code,
            "shortUrl": format!("https://sho.rt/{}", code),
            "totalClicks": 0,
            "isActive": true,
            "hasPassword": false,
            "createdAt": "2025-06-01T12:00:00Z"
        })
    }

    #[test]
    fn query_string_is_empty_without_filters() {
        assert_eq!(ListLinksQuery::default().query_string(), "");
    }

    #[test]
    fn query_string_carries_wire_names() {
        let query = ListLinksQuery {
            folder_id: Some("f1".into()),
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(query.query_string(), "?folderId=f1&page=2&limit=10");
    }

    #[tokio::test]
    async fn list_scopes_to_folder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(query_param("folderId", "f1"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "items": [link_body("l1", "abc123")],
                    "meta": {
                        "total": 1, "page": 1, "limit": 100, "totalPages": 1,
                        "hasNextPage": false, "hasPrevPage": false
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let query = ListLinksQuery {
            folder_id: Some("f1".into()),
            limit: Some(100),
            ..ListLinksQuery::default()
        };
        let page = LinkService::new().list(&client, &query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].short_code, "abc123");
    }

    #[tokio::test]
    async fn create_sends_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/urls"))
            .and(body_json(json!({ "originalUrl": "https://example.com" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "data": link_body("l1", "abc123") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let link = LinkService::new()
            .create(&client, &CreateLinkRequest::new("https://example.com"))
            .await
            .unwrap();
        assert_eq!(link.short_url, "https://sho.rt/abc123");
    }

    #[tokio::test]
    async fn create_rejects_invalid_url_client_side() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = LinkService::new()
            .create(&client, &CreateLinkRequest::new("not a url"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Validation"));
    }

    #[tokio::test]
    async fn verify_password_returns_destination() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/s/abc123/verify"))
            .and(body_json(json!({ "password": "sesame" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "originalUrl": "https://example.com/secret" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let verified = LinkService::new()
            .verify_password(&client, "abc123", "sesame".into())
            .await
            .unwrap();
        assert_eq!(verified.original_url, "https://example.com/secret");
    }
}
