//! Folder management against the `/folders` endpoints

use validator::Validate;

use shortly_protocol::{CreateFolderRequest, Folder};

use crate::client::ApiClient;
use crate::error::Result;

/// Folder service for CLI commands and embedders
#[derive(Debug, Default)]
pub struct FolderService;

impl FolderService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, client: &ApiClient) -> Result<Vec<Folder>> {
        client.get("/folders").await
    }

    pub async fn get(&self, client: &ApiClient, id: &str) -> Result<Folder> {
        client.get(&format!("/folders/{}", id)).await
    }

    pub async fn create(&self, client: &ApiClient, name: String, color: String) -> Result<Folder> {
        let request = CreateFolderRequest { name, color };
        request.validate()?;
        client.post("/folders", &request).await
    }

    pub async fn delete(&self, client: &ApiClient, id: &str) -> Result<()> {
        let _: serde_json::Value = client.delete(&format!("/folders/{}", id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::store::{CredentialPair, MemoryStore};
    use std::sync::Arc;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
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

    #[tokio::test]
    async fn list_returns_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/folders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    { "id": "f1", "name": "Work", "color": "#f00", "_count": { "urls": 3 } },
                    { "id": "f2", "name": "Personal", "color": "#0f0" }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let folders = FolderService::new().list(&client).await.unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].link_count(), 3);
        assert_eq!(folders[1].link_count(), 0);
    }

    #[tokio::test]
    async fn create_posts_name_and_color() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/folders"))
            .and(body_json(json!({ "name": "Work", "color": "#6366f1" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": "f1", "name": "Work", "color": "#6366f1" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let folder = FolderService::new()
            .create(&client, "Work".into(), "#6366f1".into())
            .await
            .unwrap();
        assert_eq!(folder.name, "Work");
    }
}
