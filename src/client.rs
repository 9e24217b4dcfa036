//! HTTP client for the Shortly API
//!
//! Callers use the verb methods and observe either a resolved value or a
//! [`ShortlyError`]; bearer attachment, envelope unwrapping and the
//! single-shot session refresh all happen behind `request`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shortly_protocol::RefreshResponse;

use crate::config::ClientConfig;
use crate::error::{Result, ShortlyError};
use crate::guard;
use crate::store::{CredentialPair, CredentialStore};

/// API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Per-request overrides; caller-supplied headers win over the defaults
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Phases of the 401 recovery flow
///
/// `recover_unauthorized` only ever moves forward through these, so the
/// original request is retried at most once per call no matter what the
/// refresh or the retry return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshPhase {
    Idle,
    Refreshing,
    RetryingOriginal,
    Failed,
}

/// Authenticated HTTP client with transparent session renewal
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    /// Serializes token exchanges so concurrent 401s share one refresh
    refresh_flight: Mutex<()>,
    /// Route the embedding host is currently showing, if it reports one
    current_route: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            http,
            config,
            store,
            refresh_flight: Mutex::new(()),
            current_route: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Whether the store currently holds an unexpired access token
    pub fn is_authenticated(&self) -> bool {
        self.store
            .read()
            .is_some_and(|credentials| credentials.access_token().is_some())
    }

    /// Tell the client which route the host is showing. A 401 raised while
    /// the login page is up is surfaced as-is instead of entering the
    /// refresh flow, so a rejected login cannot loop.
    pub fn set_current_route(&self, route: impl Into<String>) {
        *self.current_route.write().unwrap() = Some(route.into());
    }

    pub fn clear_current_route(&self) {
        *self.current_route.write().unwrap() = None;
    }

    fn on_login_route(&self) -> bool {
        self.current_route
            .read()
            .unwrap()
            .as_deref()
            .is_some_and(|route| route.starts_with(guard::LOGIN_ROUTE))
    }

    // ==================== Verb methods ====================

    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::GET, path, None, RequestOptions::default())
            .await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    // ==================== Core request flow ====================

    /// Perform one API call: attach credentials, unwrap the envelope, and on
    /// a 401 run the refresh-and-retry flow
    pub async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        options: RequestOptions,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.config.request_url(path);
        let access_token = self
            .store
            .read()
            .and_then(|credentials| credentials.access_token().map(str::to_string));

        let response = self
            .send(
                method.clone(),
                &url,
                payload,
                &options,
                access_token.as_deref(),
                false,
            )
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return self
                .recover_unauthorized(method, &url, payload, &options, access_token, response)
                .await;
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Self::unwrap_body(response).await
    }

    async fn send<B>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&B>,
        options: &RequestOptions,
        access_token: Option<&str>,
        retried: bool,
    ) -> Result<Response>
    where
        B: Serialize,
    {
        let headers = Self::build_headers(options, access_token, retried)?;

        let mut request_builder = self.http.request(method, url).headers(headers);
        if let Some(data) = payload {
            request_builder = request_builder.json(data);
        }

        Ok(request_builder.send().await?)
    }

    /// Defaults first, caller overrides second so they win. On the retry the
    /// rotated token is applied last instead: the whole point of the retry
    /// is to present the fresh credential.
    fn build_headers(
        options: &RequestOptions,
        access_token: Option<&str>,
        retried: bool,
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !retried {
            if let Some(token) = access_token {
                headers.insert(AUTHORIZATION, Self::bearer(token)?);
            }
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ShortlyError::invalid_input(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ShortlyError::invalid_input(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        if retried {
            if let Some(token) = access_token {
                headers.insert(AUTHORIZATION, Self::bearer(token)?);
            }
        }

        Ok(headers)
    }

    fn bearer(token: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ShortlyError::invalid_input(format!("Invalid bearer token: {}", e)))
    }

    /// Unwrap a successful response: empty body reads as `{}`, and a
    /// non-null `data` member is returned in place of the envelope
    async fn unwrap_body<R>(response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let text = response.text().await?;
        let body: Value = if text.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text)?
        };

        let payload = match body.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => body,
        };

        Ok(serde_json::from_value(payload)?)
    }

    /// Error for a non-401 failure: body `message` if parseable, HTTP status
    /// text otherwise
    async fn error_from_response(response: Response) -> ShortlyError {
        let status = response.status();
        let body: Value = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("API request failed")
                    .to_string()
            });

        ShortlyError::api(status.as_u16(), message)
    }

    /// The 401 recovery state machine
    ///
    /// Transition table (forward-only):
    /// `Idle -> Refreshing -> RetryingOriginal | Failed`, with the retry and
    /// the failure arms both terminal.
    async fn recover_unauthorized<B, R>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&B>,
        options: &RequestOptions,
        stale_access: Option<String>,
        denied: Response,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        // A rejected login must fail loudly, not trigger a refresh loop.
        if self.on_login_route() {
            return Err(Self::error_from_response(denied).await);
        }
        drop(denied);

        let mut phase = RefreshPhase::Idle;
        let mut rotated_token: Option<String> = None;

        loop {
            phase = match phase {
                RefreshPhase::Idle => RefreshPhase::Refreshing,

                RefreshPhase::Refreshing => {
                    match self.refresh_session(stale_access.as_deref()).await {
                        Some(token) => {
                            rotated_token = Some(token);
                            RefreshPhase::RetryingOriginal
                        }
                        None => RefreshPhase::Failed,
                    }
                }

                RefreshPhase::RetryingOriginal => {
                    debug!(url, "retrying request with rotated access token");
                    let response = self
                        .send(
                            method.clone(),
                            url,
                            payload,
                            options,
                            rotated_token.as_deref(),
                            true,
                        )
                        .await?;

                    // Whatever the retry returns is final; a second 401 is
                    // surfaced, never refreshed again.
                    return if response.status().is_success() {
                        Self::unwrap_body(response).await
                    } else {
                        Err(Self::error_from_response(response).await)
                    };
                }

                RefreshPhase::Failed => {
                    let _ = self.store.clear();
                    return Err(ShortlyError::session_expired(guard::LOGIN_ROUTE));
                }
            };
        }
    }

    /// Exchange the refresh token for a new pair, or `None` if the session
    /// cannot be renewed
    ///
    /// Callers are serialized: whoever waited behind an in-flight exchange
    /// finds the rotated pair already in the store and skips the network
    /// round-trip, so one expiry event costs one refresh call.
    async fn refresh_session(&self, stale_access: Option<&str>) -> Option<String> {
        let _flight = self.refresh_flight.lock().await;

        if let Some(credentials) = self.store.read() {
            if let Some(current) = credentials.access_token() {
                if Some(current) != stale_access {
                    return Some(current.to_string());
                }
            }
        }

        let refresh_token = self
            .store
            .read()
            .and_then(|credentials| credentials.refresh_token().map(str::to_string))?;

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(pair) => {
                let access_token = pair.access_token.clone();
                if let Err(err) = self.store.write(pair) {
                    warn!(error = %err, "failed to persist rotated credentials");
                }
                Some(access_token)
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                None
            }
        }
    }

    /// Raw call to `GET /auth/refresh`, deliberately bypassing `request` so
    /// a 401 from the refresh endpoint itself cannot recurse
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<CredentialPair> {
        let url = self.config.request_url("/auth/refresh");

        let response = self
            .http
            .request(Method::GET, &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, Self::bearer(refresh_token)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ShortlyError::authentication(format!(
                "Refresh rejected with status {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope<RefreshResponse> = response.json().await?;
        let tokens = envelope
            .data
            .ok_or_else(|| ShortlyError::invalid_response("Refresh response carried no data"))?;

        Ok(CredentialPair::new(tokens.access_token, tokens.refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoredCredentials};
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, store: Arc<dyn CredentialStore>) -> ApiClient {
        let config = ClientConfig::builder()
            .base_url(server.uri())
            .timeout(5)
            .build()
            .unwrap();
        ApiClient::new(config, store).unwrap()
    }

    fn seeded_store(access: &str, refresh: &str) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_pair(CredentialPair::new(access, refresh)))
    }

    #[tokio::test]
    async fn get_unwraps_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "id": "1" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let body: Value = client.get("/urls/1").await.unwrap();
        assert_eq!(body, json!({ "id": "1" }));
    }

    #[tokio::test]
    async fn get_returns_bare_payload_without_data_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let body: Value = client.get("/urls/1").await.unwrap();
        assert_eq!(body, json!({ "id": "1" }));
    }

    #[tokio::test]
    async fn empty_body_yields_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let body: Value = client.post("/auth/logout", &json!({})).await.unwrap();
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn null_data_falls_back_to_whole_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": null
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let body: Value = client.get("/urls").await.unwrap();
        assert_eq!(body, json!({ "success": true, "data": null }));
    }

    #[tokio::test]
    async fn bearer_header_follows_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .and(header("authorization", "Bearer live-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, seeded_store("live-token", "rt"));
        let _: Value = client.get("/users/profile").await.unwrap();
    }

    #[tokio::test]
    async fn caller_header_overrides_win() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .and(header("accept", "text/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let options = RequestOptions::default().header("Accept", "text/csv");
        let _: Value = client
            .request::<(), Value>(Method::GET, "/export", None, options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn put_replaces_resource_with_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "firstName": "Ada" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, seeded_store("at", "rt"));
        let body: Value = client
            .put("/users/profile", &json!({ "firstName": "Ada" }))
            .await
            .unwrap();
        assert_eq!(body, json!({ "firstName": "Ada" }));
    }

    #[tokio::test]
    async fn non_401_error_carries_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "Link not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let err = client.get::<Value>("/urls/missing").await.unwrap_err();
        assert!(err.to_string().contains("Link not found"));
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let err = client.get::<Value>("/urls").await.unwrap_err();
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn expired_access_token_is_refreshed_and_request_retried_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer stale-at"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .and(header("authorization", "Bearer live-rt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "accessToken": "new-at", "refreshToken": "new-rt" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer new-at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "items": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = seeded_store("stale-at", "live-rt");
        let client = client_for(&server, store.clone());

        let body: Value = client.get("/urls").await.unwrap();
        assert_eq!(body, json!({ "items": [] }));

        let credentials = store.read().unwrap();
        assert_eq!(credentials.access_token(), Some("new-at"));
        assert_eq!(credentials.refresh_token(), Some("new-rt"));
    }

    #[tokio::test]
    async fn missing_refresh_token_surfaces_session_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryStore::new()));
        let err = client.get::<Value>("/urls").await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(err.to_string().contains(guard::LOGIN_ROUTE));
    }

    #[tokio::test]
    async fn rejected_refresh_clears_credentials_and_expires_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = seeded_store("stale-at", "dead-rt");
        let client = client_for(&server, store.clone());

        let err = client.get::<Value>("/urls").await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(store.read().is_none());
    }

    #[tokio::test]
    async fn retry_returning_401_is_not_refreshed_again() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer stale-at"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "accessToken": "new-at", "refreshToken": "new-rt" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer new-at"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Account disabled"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, seeded_store("stale-at", "live-rt"));
        let err = client.get::<Value>("/urls").await.unwrap_err();
        assert!(err.to_string().contains("Account disabled"));
    }

    #[tokio::test]
    async fn rejected_login_fails_without_refresh_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Invalid credentials"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = seeded_store("stale-at", "live-rt");
        let client = client_for(&server, store);
        client.set_current_route("/login");

        let err = client
            .post::<Value, Value>("/auth/login", &json!({ "email": "a@b.c" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid credentials"));
        assert!(!err.is_session_expired());
    }

    #[tokio::test]
    async fn sequential_requests_with_live_token_touch_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/folders"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = seeded_store("live-at", "live-rt");
        let client = client_for(&server, store.clone());

        let _: Value = client.get("/folders?limit=100").await.unwrap();
        let _: Value = client.get("/folders?limit=100").await.unwrap();
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_401s_share_a_single_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer stale-at"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .and(header("authorization", "Bearer live-rt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "accessToken": "new-at", "refreshToken": "new-rt" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/urls"))
            .and(header("authorization", "Bearer new-at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(2)
            .mount(&server)
            .await;

        let store = seeded_store("stale-at", "live-rt");
        let client = client_for(&server, store);

        let (first, second) = tokio::join!(client.get::<Value>("/urls"), client.get::<Value>("/urls"));
        assert_eq!(first.unwrap(), json!([]));
        assert_eq!(second.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn expired_refresh_side_reads_as_absent_and_ends_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let mut credentials = StoredCredentials::issue(CredentialPair::new("at", "rt"));
        credentials.refresh_expires_at = Utc::now() - ChronoDuration::seconds(10);
        store.seed(credentials);

        let client = client_for(&server, store);
        let err = client.get::<Value>("/urls").await.unwrap_err();
        assert!(err.is_session_expired());
    }
}
