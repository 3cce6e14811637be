//! Dashboard REST API client.
//!
//! [`ApiClient`] owns the [`Session`], the query cache and a [`Transport`].
//! The transport is the only piece that touches the network; production uses
//! [`HttpTransport`] on top of reqwest, tests script responses in memory.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::error::{status_message, ApiError, ApiResult};
use crate::models::Envelope;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the base URL, with a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Value for the identity header, when the session has one.
    pub identity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever status the server answered with.
/// Only failures to get a response at all are errors at this level.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;

    /// Human-readable description of the target, for logs.
    fn describe(&self) -> String;
}

/// reqwest-backed transport against a fixed base URL.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            base_url: crate::config::normalize_base_url(base_url),
            client,
        })
    }
}

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach dashboard API at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid dashboard API URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let full_url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut req = self
            .client
            .request(method, &full_url)
            .header("Content-Type", "application/json");
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(id) = request.identity.as_deref() {
            req = req.header(crate::session::IDENTITY_HEADER, id);
        }
        if let Some(body) = request.body.as_ref() {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(friendly_error(&self.base_url, &e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(friendly_error(&self.base_url, &e)))?;
        Ok(ApiResponse { status, body })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Turn a non-success response into an [`ApiError::Status`], keeping the
/// server's own message when the body carries one.
fn error_from_response(resp: &ApiResponse) -> ApiError {
    let text = resp.body.trim();
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status_message(resp.status));
    ApiError::Status {
        status: resp.status,
        message,
    }
}

/// Parse a success body. Empty bodies (204) become `null`.
fn parse_body(resp: &ApiResponse) -> ApiResult<Value> {
    if resp.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&resp.body)?)
}

/// Pull `data` out of the `{ statusCode, data, message, status }` envelope.
///
/// A 2xx response whose envelope says `status: false` with an error
/// `statusCode` is still a failure. Bodies without an envelope are returned
/// unchanged.
pub fn unwrap_envelope(body: Value) -> ApiResult<Value> {
    let is_envelope = body
        .as_object()
        .is_some_and(|map| map.contains_key("data") || map.contains_key("statusCode"));
    if !is_envelope {
        return Ok(body);
    }

    let envelope: Envelope<Value> = serde_json::from_value(body)?;
    if envelope.status == Some(false) {
        if let Some(status) = envelope.status_code.filter(|c| *c >= 400) {
            let message = envelope
                .message
                .unwrap_or_else(|| status_message(status));
            return Err(ApiError::Status { status, message });
        }
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}

/// Decode enveloped data, treating a missing or `null` payload as `T::default()`.
pub fn decode_data<T: DeserializeOwned + Default>(data: Value) -> ApiResult<T> {
    if data.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(data)?)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session, cache_ttl: Duration) -> Self {
        Self {
            transport,
            session,
            cache: QueryCache::new(cache_ttl),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Swap the identity after login/logout. Cached data belonged to the
    /// previous identity and is dropped.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        self.cache.clear();
    }

    pub fn require_session(&self) -> ApiResult<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }

    /// Send one request and return the parsed JSON body of a 2xx response.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body,
            identity: self.session.user_id().map(str::to_string),
        };

        let start = Instant::now();
        let resp = self.transport.send(request).await.map_err(|e| {
            warn!(method = method.as_str(), path, error = %e, "request failed");
            e
        })?;
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            method = method.as_str(),
            path,
            status = resp.status,
            latency_ms,
            "dashboard API response"
        );

        if !resp.is_success() {
            return Err(error_from_response(&resp));
        }
        parse_body(&resp)
    }

    /// GET `path` and return the envelope's `data`, served from the cache
    /// when a fresh copy exists under `key`.
    pub async fn get_value(
        &self,
        key: QueryKey,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<Value> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let body = self.request(HttpMethod::Get, path, query, None).await?;
        let data = unwrap_envelope(body)?;
        self.cache.put(key, data.clone());
        Ok(data)
    }

    pub async fn get_data<T: DeserializeOwned + Default>(
        &self,
        key: QueryKey,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let data = self.get_value(key, path, query).await?;
        decode_data(data)
    }

    /// Uncached GET for single-record lookups that must decode to a value.
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.request(HttpMethod::Get, path, &[], None).await?;
        let data = unwrap_envelope(body)?;
        if data.is_null() {
            return Err(ApiError::Status {
                status: 404,
                message: format!("No record returned for {path}"),
            });
        }
        Ok(serde_json::from_value(data)?)
    }

    /// POST/PUT/DELETE, then invalidate every cached query of `touches`.
    pub async fn mutate(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        touches: &[&str],
    ) -> ApiResult<Value> {
        let result = self.request(method, path, &[], body).await;
        let data = result.and_then(unwrap_envelope)?;
        for resource in touches {
            self.cache.invalidate(resource);
        }
        info!(method = method.as_str(), path, "mutation applied");
        Ok(data)
    }

    pub fn describe(&self) -> String {
        self.transport.describe()
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory transport. Unscripted routes answer 404.
    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: Mutex<HashMap<(HttpMethod, String), (u16, String)>>,
        calls: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
            self.routes
                .lock()
                .unwrap()
                .insert((method, path.to_string()), (status, body.to_string()));
        }

        pub fn on_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
            self.routes
                .lock()
                .unwrap()
                .insert((method, path.to_string()), (status, body.to_string()));
        }

        pub fn on_get(&self, path: &str, body: Value) {
            self.on(HttpMethod::Get, path, 200, body);
        }

        pub fn calls(&self) -> Vec<ApiRequest> {
            self.calls.lock().unwrap().clone()
        }

        pub fn paths(&self) -> Vec<String> {
            self.calls().into_iter().map(|c| c.path).collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
            let key = (request.method, request.path.clone());
            self.calls.lock().unwrap().push(request);
            let (status, body) = self
                .routes
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or((404, r#"{"message":"Not Found"}"#.to_string()));
            Ok(ApiResponse { status, body })
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    pub fn client_with(transport: Arc<ScriptedTransport>, session: Session) -> ApiClient {
        ApiClient::new(transport, session, Duration::from_secs(60))
    }

    /// Wrap `data` in the backend envelope.
    pub fn ok(data: Value) -> Value {
        serde_json::json!({
            "statusCode": 200,
            "data": data,
            "message": "ok",
            "status": true
        })
    }
}
