//! Transport seam between the remote store and the network.
//!
//! [`RemoteRequestStore`](crate::store::RemoteRequestStore) only ever talks
//! JSON to a single backend, so a call is just a method, a path under the
//! backend's base URL and an optional JSON body. Production code goes through
//! reqwest; tests script answers with [`MockHttpClient`].

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CommdeskError, Result};
use crate::store::RemoteConfig;

/// The verbs the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Where calls go and how they authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Bearer token; `None` sends no Authorization header
    pub bearer: Option<String>,
    pub timeout: Duration,
}

impl Endpoint {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl From<&RemoteConfig> for Endpoint {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer: Some(config.api_key.clone()).filter(|key| !key.is_empty()),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// One JSON call against the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Status and raw body of a backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends [`ApiCall`]s to an [`Endpoint`].
///
/// Only transport failures (connection refused, timeout, bad URL) are errors
/// here; any status code the backend answers with comes back as a response.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, call: &ApiCall) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by a shared reqwest connection pool.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, endpoint, call), fields(method = %call.method, path = %call.path))]
    async fn send(&self, endpoint: &Endpoint, call: &ApiCall) -> Result<HttpResponse> {
        let url = endpoint.url(&call.path);
        tracing::debug!(%url, timeout_ms = endpoint.timeout.as_millis() as u64, "Calling backend");

        let mut builder = self
            .client
            .request(call.method.into(), &url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(endpoint.timeout);
        if let Some(token) = &endpoint.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::error!(%url, error = %e, "Backend unreachable");
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, body_len = body.len(), "Backend answered");
        Ok(HttpResponse { status, body })
    }
}

/// A call seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub timeout: Duration,
}

type Script = HashMap<(Method, String), VecDeque<Result<HttpResponse>>>;

/// Scripted [`HttpClient`] for tests.
///
/// Answers are queued per method and path and handed out in order. A call
/// with nothing queued fails. Clones share the same script and call log.
///
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.respond(Method::Get, "/solicitacoes", 200, json!([]));
/// let store = RemoteRequestStore::with_client(&config, Arc::new(mock.clone()));
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON answer.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, body.to_string());
    }

    /// Queue an answer whose body is not JSON (or is empty).
    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.push(
            method,
            path,
            Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        );
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: Method, path: &str, error: CommdeskError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: Method, path: &str, answer: Result<HttpResponse>) {
        self.script
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, endpoint: &Endpoint, call: &ApiCall) -> Result<HttpResponse> {
        self.calls.lock().push(RecordedCall {
            method: call.method,
            url: endpoint.url(&call.path),
            body: call.body.clone(),
            bearer: endpoint.bearer.clone(),
            timeout: endpoint.timeout,
        });

        let answer = self
            .script
            .lock()
            .get_mut(&(call.method, call.path.clone()))
            .and_then(VecDeque::pop_front);
        answer.unwrap_or_else(|| {
            Err(CommdeskError::Other(anyhow::anyhow!(
                "nothing scripted for {} {}",
                call.method,
                call.path
            )))
        })
    }
}
