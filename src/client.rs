// src/client.rs - Scoped HTTP request context bound to a base URL

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use url::Url;

use crate::config::SuiteConfig;
use crate::error::{Result, SuiteError};

/// Receives lifecycle notifications from [`ApiContext`].
pub trait ContextObserver: Send + Sync {
    fn on_open(&self, _base_url: &Url) {}
    fn on_dispose(&self, _base_url: &Url) {}
}

/// Builder for [`ApiContext`].
///
/// Every context sends `Content-Type: application/json` unless an extra
/// header overrides it.
pub struct ApiContextBuilder {
    base_url: String,
    headers: Vec<(String, String)>,
    accept_invalid_certs: bool,
    timeout: Duration,
    observer: Option<Arc<dyn ContextObserver>>,
}

impl ApiContextBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(AUTHORIZATION.as_str(), format!("Bearer {}", token))
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ContextObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<ApiContext> {
        let base_url = Url::parse(&self.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SuiteError::Configuration(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                SuiteError::Configuration(format!("Invalid value for header '{}': {}", name, e))
            })?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .build()?;

        debug!(base_url = %base_url, "Opened API context");
        if let Some(observer) = &self.observer {
            observer.on_open(&base_url);
        }

        Ok(ApiContext {
            client,
            base_url,
            observer: self.observer,
            disposed: false,
        })
    }
}

/// Short-lived request context: base URL, default headers and TLS leniency.
///
/// Release it with [`ApiContext::dispose`]; dropping an undisposed context
/// releases it as well, so error paths cannot leak it.
pub struct ApiContext {
    client: reqwest::Client,
    base_url: Url,
    observer: Option<Arc<dyn ContextObserver>>,
    disposed: bool,
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("base_url", &self.base_url.as_str())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl ApiContext {
    pub fn builder(base_url: impl Into<String>) -> ApiContextBuilder {
        ApiContextBuilder {
            base_url: base_url.into(),
            headers: Vec::new(),
            accept_invalid_certs: true,
            timeout: Duration::from_secs(30),
            observer: None,
        }
    }

    /// Builder preloaded with the base URL, timeout and TLS settings of `config`.
    pub fn from_config(config: &SuiteConfig) -> ApiContextBuilder {
        Self::builder(config.base_url.clone())
            .accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout())
    }

    /// Resolve `path` (e.g. `/products/1`) against the base URL.
    pub fn url<K, V>(&self, path: &str, query: &[(K, V)]) -> Url
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key.as_ref(), value.as_ref());
            }
        }
        url
    }

    /// Append `segments` to the base URL, percent-encoding each one whole so
    /// a `/` inside a segment cannot add a path level.
    pub fn segment_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| {
                SuiteError::Configuration(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.get_with_query::<&str, &str>(path, &[]).await
    }

    pub async fn get_with_query<K, V>(&self, path: &str, query: &[(K, V)]) -> Result<ApiResponse>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.url(path, query);
        self.send(Method::GET, self.client.get(url)).await
    }

    /// GET a path built from untrusted segments, see [`ApiContext::segment_url`].
    pub async fn get_segments(&self, segments: &[&str]) -> Result<ApiResponse> {
        let url = self.segment_url(segments)?;
        self.send(Method::GET, self.client.get(url)).await
    }

    /// GET with per-request headers on top of the context defaults.
    pub async fn get_with_headers(
        &self,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let url = self.url::<&str, &str>(path, &[]);
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(Method::GET, request).await
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url::<&str, &str>(path, &[]);
        let body = serde_json::to_vec(body)?;
        // raw body so the context's Content-Type, default or overridden, applies
        self.send(Method::POST, self.client.post(url).body(body)).await
    }

    pub async fn put_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url::<&str, &str>(path, &[]);
        let body = serde_json::to_vec(body)?;
        self.send(Method::PUT, self.client.put(url).body(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        let url = self.url::<&str, &str>(path, &[]);
        self.send(Method::DELETE, self.client.delete(url)).await
    }

    /// Send a raw body as-is, e.g. deliberately malformed JSON.
    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<ApiResponse> {
        let url = self.url::<&str, &str>(path, &[]);
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.body(body);
        }
        self.send(method, request).await
    }

    async fn send(&self, method: Method, request: RequestBuilder) -> Result<ApiResponse> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?.to_vec();
        let elapsed = started.elapsed();

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
        trace!(body = %String::from_utf8_lossy(&body), "Response body");

        Ok(ApiResponse {
            status,
            elapsed,
            body,
        })
    }

    /// Release the context.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        debug!(base_url = %self.base_url, "Disposed API context");
        if let Some(observer) = &self.observer {
            observer.on_dispose(&self.base_url);
        }
    }
}

impl Drop for ApiContext {
    fn drop(&mut self) {
        self.release();
    }
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    elapsed: Duration,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }

    /// Fail with [`SuiteError::UnexpectedStatus`] unless the status is 2xx.
    pub fn expect_ok(self) -> Result<Self> {
        if self.ok() {
            Ok(self)
        } else {
            Err(SuiteError::UnexpectedStatus {
                expected: "2xx".to_string(),
                actual: self.status(),
                body: self.text(),
            })
        }
    }

    /// Fail unless the status is one of `accepted`.
    pub fn expect_status_in(self, accepted: &[u16]) -> Result<Self> {
        if accepted.contains(&self.status()) {
            Ok(self)
        } else {
            Err(SuiteError::UnexpectedStatus {
                expected: format!("{:?}", accepted),
                actual: self.status(),
                body: self.text(),
            })
        }
    }
}
