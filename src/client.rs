//! The top-level client.
//!
//! [`GotenbergClient`] owns the HTTP connection pool and the client-wide
//! headers (webhooks, custom headers). Routes are cheap: each one holds a
//! handle to the shared [`Transport`] plus a snapshot of the client headers
//! taken when it was created.

use crate::api::{
    ChromiumApi, FlattenApi, HealthApi, LibreOfficeApi, MergeApi, MetadataApi, PdfAApi, SplitApi,
};
use crate::config::ClientConfig;
use crate::error::{GotenbergError, Result};
use crate::headers;
use crate::options::WebhookMethod;
use crate::route::RouteCore;
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

/// Connection state shared by every route of one client.
pub(crate) struct Transport {
    pub http: reqwest::Client,
    pub base_url: Url,
    pub auth: Option<(String, Option<String>)>,
    runtime: Option<Arc<Runtime>>,
}

impl Transport {
    /// Absolute URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| GotenbergError::InvalidConfig(format!("endpoint '{endpoint}': {e}")))
    }

    pub fn block_on<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let rt = self
            .runtime
            .as_ref()
            .ok_or(GotenbergError::BlockingUnavailable)?;
        rt.block_on(fut)
    }
}

/// Client for one Gotenberg server.
///
/// # Example
/// ```rust,no_run
/// use gotenberg_client::{GotenbergClient, Route, IndexFiles};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GotenbergClient::new("http://localhost:3000")?;
/// let response = client
///     .chromium()
///     .html_to_pdf()
///     .string_index("<h1>Hello</h1>")
///     .run()
///     .await?;
/// response.save("hello.pdf").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GotenbergClient {
    transport: Arc<Transport>,
    headers: BTreeMap<String, String>,
}

impl fmt::Debug for GotenbergClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GotenbergClient")
            .field("base_url", &self.transport.base_url.as_str())
            .field("headers", &self.headers)
            .field("blocking", &self.transport.runtime.is_some())
            .finish()
    }
}

impl GotenbergClient {
    /// Async client for `base_url` with default settings.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url)?)
    }

    /// Async client from a full configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Client for synchronous code.
    ///
    /// Owns a small tokio runtime that drives the `*_blocking` route methods.
    /// Do not call those methods from inside another async runtime.
    pub fn blocking(config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gotenberg-client")
            .enable_all()
            .build()
            .map_err(|e| GotenbergError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
        Self::build(config, Some(Arc::new(runtime)))
    }

    fn build(config: ClientConfig, runtime: Option<Arc<Runtime>>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        debug!("Gotenberg client for {}", config.base_url);

        Ok(Self {
            transport: Arc::new(Transport {
                http,
                auth: config.username.map(|u| (u, config.password)),
                base_url: config.base_url,
                runtime,
            }),
            headers: BTreeMap::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.transport.base_url
    }

    pub(crate) fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub(crate) fn route_core(&self, endpoint: &'static str, multi_output: bool) -> RouteCore {
        RouteCore::new(
            self.transport.clone(),
            self.headers.clone(),
            endpoint,
            multi_output,
        )
    }

    // ── Client-wide headers ───────────────────────────────────────────────

    /// Send `name: value` on every route created from now on.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn add_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in headers {
            self.add_header(k, v);
        }
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.remove(name);
        self
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Deliver results to `url` instead of the HTTP response.
    pub fn add_webhook_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.add_header(headers::WEBHOOK_URL, url)
    }

    pub fn add_error_webhook_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.add_header(headers::WEBHOOK_ERROR_URL, url)
    }

    pub fn set_webhook_http_method(&mut self, method: WebhookMethod) -> &mut Self {
        self.add_header(headers::WEBHOOK_METHOD, method.as_str())
    }

    pub fn set_error_webhook_http_method(&mut self, method: WebhookMethod) -> &mut Self {
        self.add_header(headers::WEBHOOK_ERROR_METHOD, method.as_str())
    }

    /// Extra headers the server sends along with its webhook calls.
    pub fn set_webhook_extra_headers<I, K, V>(&mut self, extra: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = extra
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let json = serde_json::to_string(&map)?;
        Ok(self.add_header(headers::WEBHOOK_EXTRA_HTTP_HEADERS, json))
    }

    // ── API families ──────────────────────────────────────────────────────

    pub fn chromium(&self) -> ChromiumApi<'_> {
        ChromiumApi::new(self)
    }

    pub fn libre_office(&self) -> LibreOfficeApi<'_> {
        LibreOfficeApi::new(self)
    }

    pub fn pdf_a(&self) -> PdfAApi<'_> {
        PdfAApi::new(self)
    }

    pub fn merge(&self) -> MergeApi<'_> {
        MergeApi::new(self)
    }

    pub fn metadata(&self) -> MetadataApi<'_> {
        MetadataApi::new(self)
    }

    pub fn split(&self) -> SplitApi<'_> {
        SplitApi::new(self)
    }

    pub fn flatten(&self) -> FlattenApi<'_> {
        FlattenApi::new(self)
    }

    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }
}
