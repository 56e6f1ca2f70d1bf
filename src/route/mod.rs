//! The request builder shared by every endpoint.
//!
//! A route accumulates form fields, attachments, and headers in a
//! [`RouteCore`], then POSTs them as `multipart/form-data`. Concrete routes
//! (see [`crate::api`]) wrap a core and pick up option methods through the
//! capability traits in [`crate::capability`]; the only thing those traits
//! need from a route is [`Route::core_mut`].
//!
//! Executing takes `&self`: the same route can be sent several times, or
//! [`Route::reset`] and reconfigured, without reconnecting.

pub(crate) mod attachments;

use crate::client::Transport;
use crate::error::{GotenbergError, Result};
use crate::headers;
use crate::response::{RawResponse, Response};
use crate::retry::{with_retry, RetryPolicy};
use attachments::{default_upload_name, FileAttachment, InMemoryFile, StagedUploads};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Form field whose `"true"` value collapses multiple outputs into one file.
pub(crate) const MERGE_FIELD: &str = "merge";
pub(crate) const SPLIT_MODE_FIELD: &str = "splitMode";
pub(crate) const SPLIT_UNIFY_FIELD: &str = "splitUnify";

/// Form fields, attachments, and headers for one endpoint.
pub struct RouteCore {
    transport: Arc<Transport>,
    endpoint: &'static str,
    form_data: BTreeMap<String, String>,
    files: BTreeMap<String, FileAttachment>,
    in_memory: BTreeMap<String, InMemoryFile>,
    client_headers: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    expect_archive: bool,
    multi_output: bool,
    next_index: u32,
}

impl fmt::Debug for RouteCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCore")
            .field("endpoint", &self.endpoint)
            .field("form_data", &self.form_data)
            .field("attachments", &self.attachment_names())
            .field("headers", &self.headers)
            .field("expects_archive", &self.expects_archive())
            .finish()
    }
}

impl RouteCore {
    pub(crate) fn new(
        transport: Arc<Transport>,
        client_headers: BTreeMap<String, String>,
        endpoint: &'static str,
        multi_output: bool,
    ) -> Self {
        Self {
            transport,
            endpoint,
            form_data: BTreeMap::new(),
            files: BTreeMap::new(),
            in_memory: BTreeMap::new(),
            client_headers,
            headers: BTreeMap::new(),
            expect_archive: false,
            multi_output,
            next_index: 1,
        }
    }

    /// Path of the endpoint relative to the server root.
    pub fn endpoint(&self) -> &str {
        self.endpoint
    }

    // ── Form fields ───────────────────────────────────────────────────────

    /// Set a form field, replacing any previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.form_data.insert(name.into(), value.into());
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.set_field(name, if value { "true" } else { "false" });
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_data.get(name).map(String::as_str)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        self.form_data.remove(name)
    }

    pub fn form_data(&self) -> &BTreeMap<String, String> {
        &self.form_data
    }

    // ── Attachments ───────────────────────────────────────────────────────

    /// Register a disk file. `name` defaults to the file's base name.
    ///
    /// The file is not opened until the request is sent.
    pub fn add_file(&mut self, path: impl AsRef<Path>, name: Option<&str>) {
        let path = path.as_ref();
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| default_upload_name(path));
        self.claim_name(&name);
        self.files.insert(
            name,
            FileAttachment {
                source: path.to_path_buf(),
            },
        );
    }

    /// Register content that does not exist on disk.
    pub fn add_in_memory_file(
        &mut self,
        data: impl Into<Bytes>,
        name: impl Into<String>,
        mime_type: Option<&str>,
    ) {
        let name = name.into();
        self.claim_name(&name);
        self.in_memory.insert(
            name,
            InMemoryFile {
                data: data.into(),
                mime: mime_type.map(str::to_string),
            },
        );
    }

    fn claim_name(&mut self, name: &str) {
        let on_disk = self.files.remove(name).is_some();
        let in_memory = self.in_memory.remove(name).is_some();
        if on_disk || in_memory {
            warn!("{} has already been provided, overwriting anyway", name);
        }
    }

    /// Upload names registered so far, disk files first.
    pub fn attachment_names(&self) -> Vec<&str> {
        self.files
            .keys()
            .chain(self.in_memory.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn attachment_count(&self) -> usize {
        self.files.len() + self.in_memory.len()
    }

    /// Next 1-based position for order-sensitive uploads.
    pub(crate) fn take_index(&mut self) -> u32 {
        let i = self.next_index;
        self.next_index += 1;
        i
    }

    // ── Headers ───────────────────────────────────────────────────────────

    /// Set a request header for this route. Validated when sent.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Header value, looking at route headers before client-wide ones.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| self.client_headers.get(name))
            .map(String::as_str)
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in self.client_headers.iter().chain(self.headers.iter()) {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| GotenbergError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| GotenbergError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    // ── Response shape ────────────────────────────────────────────────────

    /// Declare that this request should produce a zip.
    pub fn set_expect_archive(&mut self, expect: bool) {
        self.expect_archive = expect;
    }

    /// Whether the configuration suggests a zip response.
    ///
    /// Only compared with the server's `Content-Type`, never substituted for it.
    pub fn expects_archive(&self) -> bool {
        if self.expect_archive {
            return true;
        }
        let split = self.form_data.contains_key(SPLIT_MODE_FIELD)
            && self.field(SPLIT_UNIFY_FIELD) != Some("true");
        let fan_out = self.multi_output
            && self.attachment_count() > 1
            && self.field(MERGE_FIELD) != Some("true");
        split || fan_out
    }

    /// Drop form fields, attachments, and route headers.
    ///
    /// Client-wide headers and the connection pool are kept.
    pub fn reset(&mut self) {
        self.form_data.clear();
        self.files.clear();
        self.in_memory.clear();
        self.headers.clear();
        self.expect_archive = false;
        self.next_index = 1;
    }

    // ── Execution ─────────────────────────────────────────────────────────

    async fn build_form(&self, staged: &StagedUploads) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in &self.form_data {
            form = form.text(name.clone(), value.clone());
        }
        for file in &staged.files {
            let handle = tokio::fs::File::open(&file.path)
                .await
                .map_err(|e| GotenbergError::AttachmentIo {
                    path: file.path.clone(),
                    source: e,
                })?;
            let len = handle
                .metadata()
                .await
                .map_err(|e| GotenbergError::AttachmentIo {
                    path: file.path.clone(),
                    source: e,
                })?
                .len();
            let part = Part::stream_with_length(Body::from(handle), len)
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            form = form.part(file.name.clone(), part);
        }
        for blob in &staged.memory {
            let len = blob.data.len() as u64;
            let part = Part::stream_with_length(Body::from(blob.data.clone()), len)
                .file_name(blob.name.clone())
                .mime_str(&blob.mime)?;
            form = form.part(blob.name.clone(), part);
        }
        Ok(form)
    }

    async fn send(&self, staged: &StagedUploads) -> Result<RawResponse> {
        let url = self.transport.url(self.endpoint)?;
        let headers = self.header_map()?;
        let form = self.build_form(staged).await?;

        debug!(
            "POST {} ({} fields, {} attachments)",
            url,
            self.form_data.len(),
            staged.len()
        );

        let mut request = self.transport.http.post(url).headers(headers).multipart(form);
        if let Some((user, password)) = &self.transport.auth {
            request = request.basic_auth(user, password.as_ref());
        }

        let raw = RawResponse::read(request.send().await?).await?;
        if !raw.status().is_success() {
            return Err(GotenbergError::http_status(raw));
        }
        Ok(raw)
    }

    async fn stage(&self) -> Result<StagedUploads> {
        attachments::stage(&self.files, &self.in_memory).await
    }

    /// Send once. Any non-success status is an error.
    pub async fn execute(&self) -> Result<RawResponse> {
        let staged = self.stage().await?;
        self.send(&staged).await
    }

    /// Send, retrying 5xx answers according to `policy`.
    pub async fn execute_with_retry(&self, policy: &RetryPolicy) -> Result<RawResponse> {
        let staged = self.stage().await?;
        with_retry(policy, || self.send(&staged)).await
    }

    pub async fn run(&self) -> Result<Response> {
        let raw = self.execute().await?;
        Ok(Response::classify(raw, self.expects_archive()))
    }

    pub async fn run_with_retry(&self, policy: &RetryPolicy) -> Result<Response> {
        let raw = self.execute_with_retry(policy).await?;
        Ok(Response::classify(raw, self.expects_archive()))
    }

    /// Drive `fut` on the client's own runtime.
    pub(crate) fn block_on<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        self.transport.block_on(fut)
    }
}

/// Execution and header methods shared by every endpoint.
///
/// Option setters consume and return the route so they chain; execution
/// borrows it so it can be repeated.
pub trait Route: Sized {
    fn core(&self) -> &RouteCore;

    fn core_mut(&mut self) -> &mut RouteCore;

    /// Tag the request with a `Gotenberg-Trace` id.
    fn trace(mut self, id: impl Into<String>) -> Self {
        self.core_mut().set_header(headers::TRACE, id);
        self
    }

    /// Ask the server to name the output file `name` (without extension).
    fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.core_mut().set_header(headers::OUTPUT_FILENAME, name);
        self
    }

    fn request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.core_mut().set_header(name, value);
        self
    }

    /// Clear everything configured on this route.
    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn execute(&self) -> impl Future<Output = Result<RawResponse>> + Send {
        self.core().execute()
    }

    fn execute_with_retry(
        &self,
        policy: &RetryPolicy,
    ) -> impl Future<Output = Result<RawResponse>> + Send {
        self.core().execute_with_retry(policy)
    }

    fn run(&self) -> impl Future<Output = Result<Response>> + Send {
        self.core().run()
    }

    fn run_with_retry(&self, policy: &RetryPolicy) -> impl Future<Output = Result<Response>> + Send {
        self.core().run_with_retry(policy)
    }

    fn execute_blocking(&self) -> Result<RawResponse> {
        self.core().block_on(self.core().execute())
    }

    fn execute_with_retry_blocking(&self, policy: &RetryPolicy) -> Result<RawResponse> {
        self.core().block_on(self.core().execute_with_retry(policy))
    }

    fn run_blocking(&self) -> Result<Response> {
        self.core().block_on(self.core().run())
    }

    fn run_with_retry_blocking(&self, policy: &RetryPolicy) -> Result<Response> {
        self.core().block_on(self.core().run_with_retry(policy))
    }
}
