//! # gotenberg-client
//!
//! Typed client for [Gotenberg](https://gotenberg.dev), the HTTP service that
//! wraps Chromium and LibreOffice to turn HTML, Markdown, URLs, and office
//! documents into PDFs, and that merges, splits, flattens, and rewrites
//! existing PDFs.
//!
//! ## Request flow
//!
//! ```text
//! GotenbergClient
//!  │
//!  ├─ 1. Route    pick an endpoint: client.chromium().html_to_pdf()
//!  ├─ 2. Options  chain capability setters (size, margins, pdf_format, ...)
//!  ├─ 3. Stage    open attachments, rename non-ASCII uploads in a temp dir
//!  ├─ 4. Send     multipart/form-data POST, optional 5xx retry with backoff
//!  └─ 5. Classify Content-Type decides SingleFile vs Archive (zip)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gotenberg_client::{ChromiumPage, GotenbergClient, IndexFiles, PageSize, RetryPolicy, Route};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GotenbergClient::new("http://localhost:3000")?;
//!     let response = client
//!         .chromium()
//!         .html_to_pdf()
//!         .index("site/index.html")
//!         .resource("site/style.css")
//!         .size(PageSize::A4)
//!         .trace("invoice-42")
//!         .run_with_retry(&RetryPolicy::default())
//!         .await?;
//!     response.save("invoice.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Synchronous use
//!
//! [`GotenbergClient::blocking`] owns a small runtime so that the
//! `*_blocking` methods of every route can be called from plain threads.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (request/response at `debug`, retries and
//! compensated input at `warn`) and never installs a subscriber.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod capability;
pub(crate) mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod health;
pub mod options;
pub mod response;
pub mod retry;
pub mod route;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api::PdfMetadataMap;
pub use capability::{
    ChromiumPage, ChromiumRender, FlattenOption, IndexFiles, MarkdownFiles, MetadataOptions,
    OfficeCompress, OfficeMerge, OfficePage, PdfOutput, Screenshot, SplitOptions,
};
pub use client::GotenbergClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{GotenbergError, Result};
pub use health::{HealthStatus, ModuleHealth, ServiceStatus};
pub use options::{
    Cookie, EmulatedMediaType, ImageResolution, Measurement, MeasurementUnit, Metadata,
    PageMargins, PageOrientation, PageSize, PdfAFormat, SameSite, ScreenshotFormat, SplitMode,
    TrappedStatus, WebhookMethod,
};
pub use response::{ArchiveResponse, RawResponse, Response, SingleFileResponse};
pub use retry::RetryPolicy;
pub use route::{Route, RouteCore};
