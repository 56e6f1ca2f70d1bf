//! Error types for the gotenberg-client library.
//!
//! Every fallible operation returns [`GotenbergError`]. The variants fall into
//! three groups that callers usually want to tell apart:
//!
//! * **Never sent**: the request was rejected locally before any network call
//!   (invalid PDF version, comma in a metadata keyword, negative wait, a file
//!   that could not be opened). Fixing the input is the only remedy.
//!
//! * **Sent but rejected**: the server answered with a non-success status
//!   ([`GotenbergError::HttpStatus`]). A 4xx means the request itself is wrong
//!   and is never retried.
//!
//! * **Sent repeatedly, server kept failing**: every attempt of a retrying
//!   execution hit a 5xx ([`GotenbergError::MaxRetriesExceeded`]). The final
//!   response is kept so callers can inspect what the server said last.
//!
//! [`GotenbergError::was_sent`] answers the first question directly.

use crate::response::RawResponse;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GotenbergError>;

/// All errors returned by the gotenberg-client library.
#[derive(Debug, Error)]
pub enum GotenbergError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// PDF version outside the inclusive range 1.0–2.0.
    #[error("Invalid PDF version {version}: must be between 1.0 and 2.0")]
    InvalidPdfRevision { version: f64 },

    /// A metadata keyword contains the `,` join separator.
    #[error("Invalid metadata keyword '{keyword}': keywords cannot contain commas")]
    InvalidKeyword { keyword: String },

    /// A wait or delay was given as a negative number of seconds.
    #[error("Wait duration cannot be negative, got {secs}s")]
    NegativeWaitDuration { secs: f64 },

    /// Client or retry configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    // ── Attachment errors ─────────────────────────────────────────────────
    /// An attachment could not be read or staged for upload.
    #[error("Failed to read attachment '{path}': {source}")]
    AttachmentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── HTTP errors ───────────────────────────────────────────────────────
    /// The request could not be delivered or the response body not read.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("Gotenberg returned HTTP {status}")]
    HttpStatus {
        status: StatusCode,
        response: Box<RawResponse>,
    },

    /// Every attempt failed with a server error.
    #[error("Gotenberg kept failing after {attempts} attempts (last status: HTTP {})", .response.status())]
    MaxRetriesExceeded {
        attempts: u32,
        response: Box<RawResponse>,
    },

    // ── Response errors ───────────────────────────────────────────────────
    /// The response body did not have the expected shape.
    #[error("Unexpected response from Gotenberg: {0}")]
    InvalidResponse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Local output errors ───────────────────────────────────────────────
    /// The archive extraction target does not exist or is not a directory.
    #[error("Cannot extract archive into '{path}': not an existing directory")]
    CannotExtractHere { path: PathBuf },

    /// The archive body could not be read as a zip file.
    #[error("Invalid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Runtime errors ────────────────────────────────────────────────────
    /// A `*_blocking` method was called on a route from an async client.
    #[error(
        "Blocking execution requires a client created with GotenbergClient::blocking().\n\
Use the async methods (run, run_with_retry, ...) with this client instead."
    )]
    BlockingUnavailable,

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GotenbergError {
    /// The HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(RawResponse::status)
    }

    /// The last response received from the server, if any.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            GotenbergError::HttpStatus { response, .. }
            | GotenbergError::MaxRetriesExceeded { response, .. } => Some(response),
            _ => None,
        }
    }

    /// `true` for a 5xx answer, the only kind of failure worth retrying.
    pub fn is_server_error(&self) -> bool {
        matches!(self, GotenbergError::HttpStatus { status, .. } if status.is_server_error())
    }

    /// `true` for a 4xx answer.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GotenbergError::HttpStatus { status, .. } if status.is_client_error())
    }

    /// `true` if the request reached the server at least once.
    pub fn was_sent(&self) -> bool {
        matches!(
            self,
            GotenbergError::HttpStatus { .. } | GotenbergError::MaxRetriesExceeded { .. }
        )
    }

    pub(crate) fn http_status(response: RawResponse) -> Self {
        GotenbergError::HttpStatus {
            status: response.status(),
            response: Box::new(response),
        }
    }
}
