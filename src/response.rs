//! Typed conversion results.
//!
//! The server's `Content-Type` decides the shape of a result: `application/zip`
//! becomes [`Response::Archive`], anything else [`Response::SingleFile`]. A
//! route's own expectation is only compared against it and logged on mismatch.

use crate::error::{GotenbergError, Result};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// MIME type the server uses for multi-file results.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)filename\*?\s*=\s*(?:UTF-8'[^']*')?"?([^";]+)"?"#).unwrap()
});

// ── Raw response ─────────────────────────────────────────────────────────

/// Status, headers, and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self> {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        debug!(
            "Response: HTTP {} content-type={} ({} bytes)",
            status,
            headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-"),
            body.len()
        );
        Ok(Self::new(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body decoded as UTF-8, lossily. Useful for error payloads.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// File name suggested by the `Content-Disposition` header.
    pub fn filename(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
        FILENAME_RE
            .captures(value)
            .map(|c| c[1].trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// `true` when the declared content type is a zip archive.
    pub fn is_zip(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case(ZIP_CONTENT_TYPE))
            .unwrap_or(false)
    }
}

// ── Typed response ───────────────────────────────────────────────────────

/// A successful conversion result.
#[derive(Debug, Clone)]
pub enum Response {
    SingleFile(SingleFileResponse),
    Archive(ArchiveResponse),
}

impl Response {
    /// Wrap `raw` according to its content type, logging when the route
    /// expected the other shape.
    pub fn classify(raw: RawResponse, expected_archive: bool) -> Self {
        let is_zip = raw.is_zip();
        if is_zip != expected_archive {
            warn!(
                "Expected {} response but server sent content-type {}; using the server's answer",
                if expected_archive { "an archive" } else { "a single-file" },
                raw.content_type().unwrap_or("<none>")
            );
        }
        if is_zip {
            Response::Archive(ArchiveResponse { raw })
        } else {
            Response::SingleFile(SingleFileResponse { raw })
        }
    }

    pub fn raw(&self) -> &RawResponse {
        match self {
            Response::SingleFile(r) => &r.raw,
            Response::Archive(r) => &r.raw,
        }
    }

    pub fn into_raw(self) -> RawResponse {
        match self {
            Response::SingleFile(r) => r.raw,
            Response::Archive(r) => r.raw,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Response::Archive(_))
    }

    pub fn as_archive(&self) -> Option<&ArchiveResponse> {
        match self {
            Response::Archive(a) => Some(a),
            Response::SingleFile(_) => None,
        }
    }

    pub fn into_archive(self) -> Option<ArchiveResponse> {
        match self {
            Response::Archive(a) => Some(a),
            Response::SingleFile(_) => None,
        }
    }

    pub fn into_single_file(self) -> Option<SingleFileResponse> {
        match self {
            Response::SingleFile(s) => Some(s),
            Response::Archive(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.raw().status()
    }

    pub fn body(&self) -> &Bytes {
        self.raw().body()
    }

    /// Write the body verbatim to `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        write_body(self.raw(), path.as_ref())
    }

    /// Async variant of [`Response::to_file`].
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_body(self.raw(), path.as_ref()).await
    }
}

/// One PDF or image.
#[derive(Debug, Clone)]
pub struct SingleFileResponse {
    raw: RawResponse,
}

impl SingleFileResponse {
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn body(&self) -> &Bytes {
        self.raw.body()
    }

    pub fn filename(&self) -> Option<String> {
        self.raw.filename()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        write_body(&self.raw, path.as_ref())
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_body(&self.raw, path.as_ref()).await
    }
}

/// A zip holding several output files.
#[derive(Debug, Clone)]
pub struct ArchiveResponse {
    raw: RawResponse,
}

impl ArchiveResponse {
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn body(&self) -> &Bytes {
        self.raw.body()
    }

    pub fn filename(&self) -> Option<String> {
        self.raw.filename()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        write_body(&self.raw, path.as_ref())
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_body(&self.raw, path.as_ref()).await
    }

    /// Names of the archive members, in archive order.
    pub fn file_names(&self) -> Result<Vec<String>> {
        let archive = ZipArchive::new(Cursor::new(self.raw.body().as_ref()))?;
        Ok(archive.file_names().map(str::to_string).collect())
    }

    /// Extract every member into `directory` and return the written paths.
    ///
    /// `directory` must already exist. Members whose names would land outside
    /// it are skipped.
    pub fn extract_to(&self, directory: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = directory.as_ref();
        if !dir.is_dir() {
            return Err(GotenbergError::CannotExtractHere {
                path: dir.to_path_buf(),
            });
        }

        let mut archive = ZipArchive::new(Cursor::new(self.raw.body().as_ref()))?;
        let mut written = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let Some(relative) = safe_member_path(entry.name()) else {
                warn!("Skipping archive member with unsafe path: {}", entry.name());
                continue;
            };
            let target = dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&target).map_err(|e| output_err(&target, e))?;
                continue;
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| output_err(parent, e))?;
            }
            let mut out = std::fs::File::create(&target).map_err(|e| output_err(&target, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| output_err(&target, e))?;
            written.push(target);
        }

        info!("Extracted {} files into {}", written.len(), dir.display());
        Ok(written)
    }
}

fn safe_member_path(name: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn output_err(path: &Path, source: io::Error) -> GotenbergError {
    GotenbergError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

fn write_body(raw: &RawResponse, path: &Path) -> Result<()> {
    std::fs::write(path, raw.body()).map_err(|e| output_err(path, e))?;
    info!("Wrote {} bytes to {}", raw.body().len(), path.display());
    Ok(())
}

async fn save_body(raw: &RawResponse, path: &Path) -> Result<()> {
    tokio::fs::write(path, raw.body())
        .await
        .map_err(|e| output_err(path, e))?;
    info!("Wrote {} bytes to {}", raw.body().len(), path.display());
    Ok(())
}
