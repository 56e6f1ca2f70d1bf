//! PDF engine routes: PDF/A conversion, merge, split, flatten, and metadata.

use crate::capability::{FlattenOption, MetadataOptions, PdfOutput, SplitOptions};
use crate::client::GotenbergClient;
use crate::error::{GotenbergError, Result};
use crate::response::RawResponse;
use crate::retry::RetryPolicy;
use crate::route::attachments::default_upload_name;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Metadata per uploaded file name, as returned by the read endpoint.
pub type PdfMetadataMap = BTreeMap<String, BTreeMap<String, Value>>;

define_route!(
    /// Convert existing PDFs to PDF/A or PDF/UA.
    PdfAConvertRoute => "forms/pdfengines/convert", multi_output: true
);
define_route!(
    /// Merge PDFs in the order they were added.
    MergeRoute => "forms/pdfengines/merge", multi_output: false
);
define_route!(
    SplitRoute => "forms/pdfengines/split", multi_output: true
);
define_route!(
    /// Flatten form fields and annotations of existing PDFs.
    FlattenRoute => "forms/pdfengines/flatten", multi_output: true
);
define_route!(
    ReadMetadataRoute => "forms/pdfengines/metadata/read", multi_output: false
);
define_route!(
    WriteMetadataRoute => "forms/pdfengines/metadata/write", multi_output: true
);

macro_rules! file_inputs {
    ($route:ident, $one:ident, $many:ident) => {
        impl $route {
            pub fn $one(mut self, path: impl AsRef<Path>) -> Self {
                self.core.add_file(path, None);
                self
            }

            pub fn $many<I, P>(mut self, paths: I) -> Self
            where
                I: IntoIterator<Item = P>,
                P: AsRef<Path>,
            {
                for p in paths {
                    self.core.add_file(p, None);
                }
                self
            }
        }
    };
}

file_inputs!(PdfAConvertRoute, convert, convert_files);
file_inputs!(SplitRoute, split, split_files);
file_inputs!(FlattenRoute, flatten, flatten_files);
file_inputs!(ReadMetadataRoute, file, files);
file_inputs!(WriteMetadataRoute, file, files);

impl MergeRoute {
    /// Append `path` to the merge order.
    ///
    /// Uploads are named `0001_<name>`, `0002_<name>`, ... because the server
    /// merges in alphanumeric order of the upload names.
    pub fn merge_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let index = self.core.take_index();
        let name = format!("{:04}_{}", index, default_upload_name(path));
        self.core.add_file(path, Some(&name));
        self
    }

    pub fn merge<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for p in paths {
            self = self.merge_file(p);
        }
        self
    }
}

impl ReadMetadataRoute {
    /// Send the request and decode the metadata of every uploaded PDF.
    pub async fn fetch(&self) -> Result<PdfMetadataMap> {
        let raw = self.core.execute().await?;
        decode_metadata(&raw)
    }

    pub async fn fetch_with_retry(&self, policy: &RetryPolicy) -> Result<PdfMetadataMap> {
        let raw = self.core.execute_with_retry(policy).await?;
        decode_metadata(&raw)
    }

    pub fn fetch_blocking(&self) -> Result<PdfMetadataMap> {
        self.core.block_on(self.fetch())
    }

    pub fn fetch_with_retry_blocking(&self, policy: &RetryPolicy) -> Result<PdfMetadataMap> {
        self.core.block_on(self.fetch_with_retry(policy))
    }
}

fn decode_metadata(raw: &RawResponse) -> Result<PdfMetadataMap> {
    let map: PdfMetadataMap = serde_json::from_slice(raw.body()).map_err(|e| {
        GotenbergError::InvalidResponse(format!("metadata body is not a JSON object of objects: {e}"))
    })?;
    debug!("Read metadata for {} files", map.len());
    Ok(map)
}

impl PdfOutput for PdfAConvertRoute {}

impl PdfOutput for MergeRoute {}
impl MetadataOptions for MergeRoute {}
impl FlattenOption for MergeRoute {}

impl SplitOptions for SplitRoute {}
impl PdfOutput for SplitRoute {}
impl MetadataOptions for SplitRoute {}
impl FlattenOption for SplitRoute {}

impl MetadataOptions for WriteMetadataRoute {}

// ── Factories ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct PdfAApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> PdfAApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn convert(&self) -> PdfAConvertRoute {
        PdfAConvertRoute::new(self.client)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MergeApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> MergeApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn merge(&self) -> MergeRoute {
        MergeRoute::new(self.client)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SplitApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> SplitApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn split(&self) -> SplitRoute {
        SplitRoute::new(self.client)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlattenApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> FlattenApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn flatten(&self) -> FlattenRoute {
        FlattenRoute::new(self.client)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetadataApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> MetadataApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn read(&self) -> ReadMetadataRoute {
        ReadMetadataRoute::new(self.client)
    }

    pub fn write(&self) -> WriteMetadataRoute {
        WriteMetadataRoute::new(self.client)
    }
}
