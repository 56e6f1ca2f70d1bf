//! LibreOffice conversion of office documents to PDF.

use crate::capability::{
    FlattenOption, MetadataOptions, OfficeCompress, OfficeMerge, OfficePage, PdfOutput,
    SplitOptions,
};
use crate::client::GotenbergClient;
use bytes::Bytes;
use std::path::Path;

define_route!(
    /// Convert one or more office documents.
    ///
    /// Several inputs come back as a zip unless `merge(true)` is set.
    OfficeToPdfRoute => "forms/libreoffice/convert", multi_output: true
);

impl OfficeToPdfRoute {
    pub fn convert(mut self, path: impl AsRef<Path>) -> Self {
        self.core.add_file(path, None);
        self
    }

    pub fn convert_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for p in paths {
            self.core.add_file(p, None);
        }
        self
    }

    /// Convert a document held in memory; `name` must carry its extension.
    pub fn convert_in_memory_file(
        mut self,
        data: impl Into<Bytes>,
        name: impl Into<String>,
        mime_type: Option<&str>,
    ) -> Self {
        self.core.add_in_memory_file(data, name, mime_type);
        self
    }
}

impl OfficePage for OfficeToPdfRoute {}
impl OfficeCompress for OfficeToPdfRoute {}
impl OfficeMerge for OfficeToPdfRoute {}
impl PdfOutput for OfficeToPdfRoute {}
impl MetadataOptions for OfficeToPdfRoute {}
impl SplitOptions for OfficeToPdfRoute {}
impl FlattenOption for OfficeToPdfRoute {}

/// Factory for the LibreOffice route.
#[derive(Debug, Clone, Copy)]
pub struct LibreOfficeApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> LibreOfficeApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn to_pdf(&self) -> OfficeToPdfRoute {
        OfficeToPdfRoute::new(self.client)
    }
}
