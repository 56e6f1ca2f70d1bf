//! Chromium routes: HTML, URL, and Markdown to PDF, plus screenshots.

use crate::capability::{
    ChromiumPage, ChromiumRender, FlattenOption, IndexFiles, MarkdownFiles, MetadataOptions,
    PdfOutput, Screenshot, SplitOptions,
};
use crate::client::GotenbergClient;

define_route!(
    /// Render an uploaded `index.html` (and its assets) to PDF.
    HtmlToPdfRoute => "forms/chromium/convert/html", multi_output: false
);
define_route!(
    /// Render a remote page to PDF.
    UrlToPdfRoute => "forms/chromium/convert/url", multi_output: false
);
define_route!(
    /// Render Markdown files through an `index.html` template to PDF.
    MarkdownToPdfRoute => "forms/chromium/convert/markdown", multi_output: false
);
define_route!(
    ScreenshotUrlRoute => "forms/chromium/screenshot/url", multi_output: false
);
define_route!(
    ScreenshotHtmlRoute => "forms/chromium/screenshot/html", multi_output: false
);
define_route!(
    ScreenshotMarkdownRoute => "forms/chromium/screenshot/markdown", multi_output: false
);

impl UrlToPdfRoute {
    /// Page Chromium should load.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.core.set_field("url", url);
        self
    }
}

impl ScreenshotUrlRoute {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.core.set_field("url", url);
        self
    }
}

impl IndexFiles for HtmlToPdfRoute {}
impl ChromiumPage for HtmlToPdfRoute {}
impl ChromiumRender for HtmlToPdfRoute {}
impl PdfOutput for HtmlToPdfRoute {}
impl MetadataOptions for HtmlToPdfRoute {}
impl SplitOptions for HtmlToPdfRoute {}
impl FlattenOption for HtmlToPdfRoute {}

impl ChromiumPage for UrlToPdfRoute {}
impl ChromiumRender for UrlToPdfRoute {}
impl PdfOutput for UrlToPdfRoute {}
impl MetadataOptions for UrlToPdfRoute {}
impl SplitOptions for UrlToPdfRoute {}
impl FlattenOption for UrlToPdfRoute {}

impl IndexFiles for MarkdownToPdfRoute {}
impl MarkdownFiles for MarkdownToPdfRoute {}
impl ChromiumPage for MarkdownToPdfRoute {}
impl ChromiumRender for MarkdownToPdfRoute {}
impl PdfOutput for MarkdownToPdfRoute {}
impl MetadataOptions for MarkdownToPdfRoute {}
impl SplitOptions for MarkdownToPdfRoute {}
impl FlattenOption for MarkdownToPdfRoute {}

impl Screenshot for ScreenshotUrlRoute {}
impl ChromiumRender for ScreenshotUrlRoute {}

impl IndexFiles for ScreenshotHtmlRoute {}
impl Screenshot for ScreenshotHtmlRoute {}
impl ChromiumRender for ScreenshotHtmlRoute {}

impl IndexFiles for ScreenshotMarkdownRoute {}
impl MarkdownFiles for ScreenshotMarkdownRoute {}
impl Screenshot for ScreenshotMarkdownRoute {}
impl ChromiumRender for ScreenshotMarkdownRoute {}

/// Factory for the Chromium routes.
#[derive(Debug, Clone, Copy)]
pub struct ChromiumApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> ChromiumApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    pub fn html_to_pdf(&self) -> HtmlToPdfRoute {
        HtmlToPdfRoute::new(self.client)
    }

    pub fn url_to_pdf(&self) -> UrlToPdfRoute {
        UrlToPdfRoute::new(self.client)
    }

    pub fn markdown_to_pdf(&self) -> MarkdownToPdfRoute {
        MarkdownToPdfRoute::new(self.client)
    }

    pub fn screenshot_url(&self) -> ScreenshotUrlRoute {
        ScreenshotUrlRoute::new(self.client)
    }

    pub fn screenshot_html(&self) -> ScreenshotHtmlRoute {
        ScreenshotHtmlRoute::new(self.client)
    }

    pub fn screenshot_markdown(&self) -> ScreenshotMarkdownRoute {
        ScreenshotMarkdownRoute::new(self.client)
    }
}
