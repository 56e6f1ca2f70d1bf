//! Declarative option values.
//!
//! Each type here knows how to render itself into the string values of one or
//! more multipart form fields. Route capabilities (see [`crate::capability`])
//! accept these values and write the rendered fields into the route's form.

use crate::error::{GotenbergError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

// ── Measurements ─────────────────────────────────────────────────────────

/// Unit suffix attached to a [`Measurement`].
///
/// `Undefined` renders the bare number and leaves the unit choice to the
/// server (inches for paper size and margins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementUnit {
    #[default]
    Undefined,
    Points,
    Pixels,
    Inches,
    Millimeters,
    Centimeters,
    Picas,
}

impl MeasurementUnit {
    /// Suffix appended after the number in the form value.
    pub fn suffix(self) -> &'static str {
        match self {
            MeasurementUnit::Undefined => "",
            MeasurementUnit::Points => "pt",
            MeasurementUnit::Pixels => "px",
            MeasurementUnit::Inches => "in",
            MeasurementUnit::Millimeters => "mm",
            MeasurementUnit::Centimeters => "cm",
            MeasurementUnit::Picas => "pc",
        }
    }
}

/// A number with an optional unit, e.g. `8.27in` or `10mm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: MeasurementUnit,
}

impl Measurement {
    pub const fn new(value: f64, unit: MeasurementUnit) -> Self {
        Self { value, unit }
    }

    pub const fn bare(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Undefined)
    }

    pub const fn inches(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Inches)
    }

    pub const fn millimeters(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Millimeters)
    }

    pub const fn centimeters(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Centimeters)
    }

    pub const fn points(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Points)
    }

    pub const fn pixels(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Pixels)
    }

    /// Render as a form value: the number followed by the unit suffix.
    pub fn to_form_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Measurement::bare(value)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Paper width and height. A dimension left as `None` keeps the server default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageSize {
    pub width: Option<Measurement>,
    pub height: Option<Measurement>,
}

impl PageSize {
    pub const A0: PageSize = PageSize::inches(33.1, 46.8);
    pub const A1: PageSize = PageSize::inches(23.4, 33.1);
    pub const A2: PageSize = PageSize::inches(16.54, 23.4);
    pub const A3: PageSize = PageSize::inches(11.7, 16.54);
    pub const A4: PageSize = PageSize::inches(8.27, 11.7);
    pub const A5: PageSize = PageSize::inches(5.83, 8.27);
    pub const A6: PageSize = PageSize::inches(4.13, 5.83);
    pub const LETTER: PageSize = PageSize::inches(8.5, 11.0);
    pub const LEGAL: PageSize = PageSize::inches(8.5, 14.0);
    pub const TABLOID: PageSize = PageSize::inches(11.0, 17.0);
    pub const LEDGER: PageSize = PageSize::inches(17.0, 11.0);

    pub const fn new(width: Measurement, height: Measurement) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub const fn width_only(width: Measurement) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub const fn height_only(height: Measurement) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    const fn inches(width: f64, height: f64) -> Self {
        Self::new(Measurement::inches(width), Measurement::inches(height))
    }

    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        [("paperWidth", self.width), ("paperHeight", self.height)]
            .into_iter()
            .filter_map(|(name, m)| m.map(|m| (name, m.to_form_value())))
            .collect()
    }
}

/// Page margins. Sides left as `None` keep the server default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageMargins {
    pub top: Option<Measurement>,
    pub bottom: Option<Measurement>,
    pub left: Option<Measurement>,
    pub right: Option<Measurement>,
}

impl PageMargins {
    /// Same margin on all four sides.
    pub fn uniform(m: Measurement) -> Self {
        Self {
            top: Some(m),
            bottom: Some(m),
            left: Some(m),
            right: Some(m),
        }
    }

    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        [
            ("marginTop", self.top),
            ("marginBottom", self.bottom),
            ("marginLeft", self.left),
            ("marginRight", self.right),
        ]
        .into_iter()
        .filter_map(|(name, m)| m.map(|m| (name, m.to_form_value())))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrientation {
    Landscape,
    Portrait,
}

impl PageOrientation {
    pub fn is_landscape(self) -> bool {
        matches!(self, PageOrientation::Landscape)
    }
}

// ── PDF output ───────────────────────────────────────────────────────────

/// PDF/A conformance level requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfAFormat {
    A1b,
    A2b,
    A3b,
}

impl PdfAFormat {
    pub fn as_form_value(self) -> &'static str {
        match self {
            PdfAFormat::A1b => "PDF/A-1b",
            PdfAFormat::A2b => "PDF/A-2b",
            PdfAFormat::A3b => "PDF/A-3b",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Split every `span` pages.
    Intervals,
    /// Extract the page ranges given in `span`.
    Pages,
}

impl SplitMode {
    pub fn as_form_value(self) -> &'static str {
        match self {
            SplitMode::Intervals => "intervals",
            SplitMode::Pages => "pages",
        }
    }
}

// ── Chromium ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatedMediaType {
    Print,
    Screen,
}

impl EmulatedMediaType {
    pub fn as_form_value(self) -> &'static str {
        match self {
            EmulatedMediaType::Print => "print",
            EmulatedMediaType::Screen => "screen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// One cookie sent by Chromium while loading the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn secure(mut self, v: bool) -> Self {
        self.secure = Some(v);
        self
    }

    pub fn http_only(mut self, v: bool) -> Self {
        self.http_only = Some(v);
        self
    }

    pub fn same_site(mut self, v: SameSite) -> Self {
        self.same_site = Some(v);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotFormat {
    Png,
    Jpeg,
    Webp,
}

impl ScreenshotFormat {
    pub fn as_form_value(self) -> &'static str {
        match self {
            ScreenshotFormat::Png => "png",
            ScreenshotFormat::Jpeg => "jpeg",
            ScreenshotFormat::Webp => "webp",
        }
    }
}

// ── LibreOffice ──────────────────────────────────────────────────────────

/// DPI cap applied when LibreOffice reduces image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageResolution {
    Dpi75,
    Dpi150,
    Dpi300,
    Dpi600,
    Dpi1200,
}

impl ImageResolution {
    pub fn dpi(self) -> u32 {
        match self {
            ImageResolution::Dpi75 => 75,
            ImageResolution::Dpi150 => 150,
            ImageResolution::Dpi300 => 300,
            ImageResolution::Dpi600 => 600,
            ImageResolution::Dpi1200 => 1200,
        }
    }
}

// ── Webhooks ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookMethod {
    Post,
    Put,
    Patch,
}

impl WebhookMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookMethod::Post => "POST",
            WebhookMethod::Put => "PUT",
            WebhookMethod::Patch => "PATCH",
        }
    }
}

// ── Metadata ─────────────────────────────────────────────────────────────

/// Value of the PDF `Trapped` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrappedStatus {
    True,
    False,
    Unknown,
}

impl TrappedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrappedStatus::True => "True",
            TrappedStatus::False => "False",
            TrappedStatus::Unknown => "Unknown",
        }
    }
}

impl From<bool> for TrappedStatus {
    fn from(v: bool) -> Self {
        if v {
            TrappedStatus::True
        } else {
            TrappedStatus::False
        }
    }
}

/// Lowest PDF version the server accepts in metadata.
pub const MIN_PDF_VERSION: f64 = 1.0;
/// Highest PDF version the server accepts in metadata.
pub const MAX_PDF_VERSION: f64 = 2.0;

/// A bundle of PDF document-information entries.
///
/// Only the fields that were set are sent. Validation happens in
/// [`Metadata::to_json_map`], which every route calls before touching its
/// form, so an invalid bundle never changes the route.
///
/// ```rust
/// use gotenberg_client::options::Metadata;
///
/// let m = Metadata::new().title("Report").keywords(["q3", "sales"]);
/// let json = m.to_json_map().unwrap();
/// assert_eq!(json["Keywords"], "q3, sales");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub creator: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub marked: Option<bool>,
    pub modification_date: Option<DateTime<Utc>>,
    pub pdf_version: Option<f64>,
    pub producer: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub trapped: Option<TrappedStatus>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, v: impl Into<String>) -> Self {
        self.author = Some(v.into());
        self
    }

    pub fn copyright(mut self, v: impl Into<String>) -> Self {
        self.copyright = Some(v.into());
        self
    }

    pub fn creation_date(mut self, v: DateTime<Utc>) -> Self {
        self.creation_date = Some(v);
        self
    }

    pub fn creator(mut self, v: impl Into<String>) -> Self {
        self.creator = Some(v.into());
        self
    }

    pub fn keywords<I, S>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(v.into_iter().map(Into::into).collect());
        self
    }

    pub fn marked(mut self, v: bool) -> Self {
        self.marked = Some(v);
        self
    }

    pub fn modification_date(mut self, v: DateTime<Utc>) -> Self {
        self.modification_date = Some(v);
        self
    }

    pub fn pdf_version(mut self, v: f64) -> Self {
        self.pdf_version = Some(v);
        self
    }

    pub fn producer(mut self, v: impl Into<String>) -> Self {
        self.producer = Some(v.into());
        self
    }

    pub fn subject(mut self, v: impl Into<String>) -> Self {
        self.subject = Some(v.into());
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.title = Some(v.into());
        self
    }

    pub fn trapped(mut self, v: impl Into<TrappedStatus>) -> Self {
        self.trapped = Some(v.into());
        self
    }

    /// Check the version range and the keyword separator rule.
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.pdf_version {
            if !(MIN_PDF_VERSION..=MAX_PDF_VERSION).contains(&version) {
                return Err(GotenbergError::InvalidPdfRevision { version });
            }
        }
        if let Some(keywords) = &self.keywords {
            if let Some(bad) = keywords.iter().find(|k| k.contains(',')) {
                return Err(GotenbergError::InvalidKeyword {
                    keyword: bad.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate, then render the set fields under their PDF key names.
    pub fn to_json_map(&self) -> Result<Map<String, Value>> {
        self.validate()?;

        let mut map = Map::new();
        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };

        if let Some(v) = &self.author {
            put("Author", v.as_str().into());
        }
        if let Some(v) = &self.copyright {
            put("Copyright", v.as_str().into());
        }
        if let Some(v) = &self.creation_date {
            put("CreationDate", v.to_rfc3339().into());
        }
        if let Some(v) = &self.creator {
            put("Creator", v.as_str().into());
        }
        if let Some(v) = &self.keywords {
            if !v.is_empty() {
                put("Keywords", v.join(", ").into());
            }
        }
        if let Some(v) = self.marked {
            put("Marked", v.into());
        }
        if let Some(v) = &self.modification_date {
            put("ModDate", v.to_rfc3339().into());
        }
        if let Some(v) = self.pdf_version {
            put("PDFVersion", v.into());
        }
        if let Some(v) = &self.producer {
            put("Producer", v.as_str().into());
        }
        if let Some(v) = &self.subject {
            put("Subject", v.as_str().into());
        }
        if let Some(v) = &self.title {
            put("Title", v.as_str().into());
        }
        if let Some(v) = self.trapped {
            put("Trapped", v.as_str().into());
        }
        Ok(map)
    }
}
