//! Options understood by several engines: PDF/A output, metadata, split,
//! and flatten.

use super::{set_bool, set_field};
use crate::error::Result;
use crate::options::{Metadata, PdfAFormat, SplitMode};
use crate::route::{Route, SPLIT_MODE_FIELD, SPLIT_UNIFY_FIELD};
use serde_json::{Map, Value};
use tracing::warn;

const METADATA_FIELD: &str = "metadata";

/// PDF/A and PDF/UA conformance of the output.
pub trait PdfOutput: Route {
    fn pdf_format(self, format: PdfAFormat) -> Self {
        set_field(self, "pdfa", format.as_form_value())
    }

    /// Enable PDF/UA (universal accessibility).
    fn universal_access(self, enabled: bool) -> Self {
        set_bool(self, "pdfua", enabled)
    }
}

/// Document-information metadata written into the output.
pub trait MetadataOptions: Route {
    /// Add `metadata` to the route, keeping keys set by earlier calls unless
    /// `metadata` sets them again.
    fn metadata(mut self, metadata: &Metadata) -> Result<Self> {
        let update = metadata.to_json_map()?;

        let mut merged = match self.core().field(METADATA_FIELD) {
            Some(existing) => match serde_json::from_str::<Map<String, Value>>(existing) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Replacing unreadable metadata field: {}", e);
                    Map::new()
                }
            },
            None => Map::new(),
        };
        merged.extend(update);

        let json = serde_json::to_string(&merged)?;
        self.core_mut().set_field(METADATA_FIELD, json);
        Ok(self)
    }
}

/// Splitting the output into several files.
///
/// Without `split_unify(true)` the server answers with a zip.
pub trait SplitOptions: Route {
    fn split_mode(self, mode: SplitMode) -> Self {
        set_field(self, SPLIT_MODE_FIELD, mode.as_form_value())
    }

    /// Interval length (`"2"`) or page ranges (`"1-3,5"`) depending on the mode.
    fn split_span(self, span: impl Into<String>) -> Self {
        set_field(self, "splitSpan", span)
    }

    /// Put the selected pages back into a single PDF (pages mode only).
    fn split_unify(self, unify: bool) -> Self {
        set_bool(self, SPLIT_UNIFY_FIELD, unify)
    }
}

/// Flatten form fields and annotations.
pub trait FlattenOption: Route {
    fn flatten(self, flatten: bool) -> Self {
        set_bool(self, "flatten", flatten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::test_support::Probe;
    use crate::error::GotenbergError;

    #[test]
    fn sequential_metadata_calls_merge() {
        let route = Probe::new()
            .metadata(&Metadata::new().title("A"))
            .unwrap()
            .metadata(&Metadata::new().author("B"))
            .unwrap();

        let json: Value = serde_json::from_str(route.core().field("metadata").unwrap()).unwrap();
        assert_eq!(json["Title"], "A");
        assert_eq!(json["Author"], "B");
    }

    #[test]
    fn later_metadata_overrides_same_key() {
        let route = Probe::new()
            .metadata(&Metadata::new().title("Old").subject("S"))
            .unwrap()
            .metadata(&Metadata::new().title("New"))
            .unwrap();

        let json: Value = serde_json::from_str(route.core().field("metadata").unwrap()).unwrap();
        assert_eq!(json["Title"], "New");
        assert_eq!(json["Subject"], "S");
    }

    #[test]
    fn invalid_metadata_is_rejected_before_touching_form() {
        let err = Probe::new()
            .metadata(&Metadata::new().pdf_version(2.5))
            .unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidPdfRevision { .. }));
    }

    #[test]
    fn unreadable_existing_metadata_is_replaced() {
        let mut probe = Probe::new();
        probe.core_mut().set_field("metadata", "not json");
        let route = probe.metadata(&Metadata::new().creator("me")).unwrap();
        let json: Value = serde_json::from_str(route.core().field("metadata").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"Creator": "me"}));
    }

    #[test]
    fn pdf_output_fields() {
        let route = Probe::new()
            .pdf_format(PdfAFormat::A2b)
            .universal_access(true);
        assert_eq!(route.core().field("pdfa"), Some("PDF/A-2b"));
        assert_eq!(route.core().field("pdfua"), Some("true"));
    }

    #[test]
    fn split_fields_and_archive_hint() {
        let route = Probe::new()
            .split_mode(SplitMode::Intervals)
            .split_span("2");
        assert_eq!(route.core().field("splitMode"), Some("intervals"));
        assert_eq!(route.core().field("splitSpan"), Some("2"));
        assert!(route.core().expects_archive());

        let unified = route.split_mode(SplitMode::Pages).split_unify(true);
        assert_eq!(unified.core().field("splitUnify"), Some("true"));
        assert!(!unified.core().expects_archive());
    }

    #[test]
    fn flatten_field() {
        assert_eq!(Probe::new().flatten(true).core().field("flatten"), Some("true"));
    }
}
