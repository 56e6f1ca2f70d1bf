//! LibreOffice export options.

use super::{clamp_with_warning, set_bool, set_field};
use crate::options::{ImageResolution, PageOrientation};
use crate::route::{Route, MERGE_FIELD};

/// Page selection and the PDF export flags of the LibreOffice route.
pub trait OfficePage: Route {
    /// Password that opens the source document.
    fn password(self, password: impl Into<String>) -> Self {
        set_field(self, "password", password)
    }

    fn orient(self, orientation: PageOrientation) -> Self {
        set_bool(self, "landscape", orientation.is_landscape())
    }

    fn native_page_ranges(self, ranges: impl Into<String>) -> Self {
        set_field(self, "nativePageRanges", ranges)
    }

    fn update_indexes(self, update: bool) -> Self {
        set_bool(self, "updateIndexes", update)
    }

    fn export_form_fields(self, export: bool) -> Self {
        set_bool(self, "exportFormFields", export)
    }

    fn allow_duplicate_field_names(self, allow: bool) -> Self {
        set_bool(self, "allowDuplicateFieldNames", allow)
    }

    fn export_bookmarks(self, export: bool) -> Self {
        set_bool(self, "exportBookmarks", export)
    }

    fn export_bookmarks_to_pdf_destination(self, export: bool) -> Self {
        set_bool(self, "exportBookmarksToPdfDestination", export)
    }

    fn export_notes(self, export: bool) -> Self {
        set_bool(self, "exportNotes", export)
    }

    fn export_notes_pages(self, export: bool) -> Self {
        set_bool(self, "exportNotesPages", export)
    }

    fn export_only_notes_pages(self, export: bool) -> Self {
        set_bool(self, "exportOnlyNotesPages", export)
    }

    fn export_notes_in_margin(self, export: bool) -> Self {
        set_bool(self, "exportNotesInMargin", export)
    }

    fn convert_ooo_target_to_pdf_target(self, convert: bool) -> Self {
        set_bool(self, "convertOooTargetToPdfTarget", convert)
    }

    fn export_links_relative_fsys(self, relative: bool) -> Self {
        set_bool(self, "exportLinksRelativeFsys", relative)
    }

    fn export_hidden_slides(self, export: bool) -> Self {
        set_bool(self, "exportHiddenSlides", export)
    }

    fn skip_empty_pages(self, skip: bool) -> Self {
        set_bool(self, "skipEmptyPages", skip)
    }

    /// Embed the source document in the PDF.
    fn add_original_document_as_stream(self, add: bool) -> Self {
        set_bool(self, "addOriginalDocumentAsStream", add)
    }

    /// One sheet per page for spreadsheets.
    fn single_page_sheets(self, single: bool) -> Self {
        set_bool(self, "singlePageSheets", single)
    }
}

/// Image compression applied while exporting.
pub trait OfficeCompress: Route {
    fn lossless_image_compression(self, lossless: bool) -> Self {
        set_bool(self, "losslessImageCompression", lossless)
    }

    /// JPEG quality, clamped into 1–100.
    fn quality(self, quality: i64) -> Self {
        let q = clamp_with_warning("quality", quality, 1, 100);
        set_field(self, "quality", q.to_string())
    }

    fn reduce_image_resolution(self, reduce: bool) -> Self {
        set_bool(self, "reduceImageResolution", reduce)
    }

    /// Upper DPI bound used when `reduce_image_resolution` is on.
    fn max_image_resolution(self, resolution: ImageResolution) -> Self {
        set_field(self, "maxImageResolution", resolution.dpi().to_string())
    }
}

/// Collapse the converted documents into one PDF.
pub trait OfficeMerge: Route {
    fn merge(self, merge: bool) -> Self {
        set_bool(self, MERGE_FIELD, merge)
    }
}
