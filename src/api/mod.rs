//! Endpoint routes, grouped by API family.
//!
//! Every route is a thin struct around a [`RouteCore`](crate::route::RouteCore)
//! generated by `define_route!`; its options come from the capability traits
//! it implements and, where an endpoint needs them, a few inherent methods
//! for its input files.

/// Declare a route struct bound to one endpoint.
///
/// `multi_output` marks endpoints that produce one output per input, so more
/// than one attachment (without `merge=true`) hints at a zip response.
macro_rules! define_route {
    ($(#[$meta:meta])* $name:ident => $endpoint:literal, multi_output: $multi:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            core: $crate::route::RouteCore,
        }

        impl $name {
            pub(crate) fn new(client: &$crate::client::GotenbergClient) -> Self {
                Self {
                    core: client.route_core($endpoint, $multi),
                }
            }
        }

        impl $crate::route::Route for $name {
            fn core(&self) -> &$crate::route::RouteCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut $crate::route::RouteCore {
                &mut self.core
            }
        }
    };
}

mod chromium;
mod libreoffice;
mod pdfengines;

pub use crate::health::HealthApi;
pub use pdfengines::PdfMetadataMap;
pub use chromium::{
    ChromiumApi, HtmlToPdfRoute, MarkdownToPdfRoute, ScreenshotHtmlRoute, ScreenshotMarkdownRoute,
    ScreenshotUrlRoute, UrlToPdfRoute,
};
pub use libreoffice::{LibreOfficeApi, OfficeToPdfRoute};
pub use pdfengines::{
    FlattenApi, FlattenRoute, MergeApi, MergeRoute, MetadataApi, PdfAApi, PdfAConvertRoute,
    ReadMetadataRoute, SplitApi, SplitRoute, WriteMetadataRoute,
};
