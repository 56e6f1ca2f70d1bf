//! Option groups shared across endpoints.
//!
//! Each trait adds a handful of chainable setters on top of [`Route`]. A route
//! opts into a group with an empty `impl`; the default methods write into the
//! route's [`RouteCore`](crate::route::RouteCore) through [`Route::core_mut`].
//!
//! Setters that validate input return `Result<Self>` and leave the route
//! untouched on error.

mod chromium;
mod common;
mod libreoffice;

pub use chromium::{ChromiumPage, ChromiumRender, IndexFiles, MarkdownFiles, Screenshot};
pub use common::{FlattenOption, MetadataOptions, PdfOutput, SplitOptions};
pub use libreoffice::{OfficeCompress, OfficeMerge, OfficePage};

use crate::route::Route;
use tracing::warn;

/// Clamp `value` into `min..=max`, warning when it had to move.
pub(crate) fn clamp_with_warning(field: &str, value: i64, min: i64, max: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            "{} {} is out of range {}..={}, using {}",
            field, value, min, max, clamped
        );
    }
    clamped
}

pub(crate) fn set_bool<R: Route>(mut route: R, field: &'static str, value: bool) -> R {
    route.core_mut().set_bool(field, value);
    route
}

pub(crate) fn set_field<R: Route>(mut route: R, field: &'static str, value: impl Into<String>) -> R {
    route.core_mut().set_field(field, value);
    route
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_in_range_values() {
        assert_eq!(clamp_with_warning("quality", 50, 0, 100), 50);
        assert_eq!(clamp_with_warning("quality", 0, 0, 100), 0);
    }

    #[test]
    fn clamp_pulls_out_of_range_values_to_bounds() {
        assert_eq!(clamp_with_warning("quality", 150, 0, 100), 100);
        assert_eq!(clamp_with_warning("quality", -3, 1, 100), 1);
    }
}
