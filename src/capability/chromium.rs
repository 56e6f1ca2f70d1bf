//! Chromium options: page layout, rendering behaviour, screenshots, and the
//! `index.html` + resources upload convention.

use super::{clamp_with_warning, set_bool, set_field};
use crate::error::{GotenbergError, Result};
use crate::options::{Cookie, EmulatedMediaType, PageMargins, PageOrientation, PageSize, ScreenshotFormat};
use crate::route::Route;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Routes that render an `index.html` plus its assets.
pub trait IndexFiles: Route {
    /// Upload `path` as the page to render.
    fn index(mut self, path: impl AsRef<Path>) -> Self {
        self.core_mut().add_file(path, Some("index.html"));
        self
    }

    fn string_index(mut self, html: impl Into<String>) -> Self {
        self.core_mut()
            .add_in_memory_file(Into::<String>::into(html), "index.html", Some("text/html"));
        self
    }

    /// An asset referenced from the page (image, stylesheet, font).
    fn resource(mut self, path: impl AsRef<Path>) -> Self {
        self.core_mut().add_file(path, None);
        self
    }

    fn resource_named(mut self, path: impl AsRef<Path>, name: &str) -> Self {
        self.core_mut().add_file(path, Some(name));
        self
    }

    fn resources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for p in paths {
            self.core_mut().add_file(p, None);
        }
        self
    }

    fn string_resource(
        mut self,
        content: impl Into<Bytes>,
        name: impl Into<String>,
        mime_type: Option<&str>,
    ) -> Self {
        self.core_mut().add_in_memory_file(content, name, mime_type);
        self
    }

    /// Several in-memory assets as `(content, name)` pairs; MIME types are
    /// guessed from the names.
    fn string_resources<I, C, N>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<Bytes>,
        N: Into<String>,
    {
        for (content, name) in resources {
            self.core_mut().add_in_memory_file(content, name, None);
        }
        self
    }
}

/// Markdown sources rendered through an `index.html` template that pulls
/// them in with `{{ toHTML "file.md" }}`.
pub trait MarkdownFiles: IndexFiles {
    fn markdown_file(mut self, path: impl AsRef<Path>) -> Self {
        self.core_mut().add_file(path, None);
        self
    }

    fn markdown_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for p in paths {
            self.core_mut().add_file(p, None);
        }
        self
    }

    fn string_markdown(mut self, markdown: impl Into<String>, name: impl Into<String>) -> Self {
        self.core_mut()
            .add_in_memory_file(Into::<String>::into(markdown), name, Some("text/markdown"));
        self
    }
}

/// Paper, margins, and page furniture for Chromium PDF output.
pub trait ChromiumPage: Route {
    /// Print the whole document on one page.
    fn single_page(self, single: bool) -> Self {
        set_bool(self, "singlePage", single)
    }

    fn size(mut self, size: PageSize) -> Self {
        for (name, value) in size.to_form() {
            self.core_mut().set_field(name, value);
        }
        self
    }

    fn margins(mut self, margins: PageMargins) -> Self {
        for (name, value) in margins.to_form() {
            self.core_mut().set_field(name, value);
        }
        self
    }

    /// Let CSS `@page` size win over [`ChromiumPage::size`].
    fn prefer_css_page_size(self, prefer: bool) -> Self {
        set_bool(self, "preferCssPageSize", prefer)
    }

    fn generate_document_outline(self, generate: bool) -> Self {
        set_bool(self, "generateDocumentOutline", generate)
    }

    fn print_background(self, print: bool) -> Self {
        set_bool(self, "printBackground", print)
    }

    /// Transparent background instead of white (needs `print_background`).
    fn omit_background(self, omit: bool) -> Self {
        set_bool(self, "omitBackground", omit)
    }

    fn orient(self, orientation: PageOrientation) -> Self {
        set_bool(self, "landscape", orientation.is_landscape())
    }

    fn scale(self, scale: f64) -> Self {
        set_field(self, "scale", scale.to_string())
    }

    /// Pages to print, e.g. `"1-5, 8, 11-13"`.
    fn native_page_ranges(self, ranges: impl Into<String>) -> Self {
        set_field(self, "nativePageRanges", ranges)
    }

    fn header(mut self, path: impl AsRef<Path>) -> Self {
        self.core_mut().add_file(path, Some("header.html"));
        self
    }

    fn string_header(mut self, html: impl Into<String>) -> Self {
        self.core_mut()
            .add_in_memory_file(Into::<String>::into(html), "header.html", Some("text/html"));
        self
    }

    fn footer(mut self, path: impl AsRef<Path>) -> Self {
        self.core_mut().add_file(path, Some("footer.html"));
        self
    }

    fn string_footer(mut self, html: impl Into<String>) -> Self {
        self.core_mut()
            .add_in_memory_file(Into::<String>::into(html), "footer.html", Some("text/html"));
        self
    }
}

/// How Chromium loads the page before capturing it.
pub trait ChromiumRender: Route {
    /// Wait `secs` seconds after load before rendering.
    fn render_wait(mut self, secs: f64) -> Result<Self> {
        if secs < 0.0 || secs.is_nan() {
            return Err(GotenbergError::NegativeWaitDuration { secs });
        }
        self.core_mut().set_field("waitDelay", format!("{secs}s"));
        Ok(self)
    }

    fn render_wait_duration(mut self, wait: Duration) -> Self {
        self.core_mut()
            .set_field("waitDelay", format!("{}s", wait.as_secs_f64()));
        self
    }

    /// Wait until this JavaScript expression is truthy.
    fn render_expression(self, expression: impl Into<String>) -> Self {
        set_field(self, "waitForExpression", expression)
    }

    fn media_type(self, media: EmulatedMediaType) -> Self {
        set_field(self, "emulatedMediaType", media.as_form_value())
    }

    fn cookies(mut self, cookies: &[Cookie]) -> Result<Self> {
        let json = serde_json::to_string(cookies)?;
        self.core_mut().set_field("cookies", json);
        Ok(self)
    }

    fn user_agent(self, agent: impl Into<String>) -> Self {
        set_field(self, "userAgent", agent)
    }

    /// Headers Chromium adds to every request it makes while loading.
    fn extra_http_headers<I, K, V>(mut self, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let json = serde_json::to_string(&map)?;
        self.core_mut().set_field("extraHttpHeaders", json);
        Ok(self)
    }

    /// Fail the conversion when the main page answers with one of `codes`.
    fn fail_on_http_status_codes(self, codes: impl IntoIterator<Item = u16>) -> Self {
        set_field(self, "failOnHttpStatusCodes", status_list(codes))
    }

    fn fail_on_resource_http_status_codes(self, codes: impl IntoIterator<Item = u16>) -> Self {
        set_field(self, "failOnResourceHttpStatusCodes", status_list(codes))
    }

    fn fail_on_resource_loading_failed(self, fail: bool) -> Self {
        set_bool(self, "failOnResourceLoadingFailed", fail)
    }

    fn fail_on_console_exceptions(self, fail: bool) -> Self {
        set_bool(self, "failOnConsoleExceptions", fail)
    }

    /// Render without waiting for the network to go idle.
    fn skip_network_idle_event(self, skip: bool) -> Self {
        set_bool(self, "skipNetworkIdleEvent", skip)
    }
}

fn status_list(codes: impl IntoIterator<Item = u16>) -> String {
    let joined: Vec<String> = codes.into_iter().map(|c| c.to_string()).collect();
    format!("[{}]", joined.join(","))
}

/// Image output of the screenshot routes.
pub trait Screenshot: Route {
    fn width(self, px: u32) -> Self {
        set_field(self, "width", px.to_string())
    }

    fn height(self, px: u32) -> Self {
        set_field(self, "height", px.to_string())
    }

    /// Clip the capture to `width` × `height`.
    fn clip(self, clip: bool) -> Self {
        set_bool(self, "clip", clip)
    }

    fn output_format(self, format: ScreenshotFormat) -> Self {
        set_field(self, "format", format.as_form_value())
    }

    /// JPEG quality, clamped into 0–100.
    fn quality(self, quality: i64) -> Self {
        let q = clamp_with_warning("quality", quality, 0, 100);
        set_field(self, "quality", q.to_string())
    }

    fn optimize_for_speed(self, fast: bool) -> Self {
        set_bool(self, "optimizeForSpeed", fast)
    }
}
