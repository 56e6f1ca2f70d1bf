//! Request header names understood by Gotenberg.

pub const TRACE: &str = "Gotenberg-Trace";
pub const OUTPUT_FILENAME: &str = "Gotenberg-Output-Filename";

pub const WEBHOOK_URL: &str = "Gotenberg-Webhook-Url";
pub const WEBHOOK_ERROR_URL: &str = "Gotenberg-Webhook-Error-Url";
pub const WEBHOOK_METHOD: &str = "Gotenberg-Webhook-Method";
pub const WEBHOOK_ERROR_METHOD: &str = "Gotenberg-Webhook-Error-Method";
/// JSON object of extra headers the server adds to its webhook calls.
pub const WEBHOOK_EXTRA_HTTP_HEADERS: &str = "Gotenberg-Webhook-Extra-Http-Headers";
