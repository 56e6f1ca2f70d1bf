//! Client configuration.
//!
//! Everything needed to talk to one Gotenberg server lives in [`ClientConfig`],
//! built via [`ClientConfigBuilder`]. Only the base URL is required; the rest
//! has defaults that match a stock Gotenberg deployment.

use crate::error::GotenbergError;
use reqwest::Url;
use std::fmt;

/// Default total request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// `User-Agent` sent when none is configured.
pub fn default_user_agent() -> String {
    format!("gotenberg-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection settings for a Gotenberg server.
///
/// # Example
/// ```rust
/// use gotenberg_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:3000")
///     .timeout_secs(60)
///     .basic_auth("user", Some("secret"))
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Server root. Always ends with `/` so endpoints join beneath any prefix.
    pub base_url: Url,

    /// Total timeout for one HTTP exchange. Default: 30.
    ///
    /// Chromium conversions of heavy pages can take longer than this; raise it
    /// rather than relying on retries, since a timeout is not a server error.
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout. Default: 10.
    pub connect_timeout_secs: u64,

    /// `User-Agent` header. Default: `gotenberg-client/<version>`.
    pub user_agent: String,

    /// HTTP basic auth username, if the server sits behind auth.
    pub username: Option<String>,

    pub password: Option<String>,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Config for `base_url` with every other field at its default.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, GotenbergError> {
        Self::builder().base_url(base_url.as_ref()).build()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout_secs: u64,
    connect_timeout_secs: u64,
    user_agent: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: None,
            username: None,
            password: None,
        }
    }
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<&str>) -> Self {
        self.username = Some(username.into());
        self.password = password.map(str::to_string);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, GotenbergError> {
        let raw = self
            .base_url
            .ok_or_else(|| GotenbergError::InvalidConfig("base_url is required".into()))?;
        let base_url = normalize_base_url(&raw)?;

        if self.timeout_secs == 0 {
            return Err(GotenbergError::InvalidConfig(
                "timeout_secs must be ≥ 1".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(GotenbergError::InvalidConfig(
                "connect_timeout_secs must be ≥ 1".into(),
            ));
        }

        Ok(ClientConfig {
            base_url,
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            username: self.username,
            password: self.password,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, GotenbergError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| GotenbergError::InvalidConfig(format!("Invalid base_url '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GotenbergError::InvalidConfig(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
