//! Client configuration and conversion parameters.
//!
//! [`ClientConfig`] says *where* and *how* to talk to the conversion server;
//! [`ConvertParams`] says *what* to ask for. The two are kept apart because a
//! single configured client typically runs many conversions with different
//! parameters.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Base URL of a locally running conversion server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Character set used by the server when none (or an invalid one) is given.
pub const DEFAULT_CHARSET: &str = "@%#*+=-:. ";

/// Size the server falls back to when the requested one is out of range.
pub const SERVER_FALLBACK_SIZE: u32 = 100;

/// Largest size the server accepts.
pub const MAX_SIZE: u32 = 300;

/// Inclusive bounds on the charset length (in characters) the server accepts.
pub const CHARSET_LEN_RANGE: std::ops::RangeInclusive<usize> = 2..=32;

/// Fixed name of the file [`crate::save`] writes to.
pub const DEFAULT_OUTPUT_FILE: &str = "temp.txt";

/// Configuration for talking to the conversion server.
///
/// Built via [`ClientConfig::builder()`] or [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use img2ascii_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("http://127.0.0.1:9000")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.convert_url(), "http://127.0.0.1:9000/convert");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, `http://` or `https://`. Default: `http://localhost:8080`.
    pub endpoint: String,

    /// Whole-request timeout in seconds. Default: `None`, the request blocks
    /// until the server answers or the transport fails.
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            user_agent: concat!("img2ascii/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the conversion route.
    pub fn convert_url(&self) -> String {
        self.route("convert")
    }

    /// Full URL of the server's self-description route.
    pub fn about_url(&self) -> String {
        self.route("about")
    }

    fn route(&self, name: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), name)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConvertError> {
        let c = &self.config;
        if !is_http_url(&c.endpoint) {
            return Err(ConvertError::InvalidConfig(format!(
                "endpoint must start with http:// or https://, got '{}'",
                c.endpoint
            )));
        }
        if c.timeout_secs == Some(0) {
            return Err(ConvertError::InvalidConfig(
                "timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

// ── Conversion parameters ────────────────────────────────────────────────

/// The `params` part of a conversion request.
///
/// Serialises to `{"size": <int>, "charSet": "<string>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertParams {
    /// Target size of the longer image side, in characters.
    pub size: u32,
    /// Characters ordered from darkest to lightest.
    #[serde(rename = "charSet")]
    pub char_set: String,
}

impl Default for ConvertParams {
    fn default() -> Self {
        Self {
            size: MAX_SIZE,
            char_set: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl ConvertParams {
    pub fn new(size: u32, char_set: impl Into<String>) -> Self {
        Self {
            size,
            char_set: char_set.into(),
        }
    }

    /// Serialise as the JSON body of the `params` part.
    pub fn to_json(&self) -> Result<String, ConvertError> {
        serde_json::to_string(self)
            .map_err(|e| ConvertError::Internal(format!("params serialisation: {e}")))
    }

    /// Describe every value the server would silently replace with its own
    /// default. Nothing is enforced; the request is sent as-is.
    pub fn server_limit_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.size == 0 || self.size > MAX_SIZE {
            out.push(format!(
                "size {} is outside 1–{MAX_SIZE}; the server will use {SERVER_FALLBACK_SIZE}",
                self.size
            ));
        }
        let len = self.char_set.chars().count();
        if !CHARSET_LEN_RANGE.contains(&len) {
            out.push(format!(
                "charset has {len} characters, outside {}–{}; the server will use {DEFAULT_CHARSET:?}",
                CHARSET_LEN_RANGE.start(),
                CHARSET_LEN_RANGE.end()
            ));
        }
        out
    }
}
