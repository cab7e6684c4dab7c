//! Result types returned by the conversion client.

use serde::{Deserialize, Serialize};

/// What the server returned for one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// HTTP status code. Recorded, never branched on.
    pub status: u16,
    /// The `ascii` field of the response body, untouched.
    pub ascii: String,
    /// Wall-clock time of the request/response exchange.
    pub duration_ms: u64,
}

impl ConversionOutput {
    /// Number of characters before the first newline.
    pub fn first_line_width(&self) -> usize {
        self.ascii.split('\n').next().unwrap_or("").chars().count()
    }

    /// Rows of the art, without their trailing newlines.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.ascii.lines()
    }
}

/// Body of the server's `GET /about` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub about: String,
    #[serde(default)]
    pub tip: Option<String>,
}
