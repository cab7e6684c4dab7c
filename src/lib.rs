//! # img2ascii-client
//!
//! Client for an image-to-ASCII-art conversion HTTP service.
//!
//! The server does all the work: it decodes the image, scales it so the
//! longer side is `size` characters and maps each pixel's brightness onto
//! the charset. This crate uploads the image, hands back the art, and can
//! save it to a text file.
//!
//! ## Request Flow
//!
//! ```text
//! image path
//!  │
//!  ├─ 1. Input     read the file, infer filename + MIME type
//!  ├─ 2. Request   multipart: `file` (bytes) + `params` (JSON)
//!  ├─ 3. POST      {endpoint}/convert, one attempt, no retry
//!  ├─ 4. Response  typed parse of {"ascii": "..."}
//!  └─ 5. Output    ConversionOutput { status, ascii, duration_ms }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2ascii_client::{convert, save, ClientConfig, ConvertParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default(); // http://localhost:8080
//!     let params = ConvertParams::new(300, "@%#*+=-:. ");
//!     let output = convert("images.png", &params, &config).await?;
//!     println!("{}", output.ascii);
//!     save(&output.ascii)?; // → temp.txt
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2ascii` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ClientConfig, ClientConfigBuilder, ConvertParams, DEFAULT_CHARSET, DEFAULT_ENDPOINT,
    DEFAULT_OUTPUT_FILE,
};
pub use convert::{about, convert, convert_bytes, convert_sync, save, save_to};
pub use error::{ConvertError, ErrorClass};
pub use output::{AboutInfo, ConversionOutput};
pub use report::write_report;
