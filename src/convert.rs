//! Conversion entry points.
//!
//! Each call performs exactly one request: no retries and, unless
//! [`ClientConfig::timeout_secs`] is set, no timeout. The image is read in
//! full before the connection is opened.

use crate::config::{ClientConfig, ConvertParams, DEFAULT_OUTPUT_FILE};
use crate::error::ConvertError;
use crate::output::{AboutInfo, ConversionOutput};
use crate::pipeline::input::{self, ImageUpload};
use crate::pipeline::{request, response};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Convert a local image to ASCII art.
///
/// # Arguments
/// * `image_path` — Local JPEG/PNG (or any file the server accepts)
/// * `params`     — Target size and darkest-to-lightest charset
/// * `config`     — Where the server lives
///
/// # Errors
/// - File-access errors if the image cannot be read; no request is sent
/// - Network errors if the request cannot be completed
/// - Response-format errors if the body is not JSON with an `ascii` string
///
/// # Example
/// ```rust,no_run
/// use img2ascii_client::{convert, ClientConfig, ConvertParams};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let params = ConvertParams::new(300, "@%#*+=-:. ");
/// let output = convert("images.png", &params, &ClientConfig::default()).await?;
/// println!("{}", output.ascii);
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    image_path: impl AsRef<Path>,
    params: &ConvertParams,
    config: &ClientConfig,
) -> Result<ConversionOutput, ConvertError> {
    let image_path = image_path.as_ref();
    info!(
        "Converting {} (size {}, charset {:?})",
        image_path.display(),
        params.size,
        params.char_set
    );

    let upload = input::load_image(image_path).await?;
    send_conversion(upload, params, config).await
}

/// Convert image bytes already in memory.
///
/// `file_name` is sent as the part's filename and drives MIME inference,
/// exactly as a path on disk would.
pub async fn convert_bytes(
    file_name: impl Into<String>,
    bytes: Vec<u8>,
    params: &ConvertParams,
    config: &ClientConfig,
) -> Result<ConversionOutput, ConvertError> {
    let upload = ImageUpload::from_bytes(file_name, bytes);
    info!(
        "Converting {} in-memory bytes as '{}'",
        upload.bytes.len(),
        upload.file_name
    );
    send_conversion(upload, params, config).await
}

/// Blocking wrapper around [`convert`].
///
/// Runs the request on a fresh current-thread runtime, so the calling thread
/// blocks until the server answers. Must not be called from inside a tokio
/// runtime.
pub fn convert_sync(
    image_path: impl AsRef<Path>,
    params: &ConvertParams,
    config: &ClientConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(image_path, params, config))
}

/// Fetch the server's self-description from `GET /about`.
pub async fn about(config: &ClientConfig) -> Result<AboutInfo, ConvertError> {
    let url = config.about_url();
    let client = http_client(config)?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| transport_error(&url, config, e))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(&url, config, e))?;
    debug!("GET {} → HTTP {}", url, status);

    response::parse_about(status, &body)
}

/// Write `content` to the fixed output file (`temp.txt`) in the working
/// directory, replacing whatever was there.
pub fn save(content: &str) -> Result<(), ConvertError> {
    save_to(DEFAULT_OUTPUT_FILE, content)
}

/// Write `content` to `path`, creating or truncating it.
///
/// The handle is closed when this function returns, on success and on error.
pub fn save_to(path: impl AsRef<Path>, content: &str) -> Result<(), ConvertError> {
    let path = path.as_ref();
    let write_failed = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_failed)?;
    file.write_all(content.as_bytes()).map_err(write_failed)?;
    file.flush().map_err(write_failed)?;

    debug!("Saved {} bytes to {}", content.len(), path.display());
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Send one prepared upload and parse the answer.
async fn send_conversion(
    upload: ImageUpload,
    params: &ConvertParams,
    config: &ClientConfig,
) -> Result<ConversionOutput, ConvertError> {
    let url = config.convert_url();
    let client = http_client(config)?;
    let form = request::build_form(upload, params)?;

    let start = Instant::now();
    let reply = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| transport_error(&url, config, e))?;

    let status = reply.status().as_u16();
    let body = reply
        .text()
        .await
        .map_err(|e| transport_error(&url, config, e))?;
    let duration_ms = start.elapsed().as_millis() as u64;

    info!("POST {} → HTTP {} in {}ms", url, status, duration_ms);
    debug!("Response body: {} bytes", body.len());

    response::parse_conversion(status, &body, duration_ms)
}

fn http_client(config: &ClientConfig) -> Result<reqwest::Client, ConvertError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ConvertError::Internal(format!("HTTP client: {e}")))
}

fn transport_error(url: &str, config: &ClientConfig, e: reqwest::Error) -> ConvertError {
    match config.timeout_secs {
        Some(secs) if e.is_timeout() => ConvertError::RequestTimeout {
            url: url.to_string(),
            secs,
        },
        _ => ConvertError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        },
    }
}
