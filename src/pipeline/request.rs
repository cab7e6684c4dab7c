//! Multipart request body for the `/convert` route.
//!
//! The server expects exactly two parts:
//!
//! | Part     | Content type            | Body                              |
//! |----------|-------------------------|-----------------------------------|
//! | `file`   | inferred from the image | raw image bytes, with a filename  |
//! | `params` | `application/json`      | `{"size": …, "charSet": "…"}`     |

use crate::config::ConvertParams;
use crate::error::ConvertError;
use crate::pipeline::input::ImageUpload;
use reqwest::multipart::{Form, Part};

pub const FILE_FIELD: &str = "file";
pub const PARAMS_FIELD: &str = "params";

/// Assemble the two-part form. Consumes the upload to avoid copying the image.
pub fn build_form(upload: ImageUpload, params: &ConvertParams) -> Result<Form, ConvertError> {
    let file = Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.mime_type)
        .map_err(|e| ConvertError::Internal(format!("invalid content type: {e}")))?;

    let params = Part::text(params.to_json()?)
        .mime_str("application/json")
        .map_err(|e| ConvertError::Internal(format!("invalid content type: {e}")))?;

    Ok(Form::new().part(FILE_FIELD, file).part(PARAMS_FIELD, params))
}
