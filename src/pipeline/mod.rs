//! Pipeline stages for one conversion request.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ request ──▶ (POST /convert) ──▶ response
//! (file)    (multipart)                     (typed parse)
//! ```
//!
//! 1. [`input`]    — read the local image, infer its filename and MIME type
//! 2. [`request`]  — build the `file` + `params` multipart form
//! 3. [`response`] — turn the body into a [`crate::ConversionOutput`] or a
//!    response-format error
//!
//! The network call itself lives in [`crate::convert`].

pub mod input;
pub mod request;
pub mod response;
