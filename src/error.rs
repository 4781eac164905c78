//! Error types for rendering and delivery.
//!
//! Rendering and delivery are separate failure domains: a failed upload
//! does not invalidate the rendered bytes, and the caller decides whether
//! to retry delivery with them.

use thiserror::Error;

/// A render call either produces the full byte stream or fails with one
/// of these. No partial output is ever returned.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to register font: {0}")]
    Font(String),
    #[error("Failed to assemble PDF: {0}")]
    Pdf(String),
}

/// Delivery failures, distinct from render failures.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
