//! Output delivery: write the rendered bytes to disk, or forward them to
//! a persistence endpoint as a base64-encoded JSON body.
//!
//! Delivery never re-renders and never retries; a failure here leaves
//! the rendered bytes untouched for the caller to reuse.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::error::DeliveryError;
use crate::payload::DocumentPayload;

/// Where uploads go. Ambient session state made explicit: the endpoint
/// and token travel with the call instead of living in a module global.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub endpoint: String,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    document_kind: &'static str,
    document_no: String,
    date: String,
    subtotal: f64,
    total: f64,
    pdf_data: String,
}

/// Write the PDF under `dir` as `{kind}-{number|draft}.pdf` and return
/// the path.
pub fn save(bytes: &[u8], dir: &Path, payload: &DocumentPayload) -> Result<PathBuf, DeliveryError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(payload.filename());
    fs::write(&path, bytes)?;
    Ok(path)
}

/// POST the PDF to the persistence endpoint with its document fields and
/// the bytes base64-encoded under `pdfData`.
pub fn upload(
    bytes: &[u8],
    target: &UploadTarget,
    payload: &DocumentPayload,
) -> Result<(), DeliveryError> {
    let body = build_body(bytes, payload);
    let mut request = ureq::post(&target.endpoint);
    if let Some(token) = &target.token {
        request = request.set("Authorization", &format!("Bearer {}", token));
    }
    request
        .send_json(&body)
        .map_err(|e| DeliveryError::Upload(e.to_string()))?;
    Ok(())
}

fn build_body(bytes: &[u8], payload: &DocumentPayload) -> UploadBody {
    let totals = payload.totals();
    UploadBody {
        document_kind: payload.kind.slug(),
        document_no: payload.resolved_number(),
        date: payload.display_date(),
        subtotal: totals.subtotal,
        total: totals.total,
        pdf_data: STANDARD.encode(bytes),
    }
}
