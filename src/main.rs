// billing-pdf: render estimates, bills, and invoices from a JSON payload

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use billing_pdf::{
    deliver, format, render, DeliveryError, DocumentKind, DocumentPayload, RenderError,
    UploadTarget,
};

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed to read payload: {0}")]
    Payload(String),
    #[error("Invalid date format: {0}")]
    Date(String),
    #[error("Failed to load logo: {0}")]
    Logo(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Render estimates, bills, and invoices as PDF documents")]
struct Args {
    /// Payload JSON file ("-" reads from stdin)
    #[arg(short, long)]
    input: String,

    /// Document kind override (estimate, bill, invoice)
    #[arg(short, long)]
    kind: Option<DocumentKind>,

    /// Document number override
    #[arg(short, long)]
    number: Option<String>,

    /// Date override (YYYY-MM-DD format)
    #[arg(short, long)]
    date: Option<String>,

    /// Output directory for the generated PDF
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Logo image (file path or URL) to embed in the header
    #[arg(long)]
    logo: Option<String>,

    /// Upload the rendered PDF to this endpoint instead of saving it
    #[arg(long)]
    upload: Option<String>,

    /// Bearer token for the upload endpoint
    #[arg(long, requires = "upload")]
    token: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let mut payload = load_payload(&args.input)?;
    if let Some(kind) = args.kind {
        payload.kind = kind;
    }
    if let Some(number) = args.number {
        payload.document_number = Some(number);
    }
    if let Some(date) = &args.date {
        validate_date(date)?;
        payload.date = Some(date.clone());
    }
    payload.logo = load_logo(&args.logo)?;

    let bytes = render(&payload)?;
    let totals = payload.totals();

    match &args.upload {
        Some(endpoint) => {
            let target = UploadTarget {
                endpoint: endpoint.clone(),
                token: args.token,
            };
            deliver::upload(&bytes, &target, &payload)?;
            println!("✓ Uploaded: {}", target.endpoint);
        }
        None => {
            let path = deliver::save(&bytes, &args.output_dir, &payload)?;
            println!("✓ Generated: {}", path.display());
        }
    }
    println!("  Kind: {}", payload.kind.slug());
    println!("  Number: {}", payload.resolved_number());
    println!("  Total: {}", format::currency(Some(totals.total)));

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn load_payload(input: &str) -> Result<DocumentPayload, AppError> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AppError::Payload(format!("stdin: {}", e)))?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| AppError::Payload(format!("{}: {}", input, e)))?
    };

    serde_json::from_str(&content)
        .map_err(|e| AppError::Payload(format!("Invalid JSON: {}", e)))
}

fn validate_date(date: &str) -> Result<(), AppError> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::Date(date.to_string()))
}

fn load_logo(path: &Option<String>) -> Result<Option<image::DynamicImage>, AppError> {
    match path {
        Some(p) => {
            let image_bytes = if p.starts_with("http://") || p.starts_with("https://") {
                let response = ureq::get(p)
                    .call()
                    .map_err(|e| AppError::Logo(format!("Failed to fetch URL: {}", e)))?;
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| AppError::Logo(format!("Failed to read response: {}", e)))?;
                bytes
            } else {
                std::fs::read(p).map_err(|e| AppError::Logo(format!("{}: {}", p, e)))?
            };

            let img = image::load_from_memory(&image_bytes)
                .map_err(|e| AppError::Logo(format!("Failed to decode image: {}", e)))?;
            Ok(Some(img))
        }
        None => Ok(None),
    }
}
