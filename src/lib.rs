//! billing-pdf: render estimates, billing statements, and invoices as
//! single-page PDF documents.
//!
//! One parameterized layout engine drives all three document kinds; the
//! differences (titles, box labels, which optional lines render) live in
//! per-kind templates. Rendering is a pure function from payload to
//! bytes; delivery (saving to disk, uploading base64 to a persistence
//! endpoint) is a separate step with its own failure domain.
//!
//! ```no_run
//! use billing_pdf::{render, DocumentKind, DocumentPayload, LineItem};
//!
//! let payload = DocumentPayload {
//!     kind: DocumentKind::Invoice,
//!     document_number: Some("INV-2024-001".to_string()),
//!     date: Some("2024-01-15".to_string()),
//!     bill_to: Some("Acme Corp\n123 Main St".to_string()),
//!     items: vec![LineItem {
//!         label: "Widget".to_string(),
//!         quantity: Some(3.0),
//!         unit_rate: Some(10.0),
//!         ..LineItem::default()
//!     }],
//!     ..DocumentPayload::default()
//! };
//! let bytes = render(&payload)?;
//! # Ok::<(), billing_pdf::RenderError>(())
//! ```

pub mod deliver;
pub mod error;
pub mod format;
pub mod payload;
pub mod render;
pub mod template;

pub use deliver::UploadTarget;
pub use error::{DeliveryError, RenderError};
pub use payload::{CompanyInfo, DocumentKind, DocumentPayload, LineItem, Totals};
pub use render::render;
pub use template::Template;
