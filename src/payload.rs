//! Document payload: the immutable input to one render pass.
//!
//! Every field has a fallback (empty string, zero, current date,
//! generated placeholder number), so no payload is ever rejected.
//! Numeric fields arriving as strings (form state) coerce silently:
//! anything non-numeric is treated as absent and prints as zero.

use chrono::{Local, NaiveDate};
use image::DynamicImage;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Which document variant to render. Selects the template: title text,
/// which boxes appear, and whether a tax line renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Estimate,
    Bill,
    Invoice,
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Invoice
    }
}

impl DocumentKind {
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::Estimate => "estimate",
            DocumentKind::Bill => "bill",
            DocumentKind::Invoice => "invoice",
        }
    }
}

/// Company letterhead fields, all optional, rendered verbatim or blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: Option<String>,
    /// Newline-delimited address lines.
    pub address: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// One row of the item table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub label: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    pub description: String,
    #[serde(deserialize_with = "lenient_number", alias = "rate")]
    pub unit_rate: Option<f64>,
}

impl LineItem {
    /// `quantity × unit_rate`, treating absent values as 0.
    pub fn amount(&self) -> f64 {
        self.quantity.unwrap_or(0.0) * self.unit_rate.unwrap_or(0.0)
    }

    /// An empty placeholder row: no label, zero quantity, zero rate.
    /// Suppressed from rendering but kept in the items array.
    pub fn is_placeholder(&self) -> bool {
        self.label.trim().is_empty()
            && self.quantity.unwrap_or(0.0) == 0.0
            && self.unit_rate.unwrap_or(0.0) == 0.0
    }
}

/// Totals recomputed from the items. Caller-supplied subtotal/total are
/// advisory only and never trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

/// The immutable input to one render pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPayload {
    pub kind: DocumentKind,
    pub company: CompanyInfo,
    pub document_number: Option<String>,
    /// ISO date (`YYYY-MM-DD`); defaults to the current date when absent.
    pub date: Option<String>,
    /// Newline-delimited addressee block.
    pub bill_to: Option<String>,
    /// Falls back to `bill_to` when absent or blank.
    pub ship_to: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_number")]
    pub discount_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub discount_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tax_amount: Option<f64>,
    /// Advisory; recomputed by [`DocumentPayload::totals`].
    #[serde(deserialize_with = "lenient_number")]
    pub subtotal: Option<f64>,
    /// Advisory; recomputed by [`DocumentPayload::totals`].
    #[serde(deserialize_with = "lenient_number")]
    pub total: Option<f64>,
    /// Decoded letterhead logo, supplied by the caller. Not part of the
    /// JSON payload.
    #[serde(skip)]
    pub logo: Option<DynamicImage>,
}

impl DocumentPayload {
    /// Recompute totals from the items. An explicit discount amount wins
    /// over a percentage; both default to zero. Negative totals are not
    /// clamped.
    pub fn totals(&self) -> Totals {
        let subtotal: f64 = self.items.iter().map(LineItem::amount).sum();
        let discount = match (self.discount_amount, self.discount_percent) {
            (Some(amount), _) => amount,
            (None, Some(percent)) => subtotal * percent / 100.0,
            (None, None) => 0.0,
        };
        let tax = self.tax_amount.unwrap_or(0.0);
        Totals {
            subtotal,
            discount,
            tax,
            total: subtotal - discount + tax,
        }
    }

    /// Non-blank bill-to lines in order.
    pub fn bill_to_lines(&self) -> Vec<&str> {
        split_lines(self.bill_to.as_deref().unwrap_or(""))
    }

    /// Non-blank ship-to lines, falling back to bill-to when the ship-to
    /// field is absent or entirely blank.
    pub fn ship_to_lines(&self) -> Vec<&str> {
        let lines = split_lines(self.ship_to.as_deref().unwrap_or(""));
        if lines.is_empty() {
            self.bill_to_lines()
        } else {
            lines
        }
    }

    /// The document number, or a generated placeholder when absent.
    pub fn resolved_number(&self) -> String {
        match trimmed(&self.document_number) {
            Some(number) => number.to_string(),
            None => generate_placeholder_number(),
        }
    }

    /// Date for display: parsed ISO date formatted `MM/DD/YYYY`, the raw
    /// string verbatim when it does not parse, today when absent.
    pub fn display_date(&self) -> String {
        match trimmed(&self.date) {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => date.format("%m/%d/%Y").to_string(),
                Err(_) => raw.to_string(),
            },
            None => Local::now().date_naive().format("%m/%d/%Y").to_string(),
        }
    }

    /// Output filename: `{kind}-{number|"draft"}.pdf`.
    pub fn filename(&self) -> String {
        let number = match trimmed(&self.document_number) {
            Some(number) => sanitize_for_filename(number),
            None => "draft".to_string(),
        };
        format!("{}-{}.pdf", self.kind.slug(), number)
    }
}

/// Split a free-text block on newlines, dropping blank lines but
/// preserving the order of the rest.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn generate_placeholder_number() -> String {
    let hex = format!("{:x}", Uuid::new_v4());
    hex[..8].to_uppercase()
}

fn sanitize_for_filename(number: &str) -> String {
    number
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Accept numbers, numeric strings (optionally with `$` or thousands
/// separators), blanks, and nulls. Anything non-numeric coerces to
/// absent rather than failing the whole payload.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(Raw::Number(n)) if n.is_finite() => Some(n),
        Some(Raw::Text(s)) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        _ => None,
    })
}
