//! Per-kind document templates.
//!
//! Everything that differs between an estimate, a billing statement, and
//! an invoice lives here: titles, box labels, column headers, and which
//! optional lines render. The layout code is written once against this
//! configuration.

use crate::payload::DocumentKind;

/// Static configuration for one document kind.
#[derive(Debug)]
pub struct Template {
    /// Large title drawn above the document-number box.
    pub title: &'static str,
    /// Label for the document number inside the number box.
    pub number_label: &'static str,
    /// Title of the left addressee box.
    pub bill_to_title: &'static str,
    /// Title of the right addressee box; `None` renders a single box.
    pub ship_to_title: Option<&'static str>,
    /// Item table column headers, left to right.
    pub columns: [&'static str; 5],
    /// Whether the totals box carries a tax line.
    pub show_tax_line: bool,
    /// Quantity cells print blank when the quantity is zero.
    pub blank_zero_quantity: bool,
}

const ESTIMATE: Template = Template {
    title: "ESTIMATE",
    number_label: "Estimate #",
    bill_to_title: "Name / Address",
    ship_to_title: Some("Ship To"),
    columns: ["Item", "Qty", "Description", "Rate", "Total"],
    show_tax_line: false,
    blank_zero_quantity: true,
};

const BILL: Template = Template {
    title: "BILLING STATEMENT",
    number_label: "Bill #",
    bill_to_title: "Bill To",
    ship_to_title: None,
    columns: ["Item", "Qty", "Description", "Rate", "Amount"],
    show_tax_line: true,
    blank_zero_quantity: true,
};

const INVOICE: Template = Template {
    title: "INVOICE",
    number_label: "Invoice #",
    bill_to_title: "Bill To",
    ship_to_title: Some("Ship To"),
    columns: ["Item", "Qty", "Description", "Rate", "Amount"],
    show_tax_line: true,
    blank_zero_quantity: true,
};

impl DocumentKind {
    pub fn template(&self) -> &'static Template {
        match self {
            DocumentKind::Estimate => &ESTIMATE,
            DocumentKind::Bill => &BILL,
            DocumentKind::Invoice => &INVOICE,
        }
    }
}
