use billing_pdf::{render, DocumentKind, DocumentPayload, LineItem};

fn item(label: &str, qty: f64, rate: f64) -> LineItem {
    LineItem {
        label: label.to_string(),
        quantity: Some(qty),
        unit_rate: Some(rate),
        ..LineItem::default()
    }
}

/// A payload with every fallback pinned so renders are reproducible.
fn widget_payload() -> DocumentPayload {
    DocumentPayload {
        kind: DocumentKind::Invoice,
        document_number: Some("INV-100".to_string()),
        date: Some("2024-01-15".to_string()),
        bill_to: Some("Acme Corp\n123 Main St\nSpringfield".to_string()),
        items: vec![item("Widget", 3.0, 10.0)],
        ..DocumentPayload::default()
    }
}

#[test]
fn render_produces_pdf_bytes() {
    let bytes = render(&widget_payload()).expect("render failed");
    assert!(bytes.starts_with(b"%PDF-"), "output is not a PDF");
    assert!(bytes.len() > 1000, "PDF is too small, likely empty");
}

#[test]
fn identical_payloads_render_identical_bytes() {
    let first = render(&widget_payload()).expect("first render failed");
    let second = render(&widget_payload()).expect("second render failed");
    assert_eq!(first, second, "renders of the same payload differ");
}

#[test]
fn placeholder_rows_do_not_change_output() {
    let without = render(&widget_payload()).expect("render failed");

    let mut payload = widget_payload();
    payload.items.push(item("", 0.0, 0.0));
    let with = render(&payload).expect("render failed");

    assert_eq!(without, with, "placeholder row changed the rendered bytes");
}

#[test]
fn ship_to_fallback_matches_explicit_copy() {
    let implicit = render(&widget_payload()).expect("render failed");

    let mut payload = widget_payload();
    payload.ship_to = payload.bill_to.clone();
    let explicit = render(&payload).expect("render failed");

    assert_eq!(implicit, explicit, "ship-to fallback drew different lines");
}

#[test]
fn different_items_render_different_bytes() {
    let widget = render(&widget_payload()).expect("render failed");

    let mut payload = widget_payload();
    payload.items = vec![item("Gadget", 1.0, 99.0)];
    let gadget = render(&payload).expect("render failed");

    assert_ne!(widget, gadget);
}

#[test]
fn discount_changes_the_totals_box() {
    let plain = render(&widget_payload()).expect("render failed");

    let mut payload = widget_payload();
    payload.discount_percent = Some(10.0);
    let discounted = render(&payload).expect("render failed");

    assert_ne!(plain, discounted);
}

#[test]
fn every_kind_renders_and_differs() {
    let kinds = [DocumentKind::Estimate, DocumentKind::Bill, DocumentKind::Invoice];
    let mut outputs = Vec::new();
    for kind in kinds {
        let mut payload = widget_payload();
        payload.kind = kind;
        outputs.push(render(&payload).expect("render failed"));
    }
    assert_ne!(outputs[0], outputs[1]);
    assert_ne!(outputs[1], outputs[2]);
    assert_ne!(outputs[0], outputs[2]);
}

#[test]
fn empty_payload_still_renders() {
    let payload = DocumentPayload {
        document_number: Some("DRAFT".to_string()),
        date: Some("2024-01-15".to_string()),
        ..DocumentPayload::default()
    };
    let bytes = render(&payload).expect("render failed");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn malformed_numeric_strings_render_without_error() {
    let payload: DocumentPayload = serde_json::from_str(
        r#"{
            "kind": "bill",
            "documentNumber": "B-9",
            "date": "2024-02-02",
            "items": [{"label": "Thing", "quantity": "not a number", "rate": "abc"}],
            "discountAmount": "??"
        }"#,
    )
    .expect("payload should deserialize leniently");
    assert_eq!(payload.totals().subtotal, 0.0);
    let bytes = render(&payload).expect("render failed");
    assert!(bytes.starts_with(b"%PDF-"));
}
