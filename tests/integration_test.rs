use std::fs;
use std::path::Path;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_billing-pdf"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn write_payload(name: &str, json: &str) -> String {
    setup();
    let path = output_dir().join(name);
    fs::write(&path, json).expect("Failed to write payload file");
    path.to_string_lossy().into_owned()
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

const WIDGET_PAYLOAD: &str = r#"{
    "kind": "invoice",
    "documentNumber": "INV-100",
    "date": "2024-01-15",
    "company": {"name": "Springfield Supply", "phone": "555-0100"},
    "billTo": "Acme Corp\n123 Main St",
    "items": [
        {"label": "Widget", "quantity": 3, "rate": 10.0},
        {"label": "", "quantity": 0, "rate": 0}
    ]
}"#;

#[test]
fn test_basic_invoice() {
    let payload = write_payload("basic-invoice.json", WIDGET_PAYLOAD);
    let output_file = "invoice-INV-100.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args(["-i", &payload, "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_kind_override_changes_filename() {
    let payload = write_payload("kind-override.json", WIDGET_PAYLOAD);
    let output_file = "estimate-INV-100.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args(["-i", &payload, "-k", "estimate", "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_dir().join(output_file).exists(), "PDF file was not created");
}

#[test]
fn test_draft_filename_when_number_absent() {
    let payload = write_payload(
        "no-number.json",
        r#"{"kind": "bill", "date": "2024-01-15", "items": []}"#,
    );
    let output_file = "bill-draft.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args(["-i", &payload, "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_dir().join(output_file).exists(), "PDF file was not created");
}

#[test]
fn test_summary_reports_total() {
    let payload = write_payload("summary.json", WIDGET_PAYLOAD);

    let output = cargo_bin()
        .args(["-i", &payload, "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("$30.00"), "summary missing recomputed total: {}", stdout);
}

#[test]
fn test_invalid_payload_file() {
    let output = cargo_bin()
        .args(["-i", "nonexistent.json", "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing payload");
}

#[test]
fn test_invalid_payload_json() {
    let payload = write_payload("broken.json", "{ not json");

    let output = cargo_bin()
        .args(["-i", &payload, "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid JSON");
}

#[test]
fn test_invalid_date_format() {
    let payload = write_payload("bad-date.json", WIDGET_PAYLOAD);

    let output = cargo_bin()
        .args(["-i", &payload, "-d", "not-a-date", "-o", "tests/output"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid date override");
}

#[test]
fn test_stdin_payload() {
    use std::io::Write;
    use std::process::Stdio;

    setup();
    let output_file = "invoice-STDIN-1.pdf";
    cleanup_file(output_file);

    let mut child = cargo_bin()
        .args(["-i", "-", "-n", "STDIN-1", "-o", "tests/output"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child
        .stdin
        .as_mut()
        .expect("no stdin")
        .write_all(WIDGET_PAYLOAD.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for command");
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_dir().join(output_file).exists(), "PDF file was not created");
}
