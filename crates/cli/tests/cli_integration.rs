use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const UPLOAD_SCHEMA: &str = r#"{
  "banner": "Usage: upload [OPTIONS] [--] [ARGS...]",
  "options": [
    { "kind": "flag", "short": "v", "long": "verbose", "desc": "Provide verbose output" },
    { "short": "H", "long": "host", "desc": "The hostname", "default": "localhost" },
    { "short": "p", "long": "port", "desc": "The port number", "default": 8080 },
    { "kind": "required", "short": "f", "long": "files", "desc": "Files to upload", "multi": true },
    { "short": "e", "long": "exclude-from", "desc": "Directories to exclude" }
  ]
}"#;

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("clip-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn write_schema(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("options.json");
    fs::write(&path, text).expect("failed to write schema");
    path
}

fn clip() -> Command {
    Command::new(env!("CARGO_BIN_EXE_clip"))
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "clip failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    serde_json::from_slice(&out.stdout).expect("stdout is not JSON")
}

#[test]
fn help_works() {
    let out = clip().arg("--help").output().expect("failed to run clip --help");
    assert!(
        out.status.success(),
        "clip --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("parse") && stdout.contains("usage") && stdout.contains("hash"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parse_binds_values_defaults_and_remainder() {
    let dir = make_temp_dir("parse-ok");
    let schema = write_schema(&dir, UPLOAD_SCHEMA);

    let out = clip()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "extra", "--files", "foo", "-f", "bar,baz", "-v"])
        .output()
        .expect("failed to run clip parse");
    let json = stdout_json(&out);

    assert_eq!(json["values"]["files"], serde_json::json!(["foo", "bar", "baz"]));
    assert_eq!(json["values"]["port"], "8080");
    assert_eq!(json["values"]["host"], "localhost");
    assert_eq!(json["values"]["verbose"], true);
    assert_eq!(json["remainder"], serde_json::json!(["extra"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_reports_errors_with_usage() {
    let dir = make_temp_dir("parse-invalid");
    let schema = write_schema(&dir, UPLOAD_SCHEMA);

    let out = clip()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "--port", "9", "--bogus"])
        .output()
        .expect("failed to run clip parse");
    assert_eq!(out.status.code(), Some(2), "expected exit status 2");
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&out.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines[0], "Errors:", "unexpected output:\n{stderr}");
    assert!(lines.contains(&"bogus: Unrecognized parameter"), "{stderr}");
    assert!(lines.contains(&"files: Missing required parameter: files"), "{stderr}");
    assert!(stderr.contains("Usage: upload [OPTIONS]"), "{stderr}");
    assert!(stderr.contains("-f --files         Files to upload REQUIRED"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_help_trigger_prints_usage_and_succeeds() {
    let dir = make_temp_dir("parse-help");
    let schema = write_schema(&dir, UPLOAD_SCHEMA);

    let out = clip()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "--bogus", "-h"])
        .output()
        .expect("failed to run clip parse");
    assert!(out.status.success(), "status: {}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Usage: upload [OPTIONS]"), "{stdout}");
    assert!(stdout.contains("-p --port          The port number (default: 8080)"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_line_honors_quotes_and_terminator() {
    let dir = make_temp_dir("parse-line");
    let schema = write_schema(&dir, UPLOAD_SCHEMA);

    let out = clip()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .arg("--line")
        .arg("--files 'my file.txt' --exclude-from \"/tmp/a b\" -- --port 9")
        .output()
        .expect("failed to run clip parse");
    let json = stdout_json(&out);

    assert_eq!(json["values"]["files"], serde_json::json!(["my file.txt"]));
    assert_eq!(json["values"]["exclude_from"], "/tmp/a b");
    assert_eq!(json["values"]["port"], "8080");
    assert_eq!(json["remainder"], serde_json::json!(["--port", "9"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_renders_declarations_in_order() {
    let dir = make_temp_dir("usage");
    let schema = write_schema(&dir, UPLOAD_SCHEMA);

    let out = clip()
        .arg("usage")
        .arg("--schema")
        .arg(&schema)
        .output()
        .expect("failed to run clip usage");
    assert!(out.status.success(), "status: {}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "Usage: upload [OPTIONS] [--] [ARGS...]",
            "-v --verbose       Provide verbose output",
            "-H --host          The hostname (default: localhost)",
            "-p --port          The port number (default: 8080)",
            "-f --files         Files to upload REQUIRED",
            "-e --exclude-from  Directories to exclude",
        ]
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_declarations_fail_before_parsing() {
    let dir = make_temp_dir("bad-schema");
    let schema = write_schema(
        &dir,
        r#"{ "options": [
            { "short": "p", "long": "port" },
            { "short": "p", "long": "path" }
        ] }"#,
    );

    let out = clip()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "-p", "1"])
        .output()
        .expect("failed to run clip parse");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("'p' is already declared"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn hash_maps_undeclared_arguments() {
    let out = clip()
        .arg("hash")
        .args(["--", "build", "-v", "--name", "x", "--tag", "a", "--tag", "b", "rest"])
        .output()
        .expect("failed to run clip hash");
    let json = stdout_json(&out);

    assert_eq!(json["values"]["v"], true);
    assert_eq!(json["values"]["name"], "x");
    assert_eq!(json["values"]["tag"], serde_json::json!(["a", "b"]));
    assert_eq!(json["remainder"], serde_json::json!(["build", "rest"]));
}
