#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn data_file(dir: &TempDir) -> PathBuf {
    dir.path().join("pdf-form-filler/personal_data.json")
}

fn formfill(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("formfill").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PDF_FORM_FILLER_DATA")
        .env("HOME", dir.path())
        .env_remove("XDG_CONFIG_HOME")
        .arg("--data-file")
        .arg(data_file(dir));
    cmd
}

fn init_with_child(dir: &TempDir) {
    formfill(dir).arg("init").assert().success();
    formfill(dir)
        .args(["add-member", "--id", "child_1", "--role", "child"])
        .assert()
        .success();
}

fn show_member(dir: &TempDir, id: &str) -> serde_json::Value {
    let out = formfill(dir)
        .args(["show", "--member", id])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

// ---------------------------------------------------------------------------
// formfill init / show
// ---------------------------------------------------------------------------

#[test]
fn init_creates_empty_document() {
    let dir = TempDir::new().unwrap();
    formfill(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized personal data at"));

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(data_file(&dir)).unwrap()).unwrap();
    assert_eq!(doc["members"], serde_json::json!({}));
}

#[test]
fn init_twice_fails_with_already_exists() {
    let dir = TempDir::new().unwrap();
    formfill(&dir).arg("init").assert().success();
    formfill(&dir)
        .arg("init")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("error[AlreadyExists]"));
}

#[test]
fn init_from_template_records_it() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.json");
    std::fs::write(
        &template,
        r#"{ "members": { "self": { "role": "self", "first_name": null } } }"#,
    )
    .unwrap();

    formfill(&dir)
        .arg("init")
        .arg("--template")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded from template"));

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(data_file(&dir)).unwrap()).unwrap();
    let recorded = PathBuf::from(doc["template"].as_str().unwrap());
    assert_eq!(recorded, std::fs::canonicalize(&template).unwrap());
    assert_eq!(doc["members"]["self"]["role"], "self");
}

#[test]
fn init_with_missing_template_is_not_found() {
    let dir = TempDir::new().unwrap();
    formfill(&dir)
        .args(["init", "--template", "no-such-template.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("template not found"));
    assert!(!data_file(&dir).exists());
}

#[test]
fn show_without_data_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    formfill(&dir)
        .arg("show")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error[NotFound]"))
        .stderr(predicate::str::contains("formfill init"));
}

#[test]
fn show_corrupt_data_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = data_file(&dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ \"members\": ").unwrap();
    formfill(&dir)
        .arg("show")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("error[ParseError]"));
}

#[test]
fn show_unknown_member_lists_available() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["show", "--member", "parent_1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("child_1"));
}

#[test]
fn json_errors_are_machine_readable() {
    let dir = TempDir::new().unwrap();
    let out = formfill(&dir)
        .args(["--json", "show"])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["error"]["kind"], "NotFound");
}

// ---------------------------------------------------------------------------
// formfill add-member / update
// ---------------------------------------------------------------------------

#[test]
fn first_run_scenario() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);

    let child = show_member(&dir, "child_1");
    assert_eq!(child["role"], "child");

    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "first_name", "--value", "Jan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("child_1.first_name: (empty) -> Jan"));

    assert_eq!(show_member(&dir, "child_1")["first_name"], "Jan");
}

#[test]
fn add_member_twice_fails_and_keeps_document() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    let before = std::fs::read(data_file(&dir)).unwrap();

    formfill(&dir)
        .args(["add-member", "--id", "child_1", "--role", "parent"])
        .assert()
        .code(4);
    assert_eq!(std::fs::read(data_file(&dir)).unwrap(), before);
}

#[test]
fn update_creates_nested_groups() {
    let dir = TempDir::new().unwrap();
    formfill(&dir).arg("init").assert().success();
    formfill(&dir)
        .args(["add-member", "--id", "grandma", "--role", "other"])
        .assert()
        .success();

    formfill(&dir)
        .args([
            "update", "--member", "grandma", "--field", "health.allergies", "--value", "pyl",
        ])
        .assert()
        .success();

    assert_eq!(show_member(&dir, "grandma")["health"]["allergies"], "pyl");
}

#[test]
fn update_through_scalar_is_invalid_path() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "first_name", "--value", "Jan"])
        .assert()
        .success();
    let before = std::fs::read(data_file(&dir)).unwrap();

    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "first_name.x", "--value", "y"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("error[InvalidPath]"));
    assert_eq!(std::fs::read(data_file(&dir)).unwrap(), before);
}

#[test]
fn update_keeps_values_as_text_and_diacritics_verbatim() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "last_name", "--value", "Novák"])
        .assert()
        .success();
    formfill(&dir)
        .args([
            "update", "--member", "child_1", "--field", "address.postal_code", "--value", "60200",
        ])
        .assert()
        .success();

    let raw = std::fs::read_to_string(data_file(&dir)).unwrap();
    assert!(raw.contains("Novák"));
    assert!(raw.contains("\"postal_code\": \"60200\""));
}

// ---------------------------------------------------------------------------
// formfill batch-update
// ---------------------------------------------------------------------------

#[test]
fn batch_update_applies_all_fields() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);

    formfill(&dir)
        .args([
            "batch-update",
            "--member",
            "child_1",
            "--updates",
            r#"{"first_name":"Jan","last_name":"Novák","date_of_birth":"2015-03-12"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 3 field(s)."));

    let child = show_member(&dir, "child_1");
    assert_eq!(child["last_name"], "Novák");
    assert_eq!(child["date_of_birth"], "2015-03-12");
}

#[test]
fn batch_update_with_invalid_path_writes_nothing() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "first_name", "--value", "Jan"])
        .assert()
        .success();
    let before = std::fs::read(data_file(&dir)).unwrap();

    formfill(&dir)
        .args([
            "batch-update",
            "--member",
            "child_1",
            "--updates",
            r#"{"last_name":"Novák","first_name.x":"y"}"#,
        ])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("first_name.x"))
        .stderr(predicate::str::contains("nothing was saved"));
    assert_eq!(std::fs::read(data_file(&dir)).unwrap(), before);
}

#[test]
fn batch_update_with_malformed_json_is_parse_error() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["batch-update", "--member", "child_1", "--updates", "{first_name: Jan}"])
        .assert()
        .code(6);
}

// ---------------------------------------------------------------------------
// formfill find-gaps
// ---------------------------------------------------------------------------

#[test]
fn find_gaps_empties_after_filling() {
    let dir = TempDir::new().unwrap();
    formfill(&dir).arg("init").assert().success();
    formfill(&dir)
        .args(["add-member", "--id", "parent_1", "--role", "parent"])
        .assert()
        .success();

    let out = formfill(&dir)
        .args(["--json", "find-gaps", "--member", "parent_1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let gaps = report["gaps"].as_array().unwrap().clone();
    assert_eq!(gaps[0], "first_name");
    assert!(gaps.contains(&serde_json::json!("address.city")));

    let fill: serde_json::Map<String, serde_json::Value> = gaps
        .iter()
        .map(|g| (g.as_str().unwrap().to_string(), serde_json::json!("x")))
        .collect();
    let updates = serde_json::Value::Object(fill).to_string();
    formfill(&dir)
        .args([
            "batch-update",
            "--member",
            "parent_1",
            "--updates",
            updates.as_str(),
        ])
        .assert()
        .success();

    formfill(&dir)
        .args(["find-gaps", "--member", "parent_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No missing fields for 'parent_1'"));
}

#[test]
fn find_gaps_with_field_filter() {
    let dir = TempDir::new().unwrap();
    init_with_child(&dir);
    formfill(&dir)
        .args(["update", "--member", "child_1", "--field", "first_name", "--value", "Jan"])
        .assert()
        .success();

    formfill(&dir)
        .args(["find-gaps", "--member", "child_1", "--fields", "first_name,health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("health.allergies"))
        .stdout(predicate::str::contains("- first_name").not());
}

// ---------------------------------------------------------------------------
// Data-file resolution
// ---------------------------------------------------------------------------

#[test]
fn env_var_selects_data_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("elsewhere.json");
    let mut cmd = Command::cargo_bin("formfill").unwrap();
    cmd.current_dir(dir.path())
        .env("PDF_FORM_FILLER_DATA", &path)
        .arg("init")
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn default_path_is_under_config_dir() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("formfill").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PDF_FORM_FILLER_DATA")
        .env_remove("XDG_CONFIG_HOME")
        .env("HOME", dir.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ".config/pdf-form-filler/personal_data.json",
        ))
        .stdout(predicate::str::contains("(missing)"));
}
