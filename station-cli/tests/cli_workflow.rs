#![allow(missing_docs)]
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

/// Base64 of 32 zero bytes.
const ZERO_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

fn station(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("station").expect("Failed to find station binary");
    cmd.env_remove("STATION_KEY")
        .env_remove("STATION_STORE")
        .arg("--store")
        .arg(store);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run station");
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8(output.stdout).expect("stdout is not UTF-8")
}

#[test]
fn test_full_mission_workflow() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = temp_dir.path().join("missions");
    let key_file = temp_dir.path().join("station.key");

    station(&store).arg("init").assert().success();
    assert!(store.join("station.json").exists());

    let key = stdout_of(station(&store).arg("keygen").arg("--out").arg(&key_file));
    assert_eq!(
        key.trim(),
        std::fs::read_to_string(&key_file).expect("Failed to read key file")
    );

    let id = stdout_of(station(&store).arg("--key-file").arg(&key_file).arg("create"))
        .trim()
        .to_string();
    assert_eq!(id.len(), 5);

    station(&store)
        .arg("--key-file")
        .arg(&key_file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()));

    let pad_before = stdout_of(station(&store).arg("--key-file").arg(&key_file).arg("show").arg(&id));
    let rows_before: Vec<&str> = pad_before.lines().collect();
    assert_eq!(rows_before.len(), 100);

    station(&store)
        .arg("--key-file")
        .arg(&key_file)
        .arg("broadcast")
        .arg(&id)
        .arg("MEET")
        .arg("AT")
        .arg("DAWN")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Mission: {id}")))
        .stdout(predicate::str::contains(format!("Consumed row: {}", rows_before[0])))
        .stdout(predicate::str::contains("99 rows remaining"));

    let pad_after = stdout_of(station(&store).arg("--key-file").arg(&key_file).arg("show").arg(&id));
    let rows_after: Vec<&str> = pad_after.lines().collect();
    assert_eq!(rows_after, rows_before[1..]);

    station(&store)
        .arg("--key-file")
        .arg(&key_file)
        .arg("remove")
        .arg(&id)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Removed mission '{id}'")));

    station(&store)
        .arg("--key-file")
        .arg(&key_file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No missions found"));
}

#[test]
fn test_broadcast_decodes_with_consumed_row() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = temp_dir.path().join("missions");
    station(&store).arg("init").assert().success();

    let id = stdout_of(station(&store).arg("--key").arg(ZERO_KEY).arg("create"))
        .trim()
        .to_string();
    let output = stdout_of(
        station(&store)
            .arg("--key")
            .arg(ZERO_KEY)
            .arg("broadcast")
            .arg(&id)
            .arg("hello")
            .arg("--json"),
    );
    let tx: serde_json::Value = serde_json::from_str(&output).expect("Failed to parse JSON");
    let cipher = tx["cipher_digits"].as_str().expect("missing cipher_digits");
    let row = tx["consumed_row"].as_str().expect("missing consumed_row");

    station(&store)
        .arg("decode")
        .arg("--pad")
        .arg(row)
        .arg("--cipher")
        .arg(cipher)
        .assert()
        .success()
        .stdout("HELLO\n");
}

#[test]
fn test_decode_without_store_or_key() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    station(&temp_dir.path().join("absent"))
        .arg("decode")
        .arg("--pad")
        .arg("12345 67890")
        .arg("--cipher")
        .arg("10396 88005")
        .assert()
        .success()
        .stdout("HELLO\n");
}

#[test]
fn test_list_json_and_foreign_key() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = temp_dir.path().join("missions");
    station(&store)
        .arg("init")
        .arg("--pages")
        .arg("4")
        .assert()
        .success();
    station(&store).arg("--key").arg(ZERO_KEY).arg("create").assert().success();

    let output = stdout_of(station(&store).arg("--key").arg(ZERO_KEY).arg("list").arg("--json"));
    let listing: serde_json::Value = serde_json::from_str(&output).expect("Failed to parse JSON");
    assert_eq!(listing.as_array().map(Vec::len), Some(1));
    assert_eq!(listing[0]["rows_remaining"], 4);

    let other_key = stdout_of(station(&store).arg("keygen"));
    station(&store)
        .arg("--key")
        .arg(other_key.trim())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No missions found"));
}

#[test]
fn test_errors_exit_with_failure() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = temp_dir.path().join("missions");

    // Store does not exist yet.
    station(&store).arg("--key").arg(ZERO_KEY).arg("list").assert().failure();

    station(&store).arg("init").assert().success();
    // No key supplied.
    station(&store)
        .env("RUST_LOG", "error")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no session key supplied"));
    // Ten-byte key.
    station(&store)
        .arg("--key")
        .arg("AAAAAAAAAAAAAA==")
        .arg("list")
        .assert()
        .failure();
    // Unknown mission.
    station(&store)
        .arg("--key")
        .arg(ZERO_KEY)
        .arg("broadcast")
        .arg("NOPE1")
        .arg("HI")
        .assert()
        .failure();
}

#[test]
fn test_init_rejects_zero_sized_layout() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = temp_dir.path().join("missions");

    station(&store)
        .arg("init")
        .arg("--id-length")
        .arg("0")
        .assert()
        .failure();
    assert!(!store.join("station.json").exists());

    station(&store)
        .arg("init")
        .arg("--groups")
        .arg("0")
        .assert()
        .failure();
    assert!(!store.exists());
}
