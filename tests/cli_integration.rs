//! Integration tests for the KeySeal CLI.
//!
//! These run the binary end-to-end with `assert_cmd`.  The master key is
//! passed through the environment so no config file is needed, and
//! `--yes` skips the interactive reveal prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const ZERO_KEY_B64: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";
const OTHER_KEY_B64: &str = "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=";
const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Helper: a Command pointing at the keyseal binary with a clean environment.
fn keyseal(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("keyseal").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("KEYSEAL_MASTER_KEY")
        .env_remove("MASTER_KEY_BASE64")
        .env_remove("KEYSEAL_ALLOW_REVEAL")
        .env_remove("KEYSEAL_REQUIRE_MASTER_KEY")
        .env_remove("KEYSEAL_CONFIG_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Seal the test key with `master` and write the record to `record.json`.
fn seal_test_key(dir: &TempDir, master: &str) -> std::path::PathBuf {
    let output = keyseal(dir)
        .args(["seal", "--hex", TEST_PRIVATE_KEY])
        .env("KEYSEAL_MASTER_KEY", master)
        .output()
        .unwrap();
    assert!(output.status.success());

    let path = dir.child("record.json");
    path.write_binary(&output.stdout).unwrap();
    path.path().to_path_buf()
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Envelope encryption for private keys"))
        .stdout(predicate::str::contains("seal"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("gen-master"));
}

#[test]
fn no_args_shows_usage() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_shows_envelope_format() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("keyseal"))
        .stdout(predicate::str::contains("HKDF-SHA256 v1"));
}

#[test]
fn seal_prints_record_json() {
    let tmp = TempDir::new().unwrap();
    let output = keyseal(&tmp)
        .args(["seal", "--hex", TEST_PRIVATE_KEY])
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kdf"], "HKDF-SHA256");
    assert_eq!(value["version"], 1);
    assert!(value["created_at"].is_string());
    assert_eq!(value["eth_address"], TEST_ADDRESS);
    assert!(!String::from_utf8_lossy(&output.stdout).contains(&TEST_PRIVATE_KEY[2..]));
}

#[test]
fn seal_hex_rejects_invalid_scalar() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .args(["seal", "--hex", &"00".repeat(32)])
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not a valid secp256k1 scalar"));
}

#[test]
fn generate_record_opens_to_its_address() {
    let tmp = TempDir::new().unwrap();
    let output = keyseal(&tmp)
        .arg("generate")
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let address = value["eth_address"].as_str().unwrap().to_string();
    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);
    assert!(String::from_utf8_lossy(&output.stderr).contains(&address));

    let record = tmp.child("generated.json");
    record.write_binary(&output.stdout).unwrap();
    keyseal(&tmp)
        .arg("open")
        .arg(record.path())
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .assert()
        .success()
        .stderr(predicate::str::contains(address.as_str()));
}

#[test]
fn seal_reads_stdin() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .arg("seal")
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .write_stdin("a secret from stdin")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted_private_key"));
}

#[test]
fn seal_accepts_empty_input() {
    let tmp = TempDir::new().unwrap();
    let output = keyseal(&tmp)
        .arg("seal")
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .write_stdin("")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["encrypted_private_key"], "");
    assert!(value.get("eth_address").is_none());

    let record = tmp.child("empty.json");
    record.write_binary(&output.stdout).unwrap();
    keyseal(&tmp)
        .arg("open")
        .arg(record.path())
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .assert()
        .success()
        .stderr(predicate::str::contains("Envelope verified (0 bytes"));
}

#[test]
fn seal_without_master_key_warns() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .args(["seal", "--hex", TEST_PRIVATE_KEY])
        .assert()
        .success()
        .stderr(predicate::str::contains("No master key configured"));
}

#[test]
fn seal_fails_when_master_key_required() {
    let tmp = TempDir::new().unwrap();
    keyseal(&tmp)
        .args(["seal", "--hex", TEST_PRIVATE_KEY])
        .env("KEYSEAL_REQUIRE_MASTER_KEY", "true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no master key configured"));
}

#[test]
fn open_verifies_without_revealing() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .arg("open")
        .arg(&record)
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!(
            "Envelope verified (private key for {TEST_ADDRESS})"
        )));
}

#[test]
fn open_detects_address_mismatch() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&record).unwrap()).unwrap();
    value["eth_address"] = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".into();
    std::fs::write(&record, value.to_string()).unwrap();

    keyseal(&tmp)
        .args(["open", "--reveal", "--yes"])
        .arg(&record)
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .env("KEYSEAL_ALLOW_REVEAL", "true")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Address mismatch"));
}

#[test]
fn open_reveal_prints_key_when_allowed() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .args(["open", "--reveal", "--yes"])
        .arg(&record)
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .env("KEYSEAL_ALLOW_REVEAL", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains(TEST_PRIVATE_KEY))
        .stderr(predicate::str::contains(TEST_ADDRESS));
}

#[test]
fn open_reveal_is_refused_by_default() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .args(["open", "--reveal", "--yes"])
        .arg(&record)
        .env("KEYSEAL_MASTER_KEY", ZERO_KEY_B64)
        .assert()
        .failure()
        .stderr(predicate::str::contains("revealing secrets is disabled"));
}

#[test]
fn open_reveal_allowed_by_config_file() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);
    tmp.child(".keyseal.toml")
        .write_str(&format!(
            "master_key = \"{ZERO_KEY_B64}\"\nallow_reveal = true\n"
        ))
        .unwrap();

    keyseal(&tmp)
        .args(["open", "--reveal", "--yes"])
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains(TEST_PRIVATE_KEY));
}

#[test]
fn config_dir_can_come_from_environment() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);
    let conf = tmp.child("conf");
    conf.child(".keyseal.toml")
        .write_str(&format!(
            "master_key = \"{ZERO_KEY_B64}\"\nallow_reveal = true\n"
        ))
        .unwrap();

    keyseal(&tmp)
        .args(["open", "--reveal", "--yes"])
        .arg(&record)
        .env("KEYSEAL_CONFIG_DIR", conf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(TEST_PRIVATE_KEY));
}

#[test]
fn config_flag_overrides_environment() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);
    tmp.child("good/.keyseal.toml")
        .write_str(&format!("master_key = \"{ZERO_KEY_B64}\"\n"))
        .unwrap();
    tmp.child("bad/.keyseal.toml")
        .write_str(&format!("master_key = \"{OTHER_KEY_B64}\"\n"))
        .unwrap();

    keyseal(&tmp)
        .arg("open")
        .arg(&record)
        .env("KEYSEAL_CONFIG_DIR", tmp.child("bad").path())
        .args(["--config", tmp.child("good").path().to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn open_with_wrong_master_fails() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .arg("open")
        .arg(&record)
        .env("KEYSEAL_MASTER_KEY", OTHER_KEY_B64)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn open_without_master_key_fails() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .arg("open")
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no master key configured"));
}

#[test]
fn inspect_shows_format_table() {
    let tmp = TempDir::new().unwrap();
    let record = seal_test_key(&tmp, ZERO_KEY_B64);

    keyseal(&tmp)
        .arg("inspect")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("HKDF-SHA256"))
        .stdout(predicate::str::contains("32 bytes"))
        .stdout(predicate::str::contains("created_at"))
        .stdout(predicate::str::contains(TEST_ADDRESS));
}

#[test]
fn inspect_rejects_unsupported_version() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.child("bad.json");
    bad.write_str(
        r#"{"encrypted_private_key":"AA==","iv":"AA==","tag":"AA==","salt":"AA==","kdf":"HKDF-SHA256","version":2}"#,
    )
    .unwrap();

    keyseal(&tmp)
        .arg("inspect")
        .arg(bad.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported envelope format"));
}

#[test]
fn inspect_rejects_string_version() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.child("bad.json");
    bad.write_str(
        r#"{"encrypted_private_key":"AA==","iv":"AA==","tag":"AA==","salt":"AA==","kdf":"HKDF-SHA256","version":"1"}"#,
    )
    .unwrap();

    keyseal(&tmp)
        .arg("inspect")
        .arg(bad.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported envelope format"))
        .stderr(predicate::str::contains("Serialization").not());
}

#[test]
fn completions_cover_documented_shells_only() {
    let tmp = TempDir::new().unwrap();
    for shell in ["bash", "zsh", "fish"] {
        keyseal(&tmp)
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("keyseal"));
    }
    keyseal(&tmp)
        .args(["completions", "powershell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("choose bash, zsh or fish"));
}

#[test]
fn gen_master_prints_32_byte_key() {
    let tmp = TempDir::new().unwrap();
    let output = keyseal(&tmp).arg("gen-master").output().unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let decoded = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(line.trim())
            .unwrap()
    };
    assert_eq!(decoded.len(), 32);
}
