use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ros-extract"))
}

fn artifacts(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect();
    found.sort();
    found
}

fn read_only(dir: &Path, ext: &str) -> (PathBuf, String) {
    let found = artifacts(dir, ext);
    assert_eq!(found.len(), 1, "expected one .{ext} file, found {found:?}");
    let text = fs::read_to_string(&found[0]).expect("read artifact");
    (found[0].clone(), text)
}

#[test]
fn extract_writes_script_and_env() {
    let dir = tempdir().expect("tempdir");

    bin()
        .arg("extract")
        .arg(fixture("fixtures/mikrotik-vcf.json"))
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction from 192.168.3.1"))
        .stdout(predicate::str::contains("provision-mikrotik-vcf.sh -c"))
        .stdout(predicate::str::contains("/import file-name=extracted_192_168_3_1_"));

    let (script_path, script) = read_only(dir.path(), "rsc");
    let name = script_path.file_name().and_then(|n| n.to_str()).expect("name");
    assert!(name.starts_with("extracted_192_168_3_1_"), "{name}");
    assert!(script.starts_with("# MikroTik RouterOS Configuration Script\n"));
    assert!(script.contains("/system identity set name=\"crs-vcf-01\""));
    assert!(script.contains("/ip route add dst-address=0.0.0.0/0 gateway=192.168.3.254"));
    assert!(!script.contains("10.99.0.0/16"));
    assert!(!script.contains("fasttrack"));

    let (_, env) = read_only(dir.path(), "env");
    for line in [
        "MIKROTIK_IP=\"192.168.3.1\"",
        "MIKROTIK_USER=\"admin\"",
        "MIKROTIK_PASSWORD=\"\"",
        "MGMT_VLAN_ID=\"100\"",
        "EDGE_TEP_VLAN_ID=\"104\"",
        "TEP_NETWORK=\"172.16.103.0/22\"",
        "BRIDGE_NAME=\"br-lab\"",
        "UPLINK_INTERFACES=\"ether9,ether10\"",
        "TRUNK_INTERFACES=\"ether1,ether2,ether3\"",
        "MGMT_ACCESS_PORTS=\"ether7,ether8\"",
        "DNS_SERVERS=\"1.1.1.1,9.9.9.9\"",
        "ENABLE_SNMP=\"yes\"",
        "SNMP_COMMUNITY=\"vcf-ro\"",
        "SNMP_LOCATION=\"Lab Rack 4\"",
    ] {
        assert!(env.lines().any(|l| l == line), "missing {line} in\n{env}");
    }

    assert!(artifacts(dir.path(), "json").is_empty());
}

#[test]
fn extract_honours_host_username_prefix_and_json() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("nested").join("out");

    bin()
        .arg("extract")
        .arg(fixture("fixtures/mikrotik-vcf.json"))
        .args(["--host", "10.1.1.1", "--username", "ops", "--prefix", "lab", "--json"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let (rsc, script) = read_only(&out, "rsc");
    assert!(rsc
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("lab_10_1_1_1_")));
    assert!(script.contains("# Extracted from 10.1.1.1 on "));

    let (_, env) = read_only(&out, "env");
    assert!(env.contains("MIKROTIK_IP=\"10.1.1.1\""));
    assert!(env.contains("MIKROTIK_USER=\"ops\""));

    let (_, json) = read_only(&out, "json");
    let dump: Value = serde_json::from_str(&json).expect("json dump");
    assert_eq!(dump["extraction_info"]["host"], "192.168.3.1");
    assert_eq!(dump["interfaces"]["vlan"][0]["vlan-id"], "100");
}

#[test]
fn extract_degrades_on_unreadable_category() {
    let dir = tempdir().expect("tempdir");

    bin()
        .arg("extract")
        .arg(fixture("fixtures/mikrotik-minimal.json"))
        .env_remove("RUST_LOG")
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("category unavailable"));

    let (_, env) = read_only(dir.path(), "env");
    assert!(env.contains("MIKROTIK_IP=\"192.168.3.1\""));
    assert!(env.contains("VSAN_VLAN_ID=\"102\""));
    assert!(env.contains("BRIDGE_NAME=\"br-vcf\""));
    assert!(env.contains("DNS_SERVERS=\"8.8.8.8,8.8.4.4\""));
    assert!(env.contains("ENABLE_SNMP=\"no\""));
    assert!(!env.contains("UPLINK_INTERFACES"));

    let (_, script) = read_only(dir.path(), "rsc");
    assert!(script.contains("/system identity set name=\"MikroTik\""));
    assert!(!script.contains("/ip "));
}

#[test]
fn extract_strict_fails_before_writing() {
    let dir = tempdir().expect("tempdir");

    bin()
        .arg("extract")
        .arg(fixture("fixtures/mikrotik-vcf.json"))
        .arg("--strict")
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode failed"))
        .stderr(predicate::str::contains("role_conflict"));

    assert!(fs::read_dir(dir.path()).expect("read dir").next().is_none());
}

#[test]
fn extract_reports_missing_snapshot() {
    let dir = tempdir().expect("tempdir");

    bin()
        .arg("extract")
        .arg(dir.path().join("missing.json"))
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read snapshot"));
}

#[test]
fn extract_fails_when_output_dir_is_a_file() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").expect("write blocker");

    bin()
        .arg("extract")
        .arg(fixture("fixtures/mikrotik-vcf.json"))
        .arg("--output-dir")
        .arg(&blocker)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create output directory"));
}
