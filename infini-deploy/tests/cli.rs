// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fs;

use assert_cmd::Command;
use prost::Message;
use tempfile::TempDir;

const NETWORK_VARS: [&str; 6] = [
    "RPC_URL_SEPOLIA",
    "ACCOUNT_ADDRESS_SEPOLIA",
    "PRIVATE_KEY_SEPOLIA",
    "RPC_URL_DEVNET",
    "ACCOUNT_ADDRESS_DEVNET",
    "PRIVATE_KEY_DEVNET",
];

/// Runs the binary from an empty directory so no `.env` file is picked up.
fn infini(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("infini").unwrap();
    cmd.current_dir(dir.path());
    for var in NETWORK_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn missing_network_env_fails_before_connecting() {
    let dir = TempDir::new().unwrap();
    let output = infini(&dir)
        .args(["deploy", "--network", "sepolia"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("RPC_URL_SEPOLIA"), "{stderr}");
    assert!(stderr.contains("PRIVATE_KEY_SEPOLIA"), "{stderr}");
    assert!(!dir.path().join("deployments").exists());
}

#[test]
fn devnet_requires_every_variable() {
    let dir = TempDir::new().unwrap();
    let output = infini(&dir)
        .args(["balance", "--network", "devnet"])
        .env("RPC_URL_DEVNET", "http://127.0.0.1:5050")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("ACCOUNT_ADDRESS_DEVNET"), "{stderr}");
    assert!(stderr.contains("PRIVATE_KEY_DEVNET"), "{stderr}");
    assert!(!stderr.contains("RPC_URL_DEVNET"), "{stderr}");
}

#[test]
fn certificate_requires_name() {
    let dir = TempDir::new().unwrap();
    let output = infini(&dir)
        .args(["deploy-certificate", "--network", "sepolia", "--metadata", "ipfs://x"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--name"));
}

#[test]
fn upgrade_without_env_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    infini(&dir)
        .args([
            "upgrade",
            "--network",
            "sepolia",
            "--address",
            "0x1234",
            "--update-components",
        ])
        .assert()
        .code(1);
}

#[test]
fn index_reports_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = infini(&dir)
        .args(["index", "--input", "events.bin"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("events.bin"));
}

#[test]
fn index_saves_merchants() {
    let dir = TempDir::new().unwrap();
    let events = infini_indexer::pb::Events {
        merchant_contracts: vec![
            infini_indexer::pb::MerchantContract {
                merchant_address: "0xa".to_string(),
                points_contract: "0x1".to_string(),
            },
            infini_indexer::pb::MerchantContract {
                merchant_address: "0xb".to_string(),
                points_contract: "0x2".to_string(),
            },
        ],
    };
    fs::write(dir.path().join("events.bin"), events.encode_to_vec()).unwrap();

    infini(&dir)
        .args(["index", "--input", "events.bin", "--store", "out/merchants.json"])
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("out/merchants.json")).unwrap()).unwrap();
    assert_eq!(saved["0xa"]["merchantAddress"], "0xa");
    assert_eq!(saved["0xb"]["pointsContract"], "0x2");
}

#[test]
fn index_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("events.bin"), [0xff, 0xff, 0xff]).unwrap();

    infini(&dir)
        .args(["index", "--input", "events.bin"])
        .assert()
        .code(1);
    assert!(!dir.path().join("merchants.json").exists());
}
