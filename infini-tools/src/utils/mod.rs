// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! General purpose utilities.
//!
//! None of these are specific to InfiniRewards, but they are used throughout
//! [`infini-tools`](crate) to parse and print Starknet values.

use std::{fs, path::Path};

use rand::RngCore;
use starknet::core::types::Felt;

pub mod color;

/// Parses a felt from a `0x`-prefixed hex string or a decimal string.
pub fn parse_felt(text: &str) -> Result<Felt, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty value".to_string());
    }
    let parsed = if text.starts_with("0x") || text.starts_with("0X") {
        Felt::from_hex(text)
    } else {
        Felt::from_dec_str(text)
    };
    parsed.map_err(|err| format!("invalid felt {text:?}: {err}"))
}

/// Formats a felt as a minimal `0x`-prefixed hex string.
pub fn format_felt(felt: &Felt) -> String {
    format!("{felt:#x}")
}

/// Formats a felt as `0x` followed by exactly 64 hex digits.
pub fn format_felt_padded(felt: &Felt) -> String {
    format!("0x{}", hex::encode(felt.to_bytes_be()))
}

/// Random salt for UDC deployments.
///
/// The top bits are cleared so the value is always below the field prime.
pub fn random_salt() -> Felt {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    bytes[0] &= 0x03;
    Felt::from_bytes_be(&bytes)
}

/// Check if a directory exists, creating it (and its parents) if not.
pub fn create_dir_if_dne(path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Milliseconds since the unix epoch, used to name snapshot files.
pub fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current time as an RFC 3339 string with millisecond precision.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
