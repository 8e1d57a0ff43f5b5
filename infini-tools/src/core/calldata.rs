// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Cairo calldata encoding for constructor arguments.
//!
//! Arguments are given as strings keyed by name and encoded according to the type the ABI
//! declares for them. Only the types used by the InfiniRewards constructors are supported:
//! single-felt types, `u256` and `ByteArray`.

use std::collections::BTreeMap;

use starknet::core::types::Felt;

use crate::{core::artifact::Abi, utils::parse_felt};

/// Bytes packed into each full `ByteArray` word.
const BYTES_PER_WORD: usize = 31;

#[derive(Debug, thiserror::Error)]
pub enum CalldataError {
    #[error("missing constructor argument `{0}`")]
    MissingArgument(String),
    #[error("invalid value for `{name}` ({ty}): {reason}")]
    InvalidValue {
        name: String,
        ty: String,
        reason: String,
    },
    #[error("unsupported type {ty} for `{name}`")]
    UnsupportedType { name: String, ty: String },
}

/// Encodes `args` in the order of the constructor inputs declared by `abi`.
///
/// Arguments the constructor does not declare are ignored.
pub fn compile_constructor(
    abi: &Abi,
    args: &BTreeMap<String, String>,
) -> Result<Vec<Felt>, CalldataError> {
    let mut calldata = Vec::new();
    for input in abi.constructor_inputs() {
        let value = args
            .get(&input.name)
            .ok_or_else(|| CalldataError::MissingArgument(input.name.clone()))?;
        calldata.extend(encode_value(&input.name, &input.ty, value)?);
    }
    Ok(calldata)
}

/// Encodes a single value of Cairo type `ty`.
pub fn encode_value(name: &str, ty: &str, value: &str) -> Result<Vec<Felt>, CalldataError> {
    let invalid = |reason: String| CalldataError::InvalidValue {
        name: name.to_string(),
        ty: ty.to_string(),
        reason,
    };
    let short = ty.rsplit("::").next().unwrap_or(ty);
    match short {
        "felt252" | "ContractAddress" | "ClassHash" | "EthAddress" => {
            Ok(vec![parse_felt(value).map_err(invalid)?])
        }
        "bool" => match value.trim() {
            "true" | "1" => Ok(vec![Felt::ONE]),
            "false" | "0" => Ok(vec![Felt::ZERO]),
            other => Err(invalid(format!("expected true or false, got {other:?}"))),
        },
        "u8" | "u16" | "u32" | "u64" | "u128" => {
            let bits: u32 = short[1..].parse().unwrap_or(128);
            let felt = parse_felt(value).map_err(invalid)?;
            if felt.bits() as u32 > bits {
                return Err(invalid(format!("does not fit in {short}")));
            }
            Ok(vec![felt])
        }
        "u256" => {
            let (high, low) = parse_u256(value).map_err(invalid)?;
            Ok(vec![Felt::from(low), Felt::from(high)])
        }
        "ByteArray" => Ok(encode_byte_array(value)),
        _ => Err(CalldataError::UnsupportedType {
            name: name.to_string(),
            ty: ty.to_string(),
        }),
    }
}

/// Serializes a string as a Cairo `ByteArray`.
///
/// Layout: number of full 31-byte words, the words, the pending word and its length.
pub fn encode_byte_array(text: &str) -> Vec<Felt> {
    let bytes = text.as_bytes();
    let full_words = bytes.len() / BYTES_PER_WORD;
    let (full, pending) = bytes.split_at(full_words * BYTES_PER_WORD);

    let mut felts = Vec::with_capacity(full_words + 3);
    felts.push(Felt::from(full_words));
    felts.extend(full.chunks(BYTES_PER_WORD).map(Felt::from_bytes_be_slice));
    felts.push(Felt::from_bytes_be_slice(pending));
    felts.push(Felt::from(pending.len()));
    felts
}

/// Parses a hex or decimal integer below 2^256 into its `(high, low)` halves.
pub fn parse_u256(text: &str) -> Result<(u128, u128), String> {
    let text = text.trim();
    if let Some(hex_digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid hex {text:?}"));
        }
        let hex_digits = hex_digits.trim_start_matches('0');
        if hex_digits.len() > 64 {
            return Err("value exceeds 256 bits".to_string());
        }
        let split = hex_digits.len().saturating_sub(32);
        let parse = |digits: &str| {
            if digits.is_empty() {
                Ok(0)
            } else {
                u128::from_str_radix(digits, 16).map_err(|err| format!("invalid hex {text:?}: {err}"))
            }
        };
        return Ok((parse(&hex_digits[..split])?, parse(&hex_digits[split..])?));
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid integer {text:?}"));
    }
    // Little-endian u64 limbs.
    let mut limbs = [0u64; 4];
    for digit in text.bytes().map(|b| u64::from(b - b'0')) {
        let mut carry = digit as u128;
        for limb in limbs.iter_mut() {
            let product = (*limb as u128) * 10 + carry;
            *limb = product as u64;
            carry = product >> 64;
        }
        if carry != 0 {
            return Err("value exceeds 256 bits".to_string());
        }
    }
    let low = (limbs[1] as u128) << 64 | limbs[0] as u128;
    let high = (limbs[3] as u128) << 64 | limbs[2] as u128;
    Ok((high, low))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::artifact::tests::FACTORY_ABI;

    #[test]
    fn short_byte_array() {
        assert_eq!(
            encode_byte_array("hello"),
            [Felt::ZERO, Felt::from(0x68656c6c6fu64), Felt::from(5u64)]
        );
        assert_eq!(encode_byte_array(""), [Felt::ZERO, Felt::ZERO, Felt::ZERO]);
    }

    #[test]
    fn byte_array_with_full_word() {
        let text = "a".repeat(31) + "bc";
        let felts = encode_byte_array(&text);
        assert_eq!(felts.len(), 4);
        assert_eq!(felts[0], Felt::ONE);
        assert_eq!(felts[1], Felt::from_bytes_be_slice(&[b'a'; 31]));
        assert_eq!(felts[2], Felt::from(0x6263u64));
        assert_eq!(felts[3], Felt::from(2u64));
    }

    #[test]
    fn u256_halves() {
        assert_eq!(parse_u256("0").unwrap(), (0, 0));
        assert_eq!(parse_u256("1000000000000000000").unwrap(), (0, 10u128.pow(18)));
        assert_eq!(parse_u256("340282366920938463463374607431768211456").unwrap(), (1, 0));
        assert_eq!(parse_u256("0x100000000000000000000000000000002").unwrap(), (1, 2));
        assert!(parse_u256(&format!("0x1{}", "0".repeat(64))).is_err());
        assert!(parse_u256(&"9".repeat(80)).is_err());
        assert!(parse_u256("12a").is_err());
    }

    #[test]
    fn u256_rejects_non_hex_digits() {
        assert!(parse_u256(&format!("0x\u{e9}{}", "0".repeat(31))).is_err());
        assert!(parse_u256(&format!("0x{}\u{e9}{}", "1".repeat(31), "0".repeat(32))).is_err());
        assert!(parse_u256("0x+1").is_err());
        assert!(parse_u256("0x1g").is_err());
        assert_eq!(parse_u256("0XfF").unwrap(), (0, 255));
    }

    #[test]
    fn constructor_follows_abi_order() {
        let abi = Abi::from_json_str(FACTORY_ABI).unwrap();
        let args = BTreeMap::from([
            ("supply".to_string(), "5".to_string()),
            ("owner".to_string(), "0x123".to_string()),
            ("name".to_string(), "hi".to_string()),
            ("ignored".to_string(), "1".to_string()),
        ]);
        let calldata = compile_constructor(&abi, &args).unwrap();
        assert_eq!(
            calldata,
            [
                Felt::from(0x123u64),
                Felt::ZERO,
                Felt::from(0x6869u64),
                Felt::from(2u64),
                Felt::from(5u64),
                Felt::ZERO,
            ]
        );
    }

    #[test]
    fn missing_argument_is_named() {
        let abi = Abi::from_json_str(FACTORY_ABI).unwrap();
        let args = BTreeMap::from([("owner".to_string(), "0x1".to_string())]);
        let err = compile_constructor(&abi, &args).unwrap_err();
        assert!(matches!(err, CalldataError::MissingArgument(name) if name == "name"));
    }

    #[test]
    fn integer_width_is_checked() {
        assert!(encode_value("x", "core::integer::u8", "255").is_ok());
        assert!(encode_value("x", "core::integer::u8", "256").is_err());
        assert!(encode_value("x", "core::bool", "maybe").is_err());
        assert!(matches!(
            encode_value("x", "core::array::Array::<core::felt252>", "1"),
            Err(CalldataError::UnsupportedType { .. })
        ));
    }
}
