// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Compiled contract artifacts produced by `scarb build`.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use starknet::core::types::{
    contract::{CompiledClass, SierraClass},
    Felt, FlattenedSierraClass,
};

use crate::core::contract::ContractKind;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact for {kind} not found at {}; compile the contracts first (scarb build)", .path.display())]
    NotFound { kind: ContractKind, path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to compute class hash of {kind}: {reason}")]
    ClassHash { kind: ContractKind, reason: String },
    #[error("invalid abi: {0}")]
    Abi(String),
}

/// Sierra class plus its compiled hash, ready to declare.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub kind: ContractKind,
    pub class_hash: Felt,
    pub compiled_class_hash: Felt,
    pub flattened: Arc<FlattenedSierraClass>,
    pub abi: Abi,
}

impl ContractArtifact {
    pub fn sierra_path(dir: &Path, kind: ContractKind) -> PathBuf {
        dir.join(format!("{}.contract_class.json", kind.artifact_stem()))
    }

    pub fn casm_path(dir: &Path, kind: ContractKind) -> PathBuf {
        dir.join(format!("{}.compiled_contract_class.json", kind.artifact_stem()))
    }

    /// Loads both artifacts of `kind` from `dir` and computes their hashes.
    pub fn load(dir: &Path, kind: ContractKind) -> Result<Self, ArtifactError> {
        let sierra_path = Self::sierra_path(dir, kind);
        let casm_path = Self::casm_path(dir, kind);
        let sierra_bytes = read_artifact(kind, &sierra_path)?;
        let casm_bytes = read_artifact(kind, &casm_path)?;

        let parse_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ArtifactError::Parse { path, source }
        };
        let sierra: SierraClass =
            serde_json::from_slice(&sierra_bytes).map_err(parse_err(&sierra_path))?;
        let compiled: CompiledClass =
            serde_json::from_slice(&casm_bytes).map_err(parse_err(&casm_path))?;
        let raw: RawSierra =
            serde_json::from_slice(&sierra_bytes).map_err(parse_err(&sierra_path))?;

        let hash_err = |reason: String| ArtifactError::ClassHash { kind, reason };
        let class_hash = sierra.class_hash().map_err(|err| hash_err(err.to_string()))?;
        let compiled_class_hash = compiled
            .class_hash()
            .map_err(|err| hash_err(err.to_string()))?;
        let flattened = sierra.flatten().map_err(|err| hash_err(err.to_string()))?;
        let abi = Abi::from_value(raw.abi)?;

        debug!(@grey, "loaded {kind}: class hash {class_hash:#x}");
        Ok(Self {
            kind,
            class_hash,
            compiled_class_hash,
            flattened: Arc::new(flattened),
            abi,
        })
    }

    /// Reads only the ABI from the Sierra artifact of `kind`.
    pub fn load_abi(dir: &Path, kind: ContractKind) -> Result<Abi, ArtifactError> {
        let path = Self::sierra_path(dir, kind);
        let bytes = read_artifact(kind, &path)?;
        let raw: RawSierra =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })?;
        Abi::from_value(raw.abi)
    }
}

fn read_artifact(kind: ContractKind, path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.is_file() {
        return Err(ArtifactError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Deserialize)]
struct RawSierra {
    #[serde(default)]
    abi: serde_json::Value,
}

/// The subset of a Cairo ABI needed to encode constructors and validate calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Abi {
    entries: Vec<AbiEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbiEntry {
    Function(AbiFunction),
    L1Handler(AbiFunction),
    Constructor(AbiFunction),
    Interface(AbiInterface),
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AbiInterface {
    pub name: String,
    #[serde(default)]
    pub items: Vec<AbiEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Abi {
    /// Parses an ABI given either as a JSON array or as a string holding one.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ArtifactError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::String(text) => Self::from_json_str(&text),
            value => serde_json::from_value(value)
                .map(|entries| Self { entries })
                .map_err(|err| ArtifactError::Abi(err.to_string())),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ArtifactError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
            .map(|entries| Self { entries })
            .map_err(|err| ArtifactError::Abi(err.to_string()))
    }

    pub fn constructor_inputs(&self) -> &[AbiParam] {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                AbiEntry::Constructor(constructor) => Some(constructor.inputs.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Names of every externally callable function, interfaces included.
    pub fn function_names(&self) -> BTreeSet<&str> {
        fn collect<'a>(entries: &'a [AbiEntry], names: &mut BTreeSet<&'a str>) {
            for entry in entries {
                match entry {
                    AbiEntry::Function(function) => {
                        names.insert(&function.name);
                    }
                    AbiEntry::Interface(interface) => collect(&interface.items, names),
                    _ => {}
                }
            }
        }
        let mut names = BTreeSet::new();
        collect(&self.entries, &mut names);
        names
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function_names().contains(name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use tempfile::TempDir;

    use super::*;

    pub(crate) const FACTORY_ABI: &str = r#"[
        {
            "type": "impl",
            "name": "FactoryImpl",
            "interface_name": "contracts::IFactory"
        },
        {
            "type": "interface",
            "name": "contracts::IFactory",
            "items": [
                {
                    "type": "function",
                    "name": "set_points_class_hash",
                    "inputs": [{ "name": "hash", "type": "core::starknet::class_hash::ClassHash" }],
                    "outputs": [],
                    "state_mutability": "external"
                },
                {
                    "type": "function",
                    "name": "upgrade",
                    "inputs": [{ "name": "new_class_hash", "type": "core::starknet::class_hash::ClassHash" }],
                    "outputs": [],
                    "state_mutability": "external"
                }
            ]
        },
        {
            "type": "constructor",
            "name": "constructor",
            "inputs": [
                { "name": "owner", "type": "core::starknet::contract_address::ContractAddress" },
                { "name": "name", "type": "core::byte_array::ByteArray" },
                { "name": "supply", "type": "core::integer::u256" }
            ]
        },
        {
            "type": "event",
            "name": "contracts::Factory::Event",
            "kind": "enum",
            "variants": []
        }
    ]"#;

    #[test]
    fn parses_constructor_and_interface_functions() {
        let abi = Abi::from_json_str(FACTORY_ABI).unwrap();
        let names: Vec<_> = abi.constructor_inputs().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["owner", "name", "supply"]);
        assert!(abi.has_function("upgrade"));
        assert!(abi.has_function("set_points_class_hash"));
        assert!(!abi.has_function("constructor"));
        assert!(!abi.has_function("set_user_class_hash"));
    }

    #[test]
    fn abi_may_be_embedded_as_string() {
        let abi = Abi::from_value(serde_json::Value::String(FACTORY_ABI.to_string())).unwrap();
        assert_eq!(abi.constructor_inputs().len(), 3);
        assert!(Abi::from_value(serde_json::Value::Null)
            .unwrap()
            .constructor_inputs()
            .is_empty());
    }

    #[test]
    fn missing_artifact_names_the_contract() {
        let dir = TempDir::new().unwrap();
        let err = ContractArtifact::load(dir.path(), ContractKind::Points).unwrap_err();
        match err {
            ArtifactError::NotFound { kind, path } => {
                assert_eq!(kind, ContractKind::Points);
                assert!(path.ends_with("contracts_InfiniRewardsPoints.contract_class.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
