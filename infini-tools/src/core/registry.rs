// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Per-network deployment registry.
//!
//! The registry lives at `<dir>/<network>_latest.json` and maps contract names to their latest
//! class hash and address. Certificate deployments are appended to a `certificates` array since
//! any number of them may coexist.
//!
//! `classHash` is only written by a declaration. After an upgrade the class an instance runs is
//! kept in `activeClassHash` instead.
//!
//! Every write re-reads the file, applies the change and atomically replaces the file, so a
//! reader never observes a partially written document. Two scripts writing at the same time
//! still race; the last writer wins.

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use starknet::core::types::Felt;

use crate::{
    core::{contract::ContractKind, network::Network},
    utils::{create_dir_if_dne, parse_felt, unix_millis},
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("deployment file not found at {}", .0.display())]
    NotFound(PathBuf),
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
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid {field} for {contract} in registry: {reason}")]
    InvalidEntry {
        contract: String,
        field: &'static str,
        reason: String,
    },
}

/// Latest known state of a single named contract.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Cairo contract the entry was deployed from, when the export name differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Class the deployed instance runs after an upgrade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_class_hash: Option<String>,
    /// Fields written by other tools are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContractEntry {
    pub fn declared(class_hash: &Felt) -> Self {
        Self {
            class_hash: Some(format!("{class_hash:#x}")),
            ..Default::default()
        }
    }

    /// Overwrites the fields `other` sets, keeping the rest.
    pub fn merge(&mut self, other: ContractEntry) {
        if other.class_hash.is_some() {
            self.class_hash = other.class_hash;
        }
        if other.address.is_some() {
            if other.address != self.address {
                self.active_class_hash = None;
            }
            self.address = other.address;
        }
        if other.contract.is_some() {
            self.contract = other.contract;
        }
        if other.transaction_hash.is_some() {
            self.transaction_hash = other.transaction_hash;
        }
        if other.active_class_hash.is_some() {
            self.active_class_hash = other.active_class_hash;
        }
        self.extra.extend(other.extra);
    }
}

/// One deployed certificate collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub address: String,
    pub name: String,
    pub metadata: String,
    pub owner: String,
    pub deployed_at: String,
    /// Class hash the instance was deployed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_class_hash: Option<String>,
}

/// Parsed contents of a `<network>_latest.json` file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<CertificateRecord>,
    #[serde(flatten)]
    pub contracts: BTreeMap<String, ContractEntry>,
}

impl RegistryDocument {
    pub fn entry(&self, name: &str) -> Option<&ContractEntry> {
        self.contracts.get(name)
    }

    /// Recorded class hash for `kind`, if any.
    pub fn class_hash(&self, kind: ContractKind) -> Result<Option<Felt>, RegistryError> {
        self.felt_field(kind.name(), "classHash", |entry| entry.class_hash.as_deref())
    }

    /// Recorded address for `kind`, if any.
    pub fn address(&self, kind: ContractKind) -> Result<Option<Felt>, RegistryError> {
        self.felt_field(kind.name(), "address", |entry| entry.address.as_deref())
    }

    pub fn upsert(&mut self, name: impl Into<String>, entry: ContractEntry) {
        self.contracts.entry(name.into()).or_default().merge(entry);
    }

    /// Records `class_hash` as the active class of every contract entry and certificate at
    /// `address`. Declared class hashes are left alone.
    ///
    /// Returns the number of records touched.
    pub fn set_active_class_hash_at(&mut self, address: &Felt, class_hash: &Felt) -> usize {
        let class_hash = format!("{class_hash:#x}");
        let matches = |recorded: &str| parse_felt(recorded).is_ok_and(|felt| felt == *address);
        let mut touched = 0;
        for entry in self.contracts.values_mut() {
            if entry.address.as_deref().is_some_and(matches) {
                entry.active_class_hash = Some(class_hash.clone());
                touched += 1;
            }
        }
        for certificate in self.certificates.iter_mut() {
            if matches(&certificate.address) {
                certificate.active_class_hash = Some(class_hash.clone());
                touched += 1;
            }
        }
        touched
    }

    fn felt_field(
        &self,
        contract: &str,
        field: &'static str,
        get: impl Fn(&ContractEntry) -> Option<&str>,
    ) -> Result<Option<Felt>, RegistryError> {
        let Some(value) = self.contracts.get(contract).and_then(get) else {
            return Ok(None);
        };
        if value.trim().is_empty() {
            return Ok(None);
        }
        parse_felt(value)
            .map(Some)
            .map_err(|reason| RegistryError::InvalidEntry {
                contract: contract.to_string(),
                field,
                reason,
            })
    }
}

/// Handle to the registry file of one network.
#[derive(Clone, Debug)]
pub struct DeploymentRegistry {
    dir: PathBuf,
    network: Network,
}

impl DeploymentRegistry {
    pub fn new(dir: impl Into<PathBuf>, network: Network) -> Self {
        Self {
            dir: dir.into(),
            network,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}_latest.json", self.network))
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Loads the registry, failing if the file does not exist.
    pub fn load(&self) -> Result<RegistryDocument, RegistryError> {
        let path = self.path();
        if !path.is_file() {
            return Err(RegistryError::NotFound(path));
        }
        let contents = fs::read(&path).map_err(|source| RegistryError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&contents).map_err(|source| RegistryError::Parse { path, source })
    }

    /// Loads the registry, or an empty one if the file does not exist yet.
    pub fn load_or_default(&self) -> Result<RegistryDocument, RegistryError> {
        match self.load() {
            Err(RegistryError::NotFound(_)) => Ok(RegistryDocument::default()),
            other => other,
        }
    }

    /// Read-modify-write of the registry file.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut RegistryDocument) -> T,
    ) -> Result<T, RegistryError> {
        let mut document = self.load_or_default()?;
        let result = f(&mut document);
        self.write_json(&self.path(), &document)?;
        debug!(@grey, "updated registry {}", self.path().display());
        Ok(result)
    }

    pub fn upsert_contract(
        &self,
        name: impl Into<String>,
        entry: ContractEntry,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        self.update(|document| document.upsert(name, entry))
    }

    pub fn push_certificate(&self, record: CertificateRecord) -> Result<(), RegistryError> {
        self.update(|document| document.certificates.push(record))
    }

    /// Writes `value` to `<dir>/[<prefix>_]<network>_<unix millis>.json`.
    pub fn write_snapshot(
        &self,
        prefix: Option<&str>,
        value: &impl Serialize,
    ) -> Result<PathBuf, RegistryError> {
        let name = match prefix {
            Some(prefix) => format!("{prefix}_{}_{}.json", self.network, unix_millis()),
            None => format!("{}_{}.json", self.network, unix_millis()),
        };
        let path = self.dir.join(name);
        self.write_json(&path, value)?;
        Ok(path)
    }

    fn write_json(&self, path: &Path, value: &impl Serialize) -> Result<(), RegistryError> {
        let contents = serde_json::to_string_pretty(value)?;
        let write_err = |source| RegistryError::Write {
            path: path.to_path_buf(),
            source,
        };
        create_dir_if_dne(&self.dir).map_err(write_err)?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;
        file.write_all(b"\n").map_err(write_err)?;
        file.persist(path).map_err(|err| write_err(err.error))?;
        Ok(())
    }
}
