// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Merchant entities derived from encoded factory events.

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{pb::Events, IndexError};

/// A merchant and the points contract created for it. Keyed by merchant address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: String,
    pub merchant_address: String,
    pub points_contract: String,
}

/// Keyed entity storage. Saving an existing id replaces the entity.
pub trait EntityStore {
    fn save(&mut self, merchant: Merchant) -> Result<(), IndexError>;

    fn get(&self, id: &str) -> Option<&Merchant>;

    /// Persists pending writes.
    fn flush(&mut self) -> Result<(), IndexError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    merchants: BTreeMap<String, Merchant>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }
}

impl EntityStore for MemoryStore {
    fn save(&mut self, merchant: Merchant) -> Result<(), IndexError> {
        self.merchants.insert(merchant.id.clone(), merchant);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&Merchant> {
        self.merchants.get(id)
    }
}

/// Entities kept in a JSON object keyed by id.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    merchants: BTreeMap<String, Merchant>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IndexError> {
        let path = path.into();
        let merchants = if path.is_file() {
            let contents = fs::read(&path).map_err(|source| IndexError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_slice(&contents).map_err(|source| IndexError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, merchants })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn merchants(&self) -> impl Iterator<Item = &Merchant> {
        self.merchants.values()
    }
}

impl EntityStore for JsonFileStore {
    fn save(&mut self, merchant: Merchant) -> Result<(), IndexError> {
        self.merchants.insert(merchant.id.clone(), merchant);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&Merchant> {
        self.merchants.get(id)
    }

    fn flush(&mut self) -> Result<(), IndexError> {
        let io_err = |source| IndexError::Io {
            path: self.path.clone(),
            source,
        };
        let contents = serde_json::to_vec_pretty(&self.merchants).map_err(|source| {
            IndexError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;
        let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        file.write_all(&contents).map_err(io_err)?;
        file.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

/// Decodes an encoded [`Events`] message and saves one merchant per record.
///
/// Returns the number of records processed.
pub fn handle_triggers(bytes: &[u8], store: &mut impl EntityStore) -> Result<usize, IndexError> {
    let events = Events::decode(bytes)?;
    let count = events.merchant_contracts.len();
    for record in events.merchant_contracts {
        let merchant = Merchant {
            id: record.merchant_address.clone(),
            merchant_address: record.merchant_address,
            points_contract: record.points_contract,
        };
        log::info!(
            "Created merchant {} with points contract {}",
            merchant.merchant_address,
            merchant.points_contract
        );
        store.save(merchant)?;
    }
    store.flush()?;
    Ok(count)
}
