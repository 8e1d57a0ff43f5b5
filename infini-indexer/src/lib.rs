// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Indexing of InfiniRewards factory events.
//!
//! [`map::map_factory_events`] extracts `MerchantCreated` events from a batch of transactions
//! into an encoded [`pb::Events`] message. [`mapping::handle_triggers`] decodes such a message
//! and saves one [`mapping::Merchant`] entity per record.

use std::path::PathBuf;

pub mod map;
pub mod mapping;
pub mod pb;

pub use map::{map_encoded_transactions, map_factory_events, DEFAULT_FACTORY_ADDRESS};
pub use mapping::{handle_triggers, EntityStore, JsonFileStore, Merchant, MemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to decode events: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid entity store {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
