// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fs, path::PathBuf};

use eyre::Context;
use infini_indexer::{
    handle_triggers, map_encoded_transactions, JsonFileStore, DEFAULT_FACTORY_ADDRESS,
};
use starknet::core::types::Felt;

use crate::{constants::DEFAULT_MERCHANT_STORE, error::InfiniResult, utils::felt_arg};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// File holding an encoded events message.
    #[arg(long)]
    input: PathBuf,
    /// JSON file the merchant entities are saved to.
    #[arg(long, default_value = DEFAULT_MERCHANT_STORE)]
    store: PathBuf,
    /// Treat the input as an encoded transaction batch and extract factory events first.
    #[arg(long)]
    raw: bool,
    /// Factory whose events are extracted from a raw batch. Defaults to the mainnet factory.
    #[arg(long, value_parser = felt_arg)]
    factory: Option<Felt>,
}

pub fn exec(args: Args) -> InfiniResult {
    let input = fs::read(&args.input)
        .wrap_err_with(|| format!("failed to read {}", args.input.display()))?;
    let events = if args.raw {
        map_encoded_transactions(&input, args.factory.unwrap_or(DEFAULT_FACTORY_ADDRESS))?
    } else {
        input
    };

    let mut store = JsonFileStore::open(&args.store)?;
    let count = handle_triggers(&events, &mut store)?;
    log::info!("indexed {count} merchants into {}", store.path().display());
    Ok(())
}
