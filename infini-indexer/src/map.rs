// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use prost::Message;
use starknet::{
    core::types::Felt,
    macros::{felt, selector},
};

use crate::{
    pb::{Event, Events, MerchantContract, Transactions},
    IndexError,
};

/// Factory deployment the indexer follows by default.
pub const DEFAULT_FACTORY_ADDRESS: Felt =
    felt!("0x06c0b75d53c757cc1979d3aaa9482ac449ae0dfd1e5a9807b24478cf4da2d5f8");

pub const MERCHANT_CREATED: Felt = selector!("MerchantCreated");

/// Formats a felt as `0x` followed by 64 hex digits.
pub fn format_address(felt: &Felt) -> String {
    format!("0x{}", hex::encode(felt.to_bytes_be()))
}

/// Collects every `MerchantCreated` event emitted by `factory`.
///
/// Transactions without a receipt and events that do not carry two addresses are skipped.
pub fn map_factory_events(transactions: &Transactions, factory: Felt) -> Events {
    let merchant_contracts = transactions
        .transactions_with_receipt
        .iter()
        .filter_map(|transaction| transaction.receipt.as_ref())
        .flat_map(|receipt| &receipt.events)
        .filter_map(|event| merchant_created(event, factory))
        .collect();
    Events { merchant_contracts }
}

/// Decodes an encoded [`Transactions`] batch and returns the encoded [`Events`] it yields.
pub fn map_encoded_transactions(bytes: &[u8], factory: Felt) -> Result<Vec<u8>, IndexError> {
    let transactions = Transactions::decode(bytes)?;
    let events = map_factory_events(&transactions, factory);
    log::debug!(
        "{} merchant records in {} transactions",
        events.merchant_contracts.len(),
        transactions.transactions_with_receipt.len()
    );
    Ok(events.encode_to_vec())
}

fn merchant_created(event: &Event, factory: Felt) -> Option<MerchantContract> {
    if Felt::from_bytes_be_slice(&event.from_address) != factory {
        return None;
    }
    let (selector, indexed) = event.keys.split_first()?;
    if Felt::from_bytes_be_slice(selector) != MERCHANT_CREATED {
        return None;
    }

    // Members marked as keys come first, the rest follow in the data.
    let mut members = indexed
        .iter()
        .chain(&event.data)
        .map(|bytes| Felt::from_bytes_be_slice(bytes));
    let merchant = members.next()?;
    let points_contract = members.next()?;
    log::debug!("merchant {merchant:#x} created with points contract {points_contract:#x}");
    Some(MerchantContract {
        merchant_address: format_address(&merchant),
        points_contract: format_address(&points_contract),
    })
}
