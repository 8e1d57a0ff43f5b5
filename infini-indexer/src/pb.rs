// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Protobuf messages exchanged between the extractor and the entity mapping.

use prost::Message;

/// Output of the extractor: every merchant created in a block range.
#[derive(Clone, PartialEq, Message)]
pub struct Events {
    #[prost(message, repeated, tag = "1")]
    pub merchant_contracts: Vec<MerchantContract>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MerchantContract {
    /// `0x` followed by 64 hex digits.
    #[prost(string, tag = "1")]
    pub merchant_address: String,
    #[prost(string, tag = "2")]
    pub points_contract: String,
}

/// Input of the extractor.
#[derive(Clone, PartialEq, Message)]
pub struct Transactions {
    #[prost(message, repeated, tag = "1")]
    pub transactions_with_receipt: Vec<TransactionWithReceipt>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransactionWithReceipt {
    #[prost(message, optional, tag = "1")]
    pub receipt: Option<TransactionReceipt>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransactionReceipt {
    #[prost(message, repeated, tag = "1")]
    pub events: Vec<Event>,
}

/// Raw event; every field element is big-endian bytes.
#[derive(Clone, PartialEq, Message)]
pub struct Event {
    #[prost(bytes = "vec", tag = "1")]
    pub from_address: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub keys: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub data: Vec<Vec<u8>>,
}
