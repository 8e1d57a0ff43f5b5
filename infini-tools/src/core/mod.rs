// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub mod account;
pub mod artifact;
pub mod calldata;
pub mod contract;
pub mod declaration;
pub mod deployment;
pub mod fees;
pub mod network;
pub mod registry;
pub mod transaction;
pub mod upgrade;
