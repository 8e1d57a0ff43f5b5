// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Tools for declaring, deploying and upgrading the InfiniRewards contracts on Starknet.

#[macro_use]
mod macros;

pub mod core;
pub(crate) mod error;
pub mod ops;
pub mod utils;

pub use error::{Error, Result};
