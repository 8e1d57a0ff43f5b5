// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

/// Directory holding `<network>_latest.json` and deployment snapshots.
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// Output directory of `scarb build` for the contracts package.
pub const DEFAULT_ARTIFACTS_DIR: &str = "contracts/target/dev";

/// Entity store written by the `index` command.
pub const DEFAULT_MERCHANT_STORE: &str = "merchants.json";
