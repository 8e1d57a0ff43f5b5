// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use infini_tools::ops;
use starknet::core::types::Felt;

use crate::{
    common_args::{NetworkArgs, PathArgs},
    error::InfiniResult,
    utils::felt_arg,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Account to query. Defaults to the configured deployer.
    #[arg(long, value_parser = felt_arg)]
    address: Option<Felt>,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn exec(args: Args, paths: &PathArgs) -> InfiniResult {
    let ctx = args.network.context(paths)?;
    ops::balance(&ctx, args.address).await?;
    Ok(())
}
