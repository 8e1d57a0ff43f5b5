// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use infini_tools::ops;

use crate::{
    common_args::{NetworkArgs, PathArgs},
    error::InfiniResult,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn exec(args: Args, paths: &PathArgs) -> InfiniResult {
    let ctx = args.network.context(paths)?;
    ops::declare(&ctx).await?;
    Ok(())
}
