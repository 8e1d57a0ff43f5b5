// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use infini_tools::{core::upgrade::UpgradeRequest, ops};
use starknet::core::types::Felt;

use crate::{
    common_args::{NetworkArgs, PathArgs},
    error::InfiniResult,
    utils::felt_arg,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Address of the contract to upgrade.
    #[arg(long, value_parser = felt_arg)]
    address: Felt,
    /// Class hash to upgrade to. Read from the registry when unset.
    #[arg(long, value_parser = felt_arg)]
    class_hash: Option<Felt>,
    /// Point the factory at the latest recorded component class hashes.
    #[arg(long)]
    update_components: bool,
    /// Declare every contract before upgrading.
    #[arg(long)]
    declare: bool,

    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn exec(args: Args, paths: &PathArgs) -> InfiniResult {
    let ctx = args.network.context(paths)?;
    let request = UpgradeRequest {
        target: args.address,
        class_hash: args.class_hash,
        update_components: args.update_components,
    };
    ops::upgrade(&ctx, &request, args.declare).await?;
    Ok(())
}
