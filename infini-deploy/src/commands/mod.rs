// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::{common_args::PathArgs, error::InfiniResult};

mod balance;
mod declare;
mod deploy;
mod deploy_certificate;
mod deploy_certificate_direct;
mod index;
mod upgrade;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Declare every contract class and record the class hashes
    Declare(declare::Args),
    /// Declare all contracts and deploy the factory
    #[clap(visible_alias = "d")]
    Deploy(deploy::Args),
    /// Deploy a certificate collection through the batch deployer
    DeployCertificate(deploy_certificate::Args),
    /// Deploy a certificate collection with a hand-built UDC call
    DeployCertificateDirect(deploy_certificate_direct::Args),
    /// Upgrade a contract and/or refresh the factory's component class hashes
    #[clap(visible_alias = "u")]
    Upgrade(upgrade::Args),
    /// Print the STRK balance of an account
    Balance(balance::Args),
    /// Map encoded factory events to merchant entities
    Index(index::Args),
}

pub async fn exec(cmd: Command, paths: PathArgs) -> InfiniResult {
    match cmd {
        Command::Declare(args) => declare::exec(args, &paths).await,
        Command::Deploy(args) => deploy::exec(args, &paths).await,
        Command::DeployCertificate(args) => deploy_certificate::exec(args, &paths).await,
        Command::DeployCertificateDirect(args) => {
            deploy_certificate_direct::exec(args, &paths).await
        }
        Command::Upgrade(args) => upgrade::exec(args, &paths).await,
        Command::Balance(args) => balance::exec(args, &paths).await,
        Command::Index(args) => index::exec(args),
    }
}
