// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

use infini_tools::{
    core::{
        fees::skip_balance_check_from_env,
        network::{Network, NetworkConfig},
    },
    ops::OpsContext,
};
use starknet::core::types::Felt;

use crate::{
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR},
    error::InfiniError,
    utils::felt_arg,
};

/// Locations of the registry and the compiled contracts.
#[derive(Debug, Clone, clap::Args)]
pub struct PathArgs {
    /// Directory holding the deployment registry files.
    #[arg(long, global = true, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments_dir: PathBuf,
    /// Directory holding the compiled contract artifacts.
    #[arg(long, global = true, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct NetworkArgs {
    /// Network to operate on.
    #[arg(long, value_enum)]
    pub network: Network,
}

impl NetworkArgs {
    /// Reads the network configuration from the environment.
    ///
    /// Fails before any network access when a variable is missing.
    pub fn context(&self, paths: &PathArgs) -> Result<OpsContext, InfiniError> {
        let config = NetworkConfig::from_env(self.network)?;
        log::debug!("network configuration: {config:?}");
        Ok(OpsContext::builder()
            .config(config)
            .deployments_dir(paths.deployments_dir.clone())
            .artifacts_dir(paths.artifacts_dir.clone())
            .skip_balance_check(skip_balance_check_from_env())
            .build())
    }
}

#[derive(Debug, clap::Args)]
pub struct CertificateArgs {
    /// Owner address of the collection. Defaults to the deployer.
    #[arg(long, value_parser = felt_arg)]
    pub owner: Option<Felt>,
    /// Name of the certificate collection.
    #[arg(long)]
    pub name: String,
    /// Metadata URI of the certificate collection.
    #[arg(long)]
    pub metadata: String,
    /// Class hash of the certificate contract. Read from the registry when unset.
    #[arg(long, value_parser = felt_arg)]
    pub class_hash: Option<Felt>,
}
