// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! High-level operations behind each CLI command.

use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::core::{
    account::{self, RpcAccount},
    fees::{self, RetryPolicy, RpcBalanceReader, TokenAmount},
    network::NetworkConfig,
    registry::DeploymentRegistry,
    transaction::WaitConfig,
};

pub use balance::balance;
pub use certificate::{
    deploy_certificate, deploy_certificate_direct, CertificateDeploymentInfo, CertificateRequest,
};
pub use declare::{declare, declare_contracts};
pub use deploy::deploy;
pub use upgrade::upgrade;

mod balance;
mod certificate;
mod declare;
mod deploy;
mod upgrade;

/// Settings shared by every operation.
#[derive(Clone, Debug, TypedBuilder)]
pub struct OpsContext {
    pub config: NetworkConfig,
    #[builder(default = PathBuf::from("deployments"))]
    pub deployments_dir: PathBuf,
    #[builder(default = PathBuf::from("contracts/target/dev"))]
    pub artifacts_dir: PathBuf,
    #[builder(default)]
    pub wait: WaitConfig,
    #[builder(default)]
    pub retry: RetryPolicy,
    #[builder(default)]
    pub skip_balance_check: bool,
}

impl OpsContext {
    pub fn registry(&self) -> DeploymentRegistry {
        DeploymentRegistry::new(&self.deployments_dir, self.config.network)
    }

    pub async fn connect(&self) -> eyre::Result<RpcAccount> {
        Ok(account::connect(&self.config).await?)
    }

    /// Checks that the deployer can pay v3 fees before sending anything.
    pub(crate) async fn ensure_fee_balance(&self, account: &RpcAccount) -> eyre::Result<TokenAmount> {
        use starknet::accounts::{Account, ConnectedAccount};

        let reader = RpcBalanceReader(account.provider());
        let balance = fees::ensure_fee_balance(
            &reader,
            account.address(),
            &self.retry,
            self.skip_balance_check,
        )
        .await?;
        Ok(balance)
    }
}
