// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use starknet::{
    accounts::{Account, AccountError},
    providers::ProviderError,
};

use crate::core::account::RpcAccount;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for account-level operations (signing + submission).
pub type AccountFailure = AccountError<<RpcAccount as Account>::SignError>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("account error: {0}")]
    Account(#[from] AccountFailure),

    #[error("{0}")]
    Network(#[from] crate::core::network::NetworkError),
    #[error("{0}")]
    Registry(#[from] crate::core::registry::RegistryError),
    #[error("{0}")]
    Artifact(#[from] crate::core::artifact::ArtifactError),
    #[error("{0}")]
    Calldata(#[from] crate::core::calldata::CalldataError),
    #[error("{0}")]
    Transaction(#[from] crate::core::transaction::TransactionError),
    #[error("{0}")]
    Declaration(#[from] crate::core::declaration::DeclarationError),
    #[error("{0}")]
    Deployment(#[from] crate::core::deployment::DeploymentError),
    #[error("{0}")]
    Upgrade(#[from] crate::core::upgrade::UpgradeError),
    #[error("{0}")]
    Fee(#[from] crate::core::fees::FeeError),
}

#[cfg(test)]
mod tests {
    use starknet::accounts::{Account, AccountError};

    use super::*;

    fn converts<T: Into<Error>>() {}

    #[test]
    fn account_submission_errors_convert() {
        converts::<AccountError<<RpcAccount as Account>::SignError>>();
        converts::<AccountFailure>();
        converts::<ProviderError>();
    }
}
