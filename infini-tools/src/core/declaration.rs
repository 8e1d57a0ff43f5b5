// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Declaring contract classes and resolving which class hash to deploy.

use std::path::{Path, PathBuf};

use starknet::{
    accounts::{Account, ConnectedAccount},
    core::types::{BlockId, BlockTag, Felt, StarknetError},
    providers::{Provider, ProviderError},
};

use crate::{
    core::{
        account::RpcAccount,
        artifact::ContractArtifact,
        contract::ContractKind,
        registry::{ContractEntry, DeploymentRegistry, RegistryError},
        transaction::{wait_for_transaction, WaitConfig},
    },
    utils::color::Color,
};

#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("deployment file not found at {}; pass --class-hash or --declare", .0.display())]
    RegistryNotFound(PathBuf),
    #[error("class hash for {kind} not found in {}; pass --class-hash or --declare", .path.display())]
    ClassHashNotFound { kind: ContractKind, path: PathBuf },
    #[error("{0}")]
    Registry(#[from] RegistryError),
}

/// Where the class hash of a contract to deploy comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassHashSource {
    /// Given on the command line.
    Explicit(Felt),
    /// Declared now from the compiled artifacts.
    Declare,
    /// Read from the deployment registry.
    Registry,
}

impl ClassHashSource {
    /// An explicit hash wins over `--declare`, which wins over the registry.
    pub fn from_flags(class_hash: Option<Felt>, declare: bool) -> Self {
        match (class_hash, declare) {
            (Some(class_hash), _) => Self::Explicit(class_hash),
            (None, true) => Self::Declare,
            (None, false) => Self::Registry,
        }
    }

    /// Resolves the hash without touching the network. `None` means it must be declared.
    pub fn resolve_offline(
        &self,
        kind: ContractKind,
        registry: &DeploymentRegistry,
    ) -> Result<Option<Felt>, DeclarationError> {
        match self {
            Self::Explicit(class_hash) => Ok(Some(*class_hash)),
            Self::Registry => recorded_class_hash(kind, registry).map(Some),
            Self::Declare => Ok(None),
        }
    }
}

/// Class hash recorded for `kind`, failing if either the file or the entry is missing.
pub fn recorded_class_hash(
    kind: ContractKind,
    registry: &DeploymentRegistry,
) -> Result<Felt, DeclarationError> {
    let document = match registry.load() {
        Ok(document) => document,
        Err(RegistryError::NotFound(path)) => return Err(DeclarationError::RegistryNotFound(path)),
        Err(err) => return Err(err.into()),
    };
    document
        .class_hash(kind)?
        .ok_or_else(|| DeclarationError::ClassHashNotFound {
            kind,
            path: registry.path(),
        })
}

/// Whether `class_hash` is already declared on chain.
pub async fn is_declared<P: Provider + Sync>(provider: &P, class_hash: Felt) -> Result<bool, ProviderError> {
    match provider
        .get_class(BlockId::Tag(BlockTag::Latest), class_hash)
        .await
    {
        Ok(_) => Ok(true),
        Err(ProviderError::StarknetError(StarknetError::ClassHashNotFound)) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Declares `artifact` unless the class already exists, returning its class hash.
pub async fn declare_contract(
    account: &RpcAccount,
    artifact: &ContractArtifact,
    wait: WaitConfig,
) -> crate::Result<Felt> {
    let kind = artifact.kind;
    if is_declared(account.provider(), artifact.class_hash).await? {
        info!(@grey, "{kind} already declared: {:#x}", artifact.class_hash);
        return Ok(artifact.class_hash);
    }

    info!(@grey, "declaring {}", kind.to_string().lavender());
    let result = account
        .declare_v3(artifact.flattened.clone(), artifact.compiled_class_hash)
        .send()
        .await?;
    wait_for_transaction(account.provider(), result.transaction_hash, wait).await?;
    info!(@grey, "{kind} declared: {}", format!("{:#x}", result.class_hash).mint());
    Ok(result.class_hash)
}

/// Resolves the class hash to deploy `kind` from, declaring it if requested.
///
/// Freshly declared hashes are recorded in the registry.
pub async fn resolve_class_hash(
    source: ClassHashSource,
    kind: ContractKind,
    account: &RpcAccount,
    registry: &DeploymentRegistry,
    artifacts_dir: &Path,
    wait: WaitConfig,
) -> crate::Result<Felt> {
    if let Some(class_hash) = source.resolve_offline(kind, registry)? {
        debug!(@grey, "using class hash for {kind}: {class_hash:#x}");
        return Ok(class_hash);
    }
    let artifact = ContractArtifact::load(artifacts_dir, kind)?;
    let class_hash = declare_contract(account, &artifact, wait).await?;
    registry.upsert_contract(kind.name(), ContractEntry::declared(&class_hash))?;
    Ok(class_hash)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::core::network::Network;

    #[test]
    fn explicit_hash_takes_precedence() {
        let hash = Felt::from(7u64);
        assert_eq!(
            ClassHashSource::from_flags(Some(hash), true),
            ClassHashSource::Explicit(hash)
        );
        assert_eq!(ClassHashSource::from_flags(None, true), ClassHashSource::Declare);
        assert_eq!(ClassHashSource::from_flags(None, false), ClassHashSource::Registry);
    }

    #[test]
    fn missing_file_and_missing_hash_are_distinct() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Sepolia);
        let err = recorded_class_hash(ContractKind::Certificate, &registry).unwrap_err();
        assert!(matches!(err, DeclarationError::RegistryNotFound(_)));

        registry
            .upsert_contract(ContractKind::Points.name(), ContractEntry::declared(&Felt::ONE))
            .unwrap();
        let err = recorded_class_hash(ContractKind::Certificate, &registry).unwrap_err();
        assert!(matches!(
            err,
            DeclarationError::ClassHashNotFound { kind: ContractKind::Certificate, .. }
        ));
    }

    #[test]
    fn recorded_hash_is_used_unchanged() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Devnet);
        let hash = Felt::from_hex("0x0431e8e1a6ba3b5e1f4a6d3b2d1c7bb0fa4e4d2e5b5a5f5c6e8a9b0c1d2e3f40")
            .unwrap();
        registry
            .upsert_contract(ContractKind::Certificate.name(), ContractEntry::declared(&hash))
            .unwrap();
        assert_eq!(recorded_class_hash(ContractKind::Certificate, &registry).unwrap(), hash);
    }
}
