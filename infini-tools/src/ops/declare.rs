// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use starknet::core::types::Felt;

use crate::{
    core::{
        account::RpcAccount,
        artifact::ContractArtifact,
        contract::ContractKind,
        declaration::declare_contract,
        registry::ContractEntry,
    },
    ops::OpsContext,
    utils::color::Color,
};

/// Declares every contract and records the class hashes.
pub async fn declare(ctx: &OpsContext) -> eyre::Result<Vec<(ContractKind, Felt)>> {
    let account = ctx.connect().await?;
    ctx.ensure_fee_balance(&account).await?;
    declare_contracts(ctx, &account, &ContractKind::ALL).await
}

/// Declares `kinds` in order, skipping classes that already exist on chain.
///
/// Artifacts are loaded up front so a missing one fails before anything is sent.
pub async fn declare_contracts(
    ctx: &OpsContext,
    account: &RpcAccount,
    kinds: &[ContractKind],
) -> eyre::Result<Vec<(ContractKind, Felt)>> {
    let artifacts = kinds
        .iter()
        .map(|kind| ContractArtifact::load(&ctx.artifacts_dir, *kind))
        .collect::<Result<Vec<_>, _>>()?;

    let registry = ctx.registry();
    let mut declared = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        let class_hash = declare_contract(account, artifact, ctx.wait).await?;
        registry.upsert_contract(artifact.kind.name(), ContractEntry::declared(&class_hash))?;
        greyln!("{} class hash: {}", artifact.kind, format!("{class_hash:#x}").mint());
        declared.push((artifact.kind, class_hash));
    }
    Ok(declared)
}
