// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use starknet::{
    accounts::{Account, ConnectedAccount},
    core::types::{BlockId, BlockTag, ContractClass, Felt},
    providers::Provider,
};

use crate::{
    core::{
        account::RpcAccount,
        artifact::Abi,
        contract::ContractKind,
        transaction::wait_for_transaction,
        upgrade::{load_registry, plan_upgrade, UpgradePlan, UpgradeRequest},
    },
    ops::{declare_contracts, OpsContext},
    utils::color::Color,
};

/// Upgrades a contract and/or refreshes the component hashes stored by the factory.
///
/// Every planned call is sent in one multicall. Returns the transaction hash, or `None` when
/// there was nothing to do.
pub async fn upgrade(
    ctx: &OpsContext,
    request: &UpgradeRequest,
    declare: bool,
) -> eyre::Result<Option<Felt>> {
    let mut account = None;
    if declare {
        info!(@yellow, "Declaring all contracts first...");
        let connected = ctx.connect().await?;
        declare_contracts(ctx, &connected, &ContractKind::ALL).await?;
        account = Some(connected);
    }

    if request.class_hash.is_none() {
        if request.update_components {
            info!(@yellow, "Class hash not provided, only updating components");
        } else {
            info!(@yellow, "New class hash not provided, reading {} from the deployment file", ContractKind::Factory);
        }
    }

    let registry = ctx.registry();
    let document = load_registry(request, &registry)?;
    let plan = plan_upgrade(request, document.as_ref())?;
    for component in &plan.skipped {
        warn!(@yellow, "Skipping {component} as it was not found in the deployment file");
    }
    if plan.is_empty() {
        info!(@yellow, "No actions to perform");
        return Ok(None);
    }

    let account = match account {
        Some(account) => account,
        None => ctx.connect().await?,
    };
    info!(@yellow, "Target contract address: {:#x}", plan.target);
    check_target(&account, &plan).await?;

    info!(@yellow, "Executing {} call(s)...", plan.calls.len());
    let result = account.execute_v3(plan.calls()).send().await?;
    wait_for_transaction(account.provider(), result.transaction_hash, ctx.wait).await?;
    mintln!("Transaction successful!");
    greyln!("transaction hash: {}", format!("{:#x}", result.transaction_hash).mint());

    // Declared hashes stay as they are; only the active class of the target is recorded.
    if let (Some(class_hash), true) = (plan.class_hash, registry.exists()) {
        match registry.update(|document| document.set_active_class_hash_at(&plan.target, &class_hash)) {
            Ok(touched) => debug!(@grey, "recorded active class of {touched} registry record(s)"),
            Err(err) => warn!(@yellow, "could not record the active class hash: {err}"),
        }
    }
    Ok(Some(result.transaction_hash))
}

/// Fetches the class at the target and checks it exposes every planned entrypoint.
async fn check_target(account: &RpcAccount, plan: &UpgradePlan) -> eyre::Result<()> {
    let class = account
        .provider()
        .get_class_at(BlockId::Tag(BlockTag::Latest), plan.target)
        .await?;
    let abi = match class {
        ContractClass::Sierra(class) => Abi::from_json_str(&class.abi)?,
        ContractClass::Legacy(_) => {
            eyre::bail!("contract at {:#x} is a legacy Cairo 0 contract", plan.target)
        }
    };
    plan.check_entrypoints(&abi)?;
    Ok(())
}
