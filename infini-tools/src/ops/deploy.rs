// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Full protocol deployment: declare the components, then deploy the factory pointing at them.

use std::collections::BTreeMap;

use eyre::eyre;
use starknet::{accounts::Account, core::types::Felt};

use crate::{
    core::{
        artifact::ContractArtifact,
        calldata::compile_constructor,
        contract::{Component, ContractKind},
        deployment::DeploymentBatch,
    },
    ops::{declare_contracts, OpsContext},
    utils::color::Color,
};

/// Declares every component and the factory, deploys the factory and exports it.
///
/// The factory is owned by `owner`, or by the deployer when unset. Returns the factory address.
pub async fn deploy(ctx: &OpsContext, owner: Option<Felt>) -> eyre::Result<Felt> {
    let account = ctx.connect().await?;
    ctx.ensure_fee_balance(&account).await?;
    let owner = owner.unwrap_or(account.address());

    let mut kinds: Vec<ContractKind> = Component::ALL.iter().map(Component::contract).collect();
    kinds.push(ContractKind::Factory);
    let declared: BTreeMap<ContractKind, Felt> = declare_contracts(ctx, &account, &kinds)
        .await?
        .into_iter()
        .collect();
    let class_hash_of = |kind: ContractKind| {
        declared
            .get(&kind)
            .copied()
            .ok_or_else(|| eyre!("{kind} was not declared"))
    };

    let mut args = BTreeMap::from([("owner".to_string(), format!("{owner:#x}"))]);
    for component in Component::ALL {
        let class_hash = class_hash_of(component.contract())?;
        args.insert(component.constructor_arg().to_string(), format!("{class_hash:#x}"));
    }
    let factory_class_hash = class_hash_of(ContractKind::Factory)?;

    let abi = ContractArtifact::load_abi(&ctx.artifacts_dir, ContractKind::Factory)?;
    let calldata = compile_constructor(&abi, &args)?;

    let mut batch = DeploymentBatch::new();
    let address = batch.queue(
        ContractKind::Factory.name(),
        ContractKind::Factory,
        factory_class_hash,
        calldata,
    );
    batch.execute(&account, ctx.wait).await?;
    batch.export(&ctx.registry())?;

    mintln!("All Setup Done");
    greyln!("{} deployed at {}", ContractKind::Factory, format!("{address:#x}").mint());
    Ok(address)
}
