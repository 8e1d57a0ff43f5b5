// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Certificate collection deployments.
//!
//! Two flavours exist. [`deploy_certificate`] goes through the shared batch helper and records
//! the collection in the latest registry. [`deploy_certificate_direct`] builds the UDC call by
//! hand and only writes a snapshot file.

use std::collections::BTreeMap;

use serde::Serialize;
use starknet::{accounts::Account, core::types::Felt};
use typed_builder::TypedBuilder;

use crate::{
    core::{
        artifact::ContractArtifact,
        calldata::compile_constructor,
        contract::ContractKind,
        declaration::{resolve_class_hash, ClassHashSource},
        deployment::{udc, DeploymentBatch},
        network::Network,
        registry::CertificateRecord,
    },
    ops::OpsContext,
    utils::{color::Color, timestamp, unix_millis},
};

/// Placeholder written when the deployed address could not be read from the receipt.
const UNKNOWN_ADDRESS: &str = "Check transaction on explorer";

#[derive(Clone, Debug, TypedBuilder)]
pub struct CertificateRequest {
    /// Collection owner. Defaults to the deployer.
    #[builder(default, setter(strip_option))]
    pub owner: Option<Felt>,
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub metadata: String,
    #[builder(default = ClassHashSource::Registry)]
    pub class_hash: ClassHashSource,
}

/// Snapshot written to `certificate_<network>_<millis>.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDeploymentInfo {
    pub network: Network,
    pub certificate_address: String,
    pub class_hash: String,
    pub owner: String,
    pub name: String,
    pub metadata: String,
    pub deployed_at: String,
    pub transaction_hash: String,
}

impl CertificateDeploymentInfo {
    pub fn record(&self) -> CertificateRecord {
        CertificateRecord {
            address: self.certificate_address.clone(),
            name: self.name.clone(),
            metadata: self.metadata.clone(),
            owner: self.owner.clone(),
            deployed_at: self.deployed_at.clone(),
            class_hash: Some(self.class_hash.clone()),
            active_class_hash: None,
        }
    }
}

fn announce(network: Network, owner: &Felt, request: &CertificateRequest) {
    info!(@yellow, "Deploying {} on {network}", ContractKind::Certificate);
    info!(@yellow, "Owner: {owner:#x}");
    info!(@yellow, "Name: {}", request.name);
    info!(@yellow, "Metadata: {}", request.metadata);
}

fn constructor_calldata(
    ctx: &OpsContext,
    owner: &Felt,
    request: &CertificateRequest,
) -> eyre::Result<Vec<Felt>> {
    let abi = ContractArtifact::load_abi(&ctx.artifacts_dir, ContractKind::Certificate)?;
    let args = BTreeMap::from([
        ("owner".to_string(), format!("{owner:#x}")),
        ("name".to_string(), request.name.clone()),
        ("metadata".to_string(), request.metadata.clone()),
    ]);
    Ok(compile_constructor(&abi, &args)?)
}

/// Deploys a certificate collection through the batch helper.
///
/// The collection is exported under `Certificate_<millis>` and appended to the registry's
/// `certificates` list. A snapshot of the deployment is also written.
pub async fn deploy_certificate(
    ctx: &OpsContext,
    request: &CertificateRequest,
) -> eyre::Result<CertificateDeploymentInfo> {
    let registry = ctx.registry();
    // Fail on a missing registry entry before connecting.
    let recorded = request
        .class_hash
        .resolve_offline(ContractKind::Certificate, &registry)?;

    let account = ctx.connect().await?;
    let owner = request.owner.unwrap_or(account.address());
    announce(ctx.config.network, &owner, request);
    ctx.ensure_fee_balance(&account).await?;

    let class_hash = match recorded {
        Some(class_hash) => {
            info!(@yellow, "Using class hash: {class_hash:#x}");
            class_hash
        }
        None => {
            resolve_class_hash(
                ClassHashSource::Declare,
                ContractKind::Certificate,
                &account,
                &registry,
                &ctx.artifacts_dir,
                ctx.wait,
            )
            .await?
        }
    };

    let calldata = constructor_calldata(ctx, &owner, request)?;
    let mut batch = DeploymentBatch::new();
    let address = batch.queue(
        format!("Certificate_{}", unix_millis()),
        ContractKind::Certificate,
        class_hash,
        calldata,
    );
    let transaction_hash = batch.execute(&account, ctx.wait).await?;
    batch.export(&registry)?;

    let info = CertificateDeploymentInfo {
        network: ctx.config.network,
        certificate_address: format!("{address:#x}"),
        class_hash: format!("{class_hash:#x}"),
        owner: format!("{owner:#x}"),
        name: request.name.clone(),
        metadata: request.metadata.clone(),
        deployed_at: timestamp(),
        transaction_hash: format!("{transaction_hash:#x}"),
    };
    let snapshot = registry.write_snapshot(Some("certificate"), &info)?;
    registry.push_certificate(info.record())?;

    mintln!("Certificate contract deployed successfully!");
    greyln!("certificate address: {}", info.certificate_address.mint());
    greyln!("deployment info saved to: {}", snapshot.display());
    Ok(info)
}

/// Deploys a certificate collection with a hand-built UDC call.
///
/// Only the snapshot file is written; the latest registry is left untouched.
pub async fn deploy_certificate_direct(
    ctx: &OpsContext,
    request: &CertificateRequest,
) -> eyre::Result<CertificateDeploymentInfo> {
    let registry = ctx.registry();
    let class_hash = match request
        .class_hash
        .resolve_offline(ContractKind::Certificate, &registry)?
    {
        Some(class_hash) => class_hash,
        None => eyre::bail!("the direct deployment needs a declared class hash"),
    };
    info!(@yellow, "Using class hash: {class_hash:#x}");

    let account = ctx.connect().await?;
    let owner = request.owner.unwrap_or(account.address());
    announce(ctx.config.network, &owner, request);

    let calldata = constructor_calldata(ctx, &owner, request)?;
    let deployment = udc::deploy(&account, class_hash, &calldata, ctx.wait).await?;

    let info = CertificateDeploymentInfo {
        network: ctx.config.network,
        certificate_address: deployment
            .address
            .map(|address| format!("{address:#x}"))
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        class_hash: format!("{class_hash:#x}"),
        owner: format!("{owner:#x}"),
        name: request.name.clone(),
        metadata: request.metadata.clone(),
        deployed_at: timestamp(),
        transaction_hash: format!("{:#x}", deployment.transaction_hash),
    };
    let snapshot = registry.write_snapshot(Some("certificate"), &info)?;

    mintln!("Certificate contract deployed successfully!");
    greyln!("certificate address: {}", info.certificate_address.mint());
    greyln!("transaction hash: {}", info.transaction_hash);
    greyln!("deployment info saved to: {}", snapshot.display());
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_camel_case_fields() {
        let info = CertificateDeploymentInfo {
            network: Network::Sepolia,
            certificate_address: "0x5".to_string(),
            class_hash: "0xc".to_string(),
            owner: "0x1".to_string(),
            name: "Course".to_string(),
            metadata: "ipfs://meta".to_string(),
            deployed_at: "2025-01-01T00:00:00.000Z".to_string(),
            transaction_hash: "0x7".to_string(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["network"], "sepolia");
        assert_eq!(value["certificateAddress"], "0x5");
        assert_eq!(value["deployedAt"], "2025-01-01T00:00:00.000Z");
        assert_eq!(value["transactionHash"], "0x7");

        let record = info.record();
        assert_eq!(record.address, "0x5");
        assert_eq!(record.class_hash.as_deref(), Some("0xc"));
    }

    #[test]
    fn request_defaults_to_registry_hash() {
        let request = CertificateRequest::builder()
            .name("Course")
            .metadata("ipfs://meta")
            .build();
        assert_eq!(request.class_hash, ClassHashSource::Registry);
        assert_eq!(request.owner, None);
    }
}
