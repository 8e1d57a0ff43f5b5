// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Planning upgrades of a deployed contract and of the component hashes its factory stores.

use starknet::core::{
    types::{Call, Felt},
    utils::starknet_keccak,
};
use typed_builder::TypedBuilder;

use crate::core::{
    artifact::Abi,
    contract::{Component, ContractKind},
    registry::{DeploymentRegistry, RegistryDocument, RegistryError},
};

#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error(
        "could not find a new class hash; pass --class-hash or record {} in the deployment file",
        ContractKind::Factory
    )]
    MissingClassHash,
    #[error("deployment file not found; deploy the contracts before updating components")]
    RegistryNotFound,
    #[error("contract at {target} has no `{entrypoint}` entrypoint")]
    UnknownEntrypoint {
        target: String,
        entrypoint: &'static str,
    },
    #[error("{0}")]
    Registry(#[from] RegistryError),
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct UpgradeRequest {
    /// Contract to upgrade.
    pub target: Felt,
    /// Class hash to upgrade to.
    #[builder(default, setter(strip_option))]
    pub class_hash: Option<Felt>,
    /// Also point the factory at the latest recorded component hashes.
    #[builder(default)]
    pub update_components: bool,
}

impl UpgradeRequest {
    /// Whether planning reads the deployment file at all.
    pub fn needs_registry(&self) -> bool {
        self.class_hash.is_none() || self.update_components
    }
}

/// Loads the deployment file when `request` depends on it.
///
/// Returns `None` when the file is not needed or does not exist.
pub fn load_registry(
    request: &UpgradeRequest,
    registry: &DeploymentRegistry,
) -> Result<Option<RegistryDocument>, RegistryError> {
    if !request.needs_registry() {
        return Ok(None);
    }
    match registry.load() {
        Ok(document) => Ok(Some(document)),
        Err(RegistryError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// One call of the upgrade multicall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedCall {
    pub entrypoint: &'static str,
    pub calldata: Vec<Felt>,
    pub component: Option<Component>,
}

impl PlannedCall {
    pub fn to_call(&self, target: Felt) -> Call {
        Call {
            to: target,
            selector: starknet_keccak(self.entrypoint.as_bytes()),
            calldata: self.calldata.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradePlan {
    pub target: Felt,
    /// Class hash the target is upgraded to, if it is upgraded at all.
    pub class_hash: Option<Felt>,
    pub calls: Vec<PlannedCall>,
    /// Components without a recorded class hash.
    pub skipped: Vec<Component>,
}

impl UpgradePlan {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.iter().map(|call| call.to_call(self.target)).collect()
    }

    /// Checks that the target's ABI exposes every planned entrypoint.
    pub fn check_entrypoints(&self, abi: &Abi) -> Result<(), UpgradeError> {
        let functions = abi.function_names();
        for call in &self.calls {
            if !functions.contains(call.entrypoint) {
                return Err(UpgradeError::UnknownEntrypoint {
                    target: format!("{:#x}", self.target),
                    entrypoint: call.entrypoint,
                });
            }
        }
        Ok(())
    }
}

/// Resolves the calls an upgrade request expands to.
///
/// `registry` is `None` when the deployment file does not exist.
pub fn plan_upgrade(
    request: &UpgradeRequest,
    registry: Option<&RegistryDocument>,
) -> Result<UpgradePlan, UpgradeError> {
    let mut class_hash = request.class_hash;
    if class_hash.is_none() && !request.update_components {
        if let Some(document) = registry {
            class_hash = document.class_hash(ContractKind::Factory)?;
        }
        if class_hash.is_none() {
            return Err(UpgradeError::MissingClassHash);
        }
    }

    let mut plan = UpgradePlan {
        target: request.target,
        class_hash,
        ..Default::default()
    };
    if let Some(class_hash) = class_hash {
        plan.calls.push(PlannedCall {
            entrypoint: "upgrade",
            calldata: vec![class_hash],
            component: None,
        });
    }

    if request.update_components {
        let document = registry.ok_or(UpgradeError::RegistryNotFound)?;
        for component in Component::ALL {
            match document.class_hash(component.contract())? {
                Some(hash) => plan.calls.push(PlannedCall {
                    entrypoint: component.setter(),
                    calldata: vec![hash],
                    component: Some(component),
                }),
                None => plan.skipped.push(component),
            }
        }
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use starknet::core::utils::get_selector_from_name;
    use tempfile::TempDir;

    use super::*;
    use crate::core::{artifact::tests::FACTORY_ABI, network::Network, registry::ContractEntry};

    const TARGET: Felt = Felt::from_hex_unchecked("0xfac");

    fn registry_with(entries: &[(ContractKind, u64)]) -> RegistryDocument {
        let mut document = RegistryDocument::default();
        for (kind, hash) in entries {
            document.upsert(kind.name(), ContractEntry::declared(&Felt::from(*hash)));
        }
        document
    }

    fn entrypoints(plan: &UpgradePlan) -> Vec<&'static str> {
        plan.calls.iter().map(|call| call.entrypoint).collect()
    }

    #[test]
    fn explicit_hash_upgrades_only() {
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::from(0x99u64))
            .build();
        let plan = plan_upgrade(&request, None).unwrap();
        assert_eq!(entrypoints(&plan), ["upgrade"]);
        assert_eq!(plan.calls[0].calldata, [Felt::from(0x99u64)]);
        assert_eq!(plan.class_hash, Some(Felt::from(0x99u64)));
    }

    #[test]
    fn factory_hash_is_read_from_registry() {
        let document = registry_with(&[(ContractKind::Factory, 0x42)]);
        let request = UpgradeRequest::builder().target(TARGET).build();
        let plan = plan_upgrade(&request, Some(&document)).unwrap();
        assert_eq!(plan.calls[0].calldata, [Felt::from(0x42u64)]);
    }

    #[test]
    fn missing_hash_without_components_is_an_error() {
        let request = UpgradeRequest::builder().target(TARGET).build();
        assert!(matches!(plan_upgrade(&request, None), Err(UpgradeError::MissingClassHash)));
        let document = registry_with(&[(ContractKind::Points, 1)]);
        assert!(matches!(
            plan_upgrade(&request, Some(&document)),
            Err(UpgradeError::MissingClassHash)
        ));
    }

    #[test]
    fn components_require_registry() {
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .update_components(true)
            .build();
        assert!(matches!(plan_upgrade(&request, None), Err(UpgradeError::RegistryNotFound)));
    }

    #[test]
    fn components_only_does_not_upgrade() {
        let document = registry_with(&[
            (ContractKind::Factory, 0x42),
            (ContractKind::Points, 1),
            (ContractKind::Collectible, 2),
            (ContractKind::Certificate, 3),
            (ContractKind::UserAccount, 4),
            (ContractKind::MerchantAccount, 5),
        ]);
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .update_components(true)
            .build();
        let plan = plan_upgrade(&request, Some(&document)).unwrap();
        assert_eq!(plan.class_hash, None);
        assert_eq!(
            entrypoints(&plan),
            [
                "set_points_class_hash",
                "set_collectible_class_hash",
                "set_certificate_class_hash",
                "set_user_class_hash",
                "set_merchant_class_hash",
            ]
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn missing_components_are_skipped() {
        let document = registry_with(&[(ContractKind::Points, 1), (ContractKind::UserAccount, 4)]);
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::from(0x99u64))
            .update_components(true)
            .build();
        let plan = plan_upgrade(&request, Some(&document)).unwrap();
        assert_eq!(
            entrypoints(&plan),
            ["upgrade", "set_points_class_hash", "set_user_class_hash"]
        );
        assert_eq!(
            plan.skipped,
            [Component::Collectible, Component::Certificate, Component::MerchantAccount]
        );
    }

    #[test]
    fn empty_plan_when_nothing_is_recorded() {
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .update_components(true)
            .build();
        let plan = plan_upgrade(&request, Some(&RegistryDocument::default())).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.skipped.len(), Component::ALL.len());
    }

    #[test]
    fn explicit_hash_ignores_malformed_registry() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Sepolia);
        std::fs::write(registry.path(), "{ not json").unwrap();

        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::from(0x99u64))
            .build();
        assert!(!request.needs_registry());
        assert_eq!(load_registry(&request, &registry).unwrap(), None);

        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::from(0x99u64))
            .update_components(true)
            .build();
        assert!(matches!(
            load_registry(&request, &registry),
            Err(RegistryError::Parse { .. })
        ));

        let request = UpgradeRequest::builder().target(TARGET).build();
        assert!(matches!(
            load_registry(&request, &registry),
            Err(RegistryError::Parse { .. })
        ));
    }

    #[test]
    fn missing_registry_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Devnet);
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .update_components(true)
            .build();
        assert_eq!(load_registry(&request, &registry).unwrap(), None);

        registry
            .upsert_contract(ContractKind::Points.name(), ContractEntry::declared(&Felt::ONE))
            .unwrap();
        let document = load_registry(&request, &registry).unwrap().unwrap();
        assert_eq!(document.class_hash(ContractKind::Points).unwrap(), Some(Felt::ONE));
    }

    #[test]
    fn calls_target_the_contract() {
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::ONE)
            .build();
        let calls = plan_upgrade(&request, None).unwrap().calls();
        assert_eq!(calls[0].to, TARGET);
        assert_eq!(calls[0].selector, get_selector_from_name("upgrade").unwrap());
    }

    #[test]
    fn entrypoints_are_checked_against_abi() {
        let abi = Abi::from_json_str(FACTORY_ABI).unwrap();
        let document = registry_with(&[(ContractKind::Points, 1)]);
        let request = UpgradeRequest::builder()
            .target(TARGET)
            .class_hash(Felt::ONE)
            .update_components(true)
            .build();
        let plan = plan_upgrade(&request, Some(&document)).unwrap();
        assert!(plan.check_entrypoints(&abi).is_ok());

        let document = registry_with(&[(ContractKind::UserAccount, 4)]);
        let plan = plan_upgrade(&request, Some(&document)).unwrap();
        let err = plan.check_entrypoints(&abi).unwrap_err();
        assert!(matches!(
            err,
            UpgradeError::UnknownEntrypoint { entrypoint: "set_user_class_hash", .. }
        ));
    }
}
