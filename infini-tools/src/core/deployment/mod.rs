// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Batched contract deployments.
//!
//! Deployments are queued first, sent together as a single multicall through the UDC and then
//! exported to the registry once the transaction is accepted.

use std::{collections::BTreeMap, path::PathBuf};

use starknet::{
    accounts::{Account, ConnectedAccount},
    core::types::{Call, Felt},
};

use crate::{
    core::{
        account::RpcAccount,
        contract::ContractKind,
        registry::{ContractEntry, DeploymentRegistry, RegistryError},
        transaction::{wait_for_transaction, WaitConfig},
    },
    utils::{color::Color, random_salt},
};

pub mod udc;

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("no deployments queued")]
    NothingQueued,
    #[error("deployments must be executed before they are exported")]
    NotExecuted,
    #[error("{0}")]
    Registry(#[from] RegistryError),
}

/// A deployment waiting to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedDeployment {
    /// Registry key the deployment is exported under.
    pub export_name: String,
    pub kind: ContractKind,
    pub class_hash: Felt,
    pub salt: Felt,
    pub constructor_calldata: Vec<Felt>,
    /// Precomputed address the contract will be deployed at.
    pub address: Felt,
}

impl QueuedDeployment {
    pub fn call(&self) -> Call {
        udc::deploy_call(self.class_hash, self.salt, &self.constructor_calldata)
    }

    fn entry(&self, transaction_hash: &Felt) -> ContractEntry {
        ContractEntry {
            class_hash: Some(format!("{:#x}", self.class_hash)),
            address: Some(format!("{:#x}", self.address)),
            contract: Some(self.kind.name().to_string()),
            transaction_hash: Some(format!("{transaction_hash:#x}")),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct DeploymentBatch {
    queued: Vec<QueuedDeployment>,
    transaction_hash: Option<Felt>,
}

impl DeploymentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a deployment with a random salt, returning the address it will land at.
    pub fn queue(
        &mut self,
        export_name: impl Into<String>,
        kind: ContractKind,
        class_hash: Felt,
        constructor_calldata: Vec<Felt>,
    ) -> Felt {
        self.queue_with_salt(export_name, kind, class_hash, constructor_calldata, random_salt())
    }

    pub fn queue_with_salt(
        &mut self,
        export_name: impl Into<String>,
        kind: ContractKind,
        class_hash: Felt,
        constructor_calldata: Vec<Felt>,
        salt: Felt,
    ) -> Felt {
        let address = udc::expected_address(class_hash, salt, &constructor_calldata);
        let export_name = export_name.into();
        debug!(@grey, "queued {export_name} at {address:#x}");
        self.queued.push(QueuedDeployment {
            export_name,
            kind,
            class_hash,
            salt,
            constructor_calldata,
            address,
        });
        address
    }

    pub fn queued(&self) -> &[QueuedDeployment] {
        &self.queued
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.queued.iter().map(QueuedDeployment::call).collect()
    }

    pub fn transaction_hash(&self) -> Option<Felt> {
        self.transaction_hash
    }

    /// Sends every queued deployment in one transaction and waits for it.
    pub async fn execute(&mut self, account: &RpcAccount, wait: WaitConfig) -> crate::Result<Felt> {
        if self.queued.is_empty() {
            return Err(DeploymentError::NothingQueued.into());
        }
        info!(@grey, "deploying {} contract(s)", self.queued.len());
        let result = account.execute_v3(self.calls()).send().await?;
        let transaction_hash = result.transaction_hash;
        info!(@grey, "transaction hash: {}", format!("{transaction_hash:#x}").mint());
        wait_for_transaction(account.provider(), transaction_hash, wait).await?;
        for deployment in &self.queued {
            info!(@grey, "{} deployed at {}", deployment.export_name, format!("{:#x}", deployment.address).mint());
        }
        self.transaction_hash = Some(transaction_hash);
        Ok(transaction_hash)
    }

    /// Records executed deployments in the registry and writes a snapshot of them.
    pub fn export(&self, registry: &DeploymentRegistry) -> Result<PathBuf, DeploymentError> {
        let transaction_hash = self.transaction_hash.ok_or(DeploymentError::NotExecuted)?;
        let entries: BTreeMap<String, ContractEntry> = self
            .queued
            .iter()
            .map(|deployment| (deployment.export_name.clone(), deployment.entry(&transaction_hash)))
            .collect();

        registry.update(|document| {
            for (name, entry) in entries.clone() {
                document.upsert(name, entry);
            }
        })?;
        let snapshot = registry.write_snapshot(None, &entries)?;
        info!(@grey, "deployments exported to {}", registry.path().display());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::core::network::Network;

    #[test]
    fn queued_calls_keep_order() {
        let mut batch = DeploymentBatch::new();
        let first = batch.queue_with_salt("A", ContractKind::Points, Felt::ONE, vec![], Felt::ONE);
        let second = batch.queue_with_salt(
            "B",
            ContractKind::Factory,
            Felt::TWO,
            vec![Felt::THREE],
            Felt::ONE,
        );
        assert_ne!(first, second);
        let calls = batch.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].calldata[0], Felt::ONE);
        assert_eq!(calls[1].calldata, [Felt::TWO, Felt::ONE, Felt::ZERO, Felt::ONE, Felt::THREE]);
    }

    #[test]
    fn export_requires_execution() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Devnet);
        let mut batch = DeploymentBatch::new();
        batch.queue("A", ContractKind::Points, Felt::ONE, vec![]);
        assert!(matches!(batch.export(&registry), Err(DeploymentError::NotExecuted)));
        assert!(!registry.exists());
    }

    #[test]
    fn export_records_every_deployment() {
        let dir = TempDir::new().unwrap();
        let registry = DeploymentRegistry::new(dir.path(), Network::Devnet);
        let mut batch = DeploymentBatch::new();
        let address = batch.queue_with_salt(
            "Certificate_1700000000000",
            ContractKind::Certificate,
            Felt::from(0xc3u64),
            vec![],
            Felt::ONE,
        );
        batch.transaction_hash = Some(Felt::from(0x7u64));

        let snapshot = batch.export(&registry).unwrap();
        assert!(snapshot.is_file());

        let document = registry.load().unwrap();
        let entry = document.entry("Certificate_1700000000000").unwrap();
        assert_eq!(entry.class_hash.as_deref(), Some("0xc3"));
        assert_eq!(entry.address, Some(format!("{address:#x}")));
        assert_eq!(entry.contract.as_deref(), Some("InfiniRewardsCertificate"));
        assert_eq!(entry.transaction_hash.as_deref(), Some("0x7"));
    }
}
