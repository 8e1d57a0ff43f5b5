// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Waiting for submitted transactions to be accepted.

use std::{future::Future, time::Duration};

use starknet::{
    core::types::{
        ExecutionResult, Felt, StarknetError, TransactionReceipt, TransactionReceiptWithBlockInfo,
    },
    providers::{Provider, ProviderError},
};
use tokio::time::{sleep, Instant};
use typed_builder::TypedBuilder;

use crate::utils::color::Color;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("transaction {hash} reverted: {reason}")]
    Reverted { hash: String, reason: String },
    #[error("timed out waiting for transaction {hash}")]
    Timeout { hash: String },
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct WaitConfig {
    /// Delay between receipt polls.
    #[builder(default = Duration::from_millis(5000))]
    pub retry_interval: Duration,
    /// Give up after this long. Waits indefinitely when unset.
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Polls for the receipt of `hash` until it is available.
///
/// A receipt with a reverted execution is an error.
pub async fn wait_for_transaction<P: Provider + Sync>(
    provider: &P,
    hash: Felt,
    config: WaitConfig,
) -> Result<TransactionReceiptWithBlockInfo, TransactionError> {
    info!(@grey, "waiting for transaction {}", format!("{hash:#x}").mint());
    let receipt = poll_until(config, hash, move || async move {
        match provider.get_transaction_receipt(hash).await {
            Ok(receipt) => Ok(Some(receipt)),
            Err(ProviderError::StarknetError(StarknetError::TransactionHashNotFound)) => Ok(None),
            Err(err) => Err(TransactionError::Provider(err)),
        }
    })
    .await?;

    if let ExecutionResult::Reverted { reason } = receipt.receipt.execution_result() {
        return Err(TransactionError::Reverted {
            hash: format!("{hash:#x}"),
            reason: reason.clone(),
        });
    }
    info!(@grey, "transaction {hash:#x} accepted");
    Ok(receipt)
}

/// Events emitted by an invoke transaction. Other receipt kinds carry none we use.
pub fn invoke_events(receipt: &TransactionReceipt) -> &[starknet::core::types::Event] {
    match receipt {
        TransactionReceipt::Invoke(invoke) => &invoke.events,
        _ => &[],
    }
}

pub(crate) async fn poll_until<T, F, Fut>(
    config: WaitConfig,
    hash: Felt,
    mut poll: F,
) -> Result<T, TransactionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, TransactionError>>,
{
    let started = Instant::now();
    loop {
        if let Some(value) = poll().await? {
            return Ok(value);
        }
        if config
            .timeout
            .is_some_and(|timeout| started.elapsed() + config.retry_interval > timeout)
        {
            return Err(TransactionError::Timeout {
                hash: format!("{hash:#x}"),
            });
        }
        debug!(@grey, "transaction {hash:#x} pending, retrying in {:?}", config.retry_interval);
        sleep(config.retry_interval).await;
    }
}
