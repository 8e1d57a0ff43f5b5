// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::sync::Arc;

use starknet::{
    accounts::{ExecutionEncoding, SingleOwnerAccount},
    core::types::{BlockId, BlockTag},
    providers::{
        jsonrpc::{HttpTransport, JsonRpcClient},
        Provider, ProviderError,
    },
    signers::{LocalWallet, SigningKey},
};

use crate::core::network::NetworkConfig;

pub type RpcProvider = Arc<JsonRpcClient<HttpTransport>>;
pub type RpcAccount = SingleOwnerAccount<RpcProvider, LocalWallet>;

/// JSON-RPC provider for the configured node.
pub fn provider(config: &NetworkConfig) -> RpcProvider {
    Arc::new(JsonRpcClient::new(HttpTransport::new(config.rpc_url.clone())))
}

/// Signing account for the configured address, bound to the node's chain id.
pub async fn connect(config: &NetworkConfig) -> Result<RpcAccount, ProviderError> {
    let provider = provider(config);
    let chain_id = provider.chain_id().await?;
    let signer = LocalWallet::from_signing_key(SigningKey::from_secret_scalar(config.private_key));
    let mut account = SingleOwnerAccount::new(
        provider,
        signer,
        config.account_address,
        chain_id,
        ExecutionEncoding::New,
    );
    account.set_block_id(BlockId::Tag(BlockTag::Latest));
    debug!(@grey, "connected to {} as {:#x}", config.network, config.account_address);
    Ok(account)
}
