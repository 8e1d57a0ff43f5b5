// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use starknet::core::types::Felt;

use crate::{
    core::{
        account,
        fees::{get_balance, FeeToken, RpcBalanceReader, TokenAmount},
    },
    ops::OpsContext,
    utils::color::Color,
};

/// STRK balance of `address`, or of the configured account when unset.
pub async fn balance(ctx: &OpsContext, address: Option<Felt>) -> eyre::Result<TokenAmount> {
    let provider = account::provider(&ctx.config);
    let address = address.unwrap_or(ctx.config.account_address);
    let reader = RpcBalanceReader(&provider);
    let amount = get_balance(
        &reader,
        address,
        FeeToken::Strk,
        &ctx.retry,
        ctx.skip_balance_check,
    )
    .await?;
    greyln!("{} balance of {address:#x}: {}", FeeToken::Strk, amount.to_string().mint());
    Ok(amount)
}
