// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Fee token balances.
//!
//! V3 transactions pay fees in STRK, so STRK is the only token whose balance is checked.

use std::{fmt, time::Duration};

use starknet::{
    core::types::{BlockId, BlockTag, Felt, FunctionCall},
    macros::{felt, selector},
    providers::{Provider, ProviderError},
};
use tokio::time::sleep;

use crate::utils::color::Color;

/// Balance assumed when balance checks are skipped: 10^18.
pub const DEFAULT_BALANCE: TokenAmount = TokenAmount::from_u128(1_000_000_000_000_000_000);

/// Environment variable that disables balance checks when set to `true`.
pub const SKIP_BALANCE_CHECK_VAR: &str = "SKIP_BALANCE_CHECK";

#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    #[error("{0} is not supported as fee token; v3 transactions pay fees in STRK")]
    UnsupportedToken(FeeToken),
    #[error("STRK balance of {account} is zero; fund the account with STRK to pay v3 transaction fees")]
    InsufficientBalance { account: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeToken {
    Strk,
    Eth,
}

impl FeeToken {
    /// Token contract address, identical on mainnet, sepolia and devnet.
    pub fn address(&self) -> Felt {
        match self {
            FeeToken::Strk => {
                felt!("0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d")
            }
            FeeToken::Eth => {
                felt!("0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7")
            }
        }
    }
}

impl fmt::Display for FeeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeToken::Strk => f.write_str("STRK"),
            FeeToken::Eth => f.write_str("ETH"),
        }
    }
}

/// A Cairo `u256` token amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAmount {
    pub high: u128,
    pub low: u128,
}

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount::from_u128(0);

    pub const fn from_u128(low: u128) -> Self {
        Self { high: 0, low }
    }

    pub fn is_zero(&self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// Decodes the `(low, high)` felt pair returned by `balance_of`.
    pub fn from_felts(low: &Felt, high: &Felt) -> Option<Self> {
        Some(Self {
            high: felt_to_u128(high)?,
            low: felt_to_u128(low)?,
        })
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.high == 0 {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{:#x}{:032x}", self.high, self.low)
        }
    }
}

fn felt_to_u128(felt: &Felt) -> Option<u128> {
    let bytes = felt.to_bytes_be();
    let (upper, lower) = bytes.split_at(16);
    if upper.iter().any(|byte| *byte != 0) {
        return None;
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(lower);
    Some(u128::from_be_bytes(buf))
}

/// Reads token balances.
pub trait BalanceReader {
    type Error: fmt::Display;

    #[allow(async_fn_in_trait)]
    async fn balance_of(&self, token: Felt, account: Felt) -> Result<TokenAmount, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum BalanceReadError {
    #[error("{0}")]
    Provider(#[from] ProviderError),
    #[error("unexpected balance_of output: {0:?}")]
    Malformed(Vec<Felt>),
}

/// Reads balances with a `balance_of` call against the latest block.
pub struct RpcBalanceReader<'a, P>(pub &'a P);

impl<P: Provider + Sync> BalanceReader for RpcBalanceReader<'_, P> {
    type Error = BalanceReadError;

    async fn balance_of(&self, token: Felt, account: Felt) -> Result<TokenAmount, Self::Error> {
        let call = FunctionCall {
            contract_address: token,
            entry_point_selector: selector!("balance_of"),
            calldata: vec![account],
        };
        let output = self.0.call(call, BlockId::Tag(BlockTag::Latest)).await?;
        let amount = match output.as_slice() {
            [low, high, ..] => TokenAmount::from_felts(low, high),
            _ => None,
        };
        amount.ok_or(BalanceReadError::Malformed(output))
    }
}

/// Bounded exponential backoff for balance reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(1000),
            multiplier: 2,
        }
    }
}

/// Whether an error message describes a network hiccup worth retrying.
pub fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    [
        "fetch failed",
        "timeout",
        "timed out",
        "econnreset",
        "connection reset",
        "error sending request",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}

/// Whether `SKIP_BALANCE_CHECK=true` is set.
pub fn skip_balance_check_from_env() -> bool {
    std::env::var(SKIP_BALANCE_CHECK_VAR).is_ok_and(|value| value == "true")
}

/// Balance of `account` in `token`.
///
/// Transient failures are retried according to `policy`. Any other failure, or running out of
/// attempts, is logged and reported as a zero balance.
pub async fn get_balance<R: BalanceReader>(
    reader: &R,
    account: Felt,
    token: FeeToken,
    policy: &RetryPolicy,
    skip: bool,
) -> Result<TokenAmount, FeeError> {
    if token != FeeToken::Strk {
        return Err(FeeError::UnsupportedToken(token));
    }
    if skip {
        warn!(@yellow, "skipping balance check ({SKIP_BALANCE_CHECK_VAR}=true), assuming sufficient balance");
        return Ok(DEFAULT_BALANCE);
    }

    let mut delay = policy.initial_delay;
    let mut remaining = policy.attempts.max(1);
    loop {
        match reader.balance_of(token.address(), account).await {
            Ok(balance) => return Ok(balance),
            Err(err) => {
                let message = err.to_string();
                if is_transient(&message) && remaining > 1 {
                    remaining -= 1;
                    warn!(@yellow, "network error fetching balance, retrying in {}ms ({remaining} attempts left)", delay.as_millis());
                    sleep(delay).await;
                    delay *= policy.multiplier;
                } else {
                    error!(@red, "error fetching balance: {message}");
                    return Ok(TokenAmount::ZERO);
                }
            }
        }
    }
}

/// Fails unless `account` holds some STRK to pay fees with.
pub async fn ensure_fee_balance<R: BalanceReader>(
    reader: &R,
    account: Felt,
    policy: &RetryPolicy,
    skip: bool,
) -> Result<TokenAmount, FeeError> {
    let balance = get_balance(reader, account, FeeToken::Strk, policy, skip).await?;
    if balance.is_zero() {
        return Err(FeeError::InsufficientBalance {
            account: format!("{account:#x}"),
        });
    }
    info!(@grey, "using {} for fees (balance {})", FeeToken::Strk.to_string().mint(), balance);
    Ok(balance)
}
