// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Target networks and the per-network account configuration read from the environment.

use std::fmt;

use starknet::core::types::Felt;
use url::Url;

use crate::utils::parse_felt;

/// Networks the deployment scripts know how to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    Sepolia,
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Devnet, Network::Sepolia, Network::Mainnet];

    /// Lowercase name, also used as the registry file prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Sepolia => "sepolia",
            Network::Mainnet => "mainnet",
        }
    }

    pub fn rpc_url_var(&self) -> String {
        format!("RPC_URL_{}", self.env_suffix())
    }

    pub fn account_address_var(&self) -> String {
        format!("ACCOUNT_ADDRESS_{}", self.env_suffix())
    }

    pub fn private_key_var(&self) -> String {
        format!("PRIVATE_KEY_{}", self.env_suffix())
    }

    fn env_suffix(&self) -> &'static str {
        match self {
            Network::Devnet => "DEVNET",
            Network::Sepolia => "SEPOLIA",
            Network::Mainnet => "MAINNET",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error(
        "missing {} network configuration: {} not set (check your .env file)",
        .network,
        .vars.join(", ")
    )]
    MissingEnv { network: Network, vars: Vec<String> },
    #[error("invalid RPC url in {var}: {source}")]
    InvalidUrl {
        var: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid value in {var}: {reason}")]
    InvalidFelt { var: String, reason: String },
}

/// Everything needed to build a provider and a signing account for a network.
#[derive(Clone)]
pub struct NetworkConfig {
    pub network: Network,
    pub rpc_url: Url,
    pub account_address: Felt,
    pub private_key: Felt,
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("account_address", &format!("{:#x}", self.account_address))
            .finish_non_exhaustive()
    }
}

impl NetworkConfig {
    /// Reads the configuration for `network` from the process environment.
    pub fn from_env(network: Network) -> Result<Self, NetworkError> {
        Self::from_lookup(network, |var| std::env::var(var).ok())
    }

    /// Reads the configuration using an arbitrary variable lookup.
    ///
    /// All three variables are required. Every missing one is reported at once.
    pub fn from_lookup(
        network: Network,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, NetworkError> {
        let rpc_var = network.rpc_url_var();
        let address_var = network.account_address_var();
        let key_var = network.private_key_var();

        let fetch = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let rpc_url = fetch(&rpc_var);
        let account_address = fetch(&address_var);
        let private_key = fetch(&key_var);

        let (Some(rpc_url), Some(account_address), Some(private_key)) =
            (&rpc_url, &account_address, &private_key)
        else {
            let vars = [
                (rpc_var, rpc_url.is_none()),
                (address_var, account_address.is_none()),
                (key_var, private_key.is_none()),
            ]
            .into_iter()
            .filter_map(|(var, missing)| missing.then_some(var))
            .collect();
            return Err(NetworkError::MissingEnv { network, vars });
        };

        let rpc_url = Url::parse(rpc_url.trim()).map_err(|source| NetworkError::InvalidUrl {
            var: rpc_var,
            source,
        })?;
        let account_address = parse_felt(account_address)
            .map_err(|reason| NetworkError::InvalidFelt { var: address_var, reason })?;
        let private_key = parse_felt(private_key).map_err(|_| NetworkError::InvalidFelt {
            var: key_var,
            reason: "not a valid private key".to_string(),
        })?;

        Ok(Self {
            network,
            rpc_url,
            account_address,
            private_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env(network: Network) -> HashMap<String, String> {
        HashMap::from([
            (network.rpc_url_var(), "http://127.0.0.1:5050".to_string()),
            (network.account_address_var(), "0x64b48806902a367c8598f4f95c305e8c1a1acba5f082d294a43793113115691".to_string()),
            (network.private_key_var(), "0x71d7bb07b9a64f6f78ac4c816aff4da9".to_string()),
        ])
    }

    #[test]
    fn reads_complete_config() {
        for network in Network::ALL {
            let env = full_env(network);
            let config = NetworkConfig::from_lookup(network, |var| env.get(var).cloned()).unwrap();
            assert_eq!(config.network, network);
            assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:5050/");
        }
    }

    #[test]
    fn any_missing_variable_fails_for_every_network() {
        for network in Network::ALL {
            let vars = [
                network.rpc_url_var(),
                network.account_address_var(),
                network.private_key_var(),
            ];
            for missing in &vars {
                let mut env = full_env(network);
                env.remove(missing);
                let err = NetworkConfig::from_lookup(network, |var| env.get(var).cloned())
                    .unwrap_err();
                match err {
                    NetworkError::MissingEnv { network: n, vars } => {
                        assert_eq!(n, network);
                        assert_eq!(&vars, &[missing.clone()]);
                    }
                    other => panic!("unexpected error: {other}"),
                }
            }
        }
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut env = full_env(Network::Sepolia);
        env.insert(Network::Sepolia.private_key_var(), "  ".to_string());
        let err = NetworkConfig::from_lookup(Network::Sepolia, |var| env.get(var).cloned())
            .unwrap_err();
        assert!(matches!(err, NetworkError::MissingEnv { .. }));
    }

    #[test]
    fn reports_all_missing_variables() {
        let err = NetworkConfig::from_lookup(Network::Mainnet, |_| None).unwrap_err();
        let NetworkError::MissingEnv { vars, .. } = err else {
            panic!("expected missing env error");
        };
        assert_eq!(
            vars,
            ["RPC_URL_MAINNET", "ACCOUNT_ADDRESS_MAINNET", "PRIVATE_KEY_MAINNET"]
        );
    }

    #[test]
    fn missing_env_message_is_plain_text() {
        let err = NetworkConfig::from_lookup(Network::Sepolia, |_| None).unwrap_err();
        let message = err.to_string();
        assert!(!message.contains('\x1b'), "{message:?}");
        assert!(message.contains("RPC_URL_SEPOLIA, ACCOUNT_ADDRESS_SEPOLIA, PRIVATE_KEY_SEPOLIA"));
    }

    #[test]
    fn rejects_malformed_values() {
        let mut env = full_env(Network::Devnet);
        env.insert(Network::Devnet.rpc_url_var(), "not a url".to_string());
        let err = NetworkConfig::from_lookup(Network::Devnet, |var| env.get(var).cloned())
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl { .. }));

        let mut env = full_env(Network::Devnet);
        env.insert(Network::Devnet.account_address_var(), "0xnothex".to_string());
        let err = NetworkConfig::from_lookup(Network::Devnet, |var| env.get(var).cloned())
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidFelt { .. }));
    }
}
