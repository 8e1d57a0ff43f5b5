// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! The InfiniRewards contract set.

use std::fmt;

/// Every contract the scripts declare or deploy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractKind {
    Points,
    Collectible,
    Certificate,
    UserAccount,
    MerchantAccount,
    Factory,
}

impl ContractKind {
    pub const ALL: [ContractKind; 6] = [
        ContractKind::Points,
        ContractKind::Collectible,
        ContractKind::Certificate,
        ContractKind::UserAccount,
        ContractKind::MerchantAccount,
        ContractKind::Factory,
    ];

    /// Cairo contract name, also the registry key.
    pub fn name(&self) -> &'static str {
        match self {
            ContractKind::Points => "InfiniRewardsPoints",
            ContractKind::Collectible => "InfiniRewardsCollectible",
            ContractKind::Certificate => "InfiniRewardsCertificate",
            ContractKind::UserAccount => "InfiniRewardsUserAccount",
            ContractKind::MerchantAccount => "InfiniRewardsMerchantAccount",
            ContractKind::Factory => "InfiniRewardsFactory",
        }
    }

    /// File stem of the compiled artifacts, `<package>_<contract>`.
    pub fn artifact_stem(&self) -> String {
        format!("contracts_{}", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contracts whose class hash is stored by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Points,
    Collectible,
    Certificate,
    UserAccount,
    MerchantAccount,
}

impl Component {
    /// Order in which setter calls are batched.
    pub const ALL: [Component; 5] = [
        Component::Points,
        Component::Collectible,
        Component::Certificate,
        Component::UserAccount,
        Component::MerchantAccount,
    ];

    pub fn contract(&self) -> ContractKind {
        match self {
            Component::Points => ContractKind::Points,
            Component::Collectible => ContractKind::Collectible,
            Component::Certificate => ContractKind::Certificate,
            Component::UserAccount => ContractKind::UserAccount,
            Component::MerchantAccount => ContractKind::MerchantAccount,
        }
    }

    /// Factory entrypoint that replaces this component's class hash.
    pub fn setter(&self) -> &'static str {
        match self {
            Component::Points => "set_points_class_hash",
            Component::Collectible => "set_collectible_class_hash",
            Component::Certificate => "set_certificate_class_hash",
            Component::UserAccount => "set_user_class_hash",
            Component::MerchantAccount => "set_merchant_class_hash",
        }
    }

    /// Name of the matching factory constructor argument.
    pub fn constructor_arg(&self) -> &'static str {
        match self {
            Component::Points => "infini_rewards_points_hash",
            Component::Collectible => "infini_rewards_collectible_hash",
            Component::Certificate => "infini_rewards_certificate_hash",
            Component::UserAccount => "infini_rewards_user_account_hash",
            Component::MerchantAccount => "infini_rewards_merchant_account_hash",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.contract().name())
    }
}
