// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deployments through the Universal Deployer Contract.

use starknet::{
    accounts::{Account, ConnectedAccount},
    core::{
        types::{Call, Event, Felt},
        utils::get_contract_address,
    },
    macros::{felt, selector},
};

use crate::{
    core::{
        account::RpcAccount,
        transaction::{invoke_events, wait_for_transaction, WaitConfig},
    },
    utils::{color::Color, random_salt},
};

pub const ADDRESS: Felt =
    felt!("0x041a78e741e5af2fec34b695679bc6891742439f7afb8484ecd7766661ad02bf");
pub const DEPLOY_SELECTOR: Felt = selector!("deployContract");

/// UDC call deploying `class_hash` with `unique = 0`.
pub fn deploy_call(class_hash: Felt, salt: Felt, constructor_calldata: &[Felt]) -> Call {
    let mut calldata = vec![
        class_hash,
        salt,
        Felt::ZERO,
        Felt::from(constructor_calldata.len()),
    ];
    calldata.extend_from_slice(constructor_calldata);
    Call {
        to: ADDRESS,
        selector: DEPLOY_SELECTOR,
        calldata,
    }
}

/// Address a non-unique UDC deployment lands at.
pub fn expected_address(class_hash: Felt, salt: Felt, constructor_calldata: &[Felt]) -> Felt {
    get_contract_address(salt, class_hash, constructor_calldata, Felt::ZERO)
}

/// Deployed address reported by the first UDC event that carries one.
pub fn deployed_address(events: &[Event]) -> Option<Felt> {
    events.iter().find_map(|event| {
        (event.from_address == ADDRESS)
            .then(|| event.data.first().copied())
            .flatten()
    })
}

#[derive(Clone, Debug)]
pub struct UdcDeployment {
    pub transaction_hash: Felt,
    pub salt: Felt,
    /// Address read back from the receipt. `None` when no UDC event was found.
    pub address: Option<Felt>,
}

/// Sends a single UDC deployment, waits for it and reads the address from the receipt.
pub async fn deploy(
    account: &RpcAccount,
    class_hash: Felt,
    constructor_calldata: &[Felt],
    wait: WaitConfig,
) -> crate::Result<UdcDeployment> {
    let salt = random_salt();
    let call = deploy_call(class_hash, salt, constructor_calldata);
    debug!(@grey, "udc calldata: {:?}", call.calldata);

    let result = account.execute_v3(vec![call]).send().await?;
    let transaction_hash = result.transaction_hash;
    info!(@grey, "transaction hash: {}", format!("{transaction_hash:#x}").mint());

    let receipt = wait_for_transaction(account.provider(), transaction_hash, wait).await?;
    let address = deployed_address(invoke_events(&receipt.receipt));
    match address {
        Some(address) => {
            let expected = expected_address(class_hash, salt, constructor_calldata);
            if address != expected {
                warn!(@yellow, "deployed at {address:#x}, expected {expected:#x}");
            }
        }
        None => {
            warn!(@yellow, "could not extract the deployed address from the receipt events");
            warn!(@yellow, "check transaction {transaction_hash:#x} on an explorer");
        }
    }
    Ok(UdcDeployment {
        transaction_hash,
        salt,
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(from_address: Felt, data: Vec<Felt>) -> Event {
        Event {
            from_address,
            keys: vec![selector!("ContractDeployed")],
            data,
        }
    }

    #[test]
    fn call_layout() {
        let call = deploy_call(Felt::from(0xc1u64), Felt::from(9u64), &[Felt::ONE, Felt::TWO]);
        assert_eq!(call.to, ADDRESS);
        assert_eq!(call.selector, selector!("deployContract"));
        assert_eq!(
            call.calldata,
            [
                Felt::from(0xc1u64),
                Felt::from(9u64),
                Felt::ZERO,
                Felt::TWO,
                Felt::ONE,
                Felt::TWO,
            ]
        );
    }

    #[test]
    fn address_comes_from_udc_event() {
        let events = vec![
            event(Felt::from(0x1234u64), vec![Felt::from(1u64)]),
            event(ADDRESS, vec![Felt::from(0xdeadu64), Felt::ZERO]),
        ];
        assert_eq!(deployed_address(&events), Some(Felt::from(0xdeadu64)));
    }

    #[test]
    fn no_udc_event_means_no_address() {
        let events = vec![event(Felt::from(0x1234u64), vec![Felt::from(1u64)])];
        assert_eq!(deployed_address(&events), None);
        assert_eq!(deployed_address(&[event(ADDRESS, vec![])]), None);
    }

    #[test]
    fn skips_udc_events_without_data() {
        let events = [
            event(ADDRESS, vec![]),
            event(Felt::from(0x99u64), vec![Felt::from(0xfeedu64)]),
            event(ADDRESS, vec![Felt::from(0xbeefu64), Felt::ONE]),
        ];
        assert_eq!(deployed_address(&events), Some(Felt::from(0xbeefu64)));
    }

    #[test]
    fn expected_address_depends_on_salt() {
        let class_hash = Felt::from(0xc1u64);
        assert_ne!(
            expected_address(class_hash, Felt::ONE, &[]),
            expected_address(class_hash, Felt::TWO, &[])
        );
    }
}
