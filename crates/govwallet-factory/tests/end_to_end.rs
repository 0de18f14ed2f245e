//! End-to-end tests on the in-process host.
//!
//! Every scenario deploys real units on a [`Chain`], drives them through
//! direct calls and owner-signed commands, and checks owner sets, balances,
//! and the event log afterwards.

use govwallet_dispatch::{CallKind, CommandSigner, GovernanceCall};
use govwallet_factory::{Chain, Unit, WalletFactory};
use govwallet_types::{Address, AuthRoute, ChainConfig, GovernanceEvent, WalletError};

fn signer(label: &str) -> CommandSigner {
    CommandSigner::from_label(label).expect("label key")
}

/// A host with one wallet seeded with `owner` and holding `funds`.
fn chain_with_wallet(owner: Address, funds: u128) -> (Chain, Address) {
    let mut chain = Chain::default();
    let wallet = chain.deploy_wallet(owner, owner).unwrap();
    if funds > 0 {
        let donor = Address::random();
        chain.fund(donor, funds).unwrap();
        chain.deposit(donor, wallet, funds).unwrap();
    }
    (chain, wallet)
}

// =============================================================================
// Scenario 1: add then remove an owner
// =============================================================================
#[test]
fn scenario_add_then_remove_owner() {
    let a = Address::random();
    let b = Address::random();
    let (mut chain, wallet) = chain_with_wallet(a, 0);

    assert!(chain.is_owner(&wallet, &a).unwrap());
    chain.add_owner(wallet, a, b).unwrap();
    assert_eq!(chain.owners(&wallet).unwrap(), vec![a, b]);
    chain.remove_owner(wallet, a, b).unwrap();
    assert_eq!(chain.owners(&wallet).unwrap(), vec![a]);
}

// =============================================================================
// Scenario 2: overdraw fails, exact send succeeds
// =============================================================================
#[test]
fn scenario_send_native_token() {
    let a = Address::random();
    let (mut chain, wallet) = chain_with_wallet(a, 1);

    let err = chain.send_native_token(wallet, a, a, 2).unwrap_err();
    assert_eq!(
        err,
        WalletError::InsufficientBalance {
            needed: 2,
            available: 1
        }
    );
    assert_eq!(chain.balance(&wallet).unwrap(), 1);

    chain.send_native_token(wallet, a, a, 1).unwrap();
    assert_eq!(chain.balance(&wallet).unwrap(), 0);
    assert_eq!(chain.native_balance(&a), 1);
}

// =============================================================================
// Scenario 3: a removeOwner command submitted to addOwner
// =============================================================================
#[test]
fn scenario_wrong_selector() {
    let a = signer("alice");
    let b = Address::random();
    let (mut chain, wallet) = chain_with_wallet(a.address(), 0);
    chain.add_owner(wallet, a.address(), b).unwrap();

    let cmd = a
        .sign_call(&GovernanceCall::RemoveOwner { owner: b })
        .unwrap();
    let err = chain.add_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(err.reason(), "WrongSelector");
    assert_eq!(chain.owners(&wallet).unwrap(), vec![a.address(), b]);
}

// =============================================================================
// Scenario 4: factory creates an independent wallet
// =============================================================================
#[test]
fn scenario_factory_creates_wallet() {
    let s = Address::random();
    let x = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();

    let before = chain.wallet_index(&factory).unwrap();
    let created = chain.create_wallet(factory, s, x).unwrap();

    assert_eq!(chain.wallet_index(&factory).unwrap(), before + 1);
    assert_eq!(chain.wallet_at(&factory, before + 1).unwrap(), Some(created));
    assert!(chain.is_owner(&created, &x).unwrap());
    assert!(!chain.is_owner(&created, &s).unwrap());
    assert_eq!(chain.balance(&created).unwrap(), 0);
}

// =============================================================================
// Properties
// =============================================================================
#[test]
fn non_owner_mutations_leave_state_unchanged() {
    let owner = Address::random();
    let outsider = Address::random();
    let (mut chain, wallet) = chain_with_wallet(owner, 100);
    let events_before = chain.events().len();

    let attempts = [
        chain.add_owner(wallet, outsider, outsider),
        chain.remove_owner(wallet, outsider, owner),
        chain.send_native_token(wallet, outsider, outsider, 10),
    ];
    for result in attempts {
        assert_eq!(result.unwrap_err().reason(), "OnlyOwner");
    }
    assert_eq!(chain.owners(&wallet).unwrap(), vec![owner]);
    assert_eq!(chain.balance(&wallet).unwrap(), 100);
    assert_eq!(chain.events().len(), events_before);
}

#[test]
fn signature_and_direct_routes_are_equivalent() {
    let owner = signer("owner");
    let new_owner = Address::random();
    let to = Address::random();

    let (mut direct, w1) = chain_with_wallet(owner.address(), 500);
    let (mut signed, w2) = chain_with_wallet(owner.address(), 500);

    direct.add_owner(w1, owner.address(), new_owner).unwrap();
    direct
        .send_native_token(w1, owner.address(), to, 123)
        .unwrap();

    let add = owner
        .sign_call(&GovernanceCall::AddOwner { owner: new_owner })
        .unwrap();
    let send = owner
        .sign_call(&GovernanceCall::SendNativeToken { to, amount: 123 })
        .unwrap();
    signed.add_owner_with_signature(w2, &add).unwrap();
    signed.send_native_token_with_signature(w2, &send).unwrap();

    assert_eq!(direct.owners(&w1).unwrap(), signed.owners(&w2).unwrap());
    assert_eq!(direct.balance(&w1).unwrap(), signed.balance(&w2).unwrap());
    assert_eq!(direct.native_balance(&to), signed.native_balance(&to));

    let routes: Vec<_> = signed
        .events_for(w2)
        .filter_map(|r| match r.event {
            GovernanceEvent::OwnerAdded { route, .. }
            | GovernanceEvent::NativeTokenSent { route, .. } => Some(route),
            _ => None,
        })
        .collect();
    assert_eq!(routes, vec![AuthRoute::Signature, AuthRoute::Signature]);
}

#[test]
fn selector_binding_holds_for_every_entry_point() {
    let owner = signer("binder");
    let outsider = signer("stranger");
    let (mut chain, wallet) = chain_with_wallet(owner.address(), 10);

    let calls = [
        GovernanceCall::AddOwner {
            owner: Address::random(),
        },
        GovernanceCall::RemoveOwner {
            owner: owner.address(),
        },
        GovernanceCall::SendNativeToken {
            to: Address::random(),
            amount: 1,
        },
    ];
    for call in calls {
        for entry in CallKind::ALL {
            if entry == call.kind() {
                continue;
            }
            // Valid owner signature and a non-owner signature alike.
            for key in [&owner, &outsider] {
                let cmd = key.sign_call(&call).unwrap();
                let result = match entry {
                    CallKind::AddOwner => chain.add_owner_with_signature(wallet, &cmd),
                    CallKind::RemoveOwner => chain.remove_owner_with_signature(wallet, &cmd),
                    CallKind::SendNativeToken => {
                        chain.send_native_token_with_signature(wallet, &cmd)
                    }
                };
                assert_eq!(result.unwrap_err().reason(), "WrongSelector");
            }
        }
    }
    assert_eq!(chain.owners(&wallet).unwrap(), vec![owner.address()]);
    assert_eq!(chain.balance(&wallet).unwrap(), 10);
}

#[test]
fn signed_calls_reject_zero_address_parameters() {
    let a = signer("zero-params");
    let (mut chain, wallet) = chain_with_wallet(a.address(), 50);
    let events = chain.events().len();

    let cmd = a
        .sign_call(&GovernanceCall::AddOwner {
            owner: Address::ZERO,
        })
        .unwrap();
    let err = chain.add_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(err, WalletError::ZeroAddress);
    assert_eq!(chain.owners(&wallet).unwrap(), vec![a.address()]);

    let cmd = a
        .sign_call(&GovernanceCall::SendNativeToken {
            to: Address::ZERO,
            amount: 10,
        })
        .unwrap();
    let err = chain
        .send_native_token_with_signature(wallet, &cmd)
        .unwrap_err();
    assert_eq!(err, WalletError::ZeroAddress);
    assert_eq!(chain.balance(&wallet).unwrap(), 50);
    assert_eq!(chain.native_balance(&Address::ZERO), 0);
    assert_eq!(chain.events().len(), events);
}

#[test]
fn signer_check_precedes_owner_rules() {
    let a = signer("registry-owner");
    let outsider = signer("registry-outsider");
    let (mut chain, wallet) = chain_with_wallet(a.address(), 0);

    // The parameter would trip OwnerExists, but the signer is checked first.
    let cmd = outsider
        .sign_call(&GovernanceCall::AddOwner { owner: a.address() })
        .unwrap();
    let err = chain.add_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(
        err,
        WalletError::InvalidSigner {
            signer: outsider.address()
        }
    );

    // Same for NotAnOwner on removal.
    let cmd = outsider
        .sign_call(&GovernanceCall::RemoveOwner {
            owner: outsider.address(),
        })
        .unwrap();
    let err = chain.remove_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(err.reason(), "InvalidSigner");
    assert_eq!(chain.owners(&wallet).unwrap(), vec![a.address()]);
}

#[test]
fn anyone_may_submit_but_only_owner_signatures_count() {
    let owner = signer("treasurer");
    let outsider = signer("mallory");
    let (mut chain, wallet) = chain_with_wallet(owner.address(), 50);

    let forged = outsider
        .sign_call(&GovernanceCall::SendNativeToken {
            to: outsider.address(),
            amount: 50,
        })
        .unwrap();
    let err = chain
        .send_native_token_with_signature(wallet, &forged)
        .unwrap_err();
    assert_eq!(
        err,
        WalletError::InvalidSigner {
            signer: outsider.address()
        }
    );
    assert_eq!(chain.balance(&wallet).unwrap(), 50);
    assert_eq!(chain.native_balance(&outsider.address()), 0);
}

#[test]
fn signed_command_can_be_replayed_while_preconditions_hold() {
    let owner = signer("replay");
    let to = Address::random();
    let (mut chain, wallet) = chain_with_wallet(owner.address(), 25);
    let cmd = owner
        .sign_call(&GovernanceCall::SendNativeToken { to, amount: 10 })
        .unwrap();

    chain.send_native_token_with_signature(wallet, &cmd).unwrap();
    chain.send_native_token_with_signature(wallet, &cmd).unwrap();
    assert_eq!(chain.native_balance(&to), 20);

    let err = chain
        .send_native_token_with_signature(wallet, &cmd)
        .unwrap_err();
    assert_eq!(err.reason(), "InsufficientBalance");
    assert_eq!(chain.balance(&wallet).unwrap(), 5);
}

#[test]
fn signed_add_owner_replay_fails_owner_exists() {
    let owner = signer("adder");
    let (mut chain, wallet) = chain_with_wallet(owner.address(), 0);
    let cmd = owner
        .sign_call(&GovernanceCall::AddOwner {
            owner: Address::random(),
        })
        .unwrap();
    chain.add_owner_with_signature(wallet, &cmd).unwrap();
    let err = chain.add_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(err.reason(), "OwnerExists");
}

#[test]
fn factory_wallets_are_isolated() {
    let s = Address::random();
    let (a, b) = (Address::random(), Address::random());
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();

    let wa = chain.create_wallet(factory, s, a).unwrap();
    let wb = chain.create_wallet(factory, s, b).unwrap();

    assert_ne!(wa, wb);
    assert_eq!(chain.owners(&wa).unwrap(), vec![a]);
    assert_eq!(chain.owners(&wb).unwrap(), vec![b]);
    assert_eq!(chain.owners(&factory).unwrap(), vec![s]);

    // Governing one wallet does not touch the other or the factory.
    chain.add_owner(wa, a, b).unwrap();
    assert_eq!(chain.owners(&wb).unwrap(), vec![b]);
    assert_eq!(chain.owners(&factory).unwrap(), vec![s]);
    let err = chain.add_owner(wa, s, s).unwrap_err();
    assert_eq!(err.reason(), "OnlyOwner");
}

#[test]
fn seed_owner_equal_to_factory_owner_is_allowed() {
    let s = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();
    let w = chain.create_wallet(factory, s, s).unwrap();
    assert_eq!(chain.owners(&w).unwrap(), vec![s]);
}

#[test]
fn factory_rejects_non_owner_and_zero_seed() {
    let s = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();

    let outsider = Address::random();
    let err = chain.create_wallet(factory, outsider, outsider).unwrap_err();
    assert_eq!(err.reason(), "OnlyOwner");
    let err = chain.create_wallet(factory, s, Address::ZERO).unwrap_err();
    assert_eq!(err, WalletError::ZeroAddress);
    assert_eq!(chain.wallet_index(&factory).unwrap(), 0);
    assert_eq!(chain.wallet_at(&factory, 0).unwrap(), None);
}

fn next_wallet_address(chain: &Chain, factory: &Address) -> Address {
    chain
        .unit(factory)
        .and_then(Unit::as_factory)
        .map(WalletFactory::next_wallet_address)
        .expect("factory deployed")
}

#[test]
fn zero_value_sends_to_next_wallet_address_cannot_block_creation() {
    let s = Address::random();
    let griefer = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();
    let griefer_wallet = chain.deploy_wallet(griefer, griefer).unwrap();

    // A zero-value send and a zero deposit aimed at the predicted address.
    let next = next_wallet_address(&chain, &factory);
    chain.send_native_token(griefer_wallet, griefer, next, 0).unwrap();
    chain.deposit(next, griefer_wallet, 0).unwrap();

    let first = chain.create_wallet(factory, s, s).unwrap();
    assert_eq!(first, next);
    let next = next_wallet_address(&chain, &factory);
    chain.send_native_token(griefer_wallet, griefer, next, 0).unwrap();
    let second = chain.create_wallet(factory, s, s).unwrap();
    assert_eq!(second, next);
    assert_eq!(chain.wallet_index(&factory).unwrap(), 2);
    assert_eq!(chain.balance(&first).unwrap(), 0);
}

#[test]
fn value_sent_before_creation_becomes_opening_balance() {
    let s = Address::random();
    let donor = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();
    let donor_wallet = chain.deploy_wallet(donor, donor).unwrap();
    chain.fund(donor, 90).unwrap();
    chain.deposit(donor, donor_wallet, 90).unwrap();

    let next = next_wallet_address(&chain, &factory);
    chain.send_native_token(donor_wallet, donor, next, 30).unwrap();
    assert_eq!(chain.native_balance(&next), 30);
    let supply = chain.total_native_supply();

    let created = chain.create_wallet(factory, s, Address::random()).unwrap();
    assert_eq!(created, next);
    assert_eq!(chain.balance(&created).unwrap(), 30);
    assert_eq!(chain.total_native_supply(), supply);
    let kinds: Vec<_> = chain.events_for(created).map(|r| r.event.kind()).collect();
    assert_eq!(kinds, vec!["DEPOSITED"]);
}

#[test]
fn caller_errors_win_over_anything_at_next_address() {
    let s = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s).unwrap();
    let next = next_wallet_address(&chain, &factory);
    chain.fund(next, 5).unwrap();

    let outsider = Address::random();
    let err = chain.create_wallet(factory, outsider, outsider).unwrap_err();
    assert_eq!(err, WalletError::OnlyOwner { caller: outsider });
    let err = chain.create_wallet(factory, s, Address::ZERO).unwrap_err();
    assert_eq!(err, WalletError::ZeroAddress);
    assert_eq!(chain.wallet_index(&factory).unwrap(), 0);
    assert_eq!(chain.native_balance(&next), 5);
}

#[test]
fn factory_is_governed_like_a_wallet() {
    let s = signer("factory-owner");
    let t = Address::random();
    let mut chain = Chain::default();
    let factory = chain.deploy_factory(s.address()).unwrap();
    assert!(chain.unit(&factory).is_some_and(Unit::is_factory));

    let cmd = s.sign_call(&GovernanceCall::AddOwner { owner: t }).unwrap();
    chain.add_owner_with_signature(factory, &cmd).unwrap();
    let created = chain.create_wallet(factory, t, t).unwrap();
    assert_eq!(chain.wallet_at(&factory, 1).unwrap(), Some(created));

    let donor = Address::random();
    chain.fund(donor, 9).unwrap();
    chain.deposit(donor, factory, 9).unwrap();
    chain.send_native_token(factory, t, created, 4).unwrap();
    assert_eq!(chain.balance(&factory).unwrap(), 5);
    assert_eq!(chain.balance(&created).unwrap(), 4);
}

#[test]
fn value_is_conserved_across_transfers() {
    let owner = Address::random();
    let (mut chain, a) = chain_with_wallet(owner, 1_000);
    let b = chain.deploy_wallet(owner, owner).unwrap();
    let supply = chain.total_native_supply();

    chain.send_native_token(a, owner, b, 300).unwrap();
    chain.send_native_token(b, owner, owner, 100).unwrap();
    chain.send_native_token(a, owner, a, 50).unwrap();
    assert!(chain.send_native_token(a, owner, b, 10_000).is_err());

    assert_eq!(chain.balance(&a).unwrap(), 700);
    assert_eq!(chain.balance(&b).unwrap(), 200);
    assert_eq!(chain.native_balance(&owner), 100);
    assert_eq!(chain.total_native_supply(), supply);
}

#[test]
fn emptied_owner_set_locks_the_wallet() {
    let owner = signer("last");
    let (mut chain, wallet) = chain_with_wallet(owner.address(), 5);
    chain
        .remove_owner(wallet, owner.address(), owner.address())
        .unwrap();
    assert!(chain.owners(&wallet).unwrap().is_empty());

    let err = chain
        .send_native_token(wallet, owner.address(), owner.address(), 1)
        .unwrap_err();
    assert_eq!(err.reason(), "OnlyOwner");
    let cmd = owner
        .sign_call(&GovernanceCall::AddOwner {
            owner: owner.address(),
        })
        .unwrap();
    let err = chain.add_owner_with_signature(wallet, &cmd).unwrap_err();
    assert_eq!(err.reason(), "InvalidSigner");

    // Deposits stay open.
    let donor = Address::random();
    chain.fund(donor, 1).unwrap();
    chain.deposit(donor, wallet, 1).unwrap();
    assert_eq!(chain.balance(&wallet).unwrap(), 6);
}

#[test]
fn external_ledger_balance_reports_wallet_holdings() {
    let owner = Address::random();
    let (mut chain, wallet) = chain_with_wallet(owner, 0);
    assert_eq!(chain.external_ledger_balance(&wallet).unwrap(), 0);

    chain.ledger_mut().mint(wallet, 2_500_000).unwrap();
    assert_eq!(chain.external_ledger_balance(&wallet).unwrap(), 2_500_000);
    assert_eq!(chain.ledger().symbol(), "USDC");
}

#[test]
fn host_from_json_config() {
    let config = ChainConfig::from_json(
        r#"{ "chain_id": 5, "external_ledger": { "symbol": "DAI", "decimals": 18 } }"#,
    )
    .unwrap();
    let chain = Chain::new(config).unwrap();
    assert_eq!(chain.config().chain_id, 5);
    assert_eq!(chain.ledger().symbol(), "DAI");
    assert_eq!(chain.ledger().decimals(), 18);
}

#[test]
fn event_log_exports_as_json() {
    let owner = Address::random();
    let (mut chain, wallet) = chain_with_wallet(owner, 10);
    chain.add_owner(wallet, owner, Address::random()).unwrap();

    let json = chain.export_events().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let kinds: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["deposited", "owner_added"]);
}
