#![cfg(test)]

use crate::{
    messages::FastMarketOrder,
    storage::{self, AuctionConfig},
    MatchingEngineContract,
};
use mock_message_transport::{MockMessageTransport, MockMessageTransportClient};
use mock_token_bridge::{MockTokenBridge, MockTokenBridgeClient};
use sep_41_token::testutils::{MockTokenClient, MockTokenWASM};
use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    Address, Bytes, BytesN, Env, IntoVal,
};

pub(crate) const LOCAL_CHAIN: u32 = 23;
pub(crate) const SOURCE_CHAIN: u32 = 2;
pub(crate) const TARGET_CHAIN: u32 = 6;

pub(crate) fn create_matching_engine(e: &Env) -> Address {
    e.register_contract(None, MatchingEngineContract {})
}

//************************************************
//           External Contract Helpers
//************************************************

// ***** Token *****

pub(crate) fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (Address, MockTokenClient<'a>) {
    let contract_address = Address::generate(e);
    e.register_contract_wasm(&contract_address, MockTokenWASM);
    let client = MockTokenClient::new(e, &contract_address);
    client.initialize(admin, &6, &"unit".into_val(e), &"test".into_val(e));
    (contract_address, client)
}

// ***** Message Transport *****

pub(crate) fn create_message_transport<'a>(
    e: &Env,
    chain_id: u32,
) -> (Address, MockMessageTransportClient<'a>) {
    let contract_address = e.register_contract(None, MockMessageTransport {});
    let client = MockMessageTransportClient::new(e, &contract_address);
    client.initialize(&chain_id);
    (contract_address, client)
}

// ***** Token Bridge *****

pub(crate) fn create_token_bridge<'a>(
    e: &Env,
    token: &Address,
) -> (Address, MockTokenBridgeClient<'a>) {
    let contract_address = e.register_contract(None, MockTokenBridge {});
    let client = MockTokenBridgeClient::new(e, &contract_address);
    client.initialize(token);
    (contract_address, client)
}

//************************************************
//            Engine Setup Helpers
//************************************************

/// Register the engine and its collaborators, wire the instance storage, and
/// register routers for `SOURCE_CHAIN` and `TARGET_CHAIN`. The admin doubles
/// as the fee recipient.
pub(crate) fn setup_engine<'a>(
    e: &Env,
    admin: &Address,
) -> (
    Address,
    MockTokenClient<'a>,
    MockMessageTransportClient<'a>,
    MockTokenBridgeClient<'a>,
) {
    let engine = create_matching_engine(e);
    let (token, token_client) = create_token_contract(e, admin);
    let (transport, transport_client) = create_message_transport(e, LOCAL_CHAIN);
    let (bridge, bridge_client) = create_token_bridge(e, &token);

    e.as_contract(&engine, || {
        storage::set_admin(e, admin);
        storage::set_token(e, &token);
        storage::set_message_transport(e, &transport);
        storage::set_token_bridge(e, &bridge);
        storage::set_fee_recipient(e, admin);
        storage::set_local_chain(e, LOCAL_CHAIN);
        storage::set_config(e, &default_config());
        storage::set_endpoint(e, SOURCE_CHAIN, &source_router(e));
        storage::set_endpoint(e, TARGET_CHAIN, &target_router(e));
    });

    (engine, token_client, transport_client, bridge_client)
}

pub(crate) fn default_config() -> AuctionConfig {
    AuctionConfig {
        auction_duration: 2,
        auction_grace_period: 5,
        penalty_blocks: 10,
        user_penalty_reward_bps: 250_000,
        initial_penalty_bps: 250_000,
    }
}

pub(crate) fn source_router(e: &Env) -> BytesN<32> {
    BytesN::from_array(e, &[2u8; 32])
}

pub(crate) fn target_router(e: &Env) -> BytesN<32> {
    BytesN::from_array(e, &[6u8; 32])
}

pub(crate) fn default_order(e: &Env) -> FastMarketOrder {
    FastMarketOrder {
        amount_in: 50_000_000_000,
        min_amount_out: 0,
        target_chain: TARGET_CHAIN,
        destination_domain: 1,
        redeemer: BytesN::from_array(e, &[7u8; 32]),
        sender: BytesN::from_array(e, &[8u8; 32]),
        refund_address: BytesN::from_array(e, &[9u8; 32]),
        slow_emitter: BytesN::from_array(e, &[10u8; 32]),
        slow_sequence: 5,
        max_fee: 1_000_000,
        init_auction_fee: 100,
        deadline: 0,
        redeemer_message: Bytes::new(e),
    }
}

/// Build an attested fast market order envelope emitted by the source router
pub(crate) fn order_message(e: &Env, order: &FastMarketOrder, sequence: u64) -> Bytes {
    mock_message_transport::encode_message(
        e,
        SOURCE_CHAIN,
        &source_router(e),
        sequence,
        &order.encode(e),
    )
}

/// Set the ledger to `sequence_number`, leaving the remaining fields at the
/// usual test defaults
pub(crate) fn set_ledger_sequence(e: &Env, sequence_number: u32, timestamp: u64) {
    e.ledger().set(LedgerInfo {
        timestamp,
        protocol_version: 20,
        sequence_number,
        network_id: Default::default(),
        base_reserve: 10,
        min_temp_entry_ttl: 172800,
        min_persistent_entry_ttl: 172800,
        max_entry_ttl: 9999999,
    });
}
