use cast::i128;
use soroban_sdk::{
    contracttype, panic_with_error, xdr::ToXdr, Address, Bytes, BytesN, Env,
};

use crate::{
    dependencies::{MessageTransportClient, VerifiedMessage},
    errors::MatchingEngineError,
    messages::{self, FastMarketOrder},
    storage,
};

/// The lifecycle of an auction. Digests without a record read as `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum AuctionStatus {
    None,
    Active,
    Completed,
    Settled,
}

/// The auction state for an order digest
#[derive(Clone)]
#[contracttype]
pub struct AuctionData {
    pub status: AuctionStatus,
    pub start_block: u32, // the block the opening bid landed in
    pub initial_bidder: Address, // the bidder who paid to open the auction
    pub highest_bidder: Address, // the current best bidder
    pub amount: i128,     // the user principal under auction
    pub security_deposit: i128, // the collateral posted by the best bidder
    pub bid_price: i128,  // the current best fee bid
}

/// Verify an attested message with the configured messaging substrate
///
/// ### Panics
/// If the substrate cannot verify the message
pub(crate) fn verify_message(e: &Env, message: &Bytes) -> VerifiedMessage {
    let transport = MessageTransportClient::new(e, &storage::get_message_transport(e));
    match transport.parse_and_verify(message) {
        Some(verified) => verified,
        None => panic_with_error!(e, MatchingEngineError::InvalidMessage),
    }
}

/// Decode a verified payload as a fast market order
///
/// ### Panics
/// If the payload carries a different payload id or is malformed
pub(crate) fn parse_fast_order(e: &Env, payload: &Bytes) -> FastMarketOrder {
    if messages::payload_id(payload) != Some(messages::FAST_MARKET_ORDER_ID) {
        panic_with_error!(e, MatchingEngineError::NotFastMarketOrder);
    }
    FastMarketOrder::decode(e, payload)
}

/// Require that `emitter` is the registered router for `chain`
///
/// ### Panics
/// If no router is registered for `chain` or the emitter is a different
/// address
pub(crate) fn require_source_router(e: &Env, chain: u32, emitter: &BytesN<32>) {
    match storage::get_endpoint(e, chain) {
        Some(router) if router == *emitter => (),
        _ => panic_with_error!(e, MatchingEngineError::InvalidSourceRouter),
    }
}

/// Require that a router is registered for `chain`, returning it
///
/// ### Panics
/// If no router is registered for `chain`
pub(crate) fn require_target_router(e: &Env, chain: u32) -> BytesN<32> {
    match storage::get_endpoint(e, chain) {
        Some(router) => router,
        None => panic_with_error!(e, MatchingEngineError::InvalidTargetRouter),
    }
}

/// Convert a wire amount into a token ledger amount
///
/// ### Panics
/// If the amount does not fit the token ledger's amount type
pub(crate) fn to_token_amount(e: &Env, value: u128) -> i128 {
    match i128(value) {
        Ok(amount) => amount,
        Err(_) => panic_with_error!(e, MatchingEngineError::OverflowError),
    }
}

/// The 32 byte universal form of a local address, matching the emitter
/// identity the messaging substrate reports for it
pub(crate) fn universal_address(e: &Env, address: &Address) -> BytesN<32> {
    e.crypto().keccak256(&address.clone().to_xdr(e))
}
