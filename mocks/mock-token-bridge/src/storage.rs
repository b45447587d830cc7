use soroban_sdk::{contracttype, unwrap::UnwrapOptimized, Address, Bytes, Env, Symbol};

use crate::token_bridge::{OutboundTransfer, RedeemedTransfer};

const TOKEN_KEY: &str = "Token";
const SEQUENCE_KEY: &str = "Sequence";
const LAST_TRANSFER_KEY: &str = "LastXfer";

#[derive(Clone)]
#[contracttype]
pub enum BridgeDataKey {
    // A seeded redeemable transfer by attestation bytes
    Redeem(Bytes),
}

pub fn set_token(e: &Env, token: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, TOKEN_KEY), token);
}

pub fn get_token(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, TOKEN_KEY))
        .unwrap_optimized()
}

/// Take the next outbound transfer sequence
pub fn bump_sequence(e: &Env) -> u64 {
    let key = Symbol::new(e, SEQUENCE_KEY);
    let sequence: u64 = e.storage().instance().get(&key).unwrap_or(0);
    e.storage()
        .instance()
        .set::<Symbol, u64>(&key, &(sequence + 1));
    sequence
}

pub fn set_last_transfer(e: &Env, transfer: &OutboundTransfer) {
    e.storage()
        .instance()
        .set::<Symbol, OutboundTransfer>(&Symbol::new(e, LAST_TRANSFER_KEY), transfer);
}

pub fn get_last_transfer(e: &Env) -> OutboundTransfer {
    e.storage()
        .instance()
        .get(&Symbol::new(e, LAST_TRANSFER_KEY))
        .unwrap_optimized()
}

pub fn set_redeem(e: &Env, attestation: &Bytes, transfer: &RedeemedTransfer) {
    let key = BridgeDataKey::Redeem(attestation.clone());
    e.storage()
        .persistent()
        .set::<BridgeDataKey, RedeemedTransfer>(&key, transfer);
}

pub fn get_redeem(e: &Env, attestation: &Bytes) -> Option<RedeemedTransfer> {
    let key = BridgeDataKey::Redeem(attestation.clone());
    e.storage()
        .persistent()
        .get::<BridgeDataKey, RedeemedTransfer>(&key)
}

pub fn del_redeem(e: &Env, attestation: &Bytes) {
    let key = BridgeDataKey::Redeem(attestation.clone());
    e.storage().persistent().remove(&key);
}
