use soroban_sdk::{
    contract, contractimpl, contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol,
};

use crate::storage;

/// An attested cross-chain message that passed verification
#[derive(Clone)]
#[contracttype]
pub struct VerifiedMessage {
    pub emitter_chain: u32,
    pub emitter_address: BytesN<32>,
    pub sequence: u64,
    pub digest: BytesN<32>,
    pub payload: Bytes,
}

const ENVELOPE_VERSION: u8 = 1;
// version (1) + emitter chain (4) + emitter address (32) + sequence (8)
const ENVELOPE_HEADER_LEN: u32 = 45;

/// ### MockMessageTransport
///
/// Test double for the attested messaging substrate. Envelopes carry no
/// signatures, so `parse_and_verify` accepts any well-formed envelope.
#[contract]
pub struct MockMessageTransport;

pub trait MockMessageTransportTrait {
    /// Initialize the transport with the chain id it reports for this chain
    ///
    /// ### Arguments
    /// * `chain_id` - The local chain id
    fn initialize(e: Env, chain_id: u32);

    /// Fetch the local chain id
    fn chain_id(e: Env) -> u32;

    /// Publish a message from `from` and return the assigned sequence
    ///
    /// ### Arguments
    /// * `from` - The emitting address
    /// * `payload` - The message payload
    fn publish_message(e: Env, from: Address, payload: Bytes) -> u64;

    /// Verify an attested message. Returns None if the message cannot be
    /// verified.
    ///
    /// ### Arguments
    /// * `message` - The full message envelope
    fn parse_and_verify(e: Env, message: Bytes) -> Option<VerifiedMessage>;

    /// Mock Only: Fetch the envelope of the last published message
    fn last_message(e: Env) -> Bytes;
}

#[contractimpl]
impl MockMessageTransportTrait for MockMessageTransport {
    fn initialize(e: Env, chain_id: u32) {
        storage::set_chain_id(&e, chain_id);
    }

    fn chain_id(e: Env) -> u32 {
        storage::get_chain_id(&e)
    }

    fn publish_message(e: Env, from: Address, payload: Bytes) -> u64 {
        from.require_auth();

        let sequence = storage::bump_sequence(&e);
        let emitter = universal_address(&e, &from);
        let envelope = encode_message(&e, storage::get_chain_id(&e), &emitter, sequence, &payload);
        storage::set_last_message(&e, &envelope);

        e.events()
            .publish((Symbol::new(&e, "message"), emitter), (sequence, payload));
        sequence
    }

    fn parse_and_verify(e: Env, message: Bytes) -> Option<VerifiedMessage> {
        if message.len() < ENVELOPE_HEADER_LEN || message.get(0) != Some(ENVELOPE_VERSION) {
            return None;
        }
        let mut chain = [0u8; 4];
        message.slice(1..5).copy_into_slice(&mut chain);
        let mut emitter = [0u8; 32];
        message.slice(5..37).copy_into_slice(&mut emitter);
        let mut sequence = [0u8; 8];
        message.slice(37..45).copy_into_slice(&mut sequence);

        Some(VerifiedMessage {
            emitter_chain: u32::from_be_bytes(chain),
            emitter_address: BytesN::from_array(&e, &emitter),
            sequence: u64::from_be_bytes(sequence),
            digest: e.crypto().keccak256(&message),
            payload: message.slice(ENVELOPE_HEADER_LEN..),
        })
    }

    fn last_message(e: Env) -> Bytes {
        storage::get_last_message(&e)
    }
}

/// Build an envelope the transport will verify
pub fn encode_message(
    e: &Env,
    emitter_chain: u32,
    emitter_address: &BytesN<32>,
    sequence: u64,
    payload: &Bytes,
) -> Bytes {
    let mut envelope = Bytes::new(e);
    envelope.push_back(ENVELOPE_VERSION);
    envelope.extend_from_array(&emitter_chain.to_be_bytes());
    envelope.extend_from_array(&emitter_address.to_array());
    envelope.extend_from_array(&sequence.to_be_bytes());
    envelope.append(payload);
    envelope
}

/// The 32 byte universal form of a local address, as reported in envelopes
/// emitted on this chain
pub fn universal_address(e: &Env, address: &Address) -> BytesN<32> {
    e.crypto().keccak256(&address.clone().to_xdr(e))
}
