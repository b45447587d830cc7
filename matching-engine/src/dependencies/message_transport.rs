use soroban_sdk::{contractclient, contracttype, Address, Bytes, BytesN, Env};

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

/// ### MessageTransport
///
/// The attested messaging substrate. Verification of signatures and the
/// derivation of message digests happen behind this interface.
#[contractclient(name = "MessageTransportClient")]
pub trait MessageTransport {
    /// Fetch the chain id the substrate reports for this chain
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
}
