use sep_41_token::TokenClient;
use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, BytesN, Env, Symbol};

use crate::storage;

/// A finalized burn-and-mint transfer redeemed on this chain
#[derive(Clone)]
#[contracttype]
pub struct RedeemedTransfer {
    pub source_chain: u32,
    pub emitter: BytesN<32>,
    pub sequence: u64,
    pub amount: i128,
    pub payload: Bytes,
}

/// An outbound burn recorded by the bridge
#[derive(Clone)]
#[contracttype]
pub struct OutboundTransfer {
    pub sequence: u64,
    pub amount: i128,
    pub destination_domain: u32,
    pub mint_recipient: BytesN<32>,
    pub payload: Bytes,
}

/// ### MockTokenBridge
///
/// Test double for the burn-and-mint transport. Outbound transfers are
/// recorded and the pushed tokens retired into the bridge's own balance;
/// inbound redemptions pay out of that balance, so tests seed the bridge
/// with the amounts they intend to redeem.
#[contract]
pub struct MockTokenBridge;

pub trait MockTokenBridgeTrait {
    /// Initialize the bridge with the token it transports
    ///
    /// ### Arguments
    /// * `token` - The settlement token address
    fn initialize(e: Env, token: Address);

    /// Fetch the token the bridge transports
    fn token(e: Env) -> Address;

    /// Burn `amount` previously moved to the bridge by `from` and request a
    /// mint on `destination_domain`. Returns the transfer sequence.
    ///
    /// ### Arguments
    /// * `from` - The address that pushed the tokens to the bridge
    /// * `amount` - The amount to transfer
    /// * `destination_domain` - The burn-and-mint domain to mint on
    /// * `mint_recipient` - The 32 byte recipient on the destination
    /// * `payload` - Opaque bytes delivered alongside the mint
    fn transfer_tokens(
        e: Env,
        from: Address,
        amount: i128,
        destination_domain: u32,
        mint_recipient: BytesN<32>,
        payload: Bytes,
    ) -> u64;

    /// Redeem a finalized transfer, crediting the minted amount to `to`
    ///
    /// ### Arguments
    /// * `to` - The address credited with the minted tokens
    /// * `attestation` - The attested burn previously seeded via `set_redeem`
    fn redeem_tokens(e: Env, to: Address, attestation: Bytes) -> RedeemedTransfer;

    /// Mock Only: Seed a redeemable transfer for an attestation
    fn set_redeem(e: Env, attestation: Bytes, transfer: RedeemedTransfer);

    /// Mock Only: Fetch the last outbound transfer
    fn last_transfer(e: Env) -> OutboundTransfer;
}

#[contractimpl]
impl MockTokenBridgeTrait for MockTokenBridge {
    fn initialize(e: Env, token: Address) {
        storage::set_token(&e, &token);
    }

    fn token(e: Env) -> Address {
        storage::get_token(&e)
    }

    fn transfer_tokens(
        e: Env,
        from: Address,
        amount: i128,
        destination_domain: u32,
        mint_recipient: BytesN<32>,
        payload: Bytes,
    ) -> u64 {
        from.require_auth();

        let sequence = storage::bump_sequence(&e);
        storage::set_last_transfer(
            &e,
            &OutboundTransfer {
                sequence,
                amount,
                destination_domain,
                mint_recipient,
                payload,
            },
        );

        e.events().publish(
            (Symbol::new(&e, "transfer_tokens"), from),
            (sequence, amount, destination_domain),
        );
        sequence
    }

    fn redeem_tokens(e: Env, to: Address, attestation: Bytes) -> RedeemedTransfer {
        let transfer = match storage::get_redeem(&e, &attestation) {
            Some(transfer) => transfer,
            None => panic!("unknown attestation"),
        };
        storage::del_redeem(&e, &attestation);

        TokenClient::new(&e, &storage::get_token(&e)).transfer(
            &e.current_contract_address(),
            &to,
            &transfer.amount,
        );
        transfer
    }

    fn set_redeem(e: Env, attestation: Bytes, transfer: RedeemedTransfer) {
        storage::set_redeem(&e, &attestation, &transfer);
    }

    fn last_transfer(e: Env) -> OutboundTransfer {
        storage::get_last_transfer(&e)
    }
}
