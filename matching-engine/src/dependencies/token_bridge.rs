use soroban_sdk::{contractclient, contracttype, Address, Bytes, BytesN, Env};

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

/// ### TokenBridge
///
/// The canonical burn-and-mint transport for the settlement token. Outbound
/// transfers expect the tokens to be moved to the bridge in the same
/// transaction; inbound redemptions credit the minted amount to the caller's
/// choice of recipient.
#[contractclient(name = "TokenBridgeClient")]
pub trait TokenBridge {
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
    /// * `attestation` - The attested burn
    fn redeem_tokens(e: Env, to: Address, attestation: Bytes) -> RedeemedTransfer;
}
