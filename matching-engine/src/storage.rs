use soroban_sdk::{
    contracttype, unwrap::UnwrapOptimized, Address, BytesN, Env, IntoVal, Symbol, TryFromVal, Val,
};

use crate::auctions::AuctionData;

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

/********** Storage Types **********/

/// The tunable auction parameters
#[derive(Clone)]
#[contracttype]
pub struct AuctionConfig {
    pub auction_duration: u32, // the number of blocks bids are accepted for
    pub auction_grace_period: u32, // the blocks from the opening bid the winner may execute penalty free
    pub penalty_blocks: u32,       // the blocks over which the late penalty ramps to 100%
    pub user_penalty_reward_bps: u32, // the share of a penalty awarded to the user, in 6 decimals
    pub initial_penalty_bps: u32, // the penalty share when the penalty window opens, in 6 decimals
}

/********** Storage Key Types **********/

const ADMIN_KEY: &str = "Admin";
const CONFIG_KEY: &str = "Config";
const FEE_RECIPIENT_KEY: &str = "FeeRecip";
const TOKEN_KEY: &str = "Token";
const TRANSPORT_KEY: &str = "Transport";
const BRIDGE_KEY: &str = "Bridge";
const LOCAL_CHAIN_KEY: &str = "LocalChn";

#[derive(Clone)]
#[contracttype]
pub enum EngineDataKey {
    // The registered router address for a chain id
    Endpoint(u32),
    // The auction state for an order digest
    Auction(BytesN<32>),
    // Marks a fast fill digest as redeemed
    FillRedeemed(BytesN<32>),
}

/********** Storage **********/

/// Bump the instance rent for the contract
pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Fetch an entry in persistent storage that has a default value if it doesn't exist
fn get_persistent_default<K: IntoVal<Env, Val>, V: TryFromVal<Env, Val>>(
    e: &Env,
    key: &K,
    default: V,
    bump_threshold: u32,
    bump_amount: u32,
) -> V {
    if let Some(result) = e.storage().persistent().get::<K, V>(key) {
        e.storage()
            .persistent()
            .extend_ttl(key, bump_threshold, bump_amount);
        result
    } else {
        default
    }
}

/********** Admin **********/

/// Fetch the current admin Address
///
/// ### Panics
/// If the admin does not exist
pub fn get_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, ADMIN_KEY))
        .unwrap_optimized()
}

/// Set a new admin
///
/// ### Arguments
/// * `new_admin` - The Address for the admin
pub fn set_admin(e: &Env, new_admin: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, ADMIN_KEY), new_admin);
}

/// Checks if an admin is set
pub fn has_admin(e: &Env) -> bool {
    e.storage().instance().has(&Symbol::new(e, ADMIN_KEY))
}

/********** Auction Config **********/

/// Fetch the auction configuration
///
/// ### Panics
/// If the config is not set
pub fn get_config(e: &Env) -> AuctionConfig {
    e.storage()
        .instance()
        .get(&Symbol::new(e, CONFIG_KEY))
        .unwrap_optimized()
}

/// Set the auction configuration
///
/// ### Arguments
/// * `config` - The new auction parameters
pub fn set_config(e: &Env, config: &AuctionConfig) {
    e.storage()
        .instance()
        .set::<Symbol, AuctionConfig>(&Symbol::new(e, CONFIG_KEY), config);
}

/********** Collaborators **********/

/// Fetch the fee recipient
pub fn get_fee_recipient(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, FEE_RECIPIENT_KEY))
        .unwrap_optimized()
}

/// Set a new fee recipient
pub fn set_fee_recipient(e: &Env, fee_recipient: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, FEE_RECIPIENT_KEY), fee_recipient);
}

/// Fetch the settlement token
pub fn get_token(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, TOKEN_KEY))
        .unwrap_optimized()
}

/// Set the settlement token
pub fn set_token(e: &Env, token: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, TOKEN_KEY), token);
}

/// Fetch the attested messaging substrate
pub fn get_message_transport(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, TRANSPORT_KEY))
        .unwrap_optimized()
}

/// Set the attested messaging substrate
pub fn set_message_transport(e: &Env, transport: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, TRANSPORT_KEY), transport);
}

/// Fetch the burn-and-mint transport
pub fn get_token_bridge(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, BRIDGE_KEY))
        .unwrap_optimized()
}

/// Set the burn-and-mint transport
pub fn set_token_bridge(e: &Env, bridge: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, BRIDGE_KEY), bridge);
}

/// Fetch the chain id of this chain
pub fn get_local_chain(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, LOCAL_CHAIN_KEY))
        .unwrap_optimized()
}

/// Set the chain id of this chain
pub fn set_local_chain(e: &Env, chain: u32) {
    e.storage()
        .instance()
        .set::<Symbol, u32>(&Symbol::new(e, LOCAL_CHAIN_KEY), &chain);
}

/********** Endpoint Registry **********/

/// Fetch the registered router for a chain, or None if the chain has no
/// registered router
///
/// ### Arguments
/// * `chain` - The chain id
pub fn get_endpoint(e: &Env, chain: u32) -> Option<BytesN<32>> {
    let key = EngineDataKey::Endpoint(chain);
    get_persistent_default::<EngineDataKey, Option<BytesN<32>>>(
        e,
        &key,
        None,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Register the router for a chain, overwriting any previous entry
///
/// ### Arguments
/// * `chain` - The chain id
/// * `router` - The 32 byte router address on `chain`
pub fn set_endpoint(e: &Env, chain: u32, router: &BytesN<32>) {
    let key = EngineDataKey::Endpoint(chain);
    e.storage()
        .persistent()
        .set::<EngineDataKey, BytesN<32>>(&key, router);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Auctions **********/

/// Fetch the auction record for an order digest, or None if no bid was ever
/// accepted for the digest
///
/// ### Arguments
/// * `digest` - The order digest
pub fn get_auction(e: &Env, digest: &BytesN<32>) -> Option<AuctionData> {
    let key = EngineDataKey::Auction(digest.clone());
    get_persistent_default::<EngineDataKey, Option<AuctionData>>(
        e,
        &key,
        None,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Set the auction record for an order digest
///
/// ### Arguments
/// * `digest` - The order digest
/// * `auction` - The auction record
pub fn set_auction(e: &Env, digest: &BytesN<32>, auction: &AuctionData) {
    let key = EngineDataKey::Auction(digest.clone());
    e.storage()
        .persistent()
        .set::<EngineDataKey, AuctionData>(&key, auction);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Fast Fill Ledger **********/

/// Check if a fast fill digest was redeemed
///
/// ### Arguments
/// * `digest` - The fast fill digest
pub fn is_fill_redeemed(e: &Env, digest: &BytesN<32>) -> bool {
    let key = EngineDataKey::FillRedeemed(digest.clone());
    e.storage().persistent().has(&key)
}

/// Mark a fast fill digest as redeemed
///
/// ### Arguments
/// * `digest` - The fast fill digest
pub fn set_fill_redeemed(e: &Env, digest: &BytesN<32>) {
    let key = EngineDataKey::FillRedeemed(digest.clone());
    e.storage()
        .persistent()
        .set::<EngineDataKey, bool>(&key, &true);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}
