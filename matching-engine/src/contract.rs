use crate::{
    auctions::{self, AuctionData, AuctionStatus},
    constants::{MAX_CHAIN_ID, SCALAR_6},
    dependencies::MessageTransportClient,
    errors::MatchingEngineError,
    messages::FastFill,
    storage::{self, AuctionConfig},
};
use cast::i128;
use soroban_sdk::{
    contract, contractclient, contractimpl, panic_with_error, Address, Bytes, BytesN, Env, Symbol,
};

/// ### MatchingEngine
///
/// A settlement engine that auctions the right to fill fast cross-chain
/// transfer orders and reconciles each advance against the finalized
/// canonical transfer.
#[contract]
pub struct MatchingEngineContract;

#[contractclient(name = "MatchingEngineClient")]
pub trait MatchingEngine {
    /// Initialize the matching engine
    ///
    /// ### Arguments
    /// * `admin` - The Address for the admin
    /// * `message_transport` - The attested messaging substrate
    /// * `token_bridge` - The burn-and-mint transport for the settlement token
    /// * `token` - The settlement token
    /// * `fee_recipient` - The Address paid base fees on slow settlements
    /// * `config` - The auction parameters
    ///
    /// ### Panics
    /// If initialize has already been called, or the config is invalid
    fn initialize(
        e: Env,
        admin: Address,
        message_transport: Address,
        token_bridge: Address,
        token: Address,
        fee_recipient: Address,
        config: AuctionConfig,
    );

    /// (Admin only) Set a new address as the admin of this engine
    ///
    /// ### Arguments
    /// * `new_admin` - The new admin address
    ///
    /// ### Panics
    /// If the caller is not the admin
    fn set_admin(e: Env, new_admin: Address);

    /// (Admin only) Register the router for a chain, overwriting any previous
    /// entry
    ///
    /// ### Arguments
    /// * `chain` - The chain id
    /// * `router` - The 32 byte router address on `chain`
    ///
    /// ### Panics
    /// If the chain id cannot carry orders or the router is the zero address
    fn add_endpoint(e: Env, chain: u32, router: BytesN<32>);

    /// (Admin only) Replace the auction configuration
    ///
    /// ### Arguments
    /// * `config` - The new auction parameters
    ///
    /// ### Panics
    /// If the config is invalid
    fn set_config(e: Env, config: AuctionConfig);

    /// (Admin only) Update the fee recipient
    ///
    /// ### Arguments
    /// * `new_fee_recipient` - The Address paid base fees on slow settlements
    fn update_fee_recipient(e: Env, new_fee_recipient: Address);

    /// Fetch the auction configuration
    fn get_config(e: Env) -> AuctionConfig;

    /// Fetch the registered router for a chain
    ///
    /// ### Arguments
    /// * `chain` - The chain id
    fn get_endpoint(e: Env, chain: u32) -> Option<BytesN<32>>;

    /// Fetch the auction record for an order digest
    ///
    /// ### Arguments
    /// * `digest` - The order digest
    fn get_auction(e: Env, digest: BytesN<32>) -> Option<AuctionData>;

    /// Fetch the auction status for an order digest. Digests without a
    /// record report `None` status.
    ///
    /// ### Arguments
    /// * `digest` - The order digest
    fn get_auction_status(e: Env, digest: BytesN<32>) -> AuctionStatus;

    /// Fetch the fee recipient
    fn get_fee_recipient(e: Env) -> Address;

    /// Open the auction for an attested fast market order with an opening
    /// fee bid, pulling the order principal and the security deposit from
    /// `from`. If the auction is already open, the call improves the
    /// standing bid instead.
    ///
    /// Returns the order digest the auction is keyed by.
    ///
    /// ### Arguments
    /// * `from` - The bidder posting the bid
    /// * `fast_message` - The attested fast market order
    /// * `fee_bid` - The fee the bidder will execute the order for
    ///
    /// ### Panics
    /// If the message cannot be verified, did not travel the registered
    /// router path, is past its deadline, or the bid is not accepted
    fn place_initial_bid(e: Env, from: Address, fast_message: Bytes, fee_bid: i128) -> BytesN<32>;

    /// Replace the standing bid on an active auction with a strictly lower
    /// one. The improving bidder refunds the displaced bidder directly.
    ///
    /// ### Arguments
    /// * `from` - The improving bidder
    /// * `digest` - The order digest the auction is keyed by
    /// * `fee_bid` - The new fee bid
    ///
    /// ### Panics
    /// If the auction is not active, the bidding window elapsed, or the bid
    /// is not a strict improvement
    fn improve_bid(e: Env, from: Address, digest: BytesN<32>, fee_bid: i128);

    /// Settle a closed auction on the fast path, moving the user's funds to
    /// the destination. Within the grace period only the winning bidder may
    /// execute; afterwards anyone may, and the winner's deposit is slashed
    /// along the penalty curve.
    ///
    /// Returns the sequence of the settlement message.
    ///
    /// ### Arguments
    /// * `from` - The executor
    /// * `fast_message` - The attested fast market order
    ///
    /// ### Panics
    /// If the auction is not active or the bidding window has not elapsed
    fn execute_fast_order(e: Env, from: Address, fast_message: Bytes) -> u64;

    /// Redeem the finalized canonical transfer for an order and reconcile it
    /// against the fast path: refund the winner's advance, or settle the
    /// order directly when the fast path never ran.
    ///
    /// ### Arguments
    /// * `from` - The caller, paid the base fee (and penalty) on the paths
    ///   that settle the order
    /// * `fast_message` - The attested fast market order
    /// * `attested_burn` - The finalized burn redeemable with the transport
    ///
    /// ### Panics
    /// If the canonical transfer does not pair with the fast message, or the
    /// digest was already settled
    fn execute_slow_and_reconcile(e: Env, from: Address, fast_message: Bytes, attested_burn: Bytes);

    /// Redeem a fast fill emitted by this engine, paying the filled amount
    /// to the local router. Each fill redeems at most once.
    ///
    /// Returns the decoded fast fill.
    ///
    /// ### Arguments
    /// * `from` - The caller, which must be the registered local router
    /// * `fast_fill_message` - The attested fast fill
    ///
    /// ### Panics
    /// If the message was not emitted by this engine on this chain, was
    /// already redeemed, or the caller is not the local router
    fn redeem_fast_fill(e: Env, from: Address, fast_fill_message: Bytes) -> FastFill;
}

/// @dev
/// The contract implementation only manages the authorization / authentication required from the caller(s), and
/// utilizes other modules to carry out contract functionality.
#[contractimpl]
impl MatchingEngine for MatchingEngineContract {
    fn initialize(
        e: Env,
        admin: Address,
        message_transport: Address,
        token_bridge: Address,
        token: Address,
        fee_recipient: Address,
        config: AuctionConfig,
    ) {
        storage::extend_instance(&e);
        if storage::has_admin(&e) {
            panic_with_error!(e, MatchingEngineError::AlreadyInitializedError);
        }
        require_valid_config(&e, &config);

        storage::set_admin(&e, &admin);
        storage::set_token(&e, &token);
        storage::set_message_transport(&e, &message_transport);
        storage::set_token_bridge(&e, &token_bridge);
        storage::set_fee_recipient(&e, &fee_recipient);
        storage::set_config(&e, &config);

        // the substrate is the authority on what chain this is
        let local_chain = MessageTransportClient::new(&e, &message_transport).chain_id();
        storage::set_local_chain(&e, local_chain);
    }

    fn set_admin(e: Env, new_admin: Address) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();
        new_admin.require_auth();

        storage::set_admin(&e, &new_admin);

        e.events()
            .publish((Symbol::new(&e, "set_admin"), admin), new_admin);
    }

    fn add_endpoint(e: Env, chain: u32, router: BytesN<32>) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        if chain == 0 || chain > MAX_CHAIN_ID {
            panic_with_error!(e, MatchingEngineError::ChainNotAllowed);
        }
        if router == BytesN::from_array(&e, &[0u8; 32]) {
            panic_with_error!(e, MatchingEngineError::InvalidEndpoint);
        }
        storage::set_endpoint(&e, chain, &router);

        e.events()
            .publish((Symbol::new(&e, "add_endpoint"), admin), (chain, router));
    }

    fn set_config(e: Env, config: AuctionConfig) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        require_valid_config(&e, &config);
        storage::set_config(&e, &config);

        e.events()
            .publish((Symbol::new(&e, "set_config"), admin), config);
    }

    fn update_fee_recipient(e: Env, new_fee_recipient: Address) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        storage::set_fee_recipient(&e, &new_fee_recipient);

        e.events().publish(
            (Symbol::new(&e, "update_fee_recipient"), admin),
            new_fee_recipient,
        );
    }

    fn get_config(e: Env) -> AuctionConfig {
        storage::get_config(&e)
    }

    fn get_endpoint(e: Env, chain: u32) -> Option<BytesN<32>> {
        storage::get_endpoint(&e, chain)
    }

    fn get_auction(e: Env, digest: BytesN<32>) -> Option<AuctionData> {
        storage::get_auction(&e, &digest)
    }

    fn get_auction_status(e: Env, digest: BytesN<32>) -> AuctionStatus {
        match storage::get_auction(&e, &digest) {
            Some(auction) => auction.status,
            None => AuctionStatus::None,
        }
    }

    fn get_fee_recipient(e: Env) -> Address {
        storage::get_fee_recipient(&e)
    }

    fn place_initial_bid(e: Env, from: Address, fast_message: Bytes, fee_bid: i128) -> BytesN<32> {
        storage::extend_instance(&e);
        from.require_auth();

        let result = auctions::execute_place_initial_bid(&e, &from, &fast_message, fee_bid);

        match result.previous_price {
            None => e.events().publish(
                (Symbol::new(&e, "auction_started"), result.digest.clone()),
                (result.amount, result.bid_price, from),
            ),
            Some(previous_price) => e.events().publish(
                (Symbol::new(&e, "new_bid"), result.digest.clone()),
                (result.bid_price, previous_price, from),
            ),
        }
        result.digest
    }

    fn improve_bid(e: Env, from: Address, digest: BytesN<32>, fee_bid: i128) {
        storage::extend_instance(&e);
        from.require_auth();

        let previous_price = auctions::execute_improve_bid(&e, &from, &digest, fee_bid);

        e.events().publish(
            (Symbol::new(&e, "new_bid"), digest),
            (fee_bid, previous_price, from),
        );
    }

    fn execute_fast_order(e: Env, from: Address, fast_message: Bytes) -> u64 {
        storage::extend_instance(&e);
        from.require_auth();

        auctions::execute_fast_order(&e, &from, &fast_message)
    }

    fn execute_slow_and_reconcile(
        e: Env,
        from: Address,
        fast_message: Bytes,
        attested_burn: Bytes,
    ) {
        storage::extend_instance(&e);
        from.require_auth();

        auctions::execute_slow_and_reconcile(&e, &from, &fast_message, &attested_burn);
    }

    fn redeem_fast_fill(e: Env, from: Address, fast_fill_message: Bytes) -> FastFill {
        storage::extend_instance(&e);
        from.require_auth();

        auctions::execute_redeem_fast_fill(&e, &from, &fast_fill_message)
    }
}

/// Require that an incoming amount is not negative
///
/// ### Arguments
/// * `amount` - The amount
///
/// ### Panics
/// If the number is negative
pub fn require_nonnegative(e: &Env, amount: i128) {
    if amount.is_negative() {
        panic_with_error!(e, MatchingEngineError::NegativeAmountError);
    }
}

/// Require that an auction configuration holds together
///
/// ### Panics
/// If any parameter is out of range
fn require_valid_config(e: &Env, config: &AuctionConfig) {
    if config.auction_duration == 0 {
        panic_with_error!(e, MatchingEngineError::InvalidAuctionDuration);
    }
    if config.auction_grace_period <= config.auction_duration {
        panic_with_error!(e, MatchingEngineError::InvalidAuctionGracePeriod);
    }
    if i128(config.user_penalty_reward_bps) > SCALAR_6 {
        panic_with_error!(e, MatchingEngineError::UserPenaltyTooLarge);
    }
    if i128(config.initial_penalty_bps) > SCALAR_6 {
        panic_with_error!(e, MatchingEngineError::InitialPenaltyTooLarge);
    }
}
