use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Bytes, BytesN, Env};

use crate::{contract::require_nonnegative, errors::MatchingEngineError, storage};

use super::auction::{self, AuctionData, AuctionStatus};

/// The result of posting a bid against a fast market order
pub struct BidResult {
    pub digest: BytesN<32>,
    pub amount: i128,
    pub bid_price: i128,
    /// The displaced bid, or None when this bid opened the auction
    pub previous_price: Option<i128>,
}

/// Open the auction for an attested fast market order with an opening fee
/// bid, pulling the order principal and the security deposit from `from`.
///
/// A digest can only ever hold one auction. If a racing relayer already
/// opened it, the call is treated as a bid improvement so the loser of the
/// race does not waste the verification work.
///
/// ### Arguments
/// * `from` - The bidder posting the opening bid
/// * `fast_message` - The attested fast market order
/// * `fee_bid` - The fee the bidder will execute the order for
///
/// ### Panics
/// If the message cannot be verified, did not travel the registered router
/// path, is past its deadline, or the bid exceeds the order's fee cap
pub fn execute_place_initial_bid(
    e: &Env,
    from: &Address,
    fast_message: &Bytes,
    fee_bid: i128,
) -> BidResult {
    require_nonnegative(e, fee_bid);

    let verified = auction::verify_message(e, fast_message);
    let order = auction::parse_fast_order(e, &verified.payload);

    auction::require_source_router(e, verified.emitter_chain, &verified.emitter_address);
    auction::require_target_router(e, order.target_chain);

    // a racing opener improves the existing auction instead
    if let Some(existing) = storage::get_auction(e, &verified.digest) {
        let amount = existing.amount;
        let previous_price = execute_improve_bid(e, from, &verified.digest, fee_bid);
        return BidResult {
            digest: verified.digest,
            amount,
            bid_price: fee_bid,
            previous_price: Some(previous_price),
        };
    }

    if order.deadline != 0 && e.ledger().timestamp() >= order.deadline as u64 {
        panic_with_error!(e, MatchingEngineError::DeadlineExceeded);
    }

    let amount = auction::to_token_amount(e, order.amount_in);
    let security_deposit = auction::to_token_amount(e, order.max_fee);
    if fee_bid > security_deposit {
        panic_with_error!(e, MatchingEngineError::BidPriceTooHigh);
    }

    let total = match amount.checked_add(security_deposit) {
        Some(total) => total,
        None => panic_with_error!(e, MatchingEngineError::OverflowError),
    };
    TokenClient::new(e, &storage::get_token(e)).transfer(
        from,
        &e.current_contract_address(),
        &total,
    );

    storage::set_auction(
        e,
        &verified.digest,
        &AuctionData {
            status: AuctionStatus::Active,
            start_block: e.ledger().sequence(),
            initial_bidder: from.clone(),
            highest_bidder: from.clone(),
            amount,
            security_deposit,
            bid_price: fee_bid,
        },
    );

    BidResult {
        digest: verified.digest,
        amount,
        bid_price: fee_bid,
        previous_price: None,
    }
}

/// Replace the standing bid on an active auction with a strictly lower one.
/// The improving bidder funds the displaced bidder directly, so the engine's
/// custody for the auction never changes.
///
/// Returns the displaced bid price.
///
/// ### Arguments
/// * `from` - The improving bidder
/// * `digest` - The order digest the auction is keyed by
/// * `fee_bid` - The new fee bid
///
/// ### Panics
/// If the auction is not active, the bidding window elapsed, or the bid is
/// not a strict improvement
pub fn execute_improve_bid(e: &Env, from: &Address, digest: &BytesN<32>, fee_bid: i128) -> i128 {
    require_nonnegative(e, fee_bid);

    let mut auction = match storage::get_auction(e, digest) {
        Some(auction) if auction.status == AuctionStatus::Active => auction,
        _ => panic_with_error!(e, MatchingEngineError::AuctionNotActive),
    };

    let config = storage::get_config(e);
    if e.ledger().sequence() - auction.start_block > config.auction_duration {
        panic_with_error!(e, MatchingEngineError::AuctionPeriodExpired);
    }
    if fee_bid >= auction.bid_price {
        panic_with_error!(e, MatchingEngineError::OfferPriceNotImproved);
    }

    // refund the displaced bidder directly from the new bidder
    TokenClient::new(e, &storage::get_token(e)).transfer(
        from,
        &auction.highest_bidder,
        &(auction.amount + auction.security_deposit),
    );

    let previous_price = auction.bid_price;
    auction.bid_price = fee_bid;
    auction.highest_bidder = from.clone();
    storage::set_auction(e, digest, &auction);

    previous_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        messages::SlowOrderResponse,
        testutils::{self, SOURCE_CHAIN},
    };
    use soroban_sdk::{bytes, testutils::Address as _, Env};

    #[test]
    fn test_place_initial_bid() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            let result = execute_place_initial_bid(&e, &alice, &message, 500_000);
            assert_eq!(result.amount, 50_000_000_000);
            assert_eq!(result.bid_price, 500_000);
            assert!(result.previous_price.is_none());

            let auction = storage::get_auction(&e, &result.digest).unwrap();
            assert_eq!(auction.status, AuctionStatus::Active);
            assert_eq!(auction.start_block, 100);
            assert_eq!(auction.initial_bidder, alice);
            assert_eq!(auction.highest_bidder, alice);
            assert_eq!(auction.amount, 50_000_000_000);
            assert_eq!(auction.security_deposit, 1_000_000);
            assert_eq!(auction.bid_price, 500_000);
        });

        // the engine custodies principal + security deposit
        assert_eq!(token_client.balance(&engine), 50_001_000_000);
        assert_eq!(token_client.balance(&alice), 0);
    }

    #[test]
    fn test_place_initial_bid_racing_opener_improves() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let bob = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);
        token_client.mint(&bob, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 600_000);
            let result = execute_place_initial_bid(&e, &bob, &message, 500_000);
            assert_eq!(result.previous_price, Some(600_000));

            let auction = storage::get_auction(&e, &result.digest).unwrap();
            assert_eq!(auction.status, AuctionStatus::Active);
            assert_eq!(auction.start_block, 100);
            assert_eq!(auction.initial_bidder, alice);
            assert_eq!(auction.highest_bidder, bob);
            assert_eq!(auction.bid_price, 500_000);
        });

        // custody entered the engine exactly once, the loser was made whole
        assert_eq!(token_client.balance(&engine), 50_001_000_000);
        assert_eq!(token_client.balance(&alice), 50_001_000_000);
        assert_eq!(token_client.balance(&bob), 0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1333)")]
    fn test_place_initial_bid_deadline_exceeded() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);

        let mut order = testutils::default_order(&e);
        order.deadline = 599;
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 500_000);
        });
    }

    #[test]
    fn test_place_initial_bid_accepts_open_deadline() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);

        let mut order = testutils::default_order(&e);
        order.deadline = 601;
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            let result = execute_place_initial_bid(&e, &alice, &message, 500_000);
            assert!(storage::get_auction(&e, &result.digest).is_some());
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1334)")]
    fn test_place_initial_bid_over_fee_cap() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 1_000_001);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1312)")]
    fn test_place_initial_bid_unknown_source_router() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        let order = testutils::default_order(&e);
        let message = mock_message_transport::encode_message(
            &e,
            SOURCE_CHAIN,
            &BytesN::from_array(&e, &[99u8; 32]),
            1,
            &order.encode(&e),
        );

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 500_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1313)")]
    fn test_place_initial_bid_unregistered_target() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        let mut order = testutils::default_order(&e);
        order.target_chain = 9;
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 500_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1301)")]
    fn test_place_initial_bid_not_a_fast_order() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        let payload = SlowOrderResponse { base_fee: 100 }.encode(&e);
        let message = mock_message_transport::encode_message(
            &e,
            SOURCE_CHAIN,
            &testutils::source_router(&e),
            1,
            &payload,
        );

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &message, 500_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1300)")]
    fn test_place_initial_bid_unverifiable_message() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        e.as_contract(&engine, || {
            execute_place_initial_bid(&e, &alice, &bytes![&e, 0xbad0], 500_000);
        });
    }

    #[test]
    fn test_improve_bid_custody_conserved() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let bob = Address::generate(&e);
        let carol = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);
        token_client.mint(&bob, &50_001_000_000);
        token_client.mint(&carol, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            let result = execute_place_initial_bid(&e, &alice, &message, 500_000);

            testutils::set_ledger_sequence(&e, 101, 605);
            assert_eq!(
                execute_improve_bid(&e, &bob, &result.digest, 400_000),
                500_000
            );
            // the bid window is inclusive of the last auction block
            testutils::set_ledger_sequence(&e, 102, 610);
            assert_eq!(
                execute_improve_bid(&e, &carol, &result.digest, 300_000),
                400_000
            );

            let auction = storage::get_auction(&e, &result.digest).unwrap();
            assert_eq!(auction.start_block, 100);
            assert_eq!(auction.initial_bidder, alice);
            assert_eq!(auction.highest_bidder, carol);
            assert_eq!(auction.amount, 50_000_000_000);
            assert_eq!(auction.security_deposit, 1_000_000);
            assert_eq!(auction.bid_price, 300_000);
        });

        // custody never left the engine, displaced bidders are whole
        assert_eq!(token_client.balance(&engine), 50_001_000_000);
        assert_eq!(token_client.balance(&alice), 50_001_000_000);
        assert_eq!(token_client.balance(&bob), 50_001_000_000);
        assert_eq!(token_client.balance(&carol), 0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1335)")]
    fn test_improve_bid_tie_rejected() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let bob = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);
        token_client.mint(&bob, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            let result = execute_place_initial_bid(&e, &alice, &message, 500_000);
            execute_improve_bid(&e, &bob, &result.digest, 500_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1331)")]
    fn test_improve_bid_window_elapsed() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let bob = Address::generate(&e);
        let (engine, token_client, _, _) = testutils::setup_engine(&e, &bombadil);
        token_client.mint(&alice, &50_001_000_000);
        token_client.mint(&bob, &50_001_000_000);

        let order = testutils::default_order(&e);
        let message = testutils::order_message(&e, &order, 1);

        e.as_contract(&engine, || {
            let result = execute_place_initial_bid(&e, &alice, &message, 500_000);

            testutils::set_ledger_sequence(&e, 103, 615);
            execute_improve_bid(&e, &bob, &result.digest, 400_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1330)")]
    fn test_improve_bid_no_auction() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let bob = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        e.as_contract(&engine, || {
            execute_improve_bid(&e, &bob, &BytesN::from_array(&e, &[1u8; 32]), 400_000);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #8)")]
    fn test_improve_bid_negative_bid() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let bob = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        e.as_contract(&engine, || {
            execute_improve_bid(&e, &bob, &BytesN::from_array(&e, &[1u8; 32]), -1);
        });
    }
}
