use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Bytes, Env};

use crate::{
    contract::require_nonnegative, errors::MatchingEngineError, settlement, storage,
};

use super::{auction, penalty::calculate_penalty, AuctionStatus};

/// Settle a closed auction on the fast path, moving the user's funds to the
/// destination and splitting the custodied deposit between the winner, the
/// executor, and the user. Returns the sequence of the settlement message.
///
/// Within the grace period only the winning bidder may execute and the
/// deposit is returned in full. Afterwards anyone may execute: the late
/// winner is slashed along the penalty curve, the executor keeps the
/// penalty, and the user's share is added to the delivered amount.
///
/// ### Arguments
/// * `from` - The executor
/// * `fast_message` - The attested fast market order
///
/// ### Panics
/// If the auction is not active, the bidding window has not elapsed, or the
/// executor is not the winner while the grace period runs
pub fn execute_fast_order(e: &Env, from: &Address, fast_message: &Bytes) -> u64 {
    let verified = auction::verify_message(e, fast_message);
    let mut auction_data = match storage::get_auction(e, &verified.digest) {
        Some(auction_data) if auction_data.status == AuctionStatus::Active => auction_data,
        _ => panic_with_error!(e, MatchingEngineError::AuctionNotActive),
    };

    let config = storage::get_config(e);
    let blocks_elapsed = e.ledger().sequence() - auction_data.start_block;
    if blocks_elapsed <= config.auction_duration {
        panic_with_error!(e, MatchingEngineError::AuctionPeriodNotExpired);
    }

    let order = auction::parse_fast_order(e, &verified.payload);

    let (penalty, user_reward) = if blocks_elapsed <= config.auction_grace_period {
        if auction_data.highest_bidder != *from {
            panic_with_error!(e, MatchingEngineError::NotHighestBidder);
        }
        (0, 0)
    } else {
        calculate_penalty(&config, auction_data.security_deposit, blocks_elapsed)
    };

    let init_auction_fee = auction::to_token_amount(e, order.init_auction_fee);
    let winner_refund = auction_data.bid_price + auction_data.security_deposit - penalty - user_reward;
    let user_amount = auction_data.amount - auction_data.bid_price - init_auction_fee + user_reward;
    require_nonnegative(e, user_amount);

    auction_data.status = AuctionStatus::Completed;
    storage::set_auction(e, &verified.digest, &auction_data);

    let token = TokenClient::new(e, &storage::get_token(e));
    if winner_refund > 0 {
        token.transfer(
            &e.current_contract_address(),
            &auction_data.highest_bidder,
            &winner_refund,
        );
    }
    if penalty > 0 {
        token.transfer(&e.current_contract_address(), from, &penalty);
    }
    if init_auction_fee > 0 {
        token.transfer(
            &e.current_contract_address(),
            &auction_data.initial_bidder,
            &init_auction_fee,
        );
    }

    settlement::send_to_destination(e, user_amount, verified.emitter_chain, &order)
}
