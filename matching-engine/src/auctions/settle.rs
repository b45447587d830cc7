use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Bytes, Env};

use crate::{
    contract::require_nonnegative,
    dependencies::TokenBridgeClient,
    errors::MatchingEngineError,
    messages::SlowOrderResponse,
    settlement, storage,
};

use super::{auction, penalty::calculate_penalty, AuctionData, AuctionStatus};

/// Redeem the finalized canonical transfer for an order and reconcile it
/// against the fast path.
///
/// The canonical transfer carries the order principal, so every branch ends
/// with the engine's custody for the digest fully disbursed:
/// * no auction - the fast path never ran; settle the order directly and
///   close the digest so a stale fast message cannot open an auction later
/// * active - the winner never executed; refund them net of penalties, pay
///   the caller for finishing the job, and settle the order
/// * completed - the fast path already delivered; reimburse the winner's
///   fronted principal
///
/// ### Arguments
/// * `from` - The caller, paid the base fee (and penalty) on the paths that
///   settle the order
/// * `fast_message` - The attested fast market order
/// * `attested_burn` - The finalized burn redeemable with the transport
///
/// ### Panics
/// If the canonical transfer does not pair with the fast message, or the
/// digest was already settled
pub fn execute_slow_and_reconcile(
    e: &Env,
    from: &Address,
    fast_message: &Bytes,
    attested_burn: &Bytes,
) {
    let verified = auction::verify_message(e, fast_message);
    let order = auction::parse_fast_order(e, &verified.payload);

    let redeemed = TokenBridgeClient::new(e, &storage::get_token_bridge(e))
        .redeem_tokens(&e.current_contract_address(), attested_burn);

    if verified.emitter_chain != redeemed.source_chain
        || order.slow_emitter != redeemed.emitter
        || order.slow_sequence != redeemed.sequence
    {
        panic_with_error!(e, MatchingEngineError::SlowMessageMismatch);
    }

    let response = SlowOrderResponse::decode(e, &redeemed.payload);
    let base_fee = auction::to_token_amount(e, response.base_fee);

    let token = TokenClient::new(e, &storage::get_token(e));
    match storage::get_auction(e, &verified.digest) {
        None => {
            // the fast path never ran, so the router checks from the bid
            // path run here
            auction::require_source_router(e, verified.emitter_chain, &verified.emitter_address);
            auction::require_target_router(e, order.target_chain);

            let amount = auction::to_token_amount(e, order.amount_in);
            let user_amount = amount - base_fee;
            require_nonnegative(e, user_amount);

            storage::set_auction(
                e,
                &verified.digest,
                &AuctionData {
                    status: AuctionStatus::Settled,
                    start_block: e.ledger().sequence(),
                    initial_bidder: from.clone(),
                    highest_bidder: from.clone(),
                    amount: 0,
                    security_deposit: 0,
                    bid_price: 0,
                },
            );

            token.transfer(
                &e.current_contract_address(),
                &storage::get_fee_recipient(e),
                &base_fee,
            );
            settlement::send_to_destination(e, user_amount, verified.emitter_chain, &order);
        }
        Some(mut auction_data) => match auction_data.status {
            AuctionStatus::Active => {
                let config = storage::get_config(e);
                let blocks_elapsed = e.ledger().sequence() - auction_data.start_block;
                let (penalty, user_reward) =
                    calculate_penalty(&config, auction_data.security_deposit, blocks_elapsed);

                let caller_payment = penalty + base_fee;
                let winner_refund =
                    auction_data.amount + auction_data.security_deposit - penalty - user_reward;
                let user_amount = auction_data.amount - base_fee + user_reward;
                require_nonnegative(e, user_amount);

                auction_data.status = AuctionStatus::Settled;
                storage::set_auction(e, &verified.digest, &auction_data);

                if caller_payment > 0 {
                    token.transfer(&e.current_contract_address(), from, &caller_payment);
                }
                if winner_refund > 0 {
                    token.transfer(
                        &e.current_contract_address(),
                        &auction_data.highest_bidder,
                        &winner_refund,
                    );
                }
                settlement::send_to_destination(e, user_amount, verified.emitter_chain, &order);
            }
            AuctionStatus::Completed => {
                auction_data.status = AuctionStatus::Settled;
                storage::set_auction(e, &verified.digest, &auction_data);

                // the winner fronted the principal on the fast path
                token.transfer(
                    &e.current_contract_address(),
                    &auction_data.highest_bidder,
                    &auction_data.amount,
                );
            }
            _ => panic_with_error!(e, MatchingEngineError::InvalidAuctionStatus),
        },
    }
}
