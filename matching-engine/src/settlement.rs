use cast::u128;
use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Env};

use crate::{
    auctions,
    dependencies::{MessageTransportClient, TokenBridgeClient},
    errors::MatchingEngineError,
    messages::{FastFill, FastMarketOrder, Fill},
    storage,
};

/// Move `user_amount` of the settlement token to the order's destination and
/// return the sequence of the emitted message.
///
/// Orders targeting this chain settle as a fast fill message while the
/// tokens stay in engine custody for the local router to redeem. All other
/// orders are handed to the burn-and-mint transport, addressed to the
/// registered router of the target chain.
pub fn send_to_destination(
    e: &Env,
    user_amount: i128,
    source_chain: u32,
    order: &FastMarketOrder,
) -> u64 {
    let fill = Fill {
        source_chain,
        order_sender: order.sender.clone(),
        redeemer: order.redeemer.clone(),
        redeemer_message: order.redeemer_message.clone(),
    };

    if order.target_chain == storage::get_local_chain(e) {
        let fast_fill = FastFill {
            fill,
            fill_amount: to_wire_amount(e, user_amount),
        };
        MessageTransportClient::new(e, &storage::get_message_transport(e))
            .publish_message(&e.current_contract_address(), &fast_fill.encode(e))
    } else {
        let mint_recipient = auctions::require_target_router(e, order.target_chain);
        let bridge = storage::get_token_bridge(e);
        TokenClient::new(e, &storage::get_token(e)).transfer(
            &e.current_contract_address(),
            &bridge,
            &user_amount,
        );
        TokenBridgeClient::new(e, &bridge).transfer_tokens(
            &e.current_contract_address(),
            &user_amount,
            &order.destination_domain,
            &mint_recipient,
            &fill.encode(e),
        )
    }
}

fn to_wire_amount(e: &Env, amount: i128) -> u128 {
    match u128(amount) {
        Ok(amount) => amount,
        Err(_) => panic_with_error!(e, MatchingEngineError::NegativeAmountError),
    }
}
