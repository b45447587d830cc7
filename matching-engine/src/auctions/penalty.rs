use cast::i128;
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::unwrap::UnwrapOptimized;

use crate::{constants::SCALAR_6, storage::AuctionConfig};

/// Compute the `(penalty, user_reward)` slashed from a winner's security
/// deposit after `blocks_elapsed` blocks.
///
/// The deposit is untouched through the auction and grace windows. Once
/// both have lapsed, the slashed share ramps linearly from
/// `initial_penalty_bps` to 100% over `penalty_blocks`. The user's reward is
/// carved out of the total slash, so `penalty + user_reward` never exceeds
/// the deposit.
///
/// ### Arguments
/// * `config` - The auction parameters
/// * `security_deposit` - The deposit posted by the winning bidder
/// * `blocks_elapsed` - Blocks since the opening bid
pub fn calculate_penalty(
    config: &AuctionConfig,
    security_deposit: i128,
    blocks_elapsed: u32,
) -> (i128, i128) {
    let penalty_free_blocks = config.auction_duration + config.auction_grace_period;
    if blocks_elapsed <= penalty_free_blocks {
        return (0, 0);
    }

    let blocks_over = blocks_elapsed - penalty_free_blocks;
    let scaled_bps = if blocks_over >= config.penalty_blocks {
        SCALAR_6
    } else {
        let base = i128(config.initial_penalty_bps);
        base + (SCALAR_6 - base) * i128(blocks_over) / i128(config.penalty_blocks)
    };

    let total = security_deposit
        .fixed_mul_floor(scaled_bps, SCALAR_6)
        .unwrap_optimized();
    let user_reward = total
        .fixed_mul_floor(i128(config.user_penalty_reward_bps), SCALAR_6)
        .unwrap_optimized();
    (total - user_reward, user_reward)
}
