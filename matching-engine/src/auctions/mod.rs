mod auction;
pub use auction::{AuctionData, AuctionStatus};
pub(crate) use auction::require_target_router;

mod bid;
pub use bid::{execute_improve_bid, execute_place_initial_bid, BidResult};

mod execute;
pub use execute::execute_fast_order;

mod settle;
pub use settle::execute_slow_and_reconcile;

mod fast_fill;
pub use fast_fill::execute_redeem_fast_fill;

mod penalty;
pub use penalty::calculate_penalty;
