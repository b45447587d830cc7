#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod auctions;
mod constants;
mod contract;
mod dependencies;
mod errors;
mod messages;
mod settlement;
mod storage;
mod testutils;

pub use auctions::{AuctionData, AuctionStatus};
pub use contract::*;
pub use dependencies::{RedeemedTransfer, VerifiedMessage};
pub use errors::MatchingEngineError;
pub use messages::{FastFill, FastMarketOrder, Fill, SlowOrderResponse};
pub use storage::{AuctionConfig, EngineDataKey};
