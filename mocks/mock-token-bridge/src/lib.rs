#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod storage;
mod token_bridge;

pub use token_bridge::*;
