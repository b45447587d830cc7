#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod storage;
mod transport;

pub use transport::*;
