/********** Numbers **********/

/// Fixed-point scalar for 6 decimal rates, where 1_000_000 = 100%
pub const SCALAR_6: i128 = 1_000_000;

/********** Chains **********/

/// The largest chain id the wire format can address
pub const MAX_CHAIN_ID: u32 = u16::MAX as u32;
