use soroban_sdk::{contracttype, panic_with_error, Bytes, BytesN, Env};

use crate::errors::MatchingEngineError;

/********** Payload Ids **********/

pub const FAST_MARKET_ORDER_ID: u8 = 0x11;
pub const SLOW_ORDER_RESPONSE_ID: u8 = 0x14;
pub const FILL_ID: u8 = 0x01;
pub const FAST_FILL_ID: u8 = 0x0C;

// id + amount_in + min_amount_out + target_chain + destination_domain
// + 4 * bytes32 + slow_sequence + max_fee + init_auction_fee + deadline
// + redeemer_message_len
const FAST_MARKET_ORDER_FIXED_LEN: u32 = 1 + 16 + 16 + 2 + 4 + 4 * 32 + 8 + 16 + 16 + 4 + 4;
const SLOW_ORDER_RESPONSE_LEN: u32 = 1 + 16;
const FILL_FIXED_LEN: u32 = 1 + 2 + 32 + 32 + 4;
const FAST_FILL_FIXED_LEN: u32 = 1 + 16 + 2 + 32 + 32 + 4;

/// A request to move `amount_in` to `target_chain` ahead of the canonical
/// transfer that finalizes later
#[derive(Clone)]
#[contracttype]
pub struct FastMarketOrder {
    pub amount_in: u128,
    pub min_amount_out: u128,
    pub target_chain: u32,
    pub destination_domain: u32,
    pub redeemer: BytesN<32>,
    pub sender: BytesN<32>,
    pub refund_address: BytesN<32>,
    pub slow_emitter: BytesN<32>,
    pub slow_sequence: u64,
    pub max_fee: u128,
    pub init_auction_fee: u128,
    pub deadline: u32,
    pub redeemer_message: Bytes,
}

/// The fee quote carried by the canonical transfer
#[derive(Clone)]
#[contracttype]
pub struct SlowOrderResponse {
    pub base_fee: u128,
}

/// Delivery instructions attached to settled funds
#[derive(Clone)]
#[contracttype]
pub struct Fill {
    pub source_chain: u32,
    pub order_sender: BytesN<32>,
    pub redeemer: BytesN<32>,
    pub redeemer_message: Bytes,
}

/// A same-chain settlement redeemable by the local router
#[derive(Clone)]
#[contracttype]
pub struct FastFill {
    pub fill: Fill,
    pub fill_amount: u128,
}

/// Fetch the payload id, or None for an empty payload
pub fn payload_id(payload: &Bytes) -> Option<u8> {
    payload.get(0)
}

impl FastMarketOrder {
    pub fn encode(&self, e: &Env) -> Bytes {
        let mut bytes = Bytes::new(e);
        bytes.push_back(FAST_MARKET_ORDER_ID);
        bytes.extend_from_array(&self.amount_in.to_be_bytes());
        bytes.extend_from_array(&self.min_amount_out.to_be_bytes());
        write_u16(&mut bytes, self.target_chain);
        bytes.extend_from_array(&self.destination_domain.to_be_bytes());
        bytes.extend_from_array(&self.redeemer.to_array());
        bytes.extend_from_array(&self.sender.to_array());
        bytes.extend_from_array(&self.refund_address.to_array());
        bytes.extend_from_array(&self.slow_emitter.to_array());
        bytes.extend_from_array(&self.slow_sequence.to_be_bytes());
        bytes.extend_from_array(&self.max_fee.to_be_bytes());
        bytes.extend_from_array(&self.init_auction_fee.to_be_bytes());
        bytes.extend_from_array(&self.deadline.to_be_bytes());
        bytes.extend_from_array(&self.redeemer_message.len().to_be_bytes());
        bytes.append(&self.redeemer_message);
        bytes
    }

    pub fn decode(e: &Env, payload: &Bytes) -> Self {
        if payload.len() < FAST_MARKET_ORDER_FIXED_LEN
            || payload.get(0) != Some(FAST_MARKET_ORDER_ID)
        {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        let message_len = read_u32(payload, 211);
        if payload.len() - FAST_MARKET_ORDER_FIXED_LEN != message_len {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        FastMarketOrder {
            amount_in: read_u128(payload, 1),
            min_amount_out: read_u128(payload, 17),
            target_chain: read_u16(payload, 33),
            destination_domain: read_u32(payload, 35),
            redeemer: read_bytes32(e, payload, 39),
            sender: read_bytes32(e, payload, 71),
            refund_address: read_bytes32(e, payload, 103),
            slow_emitter: read_bytes32(e, payload, 135),
            slow_sequence: read_u64(payload, 167),
            max_fee: read_u128(payload, 175),
            init_auction_fee: read_u128(payload, 191),
            deadline: read_u32(payload, 207),
            redeemer_message: payload.slice(FAST_MARKET_ORDER_FIXED_LEN..),
        }
    }
}

impl SlowOrderResponse {
    pub fn encode(&self, e: &Env) -> Bytes {
        let mut bytes = Bytes::new(e);
        bytes.push_back(SLOW_ORDER_RESPONSE_ID);
        bytes.extend_from_array(&self.base_fee.to_be_bytes());
        bytes
    }

    pub fn decode(e: &Env, payload: &Bytes) -> Self {
        if payload.len() != SLOW_ORDER_RESPONSE_LEN || payload.get(0) != Some(SLOW_ORDER_RESPONSE_ID)
        {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        SlowOrderResponse {
            base_fee: read_u128(payload, 1),
        }
    }
}

impl Fill {
    pub fn encode(&self, e: &Env) -> Bytes {
        let mut bytes = Bytes::new(e);
        bytes.push_back(FILL_ID);
        self.encode_body(&mut bytes);
        bytes
    }

    pub fn decode(e: &Env, payload: &Bytes) -> Self {
        if payload.len() < FILL_FIXED_LEN || payload.get(0) != Some(FILL_ID) {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        let message_len = read_u32(payload, 67);
        if payload.len() - FILL_FIXED_LEN != message_len {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        Self::decode_body(e, payload, 1)
    }

    fn encode_body(&self, bytes: &mut Bytes) {
        write_u16(bytes, self.source_chain);
        bytes.extend_from_array(&self.order_sender.to_array());
        bytes.extend_from_array(&self.redeemer.to_array());
        bytes.extend_from_array(&self.redeemer_message.len().to_be_bytes());
        bytes.append(&self.redeemer_message);
    }

    // Reads the fill fields starting at `at`, taking everything past the
    // message length prefix as the message. Length checks are the caller's.
    fn decode_body(e: &Env, payload: &Bytes, at: u32) -> Self {
        Fill {
            source_chain: read_u16(payload, at),
            order_sender: read_bytes32(e, payload, at + 2),
            redeemer: read_bytes32(e, payload, at + 34),
            redeemer_message: payload.slice(at + 70..),
        }
    }
}

impl FastFill {
    pub fn encode(&self, e: &Env) -> Bytes {
        let mut bytes = Bytes::new(e);
        bytes.push_back(FAST_FILL_ID);
        bytes.extend_from_array(&self.fill_amount.to_be_bytes());
        self.fill.encode_body(&mut bytes);
        bytes
    }

    pub fn decode(e: &Env, payload: &Bytes) -> Self {
        if payload.len() < FAST_FILL_FIXED_LEN || payload.get(0) != Some(FAST_FILL_ID) {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        let message_len = read_u32(payload, 83);
        if payload.len() - FAST_FILL_FIXED_LEN != message_len {
            panic_with_error!(e, MatchingEngineError::MalformedPayload);
        }
        FastFill {
            fill_amount: read_u128(payload, 1),
            fill: Fill::decode_body(e, payload, 17),
        }
    }
}

/********** Byte Helpers **********/

fn read_u16(payload: &Bytes, at: u32) -> u32 {
    let mut buf = [0u8; 2];
    payload.slice(at..at + 2).copy_into_slice(&mut buf);
    u16::from_be_bytes(buf) as u32
}

fn read_u32(payload: &Bytes, at: u32) -> u32 {
    let mut buf = [0u8; 4];
    payload.slice(at..at + 4).copy_into_slice(&mut buf);
    u32::from_be_bytes(buf)
}

fn read_u64(payload: &Bytes, at: u32) -> u64 {
    let mut buf = [0u8; 8];
    payload.slice(at..at + 8).copy_into_slice(&mut buf);
    u64::from_be_bytes(buf)
}

fn read_u128(payload: &Bytes, at: u32) -> u128 {
    let mut buf = [0u8; 16];
    payload.slice(at..at + 16).copy_into_slice(&mut buf);
    u128::from_be_bytes(buf)
}

fn read_bytes32(e: &Env, payload: &Bytes, at: u32) -> BytesN<32> {
    let mut buf = [0u8; 32];
    payload.slice(at..at + 32).copy_into_slice(&mut buf);
    BytesN::from_array(e, &buf)
}

fn write_u16(bytes: &mut Bytes, value: u32) {
    bytes.extend_from_array(&(value as u16).to_be_bytes());
}
