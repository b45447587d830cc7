use soroban_sdk::{unwrap::UnwrapOptimized, Bytes, Env, Symbol};

const CHAIN_ID_KEY: &str = "ChainId";
const SEQUENCE_KEY: &str = "Sequence";
const LAST_MESSAGE_KEY: &str = "LastMsg";

pub fn set_chain_id(e: &Env, chain_id: u32) {
    e.storage()
        .instance()
        .set::<Symbol, u32>(&Symbol::new(e, CHAIN_ID_KEY), &chain_id);
}

pub fn get_chain_id(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, CHAIN_ID_KEY))
        .unwrap_optimized()
}

/// Take the next message sequence
pub fn bump_sequence(e: &Env) -> u64 {
    let key = Symbol::new(e, SEQUENCE_KEY);
    let sequence: u64 = e.storage().instance().get(&key).unwrap_or(0);
    e.storage()
        .instance()
        .set::<Symbol, u64>(&key, &(sequence + 1));
    sequence
}

pub fn set_last_message(e: &Env, message: &Bytes) {
    e.storage()
        .instance()
        .set::<Symbol, Bytes>(&Symbol::new(e, LAST_MESSAGE_KEY), message);
}

pub fn get_last_message(e: &Env) -> Bytes {
    e.storage()
        .instance()
        .get(&Symbol::new(e, LAST_MESSAGE_KEY))
        .unwrap_optimized()
}
