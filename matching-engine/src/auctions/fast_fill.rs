use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Bytes, Env};

use crate::{errors::MatchingEngineError, messages::FastFill, storage};

use super::auction;

/// Redeem a fast fill emitted by this engine, paying the filled amount out
/// of custody to the local router. Each fill redeems at most once.
///
/// ### Arguments
/// * `from` - The caller, which must be the registered local router
/// * `fast_fill_message` - The attested fast fill
///
/// ### Panics
/// If the message was not emitted by this engine on this chain, was already
/// redeemed, or the caller is not the local router
pub fn execute_redeem_fast_fill(e: &Env, from: &Address, fast_fill_message: &Bytes) -> FastFill {
    let verified = auction::verify_message(e, fast_fill_message);

    let local_chain = storage::get_local_chain(e);
    if verified.emitter_chain != local_chain
        || verified.emitter_address != auction::universal_address(e, &e.current_contract_address())
    {
        panic_with_error!(e, MatchingEngineError::InvalidEmitterForFastFill);
    }

    if storage::is_fill_redeemed(e, &verified.digest) {
        panic_with_error!(e, MatchingEngineError::FastFillAlreadyRedeemed);
    }
    storage::set_fill_redeemed(e, &verified.digest);

    match storage::get_endpoint(e, local_chain) {
        Some(router) if router == auction::universal_address(e, from) => (),
        _ => panic_with_error!(e, MatchingEngineError::InvalidSourceRouter),
    }

    let fast_fill = FastFill::decode(e, &verified.payload);
    let fill_amount = auction::to_token_amount(e, fast_fill.fill_amount);
    TokenClient::new(e, &storage::get_token(e)).transfer(
        &e.current_contract_address(),
        from,
        &fill_amount,
    );

    fast_fill
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auctions::{execute_fast_order, execute_place_initial_bid},
        testutils::{self, LOCAL_CHAIN, SOURCE_CHAIN},
    };
    use mock_message_transport::universal_address;
    use soroban_sdk::{testutils::Address as _, Env};

    /// Run an order targeting this chain through the fast path and return the
    /// emitted fast fill envelope. The local router is `router`.
    fn emit_local_fast_fill(
        e: &Env,
        engine: &Address,
        router: &Address,
        token_client: &sep_41_token::testutils::MockTokenClient,
        transport_client: &mock_message_transport::MockMessageTransportClient,
        alice: &Address,
    ) -> Bytes {
        token_client.mint(alice, &50_001_000_000);

        let mut order = testutils::default_order(e);
        order.target_chain = LOCAL_CHAIN;
        let message = testutils::order_message(e, &order, 1);

        e.as_contract(engine, || {
            storage::set_endpoint(e, LOCAL_CHAIN, &universal_address(e, router));
            execute_place_initial_bid(e, alice, &message, 500_000);

            testutils::set_ledger_sequence(e, 103, 615);
            execute_fast_order(e, alice, &message);
        });

        transport_client.last_message()
    }

    #[test]
    fn test_redeem_fast_fill() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let router = Address::generate(&e);
        let (engine, token_client, transport_client, _) = testutils::setup_engine(&e, &bombadil);

        let envelope = emit_local_fast_fill(
            &e,
            &engine,
            &router,
            &token_client,
            &transport_client,
            &alice,
        );

        e.as_contract(&engine, || {
            let fast_fill = execute_redeem_fast_fill(&e, &router, &envelope);
            assert_eq!(fast_fill.fill_amount, 49_999_499_900);
            assert_eq!(fast_fill.fill.source_chain, SOURCE_CHAIN);
        });

        assert_eq!(token_client.balance(&router), 49_999_499_900);
        assert_eq!(token_client.balance(&engine), 0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1341)")]
    fn test_redeem_fast_fill_twice() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let router = Address::generate(&e);
        let (engine, token_client, transport_client, _) = testutils::setup_engine(&e, &bombadil);

        let envelope = emit_local_fast_fill(
            &e,
            &engine,
            &router,
            &token_client,
            &transport_client,
            &alice,
        );

        e.as_contract(&engine, || {
            execute_redeem_fast_fill(&e, &router, &envelope);
            execute_redeem_fast_fill(&e, &router, &envelope);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1342)")]
    fn test_redeem_fast_fill_foreign_emitter() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let router = Address::generate(&e);
        let (engine, _, _, _) = testutils::setup_engine(&e, &bombadil);

        // a fast fill payload emitted by the source router instead of the
        // engine is not redeemable
        let fast_fill = FastFill {
            fill: crate::messages::Fill {
                source_chain: SOURCE_CHAIN,
                order_sender: soroban_sdk::BytesN::from_array(&e, &[8u8; 32]),
                redeemer: soroban_sdk::BytesN::from_array(&e, &[7u8; 32]),
                redeemer_message: Bytes::new(&e),
            },
            fill_amount: 1_000,
        };
        let envelope = mock_message_transport::encode_message(
            &e,
            LOCAL_CHAIN,
            &testutils::source_router(&e),
            9,
            &fast_fill.encode(&e),
        );

        e.as_contract(&engine, || {
            storage::set_endpoint(&e, LOCAL_CHAIN, &universal_address(&e, &router));
            execute_redeem_fast_fill(&e, &router, &envelope);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1312)")]
    fn test_redeem_fast_fill_caller_not_router() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        testutils::set_ledger_sequence(&e, 100, 600);

        let bombadil = Address::generate(&e);
        let alice = Address::generate(&e);
        let router = Address::generate(&e);
        let samwise = Address::generate(&e);
        let (engine, token_client, transport_client, _) = testutils::setup_engine(&e, &bombadil);

        let envelope = emit_local_fast_fill(
            &e,
            &engine,
            &router,
            &token_client,
            &transport_client,
            &alice,
        );

        e.as_contract(&engine, || {
            execute_redeem_fast_fill(&e, &samwise, &envelope);
        });
    }
}
