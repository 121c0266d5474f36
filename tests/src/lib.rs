//! CSPR-FOT Integration Tests
//!
//! Host-side tests of the tax token against the mock AMM. The base pool is
//! a plain account standing in for the pair contract, so pool-side buys
//! and sells are driven with `set_caller`.

#[cfg(test)]
mod fixture {
    use cspr_fot_contracts::mocks::*;
    use cspr_fot_contracts::tax_token::{TaxToken, TaxTokenHostRef, TaxTokenInitArgs};
    use cspr_fot_contracts::types::DENOMINATOR;
    use odra::casper_types::U256;
    use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
    use odra::prelude::*;

    /// 1e9 raw units: max tx 1e7, max wallet 2e7, threshold 5e5, limit floor 1e6
    pub const SUPPLY: u64 = 1_000_000_000;
    /// Settlement held by the router to pay out swaps
    pub const ROUTER_RESERVE: u64 = 1_000_000_000_000;

    pub fn percent(p: u64) -> U256 {
        U256::from(DENOMINATOR) * U256::from(p) / U256::from(100u64)
    }

    pub fn units(amount: u64) -> U256 {
        U256::from(amount)
    }

    pub struct Fixture {
        pub env: HostEnv,
        pub token: TaxTokenHostRef,
        pub router: MockRouterHostRef,
        pub factory: MockPairFactoryHostRef,
        pub settlement: MockSettlementTokenHostRef,
        pub owner: Address,
        pub pool: Address,
        pub revenue: Address,
        pub liquidity: Address,
        pub alice: Address,
        pub bob: Address,
        pub carol: Address,
    }

    impl Fixture {
        pub fn token_address(&self) -> Address {
            self.token.address()
        }

        /// Sum of token balances over every account the tests touch
        pub fn tracked_supply(&self) -> U256 {
            [
                self.owner,
                self.pool,
                self.revenue,
                self.liquidity,
                self.alice,
                self.bob,
                self.carol,
                self.token_address(),
            ]
            .iter()
            .fold(U256::zero(), |acc, account| acc + self.token.balance_of(*account))
        }

        /// Owner funds the pool and opens trading
        pub fn launch(&mut self, pool_liquidity: u64) {
            self.env.set_caller(self.owner);
            self.token.transfer(self.pool, units(pool_liquidity));
            self.token.enable_token();
        }

        /// The pool sells `amount` tokens to `buyer` (a buy from the buyer's side)
        pub fn buy(&mut self, buyer: Address, amount: u64) {
            self.env.set_caller(self.pool);
            self.token.transfer(buyer, units(amount));
        }

        pub fn fund(&mut self, account: Address, amount: u64) {
            self.env.set_caller(self.owner);
            self.token.transfer(account, units(amount));
        }
    }

    /// Deploy settlement, factory, router and token; price is 1 settlement per 100 tokens
    pub fn setup() -> Fixture {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let pool = env.get_account(1);
        let revenue = env.get_account(2);
        let liquidity = env.get_account(3);
        let alice = env.get_account(4);
        let bob = env.get_account(5);
        let carol = env.get_account(6);

        env.set_caller(owner);
        let mut settlement = MockSettlementToken::deploy(&env, NoArgs);
        let factory = MockPairFactory::deploy(&env, MockPairFactoryInitArgs { pair: pool });
        let router = MockRouter::deploy(
            &env,
            MockRouterInitArgs {
                pair: pool,
                price: percent(1),
            },
        );
        settlement.mint(router.address(), units(ROUTER_RESERVE));

        let token = TaxToken::deploy(
            &env,
            TaxTokenInitArgs {
                name: String::from("Fee Token"),
                symbol: String::from("FEE"),
                decimals: 9,
                initial_supply: units(SUPPLY),
                router: router.address(),
                factory: factory.address(),
                settlement: settlement.address(),
                revenue_recipient: revenue,
                liquidity_recipient: liquidity,
            },
        );

        Fixture {
            env,
            token,
            router,
            factory,
            settlement,
            owner,
            pool,
            revenue,
            liquidity,
            alice,
            bob,
            carol,
        }
    }
}

#[cfg(test)]
mod deployment_tests {
    use super::fixture::*;
    use odra::host::HostRef;
    use odra::prelude::Addressable;
    use cspr_fot_contracts::types::zero_address;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deploy_mints_supply_to_owner() {
        let f = setup();
        assert_eq!(f.token.total_supply(), units(SUPPLY));
        assert_eq!(f.token.balance_of(f.owner), units(SUPPLY));
        assert_eq!(f.token.get_owner(), f.owner);
        assert_eq!(f.token.get_pending_owner(), None);
        assert_eq!(f.token.name(), "Fee Token");
        assert_eq!(f.token.symbol(), "FEE");
        assert_eq!(f.token.decimals(), 9);
    }

    #[test]
    fn test_deploy_registers_base_pool() {
        let f = setup();
        assert_eq!(f.factory.pairs_created(), 1);
        assert_eq!(f.token.base_pool(), f.pool);
        assert!(f.token.is_liquidity_pool(f.pool));
        assert!(f.token.is_limit_exempt(f.pool));
        assert!(!f.token.is_fee_exempt(f.pool));
        assert_eq!(f.token.router(), Some(f.router.address()));
        assert_eq!(f.token.settlement_token(), Some(f.settlement.address()));
    }

    #[test]
    fn test_deploy_policy_defaults() {
        let f = setup();
        let policy = f.token.policy_snapshot();
        assert_eq!(policy.buy_fee_rate, percent(5));
        assert_eq!(policy.sell_fee_rate, percent(5));
        assert_eq!(policy.revenue_share, percent(50));
        assert_eq!(policy.liquidity_share, percent(50));
        assert_eq!(policy.max_transaction_size, units(10_000_000));
        assert_eq!(policy.max_wallet_size, units(20_000_000));
        assert_eq!(policy.swap_threshold, units(500_000));
        assert!(policy.trade_fee_enabled);
        assert!(!policy.transfer_fee_enabled);
        assert!(!policy.token_enabled);
        assert_eq!(policy.revenue_recipient, f.revenue);
        assert_eq!(policy.liquidity_recipient, f.liquidity);
        assert!(!f.token.is_swapping());
    }

    #[test]
    fn test_deploy_exemptions() {
        let f = setup();
        let owner_flags = f.token.account_flags(f.owner);
        assert!(owner_flags.fee_exempt);
        assert!(owner_flags.limit_exempt);
        assert!(!owner_flags.blacklisted);

        let token_flags = f.token.account_flags(f.token_address());
        assert!(token_flags.fee_exempt);
        assert!(token_flags.limit_exempt);

        let alice_flags = f.token.account_flags(f.alice);
        assert!(!alice_flags.fee_exempt && !alice_flags.limit_exempt);
        assert!(!alice_flags.blacklisted && !alice_flags.liquidity_pool);
        assert!(f.token.revenue_recipient() != zero_address());
    }
}

#[cfg(test)]
mod transfer_tests {
    use super::fixture::*;
    use cspr_fot_contracts::errors::TokenError;
    use pretty_assertions::assert_eq;

    // ===== Enable Gate =====

    #[test]
    fn test_disabled_token_blocks_regular_transfers() {
        let mut f = setup();
        f.fund(f.alice, 1_000_000);

        f.env.set_caller(f.alice);
        let result = f.token.try_transfer(f.bob, units(1_000));
        assert_eq!(result, Err(TokenError::TokenDisabled.into()));
        assert_eq!(f.token.balance_of(f.alice), units(1_000_000));
    }

    #[test]
    fn test_disabled_token_allows_owner_and_sells() {
        let mut f = setup();
        f.fund(f.alice, 1_000_000);

        // Back to the owner
        f.env.set_caller(f.alice);
        f.token.transfer(f.owner, units(100_000));

        // Into the pool, with the sell fee
        f.token.transfer(f.pool, units(100_000));
        assert_eq!(f.token.balance_of(f.pool), units(95_000));
        assert_eq!(f.token.balance_of(f.token_address()), units(5_000));
        assert_eq!(f.tracked_supply(), units(SUPPLY));
    }

    #[test]
    fn test_disabled_token_blocks_buys_from_pool() {
        let mut f = setup();
        f.fund(f.pool, 10_000_000);

        f.env.set_caller(f.pool);
        let result = f.token.try_transfer(f.alice, units(1_000_000));
        assert_eq!(result, Err(TokenError::TokenDisabled.into()));
        assert!(f.token.balance_of(f.alice).is_zero());
        assert_eq!(f.token.balance_of(f.pool), units(10_000_000));
    }

    #[test]
    fn test_enable_token_is_one_way() {
        let mut f = setup();
        f.token.enable_token();
        assert!(f.token.token_enabled());
        assert_eq!(f.token.try_enable_token(), Err(TokenError::AlreadyEnabled.into()));
    }

    // ===== Fees =====

    #[test]
    fn test_buy_from_pool_pays_buy_fee() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 1_000_000);

        assert_eq!(f.token.balance_of(f.alice), units(950_000));
        assert_eq!(f.token.balance_of(f.token_address()), units(50_000));
        assert_eq!(f.token.balance_of(f.pool), units(99_000_000));
        assert_eq!(f.tracked_supply(), units(SUPPLY));
    }

    #[test]
    fn test_sell_uses_sell_rate() {
        let mut f = setup();
        f.token.set_fee_rates(percent(2), percent(10));
        f.launch(100_000_000);
        f.fund(f.alice, 1_000_000);

        f.env.set_caller(f.alice);
        f.token.transfer(f.pool, units(200_000));
        assert_eq!(f.token.balance_of(f.token_address()), units(20_000));
        assert_eq!(f.token.balance_of(f.pool), units(100_180_000));
    }

    #[test]
    fn test_wallet_transfer_fee_switch() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 1_000_000);

        f.env.set_caller(f.alice);
        f.token.transfer(f.bob, units(100_000));
        assert_eq!(f.token.balance_of(f.bob), units(100_000));

        f.env.set_caller(f.owner);
        f.token.set_transfer_fee_enabled(true);
        f.env.set_caller(f.alice);
        f.token.transfer(f.bob, units(100_000));
        assert_eq!(f.token.balance_of(f.bob), units(195_000));
        assert_eq!(f.token.balance_of(f.token_address()), units(5_000));
    }

    #[test]
    fn test_trade_fee_switch_off() {
        let mut f = setup();
        f.token.set_trade_fee_enabled(false);
        f.launch(100_000_000);
        f.buy(f.alice, 1_000_000);
        assert_eq!(f.token.balance_of(f.alice), units(1_000_000));
        assert!(f.token.balance_of(f.token_address()).is_zero());
    }

    #[test]
    fn test_fee_exempt_receiver_pays_nothing() {
        let mut f = setup();
        f.token.set_fee_exempt(f.alice, true);
        f.launch(100_000_000);
        f.buy(f.alice, 1_000_000);
        assert_eq!(f.token.balance_of(f.alice), units(1_000_000));
    }

    #[test]
    fn test_tiny_transfer_fee_truncates() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 19);
        assert_eq!(f.token.balance_of(f.alice), units(19));
    }

    // ===== Size Limits =====

    #[test]
    fn test_max_transaction_size() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 15_000_000);

        f.env.set_caller(f.alice);
        let result = f.token.try_transfer(f.bob, units(10_000_001));
        assert_eq!(result, Err(TokenError::ExceedsSizeLimit.into()));

        f.token.transfer(f.bob, units(10_000_000));
        assert_eq!(f.token.balance_of(f.bob), units(10_000_000));
    }

    #[test]
    fn test_max_wallet_size() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 5_000_000);
        f.fund(f.bob, 19_000_000);

        f.env.set_caller(f.alice);
        let result = f.token.try_transfer(f.bob, units(1_000_001));
        assert_eq!(result, Err(TokenError::ExceedsSizeLimit.into()));

        f.token.transfer(f.bob, units(1_000_000));
        assert_eq!(f.token.balance_of(f.bob), units(20_000_000));
    }

    #[test]
    fn test_limit_exempt_sender_skips_limits() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 30_000_000);
        f.token.set_limit_exempt(f.alice, true);

        f.env.set_caller(f.alice);
        f.token.transfer(f.bob, units(25_000_000));
        assert_eq!(f.token.balance_of(f.bob), units(25_000_000));
    }

    #[test]
    fn test_limit_setters_enforce_floor() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_max_transaction_size(units(0)),
            Err(TokenError::LimitTooLow.into())
        );
        assert_eq!(
            f.token.try_set_max_wallet_size(units(999_999)),
            Err(TokenError::LimitTooLow.into())
        );
        f.token.set_max_transaction_size(units(1_000_000));
        assert_eq!(f.token.max_transaction_size(), units(1_000_000));
    }

    // ===== Blacklist =====

    #[test]
    fn test_blacklisted_cannot_send_or_receive() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 1_000_000);
        f.fund(f.bob, 1_000_000);
        f.token.set_blacklisted(f.alice, true);

        f.env.set_caller(f.alice);
        assert_eq!(
            f.token.try_transfer(f.bob, units(10)),
            Err(TokenError::Blacklisted.into())
        );

        f.env.set_caller(f.bob);
        assert_eq!(
            f.token.try_transfer(f.alice, units(10)),
            Err(TokenError::Blacklisted.into())
        );
    }

    #[test]
    fn test_blacklisted_cannot_receive_from_owner() {
        let mut f = setup();
        f.launch(100_000_000);
        f.token.set_blacklisted(f.alice, true);

        assert_eq!(
            f.token.try_transfer(f.alice, units(1_000)),
            Err(TokenError::Blacklisted.into())
        );
        assert!(f.token.balance_of(f.alice).is_zero());
    }

    #[test]
    fn test_blacklisted_can_return_to_owner() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 1_000_000);
        f.token.set_blacklisted(f.alice, true);

        f.env.set_caller(f.alice);
        f.token.transfer(f.owner, units(1_000_000));
        assert!(f.token.balance_of(f.alice).is_zero());
    }

    #[test]
    fn test_contract_and_base_pool_cannot_be_blacklisted() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_blacklisted(f.token_address(), true),
            Err(TokenError::ProtectedAccount.into())
        );
        assert_eq!(
            f.token.try_set_blacklisted(f.pool, true),
            Err(TokenError::ProtectedAccount.into())
        );
    }

    // ===== Ledger =====

    #[test]
    fn test_insufficient_balance() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 100);

        f.env.set_caller(f.alice);
        assert_eq!(
            f.token.try_transfer(f.bob, units(101)),
            Err(TokenError::InsufficientBalance.into())
        );
        assert_eq!(f.token.balance_of(f.alice), units(100));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut f = setup();
        f.launch(100_000_000);
        f.fund(f.alice, 1_000_000);

        f.env.set_caller(f.alice);
        f.token.approve(f.bob, units(500));
        f.token.increase_allowance(f.bob, units(100));
        f.token.decrease_allowance(f.bob, units(50));
        assert_eq!(f.token.allowance(f.alice, f.bob), units(550));

        f.env.set_caller(f.bob);
        f.token.transfer_from(f.alice, f.carol, units(550));
        assert_eq!(f.token.balance_of(f.carol), units(550));
        assert!(f.token.allowance(f.alice, f.bob).is_zero());

        assert_eq!(
            f.token.try_transfer_from(f.alice, f.carol, units(1)),
            Err(TokenError::InsufficientAllowance.into())
        );
    }

    #[test]
    fn test_conservation_across_mixed_traffic() {
        let mut f = setup();
        f.token.set_transfer_fee_enabled(true);
        f.launch(100_000_000);
        f.buy(f.alice, 3_000_000);
        f.buy(f.bob, 777_777);

        f.env.set_caller(f.alice);
        f.token.transfer(f.carol, units(123_457));
        f.token.transfer(f.pool, units(400_001));

        f.env.set_caller(f.bob);
        f.token.transfer(f.alice, units(99));

        assert_eq!(f.tracked_supply(), units(SUPPLY));
        assert_eq!(f.token.total_supply(), units(SUPPLY));
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::fixture::*;
    use cspr_fot_contracts::errors::TokenError;
    use cspr_fot_contracts::mocks::MockError;
    use cspr_fot_contracts::types::ConversionResult;
    use pretty_assertions::assert_eq;

    /// Collect 100_000 in buy fees, lower the threshold, then sell 1_000_000.
    /// The sell adds 50_000 more, so 150_000 are converted:
    /// 37_500 kept for liquidity, 112_500 swapped for 1_125 settlement,
    /// 562 revenue and 563 paired with the kept tokens.
    fn collect_and_sell(f: &mut Fixture) {
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.env.set_caller(f.owner);
        f.token.set_swap_threshold(units(100_000));

        f.env.set_caller(f.alice);
        f.token.transfer(f.pool, units(1_000_000));
    }

    #[test]
    fn test_sell_below_threshold_does_not_convert() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);

        f.env.set_caller(f.alice);
        f.token.transfer(f.pool, units(1_000_000));
        assert_eq!(f.token.balance_of(f.token_address()), units(150_000));
        assert_eq!(f.router.swap_count(), 0);
    }

    #[test]
    fn test_buy_never_converts() {
        let mut f = setup();
        f.token.set_swap_threshold(units(1));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        assert_eq!(f.token.balance_of(f.token_address()), units(100_000));
        assert_eq!(f.router.swap_count(), 0);
    }

    #[test]
    fn test_sell_over_threshold_converts() {
        let mut f = setup();
        collect_and_sell(&mut f);

        assert_eq!(f.router.swap_count(), 1);
        assert!(f.token.balance_of(f.token_address()).is_zero());
        assert_eq!(f.settlement.balance_of(f.revenue), units(562));
        assert_eq!(f.router.lp_balance_of(f.liquidity), units(4_594));
        assert!(f.settlement.balance_of(f.token_address()).is_zero());
        assert!(!f.token.is_swapping());
    }

    #[test]
    fn test_conversion_transfers_are_fee_free() {
        let mut f = setup();
        f.token.set_fee_exempt(f.token_address(), false);
        f.token.set_limit_exempt(f.token_address(), false);
        f.token.set_max_transaction_size(units(1_000_000));
        f.token.set_max_wallet_size(units(1_000_000));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.env.set_caller(f.owner);
        f.token.set_swap_threshold(units(100_000));
        let pool_before_sell = f.token.balance_of(f.pool);

        f.env.set_caller(f.alice);
        f.token.transfer(f.pool, units(1_000_000));

        // Sale net plus the exact swapped and paired amounts
        assert_eq!(
            f.token.balance_of(f.pool),
            pool_before_sell + units(950_000) + units(112_500) + units(37_500)
        );
        assert!(f.token.balance_of(f.token_address()).is_zero());
        assert_eq!(f.tracked_supply(), units(SUPPLY));
    }

    #[test]
    fn test_conversion_transfers_skip_size_limits() {
        let mut f = setup();
        f.token.set_limit_exempt(f.pool, false);
        f.token.set_limit_exempt(f.token_address(), false);
        f.token.set_limit_exempt(f.alice, true);
        f.token.set_max_transaction_size(units(1_000_000));
        f.token.set_max_wallet_size(units(1_000_000));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.env.set_caller(f.owner);
        f.token.set_swap_threshold(units(100_000));

        // The pool already holds far more than the wallet limit
        assert!(f.token.balance_of(f.pool) > f.token.max_wallet_size());

        f.env.set_caller(f.alice);
        f.token.transfer(f.pool, units(1_000_000));

        assert_eq!(f.router.swap_count(), 1);
        assert!(f.token.balance_of(f.token_address()).is_zero());
        assert_eq!(f.settlement.balance_of(f.revenue), units(562));
        assert_eq!(f.tracked_supply(), units(SUPPLY));
    }

    #[test]
    fn test_failed_swap_reverts_the_sell() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.env.set_caller(f.owner);
        f.token.set_swap_threshold(units(100_000));
        f.router.set_failing(true);

        let pool_before = f.token.balance_of(f.pool);
        f.env.set_caller(f.alice);
        let result = f.token.try_transfer(f.pool, units(1_000_000));
        assert_eq!(result, Err(MockError::SwapRejected.into()));

        assert_eq!(f.token.balance_of(f.alice), units(1_900_000));
        assert_eq!(f.token.balance_of(f.pool), pool_before);
        assert_eq!(f.token.balance_of(f.token_address()), units(100_000));
        assert!(!f.token.is_swapping());
    }

    #[test]
    fn test_convert_fees_manual() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);

        f.env.set_caller(f.owner);
        let result = f.token.convert_fees();
        assert_eq!(
            result,
            ConversionResult {
                tokens_swapped: units(75_000),
                settlement_received: units(750),
                tokens_to_liquidity: units(25_000),
                settlement_to_liquidity: units(375),
                revenue: units(375),
            }
        );
        assert_eq!(f.settlement.balance_of(f.revenue), units(375));
        assert!(f.token.balance_of(f.token_address()).is_zero());
    }

    #[test]
    fn test_conversion_follows_router_price() {
        let mut f = setup();
        f.router.set_price(percent(2));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);

        f.env.set_caller(f.owner);
        let result = f.token.convert_fees();
        assert_eq!(result.tokens_swapped, units(75_000));
        assert_eq!(result.settlement_received, units(1_500));
        assert_eq!(result.settlement_to_liquidity, units(750));
        assert_eq!(result.revenue, units(750));
        assert_eq!(f.settlement.balance_of(f.revenue), units(750));
    }

    #[test]
    fn test_convert_fees_requires_collected_balance() {
        let mut f = setup();
        assert_eq!(f.token.try_convert_fees(), Err(TokenError::NothingToConvert.into()));
    }

    #[test]
    fn test_convert_fees_owner_only() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.env.set_caller(f.alice);
        assert_eq!(f.token.try_convert_fees(), Err(TokenError::NotOwner.into()));
    }

    #[test]
    fn test_proceeds_measured_as_balance_delta() {
        let mut f = setup();
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);
        f.settlement.mint(f.token_address(), units(1_000));

        f.env.set_caller(f.owner);
        let result = f.token.convert_fees();
        assert_eq!(result.settlement_received, units(750));
        assert_eq!(f.settlement.balance_of(f.token_address()), units(1_000));

        assert_eq!(f.token.withdraw_settlement(f.bob), units(1_000));
        assert_eq!(f.settlement.balance_of(f.bob), units(1_000));
        assert!(f.settlement.balance_of(f.token_address()).is_zero());
    }

    #[test]
    fn test_full_revenue_share_skips_liquidity() {
        let mut f = setup();
        f.token.set_fee_split(percent(100));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);

        f.env.set_caller(f.owner);
        let result = f.token.convert_fees();
        assert_eq!(result.tokens_swapped, units(100_000));
        assert!(result.tokens_to_liquidity.is_zero());
        assert_eq!(result.revenue, units(1_000));
        assert!(f.router.lp_balance_of(f.liquidity).is_zero());
    }

    #[test]
    fn test_full_liquidity_share_sends_no_revenue() {
        let mut f = setup();
        f.token.set_fee_split(percent(0));
        f.launch(100_000_000);
        f.buy(f.alice, 2_000_000);

        f.env.set_caller(f.owner);
        let result = f.token.convert_fees();
        assert_eq!(result.tokens_swapped, units(50_000));
        assert_eq!(result.tokens_to_liquidity, units(50_000));
        assert_eq!(result.settlement_to_liquidity, units(500));
        assert!(result.revenue.is_zero());
        assert!(f.settlement.balance_of(f.revenue).is_zero());
    }

    #[test]
    fn test_recipient_change_redirects_revenue() {
        let mut f = setup();
        f.token.set_revenue_recipient(f.carol);
        collect_and_sell(&mut f);
        assert_eq!(f.settlement.balance_of(f.carol), units(562));
        assert!(f.settlement.balance_of(f.revenue).is_zero());
    }
}

#[cfg(test)]
mod admin_tests {
    use super::fixture::*;
    use cspr_fot_contracts::errors::TokenError;
    use cspr_fot_contracts::types::zero_address;
    use pretty_assertions::assert_eq;

    // ===== Validation =====

    #[test]
    fn test_fee_rate_bounds() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_fee_rates(percent(101), percent(5)),
            Err(TokenError::RateOutOfRange.into())
        );
        f.token.set_fee_rates(percent(100), percent(0));
        assert_eq!(f.token.buy_fee_rate(), percent(100));
        assert!(f.token.sell_fee_rate().is_zero());
    }

    #[test]
    fn test_fee_split_is_complementary() {
        let mut f = setup();
        f.token.set_fee_split(percent(30));
        assert_eq!(f.token.revenue_share(), percent(30));
        assert_eq!(f.token.liquidity_share(), percent(70));
        assert_eq!(
            f.token.try_set_fee_split(percent(101)),
            Err(TokenError::ShareOutOfRange.into())
        );
        assert_eq!(f.token.revenue_share() + f.token.liquidity_share(), percent(100));
    }

    #[test]
    fn test_swap_threshold_must_be_positive() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_swap_threshold(units(0)),
            Err(TokenError::ZeroThreshold.into())
        );
    }

    #[test]
    fn test_recipients_reject_zero_account() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_revenue_recipient(zero_address()),
            Err(TokenError::ZeroRecipient.into())
        );
        assert_eq!(
            f.token.try_set_liquidity_recipient(zero_address()),
            Err(TokenError::ZeroRecipient.into())
        );
        f.token.set_liquidity_recipient(f.carol);
        assert_eq!(f.token.liquidity_recipient(), f.carol);
    }

    #[test]
    fn test_setters_are_owner_only() {
        let mut f = setup();
        f.env.set_caller(f.alice);
        assert_eq!(
            f.token.try_set_fee_rates(percent(1), percent(1)),
            Err(TokenError::NotOwner.into())
        );
        assert_eq!(
            f.token.try_set_blacklisted(f.bob, true),
            Err(TokenError::NotOwner.into())
        );
        assert_eq!(f.token.try_enable_token(), Err(TokenError::NotOwner.into()));
    }

    // ===== Flags =====

    #[test]
    fn test_flag_writes_are_idempotent() {
        let mut f = setup();
        f.token.set_fee_exempt(f.alice, true);
        f.token.set_fee_exempt(f.alice, true);
        assert!(f.token.is_fee_exempt(f.alice));
        f.token.set_fee_exempt(f.alice, false);
        assert!(!f.token.is_fee_exempt(f.alice));
    }

    #[test]
    fn test_base_pool_flag_is_immutable() {
        let mut f = setup();
        assert_eq!(
            f.token.try_set_liquidity_pool(f.pool, false),
            Err(TokenError::ImmutablePool.into())
        );
        assert!(f.token.is_liquidity_pool(f.pool));
    }

    #[test]
    fn test_additional_pool_gets_trade_fees() {
        let mut f = setup();
        f.token.set_liquidity_pool(f.carol, true);
        f.token.set_limit_exempt(f.carol, true);
        f.launch(100_000_000);
        f.fund(f.carol, 10_000_000);

        f.env.set_caller(f.carol);
        f.token.transfer(f.alice, units(1_000_000));
        assert_eq!(f.token.balance_of(f.alice), units(950_000));

        f.env.set_caller(f.owner);
        f.token.set_liquidity_pool(f.carol, false);
        f.env.set_caller(f.carol);
        f.token.transfer(f.bob, units(1_000_000));
        assert_eq!(f.token.balance_of(f.bob), units(1_000_000));
    }

    // ===== Ownership =====

    #[test]
    fn test_two_step_ownership() {
        let mut f = setup();
        f.token.transfer_ownership(f.alice);
        assert_eq!(f.token.get_owner(), f.owner);
        assert_eq!(f.token.get_pending_owner(), Some(f.alice));

        f.env.set_caller(f.bob);
        assert_eq!(
            f.token.try_accept_ownership(),
            Err(TokenError::NotPendingOwner.into())
        );

        f.env.set_caller(f.alice);
        f.token.accept_ownership();
        assert_eq!(f.token.get_owner(), f.alice);
        assert_eq!(f.token.get_pending_owner(), None);

        f.env.set_caller(f.owner);
        assert_eq!(
            f.token.try_set_swap_threshold(units(1)),
            Err(TokenError::NotOwner.into())
        );
    }

    #[test]
    fn test_cancel_ownership_transfer() {
        let mut f = setup();
        f.token.transfer_ownership(f.alice);
        f.token.cancel_ownership_transfer();
        assert_eq!(f.token.get_pending_owner(), None);

        f.env.set_caller(f.alice);
        assert_eq!(
            f.token.try_accept_ownership(),
            Err(TokenError::NotPendingOwner.into())
        );
    }

    #[test]
    fn test_withdraw_settlement_rejects_zero_recipient() {
        let mut f = setup();
        assert_eq!(
            f.token.try_withdraw_settlement(zero_address()),
            Err(TokenError::ZeroRecipient.into())
        );
        assert!(f.token.withdraw_settlement(f.bob).is_zero());
    }
}
