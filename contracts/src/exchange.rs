//! Exchange adapter.
//!
//! Cross-contract interfaces of the external AMM (router + pair factory)
//! and of the CEP-18 settlement token, plus a thin adapter the tax token
//! uses to sell collected fees and provision liquidity.
//!
//! Settlement received from a swap is always measured as the change of
//! the contract's settlement balance across the swap, never as an absolute
//! balance, so unrelated incoming settlement is not counted as proceeds.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractEnv;
use odra::ContractRef;
use crate::errors::TokenError;

/// Uniswap-V2-style router
#[odra::external_contract]
pub trait DexRouter {
    fn swap_exact_tokens_for_tokens(
        &mut self,
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Vec<U256>;
    fn add_liquidity(
        &mut self,
        token_a: Address,
        token_b: Address,
        amount_a_desired: U256,
        amount_b_desired: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
        deadline: u64,
    ) -> (U256, U256, U256);
}

/// Pair factory, called once at construction
#[odra::external_contract]
pub trait PairFactory {
    fn create_pair(&mut self, token_a: Address, token_b: Address) -> Address;
}

/// CEP-18 token interface for cross-contract calls
#[odra::external_contract]
pub trait Cep18Token {
    fn transfer(&mut self, recipient: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
    fn approve(&mut self, spender: Address, amount: U256) -> bool;
    fn balance_of(&self, account: Address) -> U256;
}

/// Create the base pool for `token` against `settlement`
pub fn create_pool(env: Rc<ContractEnv>, factory: Address, settlement: Address, token: Address) -> Address {
    PairFactoryContractRef::new(env, factory).create_pair(settlement, token)
}

/// Router + settlement token bound to the calling contract
pub struct ExchangeAdapter {
    env: Rc<ContractEnv>,
    router: Address,
    settlement: Address,
}

impl ExchangeAdapter {
    pub fn new(env: Rc<ContractEnv>, router: Address, settlement: Address) -> Self {
        Self {
            env,
            router,
            settlement,
        }
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// Settlement tokens held by the calling contract
    pub fn settlement_balance(&self) -> U256 {
        let holder = self.env.self_address();
        Cep18TokenContractRef::new(self.env.clone(), self.settlement).balance_of(holder)
    }

    /// Sell `amount_in` of the calling token for settlement.
    ///
    /// The router must already hold an allowance over `amount_in`.
    /// Returns the settlement received.
    pub fn swap_tokens_for_settlement(&self, amount_in: U256, min_out: U256) -> U256 {
        let token = self.env.self_address();
        let before = self.settlement_balance();

        let path = vec![token, self.settlement];
        DexRouterContractRef::new(self.env.clone(), self.router).swap_exact_tokens_for_tokens(
            amount_in,
            min_out,
            path,
            token,
            self.deadline(),
        );

        self.settlement_balance().saturating_sub(before)
    }

    /// Pair tokens with settlement; LP tokens go to `recipient`.
    ///
    /// Returns `(tokens_used, settlement_used, lp_minted)`.
    pub fn add_liquidity(
        &self,
        token_amount: U256,
        settlement_amount: U256,
        recipient: Address,
    ) -> (U256, U256, U256) {
        self.approve_settlement(self.router, settlement_amount);
        DexRouterContractRef::new(self.env.clone(), self.router).add_liquidity(
            self.env.self_address(),
            self.settlement,
            token_amount,
            settlement_amount,
            U256::zero(),
            U256::zero(),
            recipient,
            self.deadline(),
        )
    }

    pub fn transfer_settlement(&self, recipient: Address, amount: U256) {
        let success =
            Cep18TokenContractRef::new(self.env.clone(), self.settlement).transfer(recipient, amount);
        if !success {
            self.env.revert(TokenError::SettlementTransferFailed);
        }
    }

    fn approve_settlement(&self, spender: Address, amount: U256) {
        let success =
            Cep18TokenContractRef::new(self.env.clone(), self.settlement).approve(spender, amount);
        if !success {
            self.env.revert(TokenError::SettlementApprovalFailed);
        }
    }

    /// Swaps execute in the same block they are issued
    fn deadline(&self) -> u64 {
        self.env.get_block_time()
    }
}
