//! Native-only stand-ins for the external AMM and settlement token.
//!
//! Used by the integration tests to drive fee conversion end to end:
//! - `MockSettlementToken`: minimal CEP-18 with open minting
//! - `MockPairFactory`: hands out a preconfigured pool address
//! - `MockRouter`: fixed-price swaps and liquidity provisioning that pull
//!   tokens with `transfer_from`, re-entering the calling token

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::exchange::Cep18TokenContractRef;
use crate::types::DENOMINATOR;

#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MockError {
    SwapRejected = 900,
    SlippageExceeded = 901,
    Expired = 902,
    InsufficientBalance = 903,
    InsufficientAllowance = 904,
    TransferFailed = 905,
}

impl From<MockError> for OdraError {
    fn from(error: MockError) -> Self {
        OdraError::user(error as u16, "mock exchange error")
    }
}

/// Minimal CEP-18 settlement token
#[odra::module]
pub struct MockSettlementToken {
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    total_supply: Var<U256>,
}

#[odra::module]
impl MockSettlementToken {
    pub fn mint(&mut self, to: Address, amount: U256) {
        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        self.total_supply.set(self.total_supply() + amount);
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.move_balance(sender, recipient, amount);
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            self.env().revert(MockError::InsufficientAllowance);
        }
        self.allowances.set(&(owner, spender), allowance - amount);
        self.move_balance(owner, recipient, amount);
        true
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(MockError::InsufficientBalance);
        }
        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }
}

/// Pair factory returning a fixed pool address
#[odra::module]
pub struct MockPairFactory {
    pair: Var<Address>,
    pairs_created: Var<u32>,
}

#[odra::module]
impl MockPairFactory {
    pub fn init(&mut self, pair: Address) {
        self.pair.set(pair);
        self.pairs_created.set(0);
    }

    pub fn create_pair(&mut self, token_a: Address, token_b: Address) -> Address {
        let _ = (token_a, token_b);
        self.pairs_created.set(self.pairs_created() + 1);
        self.pair.get_or_revert_with(MockError::SwapRejected)
    }

    pub fn pairs_created(&self) -> u32 {
        self.pairs_created.get().unwrap_or(0)
    }
}

/// Fixed-price router.
///
/// Swaps pay `amount_in * price / DENOMINATOR` settlement out of the
/// router's own settlement balance; both legs of liquidity go to `pair`.
#[odra::module]
pub struct MockRouter {
    pair: Var<Address>,
    /// Settlement paid per token, as a fraction of DENOMINATOR
    price: Var<U256>,
    failing: Var<bool>,
    swap_count: Var<u32>,
    lp_balances: Mapping<Address, U256>,
}

#[odra::module]
impl MockRouter {
    pub fn init(&mut self, pair: Address, price: U256) {
        self.pair.set(pair);
        self.price.set(price);
        self.failing.set(false);
        self.swap_count.set(0);
    }

    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Vec<U256> {
        self.require_live(deadline);
        if path.len() != 2 {
            self.env().revert(MockError::SwapRejected);
        }

        let caller = self.env().caller();
        let pair = self.pair();
        self.pull(path[0], caller, pair, amount_in);

        let amount_out = amount_in * self.price() / U256::from(DENOMINATOR);
        if amount_out < amount_out_min {
            self.env().revert(MockError::SlippageExceeded);
        }
        let paid = Cep18TokenContractRef::new(self.env(), path[1]).transfer(to, amount_out);
        if !paid {
            self.env().revert(MockError::TransferFailed);
        }

        self.swap_count.set(self.swap_count() + 1);
        vec![amount_in, amount_out]
    }

    pub fn add_liquidity(
        &mut self,
        token_a: Address,
        token_b: Address,
        amount_a_desired: U256,
        amount_b_desired: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
        deadline: u64,
    ) -> (U256, U256, U256) {
        self.require_live(deadline);
        if amount_a_desired < amount_a_min || amount_b_desired < amount_b_min {
            self.env().revert(MockError::SlippageExceeded);
        }

        let caller = self.env().caller();
        let pair = self.pair();
        self.pull(token_a, caller, pair, amount_a_desired);
        self.pull(token_b, caller, pair, amount_b_desired);

        let lp_minted = (amount_a_desired * amount_b_desired).integer_sqrt();
        let lp_balance = self.lp_balance_of(to);
        self.lp_balances.set(&to, lp_balance + lp_minted);

        (amount_a_desired, amount_b_desired, lp_minted)
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn set_price(&mut self, price: U256) {
        self.price.set(price);
    }

    pub fn pair(&self) -> Address {
        self.pair.get_or_revert_with(MockError::SwapRejected)
    }

    pub fn price(&self) -> U256 {
        self.price.get().unwrap_or(U256::zero())
    }

    pub fn swap_count(&self) -> u32 {
        self.swap_count.get().unwrap_or(0)
    }

    pub fn lp_balance_of(&self, owner: Address) -> U256 {
        self.lp_balances.get(&owner).unwrap_or(U256::zero())
    }

    fn require_live(&self, deadline: u64) {
        if self.failing.get().unwrap_or(false) {
            self.env().revert(MockError::SwapRejected);
        }
        if deadline < self.env().get_block_time() {
            self.env().revert(MockError::Expired);
        }
    }

    fn pull(&self, token: Address, from: Address, to: Address, amount: U256) {
        let pulled = Cep18TokenContractRef::new(self.env(), token).transfer_from(from, to, amount);
        if !pulled {
            self.env().revert(MockError::TransferFailed);
        }
    }
}
