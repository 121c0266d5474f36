//! Tax Token Contract
//!
//! CEP-18 token with a fee-on-transfer policy. Every balance change goes
//! through [`TaxToken::process_transfer`], which applies, in order:
//!
//! 1. Blacklist gate (the owner can always receive)
//! 2. Enable gate (before launch only owner transfers and sells into a pool)
//! 3. Swap-guard bypass for nested transfers issued by the fee conversion
//! 4. Transaction / wallet size limits
//! 5. Fee decision and computation (sell rate into a pool, buy rate otherwise)
//! 6. Fee collection onto the contract's own balance
//! 7. Fee conversion on sells once the collected balance reaches the threshold
//! 8. Delivery of the net amount
//!
//! ## Fee conversion
//!
//! Collected tokens are split by the liquidity share: half of that fraction
//! is kept as tokens, the rest is sold through the router for the settlement
//! token. The revenue share of the proceeds goes to the revenue recipient,
//! the remainder is paired with the kept tokens as pool liquidity whose LP
//! tokens go to the liquidity recipient.
//!
//! The router pulls tokens back through `transfer_from` while the
//! conversion runs. The swap guard turns those nested transfers into plain
//! ledger moves so they neither pay fees, hit limits nor convert again.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::events::{
    AccountFlagUpdated, Approval, FeeRatesUpdated, FeeSplitUpdated, FeeSwitchesUpdated,
    FeesConverted, OwnershipTransferStarted, OwnershipTransferred, RecipientUpdated,
    SizeLimitsUpdated, SwapThresholdUpdated, TokenEnabled, Transfer,
};
use crate::exchange::{create_pool, ExchangeAdapter};
use crate::ledger::Ledger;
use crate::math::{conversion_split, proceeds_split, split_fee};
use crate::ownership::Ownership;
use crate::policy::PolicyStore;
use crate::types::{
    is_zero_address, AccountFlag, AccountFlags, ConversionResult, PolicySnapshot, RecipientKind,
};

/// Tax Token Contract
#[odra::module(
    events = [
        Transfer,
        Approval,
        OwnershipTransferStarted,
        OwnershipTransferred,
        FeeRatesUpdated,
        FeeSplitUpdated,
        SizeLimitsUpdated,
        SwapThresholdUpdated,
        FeeSwitchesUpdated,
        TokenEnabled,
        AccountFlagUpdated,
        RecipientUpdated,
        FeesConverted
    ]
)]
pub struct TaxToken {
    /// Balances, allowances, supply
    ledger: SubModule<Ledger>,
    /// Fees, limits, flags, recipients
    policy: SubModule<PolicyStore>,
    /// Owner and pending owner
    ownership: SubModule<Ownership>,
    /// AMM router used for fee conversion
    router: Var<Address>,
    /// CEP-18 settlement token (wrapped CSPR)
    settlement: Var<Address>,
    /// Set while collected fees are being converted
    in_swap: Var<bool>,
}

#[odra::module]
impl TaxToken {
    /// Create the base pool, write policy defaults and mint the whole supply
    /// to the deployer, who becomes the owner.
    pub fn init(
        &mut self,
        name: String,
        symbol: String,
        decimals: u8,
        initial_supply: U256,
        router: Address,
        factory: Address,
        settlement: Address,
        revenue_recipient: Address,
        liquidity_recipient: Address,
    ) {
        let owner = self.env().caller();
        let this = self.env().self_address();
        let base_pool = create_pool(self.env(), factory, settlement, this);

        self.router.set(router);
        self.settlement.set(settlement);
        self.in_swap.set(false);

        self.ownership.init(owner);
        self.policy.init(initial_supply, base_pool, revenue_recipient, liquidity_recipient);
        for account in [owner, this] {
            self.policy.set_flag(account, AccountFlag::FeeExempt, true);
            self.policy.set_flag(account, AccountFlag::LimitExempt, true);
        }
        self.policy.set_flag(base_pool, AccountFlag::LimitExempt, true);

        self.ledger.init(name, symbol, decimals, owner, initial_supply);
    }

    // ========== CEP-18 Standard Functions ==========

    /// Get token name
    pub fn name(&self) -> String {
        self.ledger.name()
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        self.ledger.symbol()
    }

    /// Get token decimals
    pub fn decimals(&self) -> u8 {
        self.ledger.decimals()
    }

    /// Get total supply
    pub fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    /// Get balance of account
    pub fn balance_of(&self, account: Address) -> U256 {
        self.ledger.balance_of(account)
    }

    /// Get allowance granted by owner to spender
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    /// Transfer tokens to recipient, applying the transfer policy
    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.process_transfer(sender, recipient, amount);
        true
    }

    /// Transfer tokens on behalf of owner (requires allowance)
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        self.ledger.spend_allowance(owner, spender, amount);
        self.process_transfer(owner, recipient, amount);
        true
    }

    /// Approve spender to transfer tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.ledger.set_allowance(owner, spender, amount);
        true
    }

    /// Raise spender allowance by amount
    pub fn increase_allowance(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        let current = self.ledger.allowance(owner, spender);
        let updated = match current.checked_add(amount) {
            Some(value) => value,
            None => self.env().revert(TokenError::BalanceOverflow),
        };
        self.ledger.set_allowance(owner, spender, updated);
        true
    }

    /// Lower spender allowance by amount
    pub fn decrease_allowance(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        let current = self.ledger.allowance(owner, spender);
        if current < amount {
            self.env().revert(TokenError::InsufficientAllowance);
        }
        self.ledger.set_allowance(owner, spender, current - amount);
        true
    }

    // ========== Ownership ==========

    /// Get current owner
    pub fn get_owner(&self) -> Address {
        self.ownership.get_owner()
    }

    /// Get nominated owner, if any
    pub fn get_pending_owner(&self) -> Option<Address> {
        self.ownership.get_pending_owner()
    }

    /// Nominate a new owner (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.ownership.transfer_ownership(new_owner);
    }

    /// Accept a pending nomination (pending owner only)
    pub fn accept_ownership(&mut self) {
        self.ownership.accept_ownership();
    }

    /// Drop the pending nomination (owner only)
    pub fn cancel_ownership_transfer(&mut self) {
        self.ownership.cancel_ownership_transfer();
    }

    // ========== Policy Queries ==========

    /// Fee rate on buys and plain transfers
    pub fn buy_fee_rate(&self) -> U256 {
        self.policy.buy_fee_rate()
    }

    /// Fee rate on sells into a pool
    pub fn sell_fee_rate(&self) -> U256 {
        self.policy.sell_fee_rate()
    }

    /// Share of conversion proceeds sent to the revenue recipient
    pub fn revenue_share(&self) -> U256 {
        self.policy.revenue_share()
    }

    /// Share of collected fees routed to liquidity
    pub fn liquidity_share(&self) -> U256 {
        self.policy.liquidity_share()
    }

    /// Largest single transfer for non-exempt accounts
    pub fn max_transaction_size(&self) -> U256 {
        self.policy.max_transaction_size()
    }

    /// Largest balance a non-exempt recipient may reach
    pub fn max_wallet_size(&self) -> U256 {
        self.policy.max_wallet_size()
    }

    /// Collected balance that triggers conversion on a sell
    pub fn swap_threshold(&self) -> U256 {
        self.policy.swap_threshold()
    }

    /// Whether pool trades pay fees
    pub fn trade_fee_enabled(&self) -> bool {
        self.policy.trade_fee_enabled()
    }

    /// Whether wallet-to-wallet transfers pay fees
    pub fn transfer_fee_enabled(&self) -> bool {
        self.policy.transfer_fee_enabled()
    }

    /// Whether public trading is open
    pub fn token_enabled(&self) -> bool {
        self.policy.token_enabled()
    }

    /// Check fee exemption
    pub fn is_fee_exempt(&self, account: Address) -> bool {
        self.policy.is_fee_exempt(account)
    }

    /// Check size-limit exemption
    pub fn is_limit_exempt(&self, account: Address) -> bool {
        self.policy.is_limit_exempt(account)
    }

    /// Check blacklist
    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.policy.is_blacklisted(account)
    }

    /// Check pool registration
    pub fn is_liquidity_pool(&self, account: Address) -> bool {
        self.policy.is_liquidity_pool(account)
    }

    /// Get revenue recipient
    pub fn revenue_recipient(&self) -> Address {
        self.policy.revenue_recipient()
    }

    /// Get LP token recipient
    pub fn liquidity_recipient(&self) -> Address {
        self.policy.liquidity_recipient()
    }

    /// Get the pool created at deployment
    pub fn base_pool(&self) -> Address {
        self.policy.base_pool()
    }

    /// Get all scalar policy fields
    pub fn policy_snapshot(&self) -> PolicySnapshot {
        self.policy.snapshot()
    }

    /// Get all flags of account
    pub fn account_flags(&self, account: Address) -> AccountFlags {
        self.policy.account_flags(account)
    }

    /// Get AMM router
    pub fn router(&self) -> Option<Address> {
        self.router.get()
    }

    /// Get settlement token
    pub fn settlement_token(&self) -> Option<Address> {
        self.settlement.get()
    }

    /// Whether a fee conversion is in progress
    pub fn is_swapping(&self) -> bool {
        self.in_swap.get().unwrap_or(false)
    }

    // ========== Admin Functions ==========

    /// Set buy and sell fee rates (owner only)
    pub fn set_fee_rates(&mut self, buy_fee_rate: U256, sell_fee_rate: U256) {
        self.ownership.require_owner();
        self.policy.set_fee_rates(buy_fee_rate, sell_fee_rate);
    }

    /// Set the revenue share of conversion proceeds (liquidity gets the rest)
    pub fn set_fee_split(&mut self, revenue_share: U256) {
        self.ownership.require_owner();
        self.policy.set_fee_split(revenue_share);
    }

    /// Set max transaction size (owner only)
    pub fn set_max_transaction_size(&mut self, size: U256) {
        self.ownership.require_owner();
        self.policy.set_max_transaction_size(size);
    }

    /// Set max wallet size (owner only)
    pub fn set_max_wallet_size(&mut self, size: U256) {
        self.ownership.require_owner();
        self.policy.set_max_wallet_size(size);
    }

    /// Set conversion threshold (owner only)
    pub fn set_swap_threshold(&mut self, threshold: U256) {
        self.ownership.require_owner();
        self.policy.set_swap_threshold(threshold);
    }

    /// Toggle fees on pool trades (owner only)
    pub fn set_trade_fee_enabled(&mut self, enabled: bool) {
        self.ownership.require_owner();
        self.policy.set_trade_fee_enabled(enabled);
    }

    /// Toggle fees on plain transfers (owner only)
    pub fn set_transfer_fee_enabled(&mut self, enabled: bool) {
        self.ownership.require_owner();
        self.policy.set_transfer_fee_enabled(enabled);
    }

    /// Open public trading. Cannot be undone.
    pub fn enable_token(&mut self) {
        self.ownership.require_owner();
        self.policy.enable_token();
    }

    /// Set fee exemption (owner only)
    pub fn set_fee_exempt(&mut self, account: Address, exempt: bool) {
        self.ownership.require_owner();
        self.policy.set_flag(account, AccountFlag::FeeExempt, exempt);
    }

    /// Set size-limit exemption (owner only)
    pub fn set_limit_exempt(&mut self, account: Address, exempt: bool) {
        self.ownership.require_owner();
        self.policy.set_flag(account, AccountFlag::LimitExempt, exempt);
    }

    /// Set blacklist flag (owner only)
    pub fn set_blacklisted(&mut self, account: Address, blacklisted: bool) {
        self.ownership.require_owner();
        self.policy.set_flag(account, AccountFlag::Blacklisted, blacklisted);
    }

    /// Register or unregister a pool (owner only)
    pub fn set_liquidity_pool(&mut self, pool: Address, is_pool: bool) {
        self.ownership.require_owner();
        self.policy.set_flag(pool, AccountFlag::LiquidityPool, is_pool);
    }

    /// Set revenue recipient (owner only)
    pub fn set_revenue_recipient(&mut self, recipient: Address) {
        self.ownership.require_owner();
        self.policy.set_recipient(RecipientKind::Revenue, recipient);
    }

    /// Set LP token recipient (owner only)
    pub fn set_liquidity_recipient(&mut self, recipient: Address) {
        self.ownership.require_owner();
        self.policy.set_recipient(RecipientKind::Liquidity, recipient);
    }

    /// Convert the whole collected balance now, regardless of the threshold
    pub fn convert_fees(&mut self) -> ConversionResult {
        self.ownership.require_owner();
        let held = self.ledger.balance_of(self.env().self_address());
        if held.is_zero() {
            self.env().revert(TokenError::NothingToConvert);
        }
        self.with_swap_guard(|token| token.convert_collected_fees())
    }

    /// Sweep settlement tokens held by the contract, e.g. liquidity leftovers.
    /// Returns the amount sent.
    pub fn withdraw_settlement(&mut self, recipient: Address) -> U256 {
        self.ownership.require_owner();
        if is_zero_address(&recipient) {
            self.env().revert(TokenError::ZeroRecipient);
        }
        let exchange = self.exchange();
        let amount = exchange.settlement_balance();
        if !amount.is_zero() {
            exchange.transfer_settlement(recipient, amount);
        }
        amount
    }

    // ========== Transfer Controller ==========

    fn process_transfer(&mut self, from: Address, to: Address, amount: U256) {
        let owner = self.ownership.get_owner();

        if to != owner && (self.policy.is_blacklisted(from) || self.policy.is_blacklisted(to)) {
            self.env().revert(TokenError::Blacklisted);
        }

        if !self.policy.token_enabled()
            && from != owner
            && to != owner
            && !self.policy.is_liquidity_pool(to)
        {
            self.env().revert(TokenError::TokenDisabled);
        }

        // Nested transfer issued by the router during conversion
        if self.is_swapping() {
            self.ledger.move_balance(from, to, amount);
            return;
        }

        self.check_size_limits(from, to, amount);

        let rate = match self.applicable_fee_rate(from, to) {
            Some(rate) => rate,
            None => {
                self.ledger.move_balance(from, to, amount);
                return;
            }
        };

        let (fee, net) = split_fee(amount, rate);
        let this = self.env().self_address();
        if !fee.is_zero() {
            self.ledger.move_balance(from, this, fee);
        }

        if self.conversion_due(from, to) {
            self.with_swap_guard(|token| token.convert_collected_fees());
        }

        self.ledger.move_balance(from, to, net);
    }

    fn check_size_limits(&self, from: Address, to: Address, amount: U256) {
        if self.policy.is_limit_exempt(from) || self.policy.is_limit_exempt(to) {
            return;
        }

        if amount > self.policy.max_transaction_size() {
            self.env().revert(TokenError::ExceedsSizeLimit);
        }

        let max_wallet = self.policy.max_wallet_size();
        match self.ledger.balance_of(to).checked_add(amount) {
            Some(resulting) if resulting <= max_wallet => {}
            _ => self.env().revert(TokenError::ExceedsSizeLimit),
        }
    }

    /// Fee rate for this transfer, or `None` when no fee applies
    fn applicable_fee_rate(&self, from: Address, to: Address) -> Option<U256> {
        if self.policy.is_fee_exempt(from) || self.policy.is_fee_exempt(to) {
            return None;
        }

        let from_pool = self.policy.is_liquidity_pool(from);
        let to_pool = self.policy.is_liquidity_pool(to);
        let trade_fee = self.policy.trade_fee_enabled() && (from_pool || to_pool);
        if !trade_fee && !self.policy.transfer_fee_enabled() {
            return None;
        }

        if to_pool {
            Some(self.policy.sell_fee_rate())
        } else {
            Some(self.policy.buy_fee_rate())
        }
    }

    /// Sells into a pool convert once the collected balance reaches the threshold
    fn conversion_due(&self, from: Address, to: Address) -> bool {
        if self.policy.is_liquidity_pool(from) || !self.policy.is_liquidity_pool(to) {
            return false;
        }
        let held = self.ledger.balance_of(self.env().self_address());
        held >= self.policy.swap_threshold()
    }

    fn convert_collected_fees(&mut self) -> ConversionResult {
        let this = self.env().self_address();
        let held = self.ledger.balance_of(this);
        let (tokens_to_swap, tokens_for_liquidity) =
            conversion_split(held, self.policy.liquidity_share());

        let mut result = ConversionResult::default();
        if tokens_to_swap.is_zero() {
            return result;
        }

        let exchange = self.exchange();
        self.ledger.set_allowance(this, exchange.router(), tokens_to_swap);
        let proceeds = exchange.swap_tokens_for_settlement(tokens_to_swap, U256::zero());
        result.tokens_swapped = tokens_to_swap;
        result.settlement_received = proceeds;

        let (revenue, settlement_for_liquidity) =
            proceeds_split(proceeds, self.policy.revenue_share());

        if !tokens_for_liquidity.is_zero() && !settlement_for_liquidity.is_zero() {
            self.ledger.set_allowance(this, exchange.router(), tokens_for_liquidity);
            let (tokens_used, settlement_used, _lp_minted) = exchange.add_liquidity(
                tokens_for_liquidity,
                settlement_for_liquidity,
                self.policy.liquidity_recipient(),
            );
            result.tokens_to_liquidity = tokens_used;
            result.settlement_to_liquidity = settlement_used;
        }

        if !revenue.is_zero() {
            exchange.transfer_settlement(self.policy.revenue_recipient(), revenue);
            result.revenue = revenue;
        }

        self.env().emit_event(FeesConverted {
            tokens_swapped: result.tokens_swapped,
            settlement_received: result.settlement_received,
            tokens_to_liquidity: result.tokens_to_liquidity,
            settlement_to_liquidity: result.settlement_to_liquidity,
            revenue: result.revenue,
        });
        result
    }
}

impl TaxToken {
    fn exchange(&self) -> ExchangeAdapter {
        let router = self.router.get_or_revert_with(TokenError::ExchangeNotConfigured);
        let settlement = self.settlement.get_or_revert_with(TokenError::ExchangeNotConfigured);
        ExchangeAdapter::new(self.env(), router, settlement)
    }

    /// Run `f` with the swap guard raised; nested transfers become raw moves.
    ///
    /// A revert anywhere inside `f` rolls back the whole call, guard included.
    fn with_swap_guard<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.in_swap.set(true);
        let result = f(self);
        self.in_swap.set(false);
        result
    }
}
