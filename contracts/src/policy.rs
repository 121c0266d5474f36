//! Transfer policy store.
//!
//! Holds fee rates, the revenue/liquidity split, size limits, the swap
//! threshold, fee switches, per-account flags and the fee recipients.
//! Every setter validates before it writes; access control is enforced by
//! the owning contract.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::events::{
    AccountFlagUpdated, FeeRatesUpdated, FeeSplitUpdated, FeeSwitchesUpdated, RecipientUpdated,
    SizeLimitsUpdated, SwapThresholdUpdated, TokenEnabled,
};
use crate::math::{apply_fraction, complement};
use crate::types::{
    is_zero_address, AccountFlag, AccountFlags, PolicySnapshot, RecipientKind, DENOMINATOR,
};

/// Default buy/transfer fee (5%)
const DEFAULT_BUY_FEE: u64 = 50_000_000_000_000_000;
/// Default sell fee (5%)
const DEFAULT_SELL_FEE: u64 = 50_000_000_000_000_000;
/// Default revenue share of settlement proceeds (50%)
const DEFAULT_REVENUE_SHARE: u64 = 500_000_000_000_000_000;
/// Default max transaction size (1% of supply)
const DEFAULT_MAX_TX_FRACTION: u64 = 10_000_000_000_000_000;
/// Default max wallet size (2% of supply)
const DEFAULT_MAX_WALLET_FRACTION: u64 = 20_000_000_000_000_000;
/// Default swap threshold (0.05% of supply)
const DEFAULT_SWAP_THRESHOLD_FRACTION: u64 = 500_000_000_000_000;
/// Lowest accepted size limit (0.1% of supply)
const LIMIT_FLOOR_FRACTION: u64 = 1_000_000_000_000_000;

#[odra::module]
pub struct PolicyStore {
    buy_fee_rate: Var<U256>,
    sell_fee_rate: Var<U256>,
    /// Liquidity share is derived as DENOMINATOR - revenue_share
    revenue_share: Var<U256>,
    max_transaction_size: Var<U256>,
    max_wallet_size: Var<U256>,
    swap_threshold: Var<U256>,
    limit_floor: Var<U256>,
    trade_fee_enabled: Var<bool>,
    transfer_fee_enabled: Var<bool>,
    token_enabled: Var<bool>,
    fee_exempt: Mapping<Address, bool>,
    limit_exempt: Mapping<Address, bool>,
    blacklisted: Mapping<Address, bool>,
    liquidity_pools: Mapping<Address, bool>,
    revenue_recipient: Var<Address>,
    liquidity_recipient: Var<Address>,
    base_pool: Var<Address>,
}

#[odra::module]
impl PolicyStore {
    /// Write defaults scaled to `total_supply` and register the base pool
    pub fn init(
        &mut self,
        total_supply: U256,
        base_pool: Address,
        revenue_recipient: Address,
        liquidity_recipient: Address,
    ) {
        if is_zero_address(&revenue_recipient) || is_zero_address(&liquidity_recipient) {
            self.env().revert(TokenError::ZeroRecipient);
        }

        self.buy_fee_rate.set(U256::from(DEFAULT_BUY_FEE));
        self.sell_fee_rate.set(U256::from(DEFAULT_SELL_FEE));
        self.revenue_share.set(U256::from(DEFAULT_REVENUE_SHARE));
        self.max_transaction_size
            .set(apply_fraction(total_supply, U256::from(DEFAULT_MAX_TX_FRACTION)));
        self.max_wallet_size
            .set(apply_fraction(total_supply, U256::from(DEFAULT_MAX_WALLET_FRACTION)));
        self.limit_floor
            .set(apply_fraction(total_supply, U256::from(LIMIT_FLOOR_FRACTION)));

        let threshold = apply_fraction(total_supply, U256::from(DEFAULT_SWAP_THRESHOLD_FRACTION));
        self.swap_threshold.set(if threshold.is_zero() { U256::one() } else { threshold });

        self.trade_fee_enabled.set(true);
        self.transfer_fee_enabled.set(false);
        self.token_enabled.set(false);

        self.revenue_recipient.set(revenue_recipient);
        self.liquidity_recipient.set(liquidity_recipient);
        self.base_pool.set(base_pool);
        self.liquidity_pools.set(&base_pool, true);
    }

    // ========== Queries ==========

    pub fn buy_fee_rate(&self) -> U256 {
        self.buy_fee_rate.get().unwrap_or(U256::zero())
    }

    pub fn sell_fee_rate(&self) -> U256 {
        self.sell_fee_rate.get().unwrap_or(U256::zero())
    }

    pub fn revenue_share(&self) -> U256 {
        self.revenue_share.get().unwrap_or(U256::zero())
    }

    pub fn liquidity_share(&self) -> U256 {
        complement(self.revenue_share())
    }

    pub fn max_transaction_size(&self) -> U256 {
        self.max_transaction_size.get().unwrap_or(U256::MAX)
    }

    pub fn max_wallet_size(&self) -> U256 {
        self.max_wallet_size.get().unwrap_or(U256::MAX)
    }

    pub fn swap_threshold(&self) -> U256 {
        self.swap_threshold.get().unwrap_or(U256::MAX)
    }

    pub fn limit_floor(&self) -> U256 {
        self.limit_floor.get().unwrap_or(U256::zero())
    }

    pub fn trade_fee_enabled(&self) -> bool {
        self.trade_fee_enabled.get().unwrap_or(false)
    }

    pub fn transfer_fee_enabled(&self) -> bool {
        self.transfer_fee_enabled.get().unwrap_or(false)
    }

    pub fn token_enabled(&self) -> bool {
        self.token_enabled.get().unwrap_or(false)
    }

    pub fn is_fee_exempt(&self, account: Address) -> bool {
        self.fee_exempt.get(&account).unwrap_or(false)
    }

    pub fn is_limit_exempt(&self, account: Address) -> bool {
        self.limit_exempt.get(&account).unwrap_or(false)
    }

    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.blacklisted.get(&account).unwrap_or(false)
    }

    pub fn is_liquidity_pool(&self, account: Address) -> bool {
        self.liquidity_pools.get(&account).unwrap_or(false)
    }

    pub fn revenue_recipient(&self) -> Address {
        self.revenue_recipient.get_or_revert_with(TokenError::ZeroRecipient)
    }

    pub fn liquidity_recipient(&self) -> Address {
        self.liquidity_recipient.get_or_revert_with(TokenError::ZeroRecipient)
    }

    pub fn base_pool(&self) -> Address {
        self.base_pool.get_or_revert_with(TokenError::ImmutablePool)
    }

    pub fn account_flags(&self, account: Address) -> AccountFlags {
        AccountFlags {
            fee_exempt: self.is_fee_exempt(account),
            limit_exempt: self.is_limit_exempt(account),
            blacklisted: self.is_blacklisted(account),
            liquidity_pool: self.is_liquidity_pool(account),
        }
    }

    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            buy_fee_rate: self.buy_fee_rate(),
            sell_fee_rate: self.sell_fee_rate(),
            revenue_share: self.revenue_share(),
            liquidity_share: self.liquidity_share(),
            max_transaction_size: self.max_transaction_size(),
            max_wallet_size: self.max_wallet_size(),
            swap_threshold: self.swap_threshold(),
            trade_fee_enabled: self.trade_fee_enabled(),
            transfer_fee_enabled: self.transfer_fee_enabled(),
            token_enabled: self.token_enabled(),
            revenue_recipient: self.revenue_recipient(),
            liquidity_recipient: self.liquidity_recipient(),
            base_pool: self.base_pool(),
        }
    }

    // ========== Validated setters ==========

    pub fn set_fee_rates(&mut self, buy_fee_rate: U256, sell_fee_rate: U256) {
        let denominator = U256::from(DENOMINATOR);
        if buy_fee_rate > denominator || sell_fee_rate > denominator {
            self.env().revert(TokenError::RateOutOfRange);
        }
        self.buy_fee_rate.set(buy_fee_rate);
        self.sell_fee_rate.set(sell_fee_rate);
        self.env().emit_event(FeeRatesUpdated {
            buy_fee_rate,
            sell_fee_rate,
        });
    }

    /// Set the revenue share; the liquidity share becomes its complement
    pub fn set_fee_split(&mut self, revenue_share: U256) {
        if revenue_share > U256::from(DENOMINATOR) {
            self.env().revert(TokenError::ShareOutOfRange);
        }
        self.revenue_share.set(revenue_share);
        self.env().emit_event(FeeSplitUpdated {
            revenue_share,
            liquidity_share: complement(revenue_share),
        });
    }

    pub fn set_max_transaction_size(&mut self, size: U256) {
        self.require_above_floor(size);
        self.max_transaction_size.set(size);
        self.emit_limits();
    }

    pub fn set_max_wallet_size(&mut self, size: U256) {
        self.require_above_floor(size);
        self.max_wallet_size.set(size);
        self.emit_limits();
    }

    pub fn set_swap_threshold(&mut self, threshold: U256) {
        if threshold.is_zero() {
            self.env().revert(TokenError::ZeroThreshold);
        }
        self.swap_threshold.set(threshold);
        self.env().emit_event(SwapThresholdUpdated {
            swap_threshold: threshold,
        });
    }

    pub fn set_trade_fee_enabled(&mut self, enabled: bool) {
        self.trade_fee_enabled.set(enabled);
        self.emit_switches();
    }

    pub fn set_transfer_fee_enabled(&mut self, enabled: bool) {
        self.transfer_fee_enabled.set(enabled);
        self.emit_switches();
    }

    /// One-way switch opening public trading
    pub fn enable_token(&mut self) {
        if self.token_enabled() {
            self.env().revert(TokenError::AlreadyEnabled);
        }
        self.token_enabled.set(true);
        self.env().emit_event(TokenEnabled {
            timestamp: self.env().get_block_time(),
        });
    }

    pub fn set_flag(&mut self, account: Address, flag: AccountFlag, value: bool) {
        match flag {
            AccountFlag::FeeExempt => self.fee_exempt.set(&account, value),
            AccountFlag::LimitExempt => self.limit_exempt.set(&account, value),
            AccountFlag::Blacklisted => {
                if value && self.is_protected(account) {
                    self.env().revert(TokenError::ProtectedAccount);
                }
                self.blacklisted.set(&account, value)
            }
            AccountFlag::LiquidityPool => {
                if account == self.base_pool() {
                    self.env().revert(TokenError::ImmutablePool);
                }
                self.liquidity_pools.set(&account, value)
            }
        }
        self.env().emit_event(AccountFlagUpdated {
            account,
            flag,
            value,
        });
    }

    pub fn set_recipient(&mut self, kind: RecipientKind, recipient: Address) {
        if is_zero_address(&recipient) {
            self.env().revert(TokenError::ZeroRecipient);
        }
        match kind {
            RecipientKind::Revenue => self.revenue_recipient.set(recipient),
            RecipientKind::Liquidity => self.liquidity_recipient.set(recipient),
        }
        self.env().emit_event(RecipientUpdated { kind, recipient });
    }

    // ========== Internal Functions ==========

    /// The contract itself and the base pool can never be blacklisted
    fn is_protected(&self, account: Address) -> bool {
        account == self.env().self_address() || account == self.base_pool()
    }

    fn require_above_floor(&self, size: U256) {
        if size.is_zero() || size < self.limit_floor() {
            self.env().revert(TokenError::LimitTooLow);
        }
    }

    fn emit_limits(&self) {
        self.env().emit_event(SizeLimitsUpdated {
            max_transaction_size: self.max_transaction_size(),
            max_wallet_size: self.max_wallet_size(),
        });
    }

    fn emit_switches(&self) {
        self.env().emit_event(FeeSwitchesUpdated {
            trade_fee_enabled: self.trade_fee_enabled(),
            transfer_fee_enabled: self.transfer_fee_enabled(),
        });
    }
}
