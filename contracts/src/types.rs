//! Common types used across the token contracts.

use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;

/// Fixed-point denominator for rates and shares (100% = 1e18)
pub const DENOMINATOR: u64 = 1_000_000_000_000_000_000;

/// Per-account boolean flags held by the policy store
#[odra::odra_type]
#[derive(Copy)]
pub enum AccountFlag {
    /// Pays no transfer fee
    FeeExempt,
    /// Not subject to transaction/wallet size limits
    LimitExempt,
    /// Blocked from sending and receiving (except to the owner)
    Blacklisted,
    /// Registered AMM liquidity pool
    LiquidityPool,
}

/// Distinguished recipients of converted fees
#[odra::odra_type]
#[derive(Copy)]
pub enum RecipientKind {
    /// Receives the revenue share of settlement proceeds
    Revenue,
    /// Receives LP tokens minted by liquidity provisioning
    Liquidity,
}

/// All flags of a single account
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct AccountFlags {
    pub fee_exempt: bool,
    pub limit_exempt: bool,
    pub blacklisted: bool,
    pub liquidity_pool: bool,
}

/// Snapshot of the scalar policy fields
#[odra::odra_type]
pub struct PolicySnapshot {
    /// Fee rate applied when buying from a pool or on plain transfers
    pub buy_fee_rate: U256,
    /// Fee rate applied when selling into a pool
    pub sell_fee_rate: U256,
    /// Fraction of settlement proceeds sent to the revenue recipient
    pub revenue_share: U256,
    /// Fraction of collected fees routed to liquidity (complement of revenue_share)
    pub liquidity_share: U256,
    pub max_transaction_size: U256,
    pub max_wallet_size: U256,
    /// Contract balance at which a sell triggers conversion
    pub swap_threshold: U256,
    pub trade_fee_enabled: bool,
    pub transfer_fee_enabled: bool,
    pub token_enabled: bool,
    pub revenue_recipient: Address,
    pub liquidity_recipient: Address,
    /// Pool created at construction (never removable)
    pub base_pool: Address,
}

/// Outcome of one liquidity conversion
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct ConversionResult {
    /// Tokens sold for the settlement asset
    pub tokens_swapped: U256,
    /// Settlement received from the swap (balance delta)
    pub settlement_received: U256,
    /// Tokens paired into liquidity
    pub tokens_to_liquidity: U256,
    /// Settlement paired into liquidity
    pub settlement_to_liquidity: U256,
    /// Settlement sent to the revenue recipient
    pub revenue: U256,
}

/// The all-zero account, treated as the null address.
pub fn zero_address() -> Address {
    Address::Account(AccountHash::default())
}

/// Whether `address` is the null account
pub fn is_zero_address(address: &Address) -> bool {
    *address == zero_address()
}
