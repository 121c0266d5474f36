//! Events emitted by the tax token.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::{AccountFlag, RecipientKind};

/// Tokens moved between accounts (fee legs are emitted separately)
#[odra::event]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// Owner nominated a successor
#[odra::event]
pub struct OwnershipTransferStarted {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[odra::event]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[odra::event]
pub struct FeeRatesUpdated {
    pub buy_fee_rate: U256,
    pub sell_fee_rate: U256,
}

#[odra::event]
pub struct FeeSplitUpdated {
    pub revenue_share: U256,
    pub liquidity_share: U256,
}

#[odra::event]
pub struct SizeLimitsUpdated {
    pub max_transaction_size: U256,
    pub max_wallet_size: U256,
}

#[odra::event]
pub struct SwapThresholdUpdated {
    pub swap_threshold: U256,
}

#[odra::event]
pub struct FeeSwitchesUpdated {
    pub trade_fee_enabled: bool,
    pub transfer_fee_enabled: bool,
}

/// Public trading opened
#[odra::event]
pub struct TokenEnabled {
    pub timestamp: u64,
}

#[odra::event]
pub struct AccountFlagUpdated {
    pub account: Address,
    pub flag: AccountFlag,
    pub value: bool,
}

#[odra::event]
pub struct RecipientUpdated {
    pub kind: RecipientKind,
    pub recipient: Address,
}

/// Collected fees were sold and redistributed
#[odra::event]
pub struct FeesConverted {
    pub tokens_swapped: U256,
    pub settlement_received: U256,
    pub tokens_to_liquidity: U256,
    pub settlement_to_liquidity: U256,
    pub revenue: U256,
}
