//! Token error definitions.

use odra::prelude::*;

/// Tax token errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenError {
    // Access errors (1xx)
    NotOwner = 100,
    NotPendingOwner = 101,

    // Transfer policy errors (2xx)
    Blacklisted = 200,
    TokenDisabled = 201,
    ExceedsSizeLimit = 202,

    // Ledger errors (3xx)
    InsufficientBalance = 300,
    InsufficientAllowance = 301,
    BalanceOverflow = 302,

    // Configuration errors (4xx)
    RateOutOfRange = 400,
    ShareOutOfRange = 401,
    ZeroRecipient = 402,
    ZeroThreshold = 403,
    ImmutablePool = 404,
    AlreadyEnabled = 405,
    LimitTooLow = 406,
    ProtectedAccount = 407,

    // Exchange errors (5xx)
    SettlementTransferFailed = 500,
    SettlementApprovalFailed = 501,
    NothingToConvert = 502,
    ExchangeNotConfigured = 503,
}

impl TokenError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Access
            TokenError::NotOwner => "Unauthorized: caller is not the owner",
            TokenError::NotPendingOwner => "Unauthorized: caller is not the pending owner",

            // Policy
            TokenError::Blacklisted => "Transfer blocked: account is blacklisted",
            TokenError::TokenDisabled => "Transfer blocked: trading not enabled",
            TokenError::ExceedsSizeLimit => "Transfer exceeds transaction or wallet size limit",

            // Ledger
            TokenError::InsufficientBalance => "Insufficient balance",
            TokenError::InsufficientAllowance => "Insufficient allowance",
            TokenError::BalanceOverflow => "Balance overflow",

            // Config
            TokenError::RateOutOfRange => "Fee rate exceeds denominator",
            TokenError::ShareOutOfRange => "Fee share exceeds denominator",
            TokenError::ZeroRecipient => "Recipient cannot be the zero account",
            TokenError::ZeroThreshold => "Swap threshold cannot be zero",
            TokenError::ImmutablePool => "Base liquidity pool cannot be modified",
            TokenError::AlreadyEnabled => "Trading already enabled",
            TokenError::LimitTooLow => "Size limit below minimum",
            TokenError::ProtectedAccount => "Account cannot be blacklisted",

            // Exchange
            TokenError::SettlementTransferFailed => "Settlement token transfer failed",
            TokenError::SettlementApprovalFailed => "Settlement token approval failed",
            TokenError::NothingToConvert => "No collected fees to convert",
            TokenError::ExchangeNotConfigured => "Router or settlement token not set",
        }
    }
}

impl core::fmt::Display for TokenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<TokenError> for OdraError {
    fn from(error: TokenError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
