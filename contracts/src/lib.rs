//! CSPR Fee-on-Transfer Token Contracts
//!
//! CEP-18 token that taxes pool trades and converts the collected fees into
//! revenue and pool liquidity through an external AMM.
//!
//! ## Architecture
//!
//! - **TaxToken**: Public entry points and the transfer controller
//! - **Ledger**: Balances, allowances and supply (CEP-18 storage layout)
//! - **PolicyStore**: Fee rates, split, size limits, account flags, recipients
//! - **Ownership**: Two-step owner handover
//! - **ExchangeAdapter**: Router / pair factory / settlement token calls
//!
//! ## Launch
//!
//! Until `enable_token` is called only the owner may move tokens, except
//! that anyone may sell into a registered liquidity pool.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod math;

// Contract modules
pub mod ledger;
pub mod ownership;
pub mod policy;
pub mod exchange;
pub mod tax_token;

// Test doubles for the external AMM
#[cfg(not(target_arch = "wasm32"))]
pub mod mocks;
