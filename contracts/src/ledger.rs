//! Token ledger.
//!
//! Balances, allowances and total supply with checked credit/debit.
//! Every write is mirrored into the standard CEP-18 named keys and
//! dictionaries so wallets and indexers can read the token without
//! calling entry points.
//!
//! The ledger has no policy of its own: it is only ever driven by the
//! tax token's transfer controller.

use odra::prelude::*;
use odra::casper_types::{Key, U256};
use odra::casper_types::bytesrepr::ToBytes;
use crate::errors::TokenError;
use crate::events::{Approval, Transfer};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

const CEP18_NAME_KEY: &str = "name";
const CEP18_SYMBOL_KEY: &str = "symbol";
const CEP18_DECIMALS_KEY: &str = "decimals";
const CEP18_TOTAL_SUPPLY_KEY: &str = "total_supply";
const CEP18_BALANCES_DICT: &str = "balances";
const CEP18_ALLOWANCES_DICT: &str = "allowances";

#[odra::module]
pub struct Ledger {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    /// (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl Ledger {
    /// Set metadata and mint the entire fixed supply to `holder`
    pub fn init(&mut self, name: String, symbol: String, decimals: u8, holder: Address, supply: U256) {
        self.env().init_dictionary(CEP18_BALANCES_DICT);
        self.env().init_dictionary(CEP18_ALLOWANCES_DICT);
        self.env().set_named_value(CEP18_NAME_KEY, name.clone());
        self.env().set_named_value(CEP18_SYMBOL_KEY, symbol.clone());
        self.env().set_named_value(CEP18_DECIMALS_KEY, decimals);

        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);

        self.total_supply.set(supply);
        self.set_total_supply_cep18(supply);
        self.write_balance(holder, supply);
        self.env().emit_event(Transfer {
            from: crate::types::zero_address(),
            to: holder,
            amount: supply,
        });
    }

    pub fn name(&self) -> String {
        self.name.get().unwrap_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get().unwrap_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
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

    /// Raw balance move. No policy checks; reverts on insufficient balance or overflow.
    pub fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }
        self.write_balance(from, from_balance - amount);

        let to_balance = self.balance_of(to);
        let new_to_balance = match to_balance.checked_add(amount) {
            Some(balance) => balance,
            None => self.env().revert(TokenError::BalanceOverflow),
        };
        self.write_balance(to, new_to_balance);

        self.env().emit_event(Transfer { from, to, amount });
    }

    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.set_allowance_cep18(owner, spender, amount);
        self.env().emit_event(Approval { owner, spender, amount });
    }

    /// Deduct `amount` from the spender's allowance over `owner`'s tokens
    pub fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        let current = self.allowance(owner, spender);
        if current < amount {
            self.env().revert(TokenError::InsufficientAllowance);
        }
        self.set_allowance(owner, spender, current - amount);
    }

    fn write_balance(&mut self, account: Address, amount: U256) {
        self.balances.set(&account, amount);
        let key = Self::cep18_balance_key(account);
        self.env().set_dictionary_value(CEP18_BALANCES_DICT, key.as_bytes(), amount);
    }

    fn set_allowance_cep18(&self, owner: Address, spender: Address, amount: U256) {
        let key = Self::cep18_allowance_key(owner, spender);
        self.env().set_dictionary_value(CEP18_ALLOWANCES_DICT, key.as_bytes(), amount);
    }

    fn set_total_supply_cep18(&self, amount: U256) {
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, amount);
    }

    fn cep18_balance_key(owner: Address) -> String {
        let key = Key::from(owner);
        let bytes = key.to_bytes().unwrap_or_default();
        BASE64_STANDARD.encode(bytes)
    }

    fn cep18_allowance_key(owner: Address, spender: Address) -> String {
        let owner_key = Key::from(owner);
        let spender_key = Key::from(spender);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&owner_key.to_bytes().unwrap_or_default());
        bytes.extend_from_slice(&spender_key.to_bytes().unwrap_or_default());
        BASE64_STANDARD.encode(bytes)
    }
}
