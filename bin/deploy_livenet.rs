//! Deploy the tax token to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=400000000000
//!
//! and the token parameters:
//!   TAX_TOKEN_NAME, TAX_TOKEN_SYMBOL, TAX_TOKEN_DECIMALS, TAX_TOKEN_SUPPLY
//!   TAX_TOKEN_ROUTER, TAX_TOKEN_FACTORY, TAX_TOKEN_SETTLEMENT
//!   TAX_TOKEN_REVENUE_RECIPIENT, TAX_TOKEN_LIQUIDITY_RECIPIENT
//!
//! Recipients default to the deployer when unset.

use std::str::FromStr;

use odra::casper_types::U256;
use odra::host::{Deployer, HostRef};
use odra::prelude::*;

use cspr_fot_contracts::tax_token::{TaxToken, TaxTokenInitArgs};

const DEFAULT_PAYMENT_AMOUNT: u64 = 400_000_000_000;

#[derive(Debug, thiserror::Error)]
enum DeployError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("{key} is not a valid address: {value}")]
    InvalidAddress { key: &'static str, value: String },
    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Token parameters read from the environment
#[derive(Debug)]
struct DeployConfig {
    name: String,
    symbol: String,
    decimals: u8,
    initial_supply: U256,
    router: Address,
    factory: Address,
    settlement: Address,
    revenue_recipient: Option<Address>,
    liquidity_recipient: Option<Address>,
}

impl DeployConfig {
    fn from_env() -> Result<Self, DeployError> {
        Ok(Self {
            name: required("TAX_TOKEN_NAME")?,
            symbol: required("TAX_TOKEN_SYMBOL")?,
            decimals: number("TAX_TOKEN_DECIMALS", &required("TAX_TOKEN_DECIMALS")?)?,
            initial_supply: supply("TAX_TOKEN_SUPPLY", required("TAX_TOKEN_SUPPLY")?)?,
            router: address("TAX_TOKEN_ROUTER", &required("TAX_TOKEN_ROUTER")?)?,
            factory: address("TAX_TOKEN_FACTORY", &required("TAX_TOKEN_FACTORY")?)?,
            settlement: address("TAX_TOKEN_SETTLEMENT", &required("TAX_TOKEN_SETTLEMENT")?)?,
            revenue_recipient: optional("TAX_TOKEN_REVENUE_RECIPIENT")
                .map(|value| address("TAX_TOKEN_REVENUE_RECIPIENT", &value))
                .transpose()?,
            liquidity_recipient: optional("TAX_TOKEN_LIQUIDITY_RECIPIENT")
                .map(|value| address("TAX_TOKEN_LIQUIDITY_RECIPIENT", &value))
                .transpose()?,
        })
    }
}

fn optional(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, DeployError> {
    optional(key).ok_or(DeployError::Missing(key))
}

fn number<T: FromStr>(key: &'static str, value: &str) -> Result<T, DeployError> {
    value.trim().parse().map_err(|_| DeployError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

fn supply(key: &'static str, value: String) -> Result<U256, DeployError> {
    U256::from_dec_str(value.trim()).map_err(|_| DeployError::InvalidNumber { key, value })
}

fn address(key: &'static str, value: &str) -> Result<Address, DeployError> {
    Address::from_str(value.trim()).map_err(|_| DeployError::InvalidAddress {
        key,
        value: value.to_string(),
    })
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== Tax Token Livenet Deployment ===");
    println!();

    let config = match DeployConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid deployment configuration: {}", err);
            std::process::exit(1);
        }
    };

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PAYMENT_AMOUNT);
    env.set_gas(payment_amount);

    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!("Router: {:?}", config.router);
    println!("Factory: {:?}", config.factory);
    println!("Settlement token: {:?}", config.settlement);
    println!();

    println!("Deploying TaxToken {} ({})...", config.name, config.symbol);
    let token = TaxToken::deploy(
        &env,
        TaxTokenInitArgs {
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            initial_supply: config.initial_supply,
            router: config.router,
            factory: config.factory,
            settlement: config.settlement,
            revenue_recipient: config.revenue_recipient.unwrap_or(deployer),
            liquidity_recipient: config.liquidity_recipient.unwrap_or(deployer),
        },
    );
    println!("TaxToken deployed at: {:?}", token.address().clone());
    println!();

    let policy = token.policy_snapshot();
    println!("=== Deployment Summary ===");
    println!("Base pool:            {:?}", policy.base_pool);
    println!("Total supply:         {}", token.total_supply());
    println!("Buy / sell fee rate:  {} / {}", policy.buy_fee_rate, policy.sell_fee_rate);
    println!("Revenue share:        {}", policy.revenue_share);
    println!("Max transaction size: {}", policy.max_transaction_size);
    println!("Max wallet size:      {}", policy.max_wallet_size);
    println!("Swap threshold:       {}", policy.swap_threshold);
    println!("Revenue recipient:    {:?}", policy.revenue_recipient);
    println!("Liquidity recipient:  {:?}", policy.liquidity_recipient);
    println!();
    println!("Trading is disabled. Seed the base pool, then call enable_token.");
}
