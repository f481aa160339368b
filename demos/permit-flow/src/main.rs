//! End-to-end permit walkthrough against an in-memory Cacao-LP ledger.
//!
//! Deploys a token, has the holder sign an EIP-712 permit for a spender,
//! consumes the permit, and spends the granted allowance via
//! `transferFrom`. Set `CACAO_CHAIN_ID` (directly or through `.env`) to
//! bind the domain separator to a different chain id.

use alloy_primitives::{U256, address};
use alloy_signer_local::PrivateKeySigner;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use cacao_token::{CacaoToken, ChainReference, TokenDeployment, sign_permit};

fn expand_to_18_decimals(value: u64) -> U256 {
    U256::from(value) * U256::from(10u64).pow(U256::from(18u64))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let chain_id = std::env::var("CACAO_CHAIN_ID")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1u64);
    let deployment = TokenDeployment {
        chain_reference: ChainReference::new(chain_id),
        address: address!("0x7EfE4bdd11237610bcFca478937658bE39F8dfd6"),
    };

    let holder = PrivateKeySigner::random();
    let spender = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

    let mut token = CacaoToken::new(deployment, holder.address(), expand_to_18_decimals(10_000));
    tracing::info!(
        name = token.name(),
        symbol = token.symbol(),
        holder = %holder.address(),
        supply = %token.total_supply(),
        domain_separator = %token.domain_separator(),
        "deployed ledger"
    );

    let value = expand_to_18_decimals(10);
    let deadline = U256::MAX;
    let signature = sign_permit(&holder, &token, spender, value, deadline)?;
    token.permit(holder.address(), spender, value, deadline, &signature)?;
    tracing::info!(
        allowance = %token.allowance(holder.address(), spender),
        nonce = %token.nonces(holder.address()),
        "permit consumed"
    );

    token.transfer_from(spender, holder.address(), spender, value)?;
    tracing::info!(
        holder_balance = %token.balance_of(holder.address()),
        spender_balance = %token.balance_of(spender),
        "allowance spent"
    );

    for event in token.drain_events() {
        tracing::info!(?event, "ledger event");
    }

    Ok(())
}
