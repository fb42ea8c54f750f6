//! Vesting distribution engine.
//!
//! For every beneficiary in every plan: instantiate a vesting contract
//! through the factory, then transfer the full vested amount into it.

use alloy_core::primitives::{Address, U256};
use anyhow::Context;

use crate::{
    config::Distributions,
    contracts::{Token, VestingFactory},
    events,
    rpc::EthClient,
};

/// Base unit scale of the launch token (18 decimals).
pub const DECIMALS: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Convert a whole-token amount into base units.
pub fn to_base_units(amount: u64) -> U256 {
    U256::from(amount) * DECIMALS
}

/// Amount released at `t0`, in base units: `floor(token_amount * percent / 100)`.
pub fn initial_release(token_amount: U256, day1_percent: u8) -> U256 {
    token_amount * U256::from(day1_percent) / U256::from(100u64)
}

/// Run the whole distribution across all plans.
///
/// Plans are processed in name order, beneficiaries in the order their plan
/// lists them. Any failure aborts the run; the caller decides whether the
/// factory address gets recorded.
pub async fn run(
    client: &EthClient,
    from: Address,
    token: &Token,
    factory: &VestingFactory,
    plans: &Distributions,
) -> Result<(), anyhow::Error> {
    for (plan_name, plan) in plans {
        tracing::info!(
            plan = %plan_name,
            beneficiaries = plan.beneficiaries.len(),
            "Distributing vesting plan"
        );

        for beneficiary in &plan.beneficiaries {
            let token_amount = to_base_units(beneficiary.amount);
            let initial_amount = initial_release(token_amount, plan.day1_percent);

            let receipt = factory
                .create(
                    client,
                    from,
                    beneficiary.address,
                    plan.t0,
                    plan.t1,
                    initial_amount,
                    plan.duration,
                )
                .await
                .with_context(|| {
                    format!("Vesting setup for '{}' in plan '{}'", beneficiary.name, plan_name)
                })?;

            let vesting_address = events::instantiation_address(&receipt).with_context(|| {
                format!(
                    "Could not locate vesting contract for '{}' in plan '{}'",
                    beneficiary.name, plan_name
                )
            })?;

            token
                .transfer(client, from, vesting_address, token_amount)
                .await
                .with_context(|| {
                    format!("Funding vesting contract for '{}'", beneficiary.name)
                })?;

            tracing::info!(
                beneficiary = %beneficiary.name,
                vesting = %vesting_address,
                amount = beneficiary.amount,
                "Vesting contract funded"
            );
        }
    }

    Ok(())
}
