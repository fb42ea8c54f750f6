//! Handles for the on-chain launch artifacts.
//!
//! Each artifact is in its own submodule with its artifact name, gas
//! allowances, deploy constructor, and the operations the orchestrator uses.
//! Contract semantics live entirely on chain; these are thin typed wrappers
//! over the RPC call interface.

pub mod crowdsale;
pub mod staking;
pub mod token;
pub mod vesting_factory;

// Re-export commonly used types
pub use crowdsale::Crowdsale;
pub use staking::Staking;
pub use token::Token;
pub use vesting_factory::VestingFactory;
