//! Multisender - Timelocked Bulk Distribution for TerraClassic
//!
//! A timelock controller that holds a Merkle-committed allocation manifest
//! and distributes native coins, CW20 tokens and CW721 NFTs from it.
//!
//! # Flow
//! 1. A threshold signature gate (the `multisig` contract) is the sole
//!    proposer and executor
//! 2. The gate schedules `SeedNewAllocations`, which after the delay pulls
//!    the token budget and NFTs into custody and commits the Merkle root
//! 3. Each drop is scheduled, waits out the delay, and is executed; token
//!    and NFT drops carry a proof that the asset is part of the manifest
//!
//! # Security
//! - Every manifest and distribution entry point is callable only by the
//!   contract itself, i.e. through a timelocked operation
//! - Budgets only decrease, and a drop either moves everything or nothing
//! - Governance (role management) is handed over once, normally to the
//!   contract itself

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::msg::Call;
