//! Multisig - Threshold Signature Gate
//!
//! Holds a fixed set of ed25519 owner keys and a threshold. A call is
//! forwarded only once at least `threshold` distinct owners have signed its
//! transaction hash, which commits to the gate's domain and current nonce.
//!
//! Two paths lead to execution:
//! - `ProposeTransaction` / `SubmitSignature` / `TryExecute`, collecting
//!   signatures on-chain one at a time
//! - `ExecTransaction`, verifying a bundle of signatures gathered off-chain

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::execute::SignatureOutcome;
