//! Error types for the Multisender contract

use common::AssetKind;
use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

use crate::state::{OperationState, Role};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only the governance admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: {account} is missing role {role}")]
    MissingRole { role: Role, account: String },

    #[error("Unauthorized: only the contract itself can perform this action")]
    OnlySelf,

    #[error("Governance has already been transferred")]
    GovernanceAlreadyTransferred,

    // ========================================================================
    // Timelock Errors
    // ========================================================================

    #[error("Operation already scheduled: {operation_id}")]
    AlreadyScheduled { operation_id: String },

    #[error("Operation {operation_id} is not ready: {state}")]
    NotReady {
        operation_id: String,
        state: OperationState,
    },

    #[error("Operation {operation_id} cannot be cancelled: {state}")]
    NotCancellable {
        operation_id: String,
        state: OperationState,
    },

    #[error("Predecessor operation not done: {predecessor}")]
    PredecessorNotDone { predecessor: String },

    #[error("Insufficient delay: {delay} < minimum {min_delay}")]
    InsufficientDelay { delay: u64, min_delay: u64 },

    #[error("Delay overflows the block clock")]
    DelayOverflow,

    #[error("Batch must contain at least one call")]
    EmptyBatch,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    // ========================================================================
    // Allocation Errors
    // ========================================================================

    #[error("Allocations already seeded and not yet exhausted")]
    AlreadySeeded,

    #[error("No allocation manifest has been seeded")]
    NotSeeded,

    #[error("Coin budget mismatch: expected {expected}, received {received}")]
    CoinBudgetMismatch {
        expected: Uint128,
        received: Uint128,
    },

    #[error("Duplicate token id in seed list: {token_id}")]
    DuplicateTokenId { token_id: String },

    #[error("Merkle proof invalid for asset {asset}")]
    ProofInvalid { asset: String },

    #[error("Asset mismatch: expected {expected}, got {got}")]
    AssetMismatch { expected: String, got: String },

    #[error("{kind} budget exceeded: requested {requested}, remaining {remaining}")]
    BudgetExceeded {
        kind: AssetKind,
        requested: Uint128,
        remaining: Uint128,
    },

    #[error("Token id not allocated: {token_id}")]
    NotAllocated { token_id: String },

    // ========================================================================
    // Distribution Errors
    // ========================================================================

    #[error("Length mismatch: {receivers} receivers, {values} values")]
    LengthMismatch { receivers: usize, values: usize },

    #[error("Distribution has no receivers")]
    EmptyDistribution,

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },
}
