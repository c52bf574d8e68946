//! Error types for the signature gate

use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid threshold: {threshold} of {owners} owners")]
    InvalidThreshold { threshold: u32, owners: u32 },

    #[error("Invalid owner: {reason}")]
    InvalidOwner { reason: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    // ========================================================================
    // Signature Errors
    // ========================================================================

    #[error("Unknown signer: {signer}")]
    UnknownSigner { signer: String },

    #[error("Invalid signature from {signer}")]
    InvalidSignature { signer: String },

    #[error("Insufficient signatures: got {got}, required {required}")]
    InsufficientSignatures { got: u32, required: u32 },

    // ========================================================================
    // Transaction Errors
    // ========================================================================

    #[error("Unknown pending transaction: {pending_id}")]
    UnknownTransaction { pending_id: String },

    #[error("Stale nonce: proposed at {proposed}, current {current}")]
    StaleNonce { proposed: u64, current: u64 },

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },
}
