//! Message types for the signature gate

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// ed25519 public keys (32 bytes each)
    pub owners: Vec<Binary>,
    /// Signatures required to forward a transaction
    pub threshold: u32,
    /// Denom of the `value` attached to forwarded calls
    pub native_denom: String,
}

/// One owner's signature over a transaction hash
#[cw_serde]
pub struct SignatureEntry {
    pub signer: Binary,
    pub signature: Binary,
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    /// Record a call at the current nonce; returns the `pending_id` attribute.
    /// Proposing an identical call again returns the same id.
    ProposeTransaction {
        to: String,
        value: Uint128,
        data: Binary,
    },

    /// Add an owner's signature over `pending_id`.
    /// A repeated signature from the same owner is accepted as a no-op.
    SubmitSignature {
        pending_id: Binary,
        signer: Binary,
        signature: Binary,
    },

    /// Forward a pending transaction once it has enough signatures
    TryExecute { pending_id: Binary },

    /// Verify a bundle of signatures over the call at the current nonce and
    /// forward it, without a pending record
    ExecTransaction {
        to: String,
        value: Uint128,
        data: Binary,
        signatures: Vec<SignatureEntry>,
    },
}

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(NonceResponse)]
    Nonce {},

    #[returns(DomainSeparatorResponse)]
    DomainSeparator {},

    /// Hash owners must sign; `nonce` defaults to the current nonce
    #[returns(TransactionHashResponse)]
    TransactionHash {
        to: String,
        value: Uint128,
        data: Binary,
        nonce: Option<u64>,
    },

    #[returns(Option<PendingTransactionResponse>)]
    PendingTransaction { pending_id: Binary },

    /// Signers collected so far for a pending transaction
    #[returns(SignaturesResponse)]
    Signatures { pending_id: Binary },
}

#[cw_serde]
pub struct ConfigResponse {
    pub owners: Vec<Binary>,
    pub threshold: u32,
    pub native_denom: String,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

#[cw_serde]
pub struct DomainSeparatorResponse {
    pub domain_separator: Binary,
}

#[cw_serde]
pub struct TransactionHashResponse {
    pub hash: Binary,
}

#[cw_serde]
pub struct PendingTransactionResponse {
    pub pending_id: Binary,
    pub to: Addr,
    pub value: Uint128,
    pub data: Binary,
    pub nonce: u64,
    pub proposed_by: Addr,
    pub signature_count: u32,
}

#[cw_serde]
pub struct SignaturesResponse {
    pub signers: Vec<Binary>,
    pub threshold: u32,
}
