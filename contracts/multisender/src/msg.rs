//! Message types for the Multisender contract
//!
//! Timelock, governance, allocation and distribution messages, plus the
//! `Call` builder used by orchestrators to nest a contract call inside a
//! schedule/execute pair.

use common::hash::{operation_id, CallRef};
use common::{AssetKind, Bytes32};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, Binary, StdResult, Timestamp, Uint128};
use serde::Serialize;

use crate::state::{OperationState, Role};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Name mixed into the domain separator
    pub name: String,
    /// Version mixed into the domain separator
    pub version: String,
    /// Per-deployment salt mixed into the domain separator
    pub deployment_salt: u64,
    /// Minimum delay in seconds for scheduled operations
    pub min_delay: u64,
    /// Accounts allowed to schedule and cancel
    pub proposers: Vec<String>,
    /// Accounts allowed to execute ready operations
    pub executors: Vec<String>,
    /// Native denom distributed by `DropNativeCoin` and forwarded as call value
    pub native_denom: String,
    /// Bootstrap governance admin (defaults to the instantiator)
    pub admin: Option<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// A single timelocked contract call.
#[cw_serde]
pub struct Call {
    /// Contract to execute
    pub target: String,
    /// Native coins (configured denom) attached to the call
    pub value: Uint128,
    /// JSON execute message for `target`
    pub payload: Binary,
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Timelock
    // ========================================================================
    /// Schedule a call to become executable after `delay` seconds (proposers)
    Schedule {
        target: String,
        value: Uint128,
        payload: Binary,
        /// Operation that must be done before this one (32 bytes, optional)
        predecessor: Option<Binary>,
        /// Disambiguates otherwise identical operations (32 bytes, optional)
        salt: Option<Binary>,
        delay: u64,
    },

    /// Schedule an ordered list of calls as one operation (proposers)
    ScheduleBatch {
        calls: Vec<Call>,
        predecessor: Option<Binary>,
        salt: Option<Binary>,
        delay: u64,
    },

    /// Execute a ready operation (executors)
    Execute {
        target: String,
        value: Uint128,
        payload: Binary,
        predecessor: Option<Binary>,
        salt: Option<Binary>,
    },

    /// Execute a ready batch operation (executors)
    ExecuteBatch {
        calls: Vec<Call>,
        predecessor: Option<Binary>,
        salt: Option<Binary>,
    },

    /// Cancel a pending operation (proposers)
    Cancel { operation_id: Binary },

    /// Update the minimum delay (self only)
    UpdateDelay { min_delay: u64 },

    /// Grant a timelock role (self, or governance admin before hand-over)
    GrantRole { role: Role, account: String },

    /// Revoke a timelock role (self, or governance admin before hand-over)
    RevokeRole { role: Role, account: String },

    // ========================================================================
    // Governance
    // ========================================================================
    /// Hand the governance record to a new admin; allowed once
    TransferGovernance { new_admin: String },

    // ========================================================================
    // Allocation Manifest (self only)
    // ========================================================================
    /// Commit a new campaign and pull its budgets into custody.
    /// The coin budget must be attached as funds.
    SeedNewAllocations {
        /// Merkle root over the approved asset addresses (32 bytes)
        root: Binary,
        /// Account the token and NFT budgets are pulled from
        admin: String,
        token_asset: String,
        nft_asset: String,
        coin_budget: Uint128,
        token_budget: Uint128,
        nft_token_ids: Vec<String>,
    },

    // ========================================================================
    // Distribution (self only)
    // ========================================================================
    /// Send native coins to each receiver
    DropNativeCoin {
        receivers: Vec<String>,
        amounts: Vec<Uint128>,
    },

    /// Send the manifest's CW20 token to each receiver
    DropToken {
        receivers: Vec<String>,
        token: String,
        amounts: Vec<Uint128>,
        proof: Vec<Binary>,
    },

    /// Send groups of manifest NFTs, one group per receiver
    DropNft721 {
        receivers: Vec<String>,
        nft: String,
        token_ids: Vec<Vec<String>>,
        proof: Vec<Binary>,
    },
}

impl Call {
    pub fn new(target: impl Into<String>, value: Uint128, payload: Binary) -> Self {
        Self {
            target: target.into(),
            value,
            payload,
        }
    }

    /// Call into the timelock contract itself, e.g. a manifest or drop message.
    pub fn to_self<T: Serialize>(contract: &Addr, msg: &T, value: Uint128) -> StdResult<Self> {
        Ok(Self::new(contract.as_str(), value, to_json_binary(msg)?))
    }

    pub fn call_ref(&self) -> CallRef<'_> {
        CallRef {
            target: &self.target,
            value: self.value.u128(),
            payload: self.payload.as_slice(),
        }
    }

    /// Id the timelock assigns to this call.
    pub fn operation_id(&self, predecessor: Option<Bytes32>, salt: Option<Bytes32>) -> Bytes32 {
        operation_id(
            self.call_ref(),
            &predecessor.unwrap_or_default(),
            &salt.unwrap_or_default(),
        )
    }

    pub fn schedule_msg(
        &self,
        predecessor: Option<Bytes32>,
        salt: Option<Bytes32>,
        delay: u64,
    ) -> ExecuteMsg {
        ExecuteMsg::Schedule {
            target: self.target.clone(),
            value: self.value,
            payload: self.payload.clone(),
            predecessor: predecessor.map(|p| Binary::from(p.to_vec())),
            salt: salt.map(|s| Binary::from(s.to_vec())),
            delay,
        }
    }

    pub fn execute_msg(&self, predecessor: Option<Bytes32>, salt: Option<Bytes32>) -> ExecuteMsg {
        ExecuteMsg::Execute {
            target: self.target.clone(),
            value: self.value,
            payload: self.payload.clone(),
            predecessor: predecessor.map(|p| Binary::from(p.to_vec())),
            salt: salt.map(|s| Binary::from(s.to_vec())),
        }
    }
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns the governance record
    #[returns(GovernanceResponse)]
    Governance {},

    #[returns(HasRoleResponse)]
    HasRole { role: Role, account: String },

    /// Returns all active proposers and executors
    #[returns(RolesResponse)]
    Roles {},

    // ========================================================================
    // Timelock Queries
    // ========================================================================
    /// Returns the derived state and raw timestamp of an operation
    #[returns(OperationStateResponse)]
    OperationState { operation_id: Binary },

    /// Returns the raw timestamp (0 = unset, 1 = done)
    #[returns(TimestampResponse)]
    Timestamp { operation_id: Binary },

    /// True if the operation exists (pending, ready or done)
    #[returns(bool)]
    IsOperation { operation_id: Binary },

    #[returns(bool)]
    IsOperationPending { operation_id: Binary },

    #[returns(bool)]
    IsOperationReady { operation_id: Binary },

    #[returns(bool)]
    IsOperationDone { operation_id: Binary },

    #[returns(MinDelayResponse)]
    MinDelay {},

    /// Compute the id of a single-call operation
    #[returns(OperationIdResponse)]
    HashOperation {
        target: String,
        value: Uint128,
        payload: Binary,
        predecessor: Option<Binary>,
        salt: Option<Binary>,
    },

    /// Compute the id of a batch operation
    #[returns(OperationIdResponse)]
    HashOperationBatch {
        calls: Vec<Call>,
        predecessor: Option<Binary>,
        salt: Option<Binary>,
    },

    // ========================================================================
    // Allocation Queries
    // ========================================================================
    /// Returns the current manifest, if any
    #[returns(Option<ManifestResponse>)]
    Manifest {},

    /// Returns the remaining budgets
    #[returns(BudgetsResponse)]
    Budgets {},

    #[returns(DomainSeparatorResponse)]
    DomainSeparator {},

    /// Check a Merkle proof for an asset against the current root
    #[returns(VerifyAllocationResponse)]
    VerifyAllocation { asset: String, proof: Vec<Binary> },

    #[returns(IsAllocatedResponse)]
    IsAllocated { token_id: String },

    /// Lists NFT ids still allocated
    #[returns(AllocatedTokenIdsResponse)]
    AllocatedTokenIds {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub name: String,
    pub version: String,
    pub native_denom: String,
    pub min_delay: u64,
}

#[cw_serde]
pub struct GovernanceResponse {
    pub admin: Addr,
    pub transferred_at: Option<Timestamp>,
}

#[cw_serde]
pub struct HasRoleResponse {
    pub has_role: bool,
}

#[cw_serde]
pub struct RolesResponse {
    pub proposers: Vec<Addr>,
    pub executors: Vec<Addr>,
}

#[cw_serde]
pub struct OperationStateResponse {
    pub operation_id: Binary,
    pub state: OperationState,
    pub timestamp: u64,
}

#[cw_serde]
pub struct TimestampResponse {
    pub timestamp: u64,
}

#[cw_serde]
pub struct MinDelayResponse {
    pub min_delay: u64,
}

#[cw_serde]
pub struct OperationIdResponse {
    pub operation_id: Binary,
}

#[cw_serde]
pub struct ManifestResponse {
    pub root: Binary,
    pub seeded_at: Timestamp,
    pub admin: Addr,
    pub coin_budget: Uint128,
    pub token_asset: Addr,
    pub token_budget: Uint128,
    pub nft_asset: Addr,
    pub nft_remaining: u64,
}

/// Remaining budget per asset kind; all zero before seeding
#[cw_serde]
pub struct BudgetsResponse {
    pub coin_budget: Uint128,
    pub token_budget: Uint128,
    pub nft_remaining: u64,
}

#[cw_serde]
pub struct DomainSeparatorResponse {
    pub domain_separator: Binary,
}

#[cw_serde]
pub struct VerifyAllocationResponse {
    pub valid: bool,
    /// Kind the asset is allocated as under the current manifest, if any
    pub kind: Option<AssetKind>,
}

#[cw_serde]
pub struct IsAllocatedResponse {
    pub allocated: bool,
}

#[cw_serde]
pub struct AllocatedTokenIdsResponse {
    pub token_ids: Vec<String>,
}
