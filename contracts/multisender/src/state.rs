//! State definitions for the Multisender contract
//!
//! Storage for the timelock operation table, the role sets, the governance
//! record and the allocation manifest.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use common::Bytes32;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Name mixed into the domain separator
    pub name: String,
    /// Version mixed into the domain separator
    pub version: String,
    /// Denom of the native coin distributed by `DropNativeCoin`
    pub native_denom: String,
    /// Minimum delay in seconds between schedule and execute
    pub min_delay: u64,
}

/// Governance record
///
/// `admin` holds the bootstrap capability (role management) until it is
/// handed over once, normally to the contract itself.
#[cw_serde]
pub struct Governance {
    pub admin: Addr,
    pub transferred_at: Option<Timestamp>,
}

/// Timelock roles
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    Proposer,
    Executor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Proposer => write!(f, "proposer"),
            Role::Executor => write!(f, "executor"),
        }
    }
}

// ============================================================================
// Timelock
// ============================================================================

/// Sentinel timestamp marking an executed operation.
pub const DONE_TIMESTAMP: u64 = 1;

/// Lifecycle of a timelock operation.
///
/// Never stored: always derived from the operation's ready timestamp.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum OperationState {
    Unset,
    Pending,
    Ready,
    Done,
}

impl OperationState {
    pub fn from_timestamp(timestamp: u64, now: u64) -> Self {
        match timestamp {
            0 => OperationState::Unset,
            DONE_TIMESTAMP => OperationState::Done,
            ready_at if ready_at > now => OperationState::Pending,
            _ => OperationState::Ready,
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationState::Unset => write!(f, "unset"),
            OperationState::Pending => write!(f, "pending"),
            OperationState::Ready => write!(f, "ready"),
            OperationState::Done => write!(f, "done"),
        }
    }
}

// ============================================================================
// Allocation Manifest
// ============================================================================

/// Committed distribution campaign.
///
/// The budgets are the only fields that change after seeding; NFT ids live
/// in `ALLOCATED_NFTS` with `nft_remaining` tracking their count.
#[cw_serde]
pub struct AllocationManifest {
    /// Merkle root over the approved asset addresses
    pub root: Binary,
    pub seeded_at: Timestamp,
    /// Account the token and NFT budgets were pulled from
    pub admin: Addr,
    pub coin_budget: Uint128,
    pub token_asset: Addr,
    pub token_budget: Uint128,
    pub nft_asset: Addr,
    pub nft_remaining: u64,
}

impl AllocationManifest {
    pub fn has_unspent_budget(&self) -> bool {
        !self.coin_budget.is_zero() || !self.token_budget.is_zero() || self.nft_remaining > 0
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:multisender";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "1.0.0";

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

pub const GOVERNANCE: Item<Governance> = Item::new("governance");

/// Domain separator computed at instantiation
pub const DOMAIN_SEPARATOR: Item<Bytes32> = Item::new("domain_separator");

/// Key: account, Value: whether active
pub const PROPOSERS: Map<&Addr, bool> = Map::new("proposers");
pub const EXECUTORS: Map<&Addr, bool> = Map::new("executors");

/// Operation table
/// Key: 32-byte operation id, Value: ready timestamp (seconds) or `DONE_TIMESTAMP`
pub const TIMESTAMPS: Map<&[u8], u64> = Map::new("timestamps");

pub const MANIFEST: Item<AllocationManifest> = Item::new("manifest");

/// NFT ids still allocated under the current manifest
/// Key: token id, Value: always true
pub const ALLOCATED_NFTS: Map<&str, bool> = Map::new("allocated_nfts");

pub fn role_map(role: Role) -> Map<'static, &'static Addr, bool> {
    match role {
        Role::Proposer => PROPOSERS,
        Role::Executor => EXECUTORS,
    }
}
