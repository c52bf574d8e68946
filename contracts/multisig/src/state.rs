//! State definitions for the signature gate

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

use common::Bytes32;

/// Gate configuration
#[cw_serde]
pub struct Config {
    /// Signatures required to forward a transaction
    pub threshold: u32,
    pub owner_count: u32,
    /// Denom of the `value` attached to forwarded calls
    pub native_denom: String,
}

/// A proposed call awaiting signatures.
///
/// Keyed by its transaction hash, which commits to `nonce`; once any
/// transaction executes, records proposed at an older nonce are stale.
#[cw_serde]
pub struct PendingTransaction {
    pub to: Addr,
    pub value: Uint128,
    pub data: Binary,
    pub nonce: u64,
    pub proposed_by: Addr,
}

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:multisig";
pub const CONTRACT_VERSION: &str = "1.0.0";

/// Length of an ed25519 public key
pub const PUBKEY_LEN: usize = 32;

pub const CONFIG: Item<Config> = Item::new("config");
pub const NONCE: Item<u64> = Item::new("nonce");
pub const DOMAIN_SEPARATOR: Item<Bytes32> = Item::new("domain_separator");

/// Key: ed25519 public key, Value: always true
pub const OWNERS: Map<&[u8], bool> = Map::new("owners");

/// Key: pending id (transaction hash)
pub const PENDING: Map<&[u8], PendingTransaction> = Map::new("pending");

/// Key: (pending id, signer public key), Value: signature
pub const SIGNATURES: Map<(&[u8], &[u8]), Binary> = Map::new("signatures");
