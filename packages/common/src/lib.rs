//! Common - Shared Types and Utilities for the Multisender Contracts
//!
//! This package provides the hashing conventions, Merkle manifest helpers and
//! asset transfer types shared by the `multisender` (timelock + allocation
//! manifest + distribution) and `multisig` (threshold signature gate)
//! contracts. Off-chain tooling links the same code so that operation ids,
//! transaction hashes and Merkle proofs are built exactly the way the
//! contracts verify them.

pub mod asset;
pub mod hash;
pub mod merkle;

pub use asset::{Asset, AssetKind};
pub use hash::{bytes32_to_hex, hex_to_bytes32, keccak256, Bytes32};
pub use merkle::MerkleTree;
