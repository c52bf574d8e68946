//! Merkle manifest: leaf hashing, proof verification and tree construction.
//!
//! Pairs are hashed in sorted order (`keccak256(min(a, b) ‖ max(a, b))`), so a
//! proof is just the ordered list of sibling hashes from leaf to root; no
//! left/right flags are needed. Trees are built over sorted leaves and an odd
//! node at the end of a layer is promoted unchanged to the next layer. Build
//! and verify must agree on both conventions.

use crate::hash::{address_word, keccak256, typed_digest, Bytes32};

/// Leaf committed for an approved asset address.
///
/// `keccak256(keccak256(0x19 ‖ 0x01 ‖ domain ‖ keccak256(address_word)))`
pub fn allocation_leaf(domain_separator: &Bytes32, asset: &str) -> Bytes32 {
    let inner = typed_digest(domain_separator, &keccak256(&address_word(asset)));
    keccak256(&inner)
}

/// Hash two nodes in sorted order.
pub fn hash_pair(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    let mut data = [0u8; 64];
    if a <= b {
        data[..32].copy_from_slice(a);
        data[32..].copy_from_slice(b);
    } else {
        data[..32].copy_from_slice(b);
        data[32..].copy_from_slice(a);
    }
    keccak256(&data)
}

/// Walk `proof` upwards from `leaf` and return the resulting root.
pub fn process_proof(leaf: &Bytes32, proof: &[Bytes32]) -> Bytes32 {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// True iff `proof` links `leaf` to `root`.
pub fn verify(proof: &[Bytes32], root: &Bytes32, leaf: &Bytes32) -> bool {
    process_proof(leaf, proof) == *root
}

/// In-memory tree used by off-chain tooling and tests to produce roots and
/// proofs that [`verify`] accepts.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    layers: Vec<Vec<Bytes32>>,
}

impl MerkleTree {
    pub fn new(mut leaves: Vec<Bytes32>) -> Self {
        leaves.sort_unstable();

        let mut layers = vec![leaves];
        while layers.last().map_or(false, |layer| layer.len() > 1) {
            let current = &layers[layers.len() - 1];
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }
        Self { layers }
    }

    /// Tree over the allocation leaves of `assets` for one contract instance.
    pub fn from_assets<S: AsRef<str>>(domain_separator: &Bytes32, assets: &[S]) -> Self {
        Self::new(
            assets
                .iter()
                .map(|asset| allocation_leaf(domain_separator, asset.as_ref()))
                .collect(),
        )
    }

    /// Root hash; all zeros for an empty tree.
    pub fn root(&self) -> Bytes32 {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    pub fn leaves(&self) -> &[Bytes32] {
        &self.layers[0]
    }

    /// Sibling path for `leaf`, or `None` if the leaf is not in the tree.
    pub fn proof(&self, leaf: &Bytes32) -> Option<Vec<Bytes32>> {
        let mut index = self.layers[0].iter().position(|l| l == leaf)?;
        let mut proof = Vec::with_capacity(self.layers.len());
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = if index % 2 == 1 { index - 1 } else { index + 1 };
            if let Some(node) = layer.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }
        Some(proof)
    }

    /// Proof for an asset address of this instance.
    pub fn asset_proof(&self, domain_separator: &Bytes32, asset: &str) -> Option<Vec<Bytes32>> {
        self.proof(&allocation_leaf(domain_separator, asset))
    }
}
