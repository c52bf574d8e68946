//! Hash computation shared by the timelock, the allocation manifest and the
//! signature gate.
//!
//! Everything here follows Solidity `abi.encode` layout (32-byte big-endian
//! words, dynamic values behind offsets) hashed with keccak256, so ids can be
//! reproduced by any EVM-style tooling.
//!
//! # Operation id
//! `keccak256(abi.encode(bytes32 target, uint256 value, bytes payload, bytes32 predecessor, bytes32 salt))`
//!
//! # Byte Layout (single operation)
//! - Bytes 0-31:    target (address word)
//! - Bytes 32-63:   value (uint256, big-endian, left-padded)
//! - Bytes 64-95:   offset of payload (always 0xa0)
//! - Bytes 96-127:  predecessor
//! - Bytes 128-159: salt
//! - Bytes 160-191: payload length
//! - Bytes 192-..:  payload, right-padded to a 32-byte boundary

use tiny_keccak::{Hasher, Keccak};

/// 32-byte hash or word.
pub type Bytes32 = [u8; 32];

/// Encodes "no predecessor" and "no salt".
pub const ZERO_BYTES32: Bytes32 = [0u8; 32];

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,bytes32 chainKey,uint256 salt,bytes32 verifyingContract)";
const GATE_DOMAIN_TYPE: &[u8] = b"GateDomain(bytes32 chainKey,bytes32 verifyingContract)";
const GATE_TX_TYPE: &[u8] = b"GateTx(bytes32 to,uint256 value,bytes data,uint256 nonce)";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> Bytes32 {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Encode a bech32 address (or denom) as a 32-byte word.
///
/// Bech32 strings do not fit an EVM address slot, so the word is the keccak
/// of the UTF-8 string. Callers must pass the normalized (validated) form.
pub fn address_word(address: &str) -> Bytes32 {
    keccak256(address.as_bytes())
}

/// Chain key for a Cosmos chain id (e.g. "columbus-5").
pub fn chain_key(chain_id: &str) -> Bytes32 {
    keccak256(chain_id.as_bytes())
}

/// A call as seen by the hashing layer.
#[derive(Clone, Copy, Debug)]
pub struct CallRef<'a> {
    pub target: &'a str,
    pub value: u128,
    pub payload: &'a [u8],
}

/// Content hash identifying a single timelock operation.
pub fn operation_id(
    call: CallRef<'_>,
    predecessor: &Bytes32,
    salt: &Bytes32,
) -> Bytes32 {
    let mut data = Vec::with_capacity(192 + padded_len(call.payload.len()));
    data.extend_from_slice(&address_word(call.target));
    data.extend_from_slice(&uint_word(call.value));
    data.extend_from_slice(&uint_word(5 * 32));
    data.extend_from_slice(predecessor);
    data.extend_from_slice(salt);
    data.extend(encode_bytes(call.payload));
    keccak256(&data)
}

/// Content hash identifying a batch operation.
///
/// Matches `keccak256(abi.encode(bytes32[] targets, uint256[] values, bytes[] payloads, bytes32 predecessor, bytes32 salt))`.
pub fn operation_batch_id(
    calls: &[CallRef<'_>],
    predecessor: &Bytes32,
    salt: &Bytes32,
) -> Bytes32 {
    let n = calls.len() as u128;

    let mut targets = uint_word(n).to_vec();
    let mut values = uint_word(n).to_vec();
    for call in calls {
        targets.extend_from_slice(&address_word(call.target));
        values.extend_from_slice(&uint_word(call.value));
    }
    let payloads: Vec<&[u8]> = calls.iter().map(|c| c.payload).collect();
    let payloads = encode_bytes_array(&payloads);

    let targets_offset = 5 * 32;
    let values_offset = targets_offset + targets.len() as u128;
    let payloads_offset = values_offset + values.len() as u128;

    let mut data = Vec::with_capacity(160 + targets.len() + values.len() + payloads.len());
    data.extend_from_slice(&uint_word(targets_offset));
    data.extend_from_slice(&uint_word(values_offset));
    data.extend_from_slice(&uint_word(payloads_offset));
    data.extend_from_slice(predecessor);
    data.extend_from_slice(salt);
    data.extend(targets);
    data.extend(values);
    data.extend(payloads);
    keccak256(&data)
}

/// Domain separator of a multisender instance.
///
/// Binds leaves and digests to the contract name/version, the chain, a
/// deployment salt and the contract address.
pub fn domain_separator(
    name: &str,
    version: &str,
    chain_id: &str,
    deployment_salt: u64,
    contract: &str,
) -> Bytes32 {
    let mut data = [0u8; 192];
    data[0..32].copy_from_slice(&keccak256(DOMAIN_TYPE));
    data[32..64].copy_from_slice(&keccak256(name.as_bytes()));
    data[64..96].copy_from_slice(&keccak256(version.as_bytes()));
    data[96..128].copy_from_slice(&chain_key(chain_id));
    data[128..160].copy_from_slice(&uint_word(deployment_salt as u128));
    data[160..192].copy_from_slice(&address_word(contract));
    keccak256(&data)
}

/// Domain separator of a signature gate instance.
pub fn gate_domain_separator(chain_id: &str, contract: &str) -> Bytes32 {
    let mut data = [0u8; 96];
    data[0..32].copy_from_slice(&keccak256(GATE_DOMAIN_TYPE));
    data[32..64].copy_from_slice(&chain_key(chain_id));
    data[64..96].copy_from_slice(&address_word(contract));
    keccak256(&data)
}

/// `keccak256(0x19 ‖ 0x01 ‖ domain ‖ struct_hash)`
pub fn typed_digest(domain: &Bytes32, struct_hash: &Bytes32) -> Bytes32 {
    let mut data = [0u8; 66];
    data[0] = 0x19;
    data[1] = 0x01;
    data[2..34].copy_from_slice(domain);
    data[34..66].copy_from_slice(struct_hash);
    keccak256(&data)
}

/// Canonical hash of a gate transaction; this is what owners sign.
pub fn transaction_hash(domain: &Bytes32, to: &str, value: u128, data: &[u8], nonce: u64) -> Bytes32 {
    let mut encoded = [0u8; 160];
    encoded[0..32].copy_from_slice(&keccak256(GATE_TX_TYPE));
    encoded[32..64].copy_from_slice(&address_word(to));
    encoded[64..96].copy_from_slice(&uint_word(value));
    encoded[96..128].copy_from_slice(&keccak256(data));
    encoded[128..160].copy_from_slice(&uint_word(nonce as u128));
    typed_digest(domain, &keccak256(&encoded))
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &Bytes32) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse hex string (with or without 0x prefix) to 32-byte array
pub fn hex_to_bytes32(hex: &str) -> Result<Bytes32, &'static str> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() != 64 {
        return Err("Invalid hex length: expected 64 characters");
    }
    let bytes = hex::decode(hex).map_err(|_| "Invalid hex character")?;
    let mut result = [0u8; 32];
    result.copy_from_slice(&bytes);
    Ok(result)
}

// ============================================================================
// Internal helpers
// ============================================================================

/// uint256 word, big-endian, left-padded
fn uint_word(value: u128) -> Bytes32 {
    let mut word = [0u8; 32];
    word[16..32].copy_from_slice(&value.to_be_bytes());
    word
}

fn padded_len(len: usize) -> usize {
    ((len + 31) / 32) * 32
}

/// Dynamic `bytes` tail: length word followed by right-padded data.
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 32 + padded_len(data.len())];
    out[0..32].copy_from_slice(&uint_word(data.len() as u128));
    out[32..32 + data.len()].copy_from_slice(data);
    out
}

/// Dynamic `bytes[]` tail: length, per-element offsets, then element tails.
fn encode_bytes_array(items: &[&[u8]]) -> Vec<u8> {
    let mut heads = Vec::with_capacity(32 * items.len());
    let mut tails = Vec::new();
    let mut offset = 32 * items.len();
    for item in items {
        heads.extend_from_slice(&uint_word(offset as u128));
        let tail = encode_bytes(item);
        offset += tail.len();
        tails.extend(tail);
    }

    let mut out = uint_word(items.len() as u128).to_vec();
    out.extend(heads);
    out.extend(tails);
    out
}
