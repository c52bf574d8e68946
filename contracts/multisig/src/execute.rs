//! Execute handlers for the signature gate.
//!
//! Signatures accumulate per pending transaction in a map keyed by signer,
//! so submissions commute and a repeat from the same signer changes nothing.
//! Forwarded calls are plain messages: a failing target reverts the whole
//! transaction, nonce increment included.

use std::collections::BTreeSet;

use common::bytes32_to_hex;
use common::hash::transaction_hash;
use common::Bytes32;
use cosmwasm_std::{
    coins, Addr, Api, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdResult, Storage, Uint128, WasmMsg,
};

use crate::error::ContractError;
use crate::msg::SignatureEntry;
use crate::state::{
    PendingTransaction, CONFIG, DOMAIN_SEPARATOR, NONCE, OWNERS, PENDING, SIGNATURES,
};

/// Result of a signature submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureOutcome {
    Accepted,
    Duplicate,
}

impl SignatureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureOutcome::Accepted => "accepted",
            SignatureOutcome::Duplicate => "duplicate",
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn parse_bytes32(value: &Binary) -> Result<Bytes32, ContractError> {
    value
        .to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: value.len() })
}

/// Hash owners sign for `(to, value, data)` at `nonce`.
pub(crate) fn compute_transaction_hash(
    deps: Deps,
    to: &Addr,
    value: Uint128,
    data: &Binary,
    nonce: u64,
) -> StdResult<Bytes32> {
    let domain = DOMAIN_SEPARATOR.load(deps.storage)?;
    Ok(transaction_hash(
        &domain,
        to.as_str(),
        value.u128(),
        data.as_slice(),
        nonce,
    ))
}

/// Check that `signer` is an owner and that `signature` authenticates it
/// over `hash`.
fn verify_owner_signature(
    storage: &dyn Storage,
    api: &dyn Api,
    hash: &Bytes32,
    signer: &Binary,
    signature: &Binary,
) -> Result<(), ContractError> {
    if !OWNERS.has(storage, signer.as_slice()) {
        return Err(ContractError::UnknownSigner {
            signer: hex::encode(signer.as_slice()),
        });
    }
    // Malformed keys or signatures count as invalid, not as host errors
    let valid = api
        .ed25519_verify(hash, signature.as_slice(), signer.as_slice())
        .unwrap_or(false);
    if !valid {
        return Err(ContractError::InvalidSignature {
            signer: hex::encode(signer.as_slice()),
        });
    }
    Ok(())
}

fn signers_of(storage: &dyn Storage, pending_id: &Bytes32) -> StdResult<Vec<Vec<u8>>> {
    SIGNATURES
        .prefix(pending_id.as_slice())
        .keys(storage, None, None, Order::Ascending)
        .collect()
}

fn forward_message(to: &Addr, value: Uint128, data: Binary, denom: &str) -> CosmosMsg {
    let funds = if value.is_zero() {
        vec![]
    } else {
        coins(value.u128(), denom)
    };
    CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: to.to_string(),
        msg: data,
        funds,
    })
}

/// Advance the nonce; returns the nonce the executed transaction used.
fn consume_nonce(storage: &mut dyn Storage) -> StdResult<u64> {
    let nonce = NONCE.load(storage)?;
    NONCE.save(storage, &(nonce + 1))?;
    Ok(nonce)
}

// ============================================================================
// Pending Transactions
// ============================================================================

pub fn execute_propose_transaction(
    deps: DepsMut,
    info: MessageInfo,
    to: String,
    value: Uint128,
    data: Binary,
) -> Result<Response, ContractError> {
    let to = deps.api.addr_validate(&to)?;
    let nonce = NONCE.load(deps.storage)?;
    let pending_id = compute_transaction_hash(deps.as_ref(), &to, value, &data, nonce)?;

    let created = if PENDING.has(deps.storage, &pending_id) {
        false
    } else {
        PENDING.save(
            deps.storage,
            &pending_id,
            &PendingTransaction {
                to: to.clone(),
                value,
                data,
                nonce,
                proposed_by: info.sender,
            },
        )?;
        true
    };

    Ok(Response::new()
        .add_attribute("method", "propose_transaction")
        .add_attribute("pending_id", bytes32_to_hex(&pending_id))
        .add_attribute("to", to)
        .add_attribute("value", value.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("created", created.to_string()))
}

pub fn execute_submit_signature(
    deps: DepsMut,
    pending_id: Binary,
    signer: Binary,
    signature: Binary,
) -> Result<Response, ContractError> {
    let id = parse_bytes32(&pending_id)?;
    if !PENDING.has(deps.storage, &id) {
        return Err(ContractError::UnknownTransaction {
            pending_id: bytes32_to_hex(&id),
        });
    }

    verify_owner_signature(deps.storage, deps.api, &id, &signer, &signature)?;

    let key = (id.as_slice(), signer.as_slice());
    let outcome = if SIGNATURES.has(deps.storage, key) {
        SignatureOutcome::Duplicate
    } else {
        SIGNATURES.save(deps.storage, key, &signature)?;
        SignatureOutcome::Accepted
    };
    let count = signers_of(deps.storage, &id)?.len();

    Ok(Response::new()
        .add_attribute("method", "submit_signature")
        .add_attribute("pending_id", bytes32_to_hex(&id))
        .add_attribute("signer", hex::encode(signer.as_slice()))
        .add_attribute("outcome", outcome.as_str())
        .add_attribute("signature_count", count.to_string()))
}

pub fn execute_try_execute(deps: DepsMut, pending_id: Binary) -> Result<Response, ContractError> {
    let id = parse_bytes32(&pending_id)?;
    let pending = PENDING
        .may_load(deps.storage, &id)?
        .ok_or_else(|| ContractError::UnknownTransaction {
            pending_id: bytes32_to_hex(&id),
        })?;

    let current = NONCE.load(deps.storage)?;
    if pending.nonce != current {
        return Err(ContractError::StaleNonce {
            proposed: pending.nonce,
            current,
        });
    }

    let config = CONFIG.load(deps.storage)?;
    let signers = signers_of(deps.storage, &id)?;
    let got = signers.len() as u32;
    if got < config.threshold {
        return Err(ContractError::InsufficientSignatures {
            got,
            required: config.threshold,
        });
    }

    let nonce = consume_nonce(deps.storage)?;
    for signer in &signers {
        SIGNATURES.remove(deps.storage, (id.as_slice(), signer.as_slice()));
    }
    PENDING.remove(deps.storage, &id);

    Ok(Response::new()
        .add_message(forward_message(
            &pending.to,
            pending.value,
            pending.data,
            &config.native_denom,
        ))
        .add_attribute("method", "try_execute")
        .add_attribute("pending_id", bytes32_to_hex(&id))
        .add_attribute("to", pending.to)
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("signature_count", got.to_string()))
}

// ============================================================================
// Signature Bundle
// ============================================================================

pub fn execute_exec_transaction(
    deps: DepsMut,
    to: String,
    value: Uint128,
    data: Binary,
    signatures: Vec<SignatureEntry>,
) -> Result<Response, ContractError> {
    let to = deps.api.addr_validate(&to)?;
    let config = CONFIG.load(deps.storage)?;
    let nonce = NONCE.load(deps.storage)?;
    let hash = compute_transaction_hash(deps.as_ref(), &to, value, &data, nonce)?;

    // Repeated signers are counted once
    let mut signers = BTreeSet::new();
    for entry in &signatures {
        if signers.contains(entry.signer.as_slice()) {
            continue;
        }
        verify_owner_signature(deps.storage, deps.api, &hash, &entry.signer, &entry.signature)?;
        signers.insert(entry.signer.to_vec());
    }

    let got = signers.len() as u32;
    if got < config.threshold {
        return Err(ContractError::InsufficientSignatures {
            got,
            required: config.threshold,
        });
    }

    consume_nonce(deps.storage)?;

    Ok(Response::new()
        .add_message(forward_message(&to, value, data, &config.native_denom))
        .add_attribute("method", "exec_transaction")
        .add_attribute("tx_hash", bytes32_to_hex(&hash))
        .add_attribute("to", to)
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("signature_count", got.to_string()))
}

/// Domain separator of this gate instance.
pub(crate) fn gate_domain(env: &Env) -> Bytes32 {
    common::hash::gate_domain_separator(&env.block.chain_id, env.contract.address.as_str())
}
